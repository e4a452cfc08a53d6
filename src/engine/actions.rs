//! Player-facing commands and the operator override surface.
//!
//! Commands validate against current state and reject with a clear
//! condition; they never apply lifecycle transitions themselves. All
//! forward progress (law closure, round and battle resolution, war
//! expiry) belongs to the reconciliation passes.

use super::battles::{BattleOutcome, complete_battle};
use super::config::EngineConfig;
use super::laws::close_law;
use super::rounds::{RoundOutcome, complete_round};
use super::services::Services;
use crate::error::{ActionError, EngineError};
use crate::model::{
    AllianceStatus, Ballot, BattleStatus, DamageRecord, JointKind, JournalKind, LawKind,
    LawStatus, Participation, RoundStatus, Side, Timestamp, WarStatus, World,
};

fn require_country(world: &World, id: u64) -> Result<(), ActionError> {
    if world.countries.contains_key(&id) {
        Ok(())
    } else {
        Err(ActionError::NotFound {
            entity: "country",
            id,
        })
    }
}

fn record_proposal(world: &mut World, law_id: u64, what: &str) {
    world.record(
        JournalKind::LawProposed { law_id },
        format!("law {law_id} proposed: {what}"),
    );
}

// -- Law pipeline commands --

/// Put a war declaration to the vote. The declaration is also re-checked
/// at execution time; this early rejection just keeps obviously dead
/// proposals out of the pipeline.
pub fn propose_war(
    world: &mut World,
    config: &EngineConfig,
    country_id: u64,
    defender_id: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    require_country(world, country_id)?;
    require_country(world, defender_id)?;
    if country_id == defender_id {
        return Err(ActionError::SelfWar(country_id));
    }
    if world.open_war_between(country_id, defender_id).is_some() {
        return Err(ActionError::DuplicateWar(country_id, defender_id));
    }
    let law_id = world.add_law(
        country_id,
        LawKind::DeclareWar { defender_id },
        proposed_by,
        now,
        now.plus_hours(config.law_voting_hours),
    );
    record_proposal(world, law_id, "declare war");
    Ok(law_id)
}

/// Cast a ballot on an open law. One ballot per voter; a closed or
/// expired voting window rejects rather than silently dropping the vote.
pub fn cast_vote(
    world: &mut World,
    law_id: u64,
    voter_id: u64,
    approve: bool,
    now: Timestamp,
) -> Result<(), ActionError> {
    let law = world.laws.get_mut(&law_id).ok_or(ActionError::NotFound {
        entity: "law",
        id: law_id,
    })?;
    if law.status != LawStatus::Voting || now >= law.voting_ends_at {
        return Err(ActionError::VotingClosed(law_id));
    }
    if law.has_voted(voter_id) {
        return Err(ActionError::AlreadyVoted {
            law_id,
            user_id: voter_id,
        });
    }
    law.ballots.push(Ballot {
        voter_id,
        approve,
        cast_at: now,
    });
    Ok(())
}

/// Open a peace accord: one linked ProposePeace law in each belligerent
/// country, resolved jointly. The war is parked in PEACE_PROPOSED until
/// the accord resolves.
pub fn propose_peace(
    world: &mut World,
    config: &EngineConfig,
    war_id: u64,
    proposer_country: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    let (status, attacker_id, defender_id) = {
        let war = world.wars.get(&war_id).ok_or(ActionError::NotFound {
            entity: "war",
            id: war_id,
        })?;
        (war.status, war.attacker_id, war.defender_id)
    };
    if status != WarStatus::Active {
        return Err(ActionError::WarNotActive(war_id));
    }
    if proposer_country != attacker_id && proposer_country != defender_id {
        return Err(ActionError::NotABelligerent {
            war_id,
            country_id: proposer_country,
        });
    }

    let ends = now.plus_hours(config.law_voting_hours);
    let first = world.add_law(
        attacker_id,
        LawKind::ProposePeace { war_id },
        proposed_by,
        now,
        ends,
    );
    let second = world.add_law(
        defender_id,
        LawKind::ProposePeace { war_id },
        proposed_by,
        now,
        ends,
    );
    let proposal_id =
        world.add_joint_proposal(JointKind::PeaceAccord { war_id }, first, second, ends);

    // Cannot fail: the war was just read as ACTIVE.
    world
        .transition_war(war_id, WarStatus::PeaceProposed)
        .map_err(|_| ActionError::WarNotActive(war_id))?;
    record_proposal(world, first, "peace accord");
    record_proposal(world, second, "peace accord");
    world.record(
        JournalKind::PeaceProposed { war_id },
        format!("peace proposed for war {war_id}"),
    );
    Ok(proposal_id)
}

/// Invite a country into an alliance: linked laws in the inviting
/// alliance's founder country and in the invited country.
pub fn propose_alliance_invite(
    world: &mut World,
    config: &EngineConfig,
    alliance_id: u64,
    inviter_country: u64,
    invited_id: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    require_country(world, invited_id)?;
    let alliance = world
        .alliances
        .get(&alliance_id)
        .ok_or(ActionError::NotFound {
            entity: "alliance",
            id: alliance_id,
        })?;
    if !alliance.is_member(inviter_country) {
        return Err(ActionError::NotAMember {
            alliance_id,
            country_id: inviter_country,
        });
    }
    if alliance.is_member(invited_id) {
        return Err(ActionError::AlreadyMember {
            alliance_id,
            country_id: invited_id,
        });
    }

    let ends = now.plus_hours(config.law_voting_hours);
    let invite = world.add_law(
        inviter_country,
        LawKind::AllianceInvite {
            alliance_id,
            invited_id,
        },
        proposed_by,
        now,
        ends,
    );
    let join = world.add_law(
        invited_id,
        LawKind::AllianceJoin { alliance_id },
        proposed_by,
        now,
        ends,
    );
    let proposal_id = world.add_joint_proposal(
        JointKind::AllianceInvitation {
            alliance_id,
            invited_id,
        },
        invite,
        join,
        ends,
    );
    record_proposal(world, invite, "alliance invitation");
    record_proposal(world, join, "alliance membership");
    Ok(proposal_id)
}

pub fn propose_alliance_kick(
    world: &mut World,
    config: &EngineConfig,
    alliance_id: u64,
    proposer_country: u64,
    member_id: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    let alliance = world
        .alliances
        .get(&alliance_id)
        .ok_or(ActionError::NotFound {
            entity: "alliance",
            id: alliance_id,
        })?;
    for country_id in [proposer_country, member_id] {
        if !alliance.is_member(country_id) {
            return Err(ActionError::NotAMember {
                alliance_id,
                country_id,
            });
        }
    }
    let law_id = world.add_law(
        proposer_country,
        LawKind::AllianceKick {
            alliance_id,
            member_id,
        },
        proposed_by,
        now,
        now.plus_hours(config.law_voting_hours),
    );
    record_proposal(world, law_id, "expel alliance member");
    Ok(law_id)
}

/// A passed leave law does not end the membership immediately; it queues
/// a departure that the alliance pass executes after the leave delay.
pub fn propose_alliance_leave(
    world: &mut World,
    config: &EngineConfig,
    alliance_id: u64,
    country_id: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    let alliance = world
        .alliances
        .get(&alliance_id)
        .ok_or(ActionError::NotFound {
            entity: "alliance",
            id: alliance_id,
        })?;
    if !alliance.is_member(country_id) {
        return Err(ActionError::NotAMember {
            alliance_id,
            country_id,
        });
    }
    let law_id = world.add_law(
        country_id,
        LawKind::AllianceLeave { alliance_id },
        proposed_by,
        now,
        now.plus_hours(config.law_voting_hours),
    );
    record_proposal(world, law_id, "leave alliance");
    Ok(law_id)
}

/// Put dissolution to a unanimous vote: one law per current member, all
/// tracked under a single dissolution record with a shared deadline.
pub fn propose_alliance_dissolution(
    world: &mut World,
    config: &EngineConfig,
    alliance_id: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    let members: Vec<u64> = {
        let alliance = world
            .alliances
            .get(&alliance_id)
            .ok_or(ActionError::NotFound {
                entity: "alliance",
                id: alliance_id,
            })?;
        if alliance.status != AllianceStatus::Active {
            return Err(ActionError::NotFound {
                entity: "alliance",
                id: alliance_id,
            });
        }
        alliance.active_members().map(|m| m.country_id).collect()
    };

    let ends = now.plus_hours(config.law_voting_hours);
    let mut member_laws = std::collections::BTreeMap::new();
    for country_id in members {
        let law_id = world.add_law(
            country_id,
            LawKind::AllianceDissolve { alliance_id },
            proposed_by,
            now,
            ends,
        );
        record_proposal(world, law_id, "dissolve alliance");
        member_laws.insert(country_id, law_id);
    }
    Ok(world.add_dissolution(alliance_id, member_laws, ends))
}

pub fn propose_embargo(
    world: &mut World,
    config: &EngineConfig,
    country_id: u64,
    target_id: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    require_country(world, country_id)?;
    require_country(world, target_id)?;
    let law_id = world.add_law(
        country_id,
        LawKind::DeclareEmbargo { target_id },
        proposed_by,
        now,
        now.plus_hours(config.law_voting_hours),
    );
    record_proposal(world, law_id, "declare embargo");
    Ok(law_id)
}

pub fn propose_embargo_lift(
    world: &mut World,
    config: &EngineConfig,
    country_id: u64,
    target_id: u64,
    proposed_by: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    require_country(world, country_id)?;
    require_country(world, target_id)?;
    let law_id = world.add_law(
        country_id,
        LawKind::LiftEmbargo { target_id },
        proposed_by,
        now,
        now.plus_hours(config.law_voting_hours),
    );
    record_proposal(world, law_id, "lift embargo");
    Ok(law_id)
}

// -- Battle commands --

/// Open a battle in a war. Eligibility, checked in order:
/// the war is ACTIVE; the opener holds battle rights (initiative holder
/// inside the window, or anyone after it lapsed); the war has no other
/// active battle; the region is not already contested by any war; the
/// region is held by the opposing side; and it borders the opener's
/// territory.
pub fn start_battle(
    world: &mut World,
    services: &Services,
    config: &EngineConfig,
    war_id: u64,
    region_id: u64,
    by_country: u64,
    now: Timestamp,
) -> Result<(u64, u64), ActionError> {
    let (status, opponent) = {
        let war = world.wars.get(&war_id).ok_or(ActionError::NotFound {
            entity: "war",
            id: war_id,
        })?;
        if war.status != WarStatus::Active {
            return Err(ActionError::WarNotActive(war_id));
        }
        if !war.has_battle_rights(by_country, now) {
            return Err(ActionError::NoBattleRights(by_country, war_id));
        }
        (war.status, war.opponent_of(by_country))
    };
    debug_assert_eq!(status, WarStatus::Active);
    let opponent = opponent.ok_or(ActionError::NotABelligerent {
        war_id,
        country_id: by_country,
    })?;

    if world.active_battle_for_war(war_id).is_some() {
        return Err(ActionError::WarHasActiveBattle(war_id));
    }
    if world.active_battle_in_region(region_id).is_some() {
        return Err(ActionError::RegionContested(region_id));
    }
    if services.territory.current_owner(region_id) != Some(opponent) {
        return Err(ActionError::RegionNotHostile(region_id));
    }
    if !services.territory.borders_country(region_id, by_country) {
        return Err(ActionError::NotAdjacent {
            region_id,
            country_id: by_country,
        });
    }

    let ids = world
        .add_battle(
            war_id,
            region_id,
            now,
            now.plus_hours(config.battle_duration_hours),
            now.plus_hours(config.round_duration_hours),
        )
        .map_err(|_| ActionError::NotFound {
            entity: "war",
            id: war_id,
        })?;
    world.record(
        JournalKind::BattleOpened { battle_id: ids.0 },
        format!(
            "{} opened a battle for region {region_id} in war {war_id}",
            world.country_name(by_country)
        ),
    );
    tracing::info!(battle_id = ids.0, war_id, region_id, by_country, "battle opened");
    Ok(ids)
}

/// Enlist a user on one side of an active battle. Re-joining is a no-op.
pub fn join_battle(
    world: &mut World,
    battle_id: u64,
    user_id: u64,
    side: Side,
    now: Timestamp,
) -> Result<(), ActionError> {
    let battle = world.battles.get(&battle_id).ok_or(ActionError::NotFound {
        entity: "battle",
        id: battle_id,
    })?;
    if battle.status != BattleStatus::Active {
        return Err(ActionError::BattleClosed(battle_id));
    }
    let already = world
        .participations
        .iter()
        .any(|p| p.battle_id == battle_id && p.user_id == user_id);
    if !already {
        world.participations.push(Participation {
            battle_id,
            user_id,
            side,
            joined_at: now,
        });
    }
    Ok(())
}

/// Append a damage contribution to the ledger for the battle's current
/// round. The round record itself is never touched, so contributions
/// from many users interleave freely; aggregation happens only at round
/// resolution. A user dealing damage without joining first is enrolled
/// implicitly.
pub fn deal_damage(
    world: &mut World,
    battle_id: u64,
    user_id: u64,
    side: Side,
    amount: u64,
    now: Timestamp,
) -> Result<(), ActionError> {
    let (status, round_number) = {
        let battle = world.battles.get(&battle_id).ok_or(ActionError::NotFound {
            entity: "battle",
            id: battle_id,
        })?;
        (battle.status, battle.current_round)
    };
    if status != BattleStatus::Active {
        return Err(ActionError::BattleClosed(battle_id));
    }
    let round_open = world
        .active_round_of(battle_id)
        .is_some_and(|r| r.round_number == round_number && r.status == RoundStatus::Active);
    if !round_open {
        return Err(ActionError::RoundClosed {
            battle_id,
            round_number,
        });
    }

    join_battle(world, battle_id, user_id, side, now)?;
    world.damage_ledger.push(DamageRecord {
        battle_id,
        round_number,
        user_id,
        side,
        amount,
        dealt_at: now,
    });
    Ok(())
}

/// Stake gold on one side of an active battle.
pub fn open_bounty(
    world: &mut World,
    battle_id: u64,
    side: Side,
    reward: u64,
    funder_id: u64,
    now: Timestamp,
) -> Result<u64, ActionError> {
    let battle = world.battles.get(&battle_id).ok_or(ActionError::NotFound {
        entity: "battle",
        id: battle_id,
    })?;
    if battle.status != BattleStatus::Active {
        return Err(ActionError::BattleClosed(battle_id));
    }
    world
        .add_bounty(battle_id, side, reward, funder_id, now)
        .map_err(|_| ActionError::NotFound {
            entity: "battle",
            id: battle_id,
        })
}

// -- Operator override surface --
//
// Each override runs the normal resolver (so every guard and side effect
// applies exactly as in a scheduled pass) and then writes a
// manually-corrected journal entry on top.

pub fn force_complete_round(
    world: &mut World,
    config: &EngineConfig,
    round_id: u64,
    now: Timestamp,
) -> Result<Option<RoundOutcome>, EngineError> {
    let outcome = complete_round(world, config, round_id, now, true)?;
    if outcome.is_some() {
        world.record_manual(
            JournalKind::ManualOverride,
            format!("operator forced completion of round {round_id}"),
        );
    }
    Ok(outcome)
}

pub fn force_complete_battle(
    world: &mut World,
    services: &mut Services,
    config: &EngineConfig,
    battle_id: u64,
    now: Timestamp,
) -> Result<Option<BattleOutcome>, EngineError> {
    let outcome = complete_battle(world, services, config, battle_id, now, true)?;
    if outcome.is_some() {
        world.record_manual(
            JournalKind::ManualOverride,
            format!("operator forced completion of battle {battle_id}"),
        );
    }
    Ok(outcome)
}

pub fn force_close_law(
    world: &mut World,
    config: &EngineConfig,
    law_id: u64,
    now: Timestamp,
) -> Result<Option<bool>, EngineError> {
    let outcome = close_law(world, config, law_id, now)?.map(|(passed, _)| passed);
    if outcome.is_some() {
        world.record_manual(
            JournalKind::ManualOverride,
            format!("operator forced closure of law {law_id}"),
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::services::MapTerritory;

    fn ts(h: i64) -> Timestamp {
        Timestamp::from_unix(0).plus_hours(h)
    }

    struct Fixture {
        world: World,
        services: Services,
        config: EngineConfig,
        war_id: u64,
        attacker: u64,
        defender: u64,
    }

    /// Two countries at war; region 1 belongs to the attacker, region 2
    /// to the defender, and they border each other.
    fn at_war() -> Fixture {
        let mut world = World::new();
        let attacker = world.add_country("Arcadia");
        let defender = world.add_country("Borduria");
        let war_id = world.add_war(attacker, defender, ts(0), ts(30 * 24));
        if let Some(war) = world.wars.get_mut(&war_id) {
            war.grant_initiative(attacker, ts(24));
        }
        let mut territory = MapTerritory::new();
        territory.set_owner(1, attacker);
        territory.set_owner(2, defender);
        territory.connect(1, 2);
        let mut services = Services::in_memory();
        services.territory = Box::new(territory);
        Fixture {
            world,
            services,
            config: EngineConfig::default(),
            war_id,
            attacker,
            defender,
        }
    }

    #[test]
    fn start_battle_checks_eligibility_in_order() {
        let mut f = at_war();

        // Defender has no initiative inside the window.
        let err = start_battle(
            &mut f.world,
            &f.services,
            &f.config,
            f.war_id,
            1,
            f.defender,
            ts(1),
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::NoBattleRights(..)));

        // Attacker cannot attack their own region.
        let err = start_battle(
            &mut f.world,
            &f.services,
            &f.config,
            f.war_id,
            1,
            f.attacker,
            ts(1),
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::RegionNotHostile(1)));

        let (battle_id, round_id) = start_battle(
            &mut f.world,
            &f.services,
            &f.config,
            f.war_id,
            2,
            f.attacker,
            ts(1),
        )
        .unwrap();
        assert_eq!(f.world.battles[&battle_id].ends_at, ts(25));
        assert_eq!(f.world.rounds[&round_id].ends_at, ts(9));

        // One battle per war at a time.
        let err = start_battle(
            &mut f.world,
            &f.services,
            &f.config,
            f.war_id,
            2,
            f.attacker,
            ts(2),
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::WarHasActiveBattle(_)));
    }

    #[test]
    fn either_side_may_open_after_initiative_lapses() {
        let mut f = at_war();
        if let Some(war) = f.world.wars.get_mut(&f.war_id) {
            war.initiative_lost = true;
        }
        assert!(
            start_battle(
                &mut f.world,
                &f.services,
                &f.config,
                f.war_id,
                1,
                f.defender,
                ts(30),
            )
            .is_ok()
        );
    }

    #[test]
    fn damage_requires_an_open_round_and_enrolls_the_dealer() {
        let mut f = at_war();
        let (battle_id, round_id) = start_battle(
            &mut f.world,
            &f.services,
            &f.config,
            f.war_id,
            2,
            f.attacker,
            ts(1),
        )
        .unwrap();

        deal_damage(&mut f.world, battle_id, 100, Side::Attacker, 50, ts(2)).unwrap();
        assert_eq!(f.world.damage_ledger.len(), 1);
        assert!(
            f.world
                .participations
                .iter()
                .any(|p| p.battle_id == battle_id && p.user_id == 100)
        );

        // Round closed, none open yet: damage is rejected, not misfiled.
        f.world
            .transition_round(round_id, RoundStatus::Completed)
            .unwrap();
        let err = deal_damage(&mut f.world, battle_id, 100, Side::Attacker, 50, ts(9)).unwrap_err();
        assert!(matches!(err, ActionError::RoundClosed { .. }));
    }

    #[test]
    fn voting_window_is_enforced() {
        let mut f = at_war();
        let c = f.world.add_country("Cimmeria");
        let law_id = propose_war(&mut f.world, &f.config, f.attacker, c, 1, ts(0)).unwrap();

        cast_vote(&mut f.world, law_id, 1, true, ts(1)).unwrap();
        assert!(matches!(
            cast_vote(&mut f.world, law_id, 1, false, ts(2)),
            Err(ActionError::AlreadyVoted { .. })
        ));
        assert!(matches!(
            cast_vote(&mut f.world, law_id, 2, true, ts(24)),
            Err(ActionError::VotingClosed(_))
        ));
    }

    #[test]
    fn duplicate_war_proposal_rejected_up_front() {
        let mut f = at_war();
        assert!(matches!(
            propose_war(&mut f.world, &f.config, f.defender, f.attacker, 1, ts(0)),
            Err(ActionError::DuplicateWar(..))
        ));
        assert!(matches!(
            propose_war(&mut f.world, &f.config, f.attacker, f.attacker, 1, ts(0)),
            Err(ActionError::SelfWar(_))
        ));
    }

    #[test]
    fn propose_peace_parks_the_war() {
        let mut f = at_war();
        let proposal_id =
            propose_peace(&mut f.world, &f.config, f.war_id, f.defender, 9, ts(5)).unwrap();
        assert_eq!(f.world.wars[&f.war_id].status, WarStatus::PeaceProposed);
        let proposal = &f.world.joint_proposals[&proposal_id];
        assert_eq!(proposal.deadline, ts(29));

        // Only one accord at a time: the war is no longer ACTIVE.
        assert!(matches!(
            propose_peace(&mut f.world, &f.config, f.war_id, f.attacker, 9, ts(6)),
            Err(ActionError::WarNotActive(_))
        ));
    }

    #[test]
    fn dissolution_creates_one_law_per_member() {
        let mut f = at_war();
        let c = f.world.add_country("Cimmeria");
        let alliance_id = f.world.add_alliance("Northern Pact", f.attacker, ts(0));
        f.world.join_alliance(alliance_id, c, ts(0)).unwrap();

        let dissolution_id =
            propose_alliance_dissolution(&mut f.world, &f.config, alliance_id, 1, ts(0)).unwrap();
        let dissolution = &f.world.dissolutions[&dissolution_id];
        assert_eq!(dissolution.member_laws.len(), 2);
        assert!(dissolution.member_laws.contains_key(&f.attacker));
        assert!(dissolution.member_laws.contains_key(&c));
    }

    #[test]
    fn early_forced_battle_retires_the_open_round() {
        let mut f = at_war();
        let (battle_id, _) = start_battle(
            &mut f.world,
            &f.services,
            &f.config,
            f.war_id,
            2,
            f.attacker,
            ts(1),
        )
        .unwrap();
        deal_damage(&mut f.world, battle_id, 100, Side::Attacker, 50, ts(2)).unwrap();

        // Forced well before ends_at: the open round is settled without
        // spawning a successor.
        let outcome = force_complete_battle(&mut f.world, &mut f.services, &f.config, battle_id, ts(2))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.winner, Side::Attacker);
        assert_eq!(f.world.battles[&battle_id].status, BattleStatus::AttackerWon);
        assert!(f.world.active_round_of(battle_id).is_none());

        // Later rounds passes find nothing due under the terminal battle
        // and flag nothing.
        let flags = |w: &World| {
            w.journal
                .iter()
                .filter(|e| matches!(e.kind, JournalKind::InvariantFlagged))
                .count()
        };
        assert_eq!(flags(&f.world), 0);
        let mut rounds = crate::engine::rounds::RoundSystem;
        for hour in [9, 17] {
            crate::testutil::run_pass(
                &mut f.world,
                &mut f.services,
                &f.config,
                &mut rounds,
                ts(hour),
            );
        }
        assert_eq!(flags(&f.world), 0);
    }

    #[test]
    fn forced_round_completion_journals_an_override() {
        let mut f = at_war();
        let (_, round_id) = start_battle(
            &mut f.world,
            &f.services,
            &f.config,
            f.war_id,
            2,
            f.attacker,
            ts(1),
        )
        .unwrap();

        let outcome = force_complete_round(&mut f.world, &f.config, round_id, ts(2)).unwrap();
        assert!(outcome.is_some());
        assert!(f.world.journal.iter().any(|e| e.manual));

        // A second force is a no-op and writes no second override entry.
        let manual_entries = f.world.journal.iter().filter(|e| e.manual).count();
        force_complete_round(&mut f.world, &f.config, round_id, ts(3)).unwrap();
        assert_eq!(
            f.world.journal.iter().filter(|e| e.manual).count(),
            manual_entries
        );
    }
}
