use super::config::EngineConfig;
use super::context::PassContext;
use super::rounds::complete_round;
use super::services::Services;
use super::signal::{Signal, SignalKind};
use super::system::{PassCadence, ReconcileSystem};
use crate::error::EngineError;
use crate::model::{
    BattleStatus, BountyStatus, JournalKind, Side, Timestamp, World, top_contributor,
};

/// Gold paid to the top damage dealer on each side of a finished battle.
const HERO_REWARD: u64 = 10;

#[derive(Debug, Clone)]
pub struct BattleOutcome {
    pub battle_id: u64,
    pub war_id: u64,
    pub region_id: u64,
    pub winner: Side,
    pub winner_country_id: u64,
    /// Whether region ownership moved (attacker victories only).
    pub captured: bool,
    /// Bounty contracts settled or voided as part of this completion.
    pub closed_bounties: Vec<u64>,
    pub journal_id: u64,
}

/// Aggregate round outcomes into a battle result.
///
/// Fires when one side holds a 2-of-3 round majority, or the battle's
/// hard `ends_at` has passed (a forced decision), or `force` is set (the
/// operator override surface). Idempotent: terminal battles return
/// `Ok(None)` untouched.
///
/// Forced decision with a round still ACTIVE: that round is completed
/// through the normal Round Resolver first, so its ledger totals and the
/// tie-break are honored; the battle then goes to the side with more
/// rounds won, a rounds-won tie falling back to the same configured
/// tie-break.
///
/// The winning country receives a fresh 24h initiative window on the war.
/// On an attacker victory the region is handed over through the territory
/// collaborator as the last step; if that call fails the status flip and
/// initiative grant are rolled back, leaving the battle for the next pass
/// to retry (the capture itself is idempotent, so a retry is safe).
pub fn complete_battle(
    world: &mut World,
    services: &mut Services,
    config: &EngineConfig,
    battle_id: u64,
    now: Timestamp,
    force: bool,
) -> Result<Option<BattleOutcome>, EngineError> {
    let (status, war_id, region_id, ends_at) = {
        let battle = world.battles.get(&battle_id).ok_or(EngineError::NotFound {
            entity: "battle",
            id: battle_id,
        })?;
        (battle.status, battle.war_id, battle.region_id, battle.ends_at)
    };
    if status != BattleStatus::Active {
        return Ok(None);
    }

    let deadline_reached = now >= ends_at;
    let has_majority = world
        .battles
        .get(&battle_id)
        .is_some_and(|b| b.majority_winner().is_some());
    if !has_majority && !deadline_reached && !force {
        return Ok(None);
    }

    // Forced decision: settle the still-active round first. The battle is
    // about to go terminal, so no successor round may be spawned.
    if (deadline_reached || force)
        && let Some(round) = world.active_round_of(battle_id)
    {
        let round_id = round.id;
        complete_round(world, config, round_id, now, false)?;
    }

    let winner = {
        let battle = world.battles.get(&battle_id).ok_or(EngineError::NotFound {
            entity: "battle",
            id: battle_id,
        })?;
        match battle.majority_winner() {
            Some(side) => side,
            None if battle.attacker_rounds_won > battle.defender_rounds_won => Side::Attacker,
            None if battle.defender_rounds_won > battle.attacker_rounds_won => Side::Defender,
            None => config.round_tie_break,
        }
    };

    let (attacker_id, defender_id, war_over) = {
        let war = world.wars.get(&war_id).ok_or(EngineError::NotFound {
            entity: "war",
            id: war_id,
        })?;
        (war.attacker_id, war.defender_id, war.is_over())
    };
    let winner_country_id = match winner {
        Side::Attacker => attacker_id,
        Side::Defender => defender_id,
    };
    let target_status = match winner {
        Side::Attacker => BattleStatus::AttackerWon,
        Side::Defender => BattleStatus::DefenderWon,
    };

    let prior_initiative = world
        .wars
        .get(&war_id)
        .map(|w| (w.initiative_holder_id, w.initiative_expires_at, w.initiative_lost));

    world.transition_battle(battle_id, target_status)?;
    if !war_over && let Some(war) = world.wars.get_mut(&war_id) {
        war.grant_initiative(winner_country_id, now.plus_hours(config.initiative_hours));
    }

    let mut captured = false;
    if winner == Side::Attacker {
        if let Err(err) = services.territory.capture_region(region_id, winner_country_id) {
            // Roll the flip back so a later pass retries the whole unit.
            if let Some(battle) = world.battles.get_mut(&battle_id) {
                battle.status = BattleStatus::Active;
            }
            if !war_over
                && let (Some(war), Some((holder, expires, lost))) =
                    (world.wars.get_mut(&war_id), prior_initiative)
            {
                war.initiative_holder_id = holder;
                war.initiative_expires_at = expires;
                war.initiative_lost = lost;
            }
            tracing::error!(battle_id, region_id, %err, "region capture failed, flip rolled back");
            return Err(err.into());
        }
        captured = true;
    }

    let journal_id = world.record(
        JournalKind::BattleCompleted { battle_id, winner },
        format!(
            "battle {battle_id} in region {region_id} won by {} ({winner:?})",
            world.country_name(winner_country_id)
        ),
    );
    if captured {
        world.record(
            JournalKind::RegionCaptured {
                region_id,
                new_owner_id: winner_country_id,
            },
            format!("region {region_id} captured by {}", world.country_name(winner_country_id)),
        );
    }
    tracing::info!(battle_id, war_id, ?winner, captured, "battle completed");

    award_heroes(world, services, battle_id);
    let closed_bounties = settle_bounties(world, services, battle_id, winner);

    Ok(Some(BattleOutcome {
        battle_id,
        war_id,
        region_id,
        winner,
        winner_country_id,
        captured,
        closed_bounties,
        journal_id,
    }))
}

/// Pay and notify the top damage dealer on each side.
fn award_heroes(world: &mut World, services: &mut Services, battle_id: u64) {
    for side in [Side::Attacker, Side::Defender] {
        let Some((user_id, total)) = top_contributor(&world.damage_ledger, battle_id, side) else {
            continue;
        };
        world.record(
            JournalKind::BattleHero {
                battle_id,
                user_id,
                side,
            },
            format!("user {user_id} is the {side:?} hero of battle {battle_id}"),
        );
        if let Err(err) = services.treasury.deposit(user_id, HERO_REWARD) {
            tracing::warn!(user_id, battle_id, %err, "hero reward deposit failed");
        }
        services.notify(
            user_id,
            "battle_hero",
            serde_json::json!({ "battle_id": battle_id, "damage": total }),
        );
    }
}

/// Settle every open bounty riding on the battle: backed side won pays
/// the top contributor on that side, backed side lost refunds the funder.
/// Returns the contracts closed.
fn settle_bounties(
    world: &mut World,
    services: &mut Services,
    battle_id: u64,
    winner: Side,
) -> Vec<u64> {
    let mut closed = Vec::new();
    let open: Vec<u64> = world
        .bounties
        .values()
        .filter(|b| b.battle_id == battle_id && b.status == BountyStatus::Open)
        .map(|b| b.id)
        .collect();

    for contract_id in open {
        let (side, reward, funder_id) = {
            let contract = &world.bounties[&contract_id];
            (contract.side, contract.reward, contract.funder_id)
        };
        let (target, payee) = if side == winner {
            let awardee = top_contributor(&world.damage_ledger, battle_id, side)
                .map(|(user, _)| user)
                .unwrap_or(funder_id);
            (BountyStatus::Settled, awardee)
        } else {
            (BountyStatus::Void, funder_id)
        };
        if let Err(err) = world.transition_bounty(contract_id, target) {
            tracing::error!(contract_id, %err, "bounty settlement skipped");
            continue;
        }
        if target == BountyStatus::Settled
            && let Some(contract) = world.bounties.get_mut(&contract_id)
        {
            contract.awarded_to = Some(payee);
        }
        if let Err(err) = services.treasury.deposit(payee, reward) {
            tracing::warn!(contract_id, payee, %err, "bounty payout deposit failed");
        }
        world.record(
            JournalKind::BountySettled { contract_id },
            format!("bounty {contract_id} on battle {battle_id} closed, {reward} to {payee}"),
        );
        closed.push(contract_id);
    }
    closed
}

/// Battle Resolver pass. Phase 1 sweeps battles that are due on their own
/// (majority already reached, or past the hard ceiling); Phase 2 reacts to
/// rounds completed earlier in the same cycle, so a round that produces a
/// majority finishes its battle without waiting for the next tick.
pub struct BattleSystem;

impl BattleSystem {
    fn try_complete(ctx: &mut PassContext, battle_id: u64, now: Timestamp) {
        match complete_battle(ctx.world, ctx.services, ctx.config, battle_id, now, false) {
            Ok(Some(outcome)) => {
                ctx.signals.push(Signal {
                    journal_id: outcome.journal_id,
                    kind: SignalKind::BattleDecided {
                        battle_id: outcome.battle_id,
                        war_id: outcome.war_id,
                        region_id: outcome.region_id,
                        winner: outcome.winner,
                    },
                });
                if outcome.captured {
                    ctx.signals.push(Signal {
                        journal_id: outcome.journal_id,
                        kind: SignalKind::RegionCaptured {
                            region_id: outcome.region_id,
                            new_owner_id: outcome.winner_country_id,
                        },
                    });
                }
                for contract_id in outcome.closed_bounties {
                    ctx.signals.push(Signal {
                        journal_id: outcome.journal_id,
                        kind: SignalKind::BountyClosed {
                            contract_id,
                            battle_id: outcome.battle_id,
                        },
                    });
                }
            }
            Ok(None) => {}
            Err(err) => super::report_failure(ctx.world, "battles", battle_id, &err),
        }
    }
}

impl ReconcileSystem for BattleSystem {
    fn name(&self) -> &str {
        "battles"
    }

    fn cadence(&self) -> PassCadence {
        PassCadence::minutes(5)
    }

    fn pass(&mut self, ctx: &mut PassContext) {
        let now = ctx.world.current_time;
        let due: Vec<u64> = ctx
            .world
            .battles
            .values()
            .filter(|b| {
                b.status == BattleStatus::Active
                    && (b.majority_winner().is_some() || b.ends_at <= now)
            })
            .map(|b| b.id)
            .collect();
        for battle_id in due {
            Self::try_complete(ctx, battle_id, now);
        }
    }

    fn handle_signals(&mut self, ctx: &mut PassContext) {
        let now = ctx.world.current_time;
        let candidates: Vec<u64> = ctx
            .inbox
            .iter()
            .filter_map(|signal| match signal.kind {
                SignalKind::RoundCompleted { battle_id, .. } => Some(battle_id),
                _ => None,
            })
            .collect();
        for battle_id in candidates {
            let ready = ctx
                .world
                .battles
                .get(&battle_id)
                .is_some_and(|b| b.status == BattleStatus::Active && b.majority_winner().is_some());
            if ready {
                Self::try_complete(ctx, battle_id, now);
            }
        }
    }
}
