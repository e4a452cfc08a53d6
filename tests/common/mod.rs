use warfront::engine::EngineConfig;
use warfront::model::*;

pub fn ts(h: i64) -> Timestamp {
    Timestamp::from_unix(0).plus_hours(h)
}

/// A world exercising every persisted table: three countries, an
/// alliance with history, a war with a two-round battle, the law
/// pipeline in several states, and a bounty.
pub fn build_test_world() -> World {
    let config = EngineConfig::default();
    let mut world = World::new();
    world.current_time = ts(0);

    let arcadia = world.add_country("Arcadia");
    let borduria = world.add_country("Borduria");
    let cimmeria = world.add_country("Cimmeria");

    let alliance = world.add_alliance("Northern Pact", arcadia, ts(0));
    world.join_alliance(alliance, cimmeria, ts(1)).unwrap();

    let war = world.add_war(arcadia, borduria, ts(0), ts(0).plus_days(30));
    if let Some(w) = world.wars.get_mut(&war) {
        w.grant_initiative(arcadia, ts(24));
    }
    world.record(
        JournalKind::WarDeclared { war_id: war },
        "Arcadia declared war on Borduria".to_string(),
    );

    let (battle, round1) = world.add_battle(war, 7, ts(1), ts(25), ts(9)).unwrap();
    world.participations.push(Participation {
        battle_id: battle,
        user_id: 100,
        side: Side::Attacker,
        joined_at: ts(1),
    });
    world.participations.push(Participation {
        battle_id: battle,
        user_id: 200,
        side: Side::Defender,
        joined_at: ts(2),
    });
    for (round, user, side, amount) in [
        (1u8, 100u64, Side::Attacker, 300u64),
        (1, 200, Side::Defender, 120),
        (2, 200, Side::Defender, 80),
    ] {
        world.damage_ledger.push(DamageRecord {
            battle_id: battle,
            round_number: round,
            user_id: user,
            side,
            amount,
            dealt_at: ts(3),
        });
    }
    world.transition_round(round1, RoundStatus::Completed).unwrap();
    if let Some(r) = world.rounds.get_mut(&round1) {
        r.winner = Some(Side::Attacker);
    }
    if let Some(b) = world.battles.get_mut(&battle) {
        b.attacker_rounds_won = 1;
    }
    world.add_round(battle, ts(9), ts(17)).unwrap();

    let declaration = world.add_law(
        arcadia,
        LawKind::DeclareWar {
            defender_id: borduria,
        },
        1,
        ts(0).plus_days(-1),
        ts(0),
    );
    if let Some(law) = world.laws.get_mut(&declaration) {
        law.ballots.push(Ballot {
            voter_id: 1,
            approve: true,
            cast_at: ts(-12),
        });
    }
    world.transition_law(declaration, LawStatus::Passed).unwrap();

    let peace_a = world.add_law(
        arcadia,
        LawKind::ProposePeace { war_id: war },
        2,
        ts(4),
        ts(4).plus_hours(config.law_voting_hours),
    );
    let peace_b = world.add_law(
        borduria,
        LawKind::ProposePeace { war_id: war },
        3,
        ts(4),
        ts(4).plus_hours(config.law_voting_hours),
    );
    world.add_joint_proposal(
        JointKind::PeaceAccord { war_id: war },
        peace_a,
        peace_b,
        ts(4).plus_hours(config.law_voting_hours),
    );

    world.add_pending_leave(alliance, cimmeria, ts(30));
    let dissolve_law = world.add_law(
        arcadia,
        LawKind::AllianceDissolve {
            alliance_id: alliance,
        },
        1,
        ts(5),
        ts(29),
    );
    let member_laws = std::collections::BTreeMap::from([(arcadia, dissolve_law)]);
    world.add_dissolution(alliance, member_laws, ts(29));
    world.add_embargo(arcadia, cimmeria, ts(6));
    world
        .add_bounty(battle, Side::Attacker, 50, 300, ts(3))
        .unwrap();

    world
}
