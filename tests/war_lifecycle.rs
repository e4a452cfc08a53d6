use warfront::engine::actions::start_battle;
use warfront::engine::Reconciler;
use warfront::error::ActionError;
use warfront::model::{JournalKind, Timestamp, WarStatus};
use warfront::testutil::war_scenario;

fn ts(h: i64) -> Timestamp {
    Timestamp::from_unix(0).plus_hours(h)
}

#[test]
fn initiative_lapse_opens_battles_to_both_sides() {
    let mut setup = war_scenario();
    let mut reconciler = Reconciler::with_standard_passes(setup.config.clone());

    // Before the lapse the defender is locked out.
    let err = start_battle(
        &mut setup.world,
        &setup.services,
        &setup.config,
        setup.war_id,
        setup.home_region,
        setup.defender,
        ts(1),
    )
    .unwrap_err();
    assert!(matches!(err, ActionError::NoBattleRights(..)));

    // 24h pass with no battle opened: the window lapses.
    reconciler.run_at(&mut setup.world, &mut setup.services, ts(24));
    let war = &setup.world.wars[&setup.war_id];
    assert!(war.initiative_lost);
    assert!(setup.world.journal.iter().any(|e| matches!(
        e.kind,
        JournalKind::InitiativeExpired { war_id } if war_id == setup.war_id
    )));

    // Now the defender may push into the attacker's region.
    start_battle(
        &mut setup.world,
        &setup.services,
        &setup.config,
        setup.war_id,
        setup.home_region,
        setup.defender,
        ts(25),
    )
    .unwrap();
}

#[test]
fn startup_catch_up_expires_an_overdue_war() {
    let mut setup = war_scenario();

    // The process was down past the war's scheduled end. A fresh
    // reconciler's first invocation applies everything overdue at once.
    let mut reconciler = Reconciler::with_standard_passes(setup.config.clone());
    reconciler.run_at(&mut setup.world, &mut setup.services, ts(31 * 24));

    let war = &setup.world.wars[&setup.war_id];
    assert_eq!(war.status, WarStatus::EndedExpired);
    assert!(war.initiative_lost);

    // Battles can no longer be opened on the dead war.
    let err = start_battle(
        &mut setup.world,
        &setup.services,
        &setup.config,
        setup.war_id,
        setup.target_region,
        setup.attacker,
        ts(31 * 24),
    )
    .unwrap_err();
    assert!(matches!(err, ActionError::WarNotActive(_)));
}

#[test]
fn expiry_is_applied_exactly_once_across_cycles() {
    let mut setup = war_scenario();
    let mut reconciler = Reconciler::with_standard_passes(setup.config.clone());

    reconciler.run_at(&mut setup.world, &mut setup.services, ts(30 * 24));
    let journal_len = setup.world.journal.len();

    reconciler.run_at(&mut setup.world, &mut setup.services, ts(30 * 24).plus_minutes(10));
    reconciler.run_at(&mut setup.world, &mut setup.services, ts(30 * 24).plus_minutes(20));
    assert_eq!(setup.world.wars[&setup.war_id].status, WarStatus::EndedExpired);
    assert_eq!(setup.world.journal.len(), journal_len);
}
