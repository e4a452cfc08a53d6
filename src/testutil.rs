//! Shared helpers for unit and integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::services::{
    MapTerritory, Notifier, NullTreasury, Services, TerritoryService, Treasury,
};
use crate::engine::{EngineConfig, PassContext, ReconcileSystem, Signal, SignalKind};
use crate::error::ServiceError;
use crate::model::{DamageRecord, Side, Timestamp, World};

// ---------------------------------------------------------------------------
// Pass execution helpers
// ---------------------------------------------------------------------------

/// Run a single system's pass at the given time. Returns emitted signals.
pub fn run_pass(
    world: &mut World,
    services: &mut Services,
    config: &EngineConfig,
    system: &mut dyn ReconcileSystem,
    now: Timestamp,
) -> Vec<Signal> {
    world.current_time = now;
    let mut signals = Vec::new();
    let mut ctx = PassContext {
        world,
        services,
        config,
        signals: &mut signals,
        inbox: &[],
    };
    system.pass(&mut ctx);
    signals
}

/// Run a system's handle_signals with the given inbox. Returns newly
/// emitted signals (which the real dispatcher would discard).
pub fn deliver_signals(
    world: &mut World,
    services: &mut Services,
    config: &EngineConfig,
    system: &mut dyn ReconcileSystem,
    inbox: &[Signal],
) -> Vec<Signal> {
    let mut signals = Vec::new();
    let mut ctx = PassContext {
        world,
        services,
        config,
        signals: &mut signals,
        inbox,
    };
    system.handle_signals(&mut ctx);
    signals
}

/// Append a ledger row directly, bypassing the command layer. For tests
/// that only care about resolution arithmetic.
pub fn raw_damage(world: &mut World, battle_id: u64, round: u8, user: u64, side: Side, amount: u64) {
    world.damage_ledger.push(DamageRecord {
        battle_id,
        round_number: round,
        user_id: user,
        side,
        amount,
        dealt_at: world.current_time,
    });
}

// ---------------------------------------------------------------------------
// Signal helpers
// ---------------------------------------------------------------------------

pub fn has_signal(signals: &[Signal], predicate: impl Fn(&SignalKind) -> bool) -> bool {
    signals.iter().any(|s| predicate(&s.kind))
}

pub fn count_signals(signals: &[Signal], predicate: impl Fn(&SignalKind) -> bool) -> usize {
    signals.iter().filter(|s| predicate(&s.kind)).count()
}

// ---------------------------------------------------------------------------
// Test collaborator doubles
// ---------------------------------------------------------------------------

/// Notifier that records every delivery for later assertions.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub sent: Rc<RefCell<Vec<(u64, String, serde_json::Value)>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(
        &mut self,
        user_id: u64,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), ServiceError> {
        self.sent.borrow_mut().push((user_id, event.to_string(), payload));
        Ok(())
    }
}

/// Treasury that records every deposit.
#[derive(Default, Clone)]
pub struct RecordingTreasury {
    pub deposits: Rc<RefCell<Vec<(u64, u64)>>>,
}

impl Treasury for RecordingTreasury {
    fn deposit(&mut self, account_id: u64, amount: u64) -> Result<(), ServiceError> {
        self.deposits.borrow_mut().push((account_id, amount));
        Ok(())
    }
}

/// Territory whose captures fail a set number of times before working,
/// for rollback-and-retry tests.
pub struct FlakyTerritory {
    pub inner: MapTerritory,
    pub failures_left: u32,
    pub capture_calls: u32,
}

impl FlakyTerritory {
    pub fn failing(inner: MapTerritory, failures: u32) -> Self {
        Self {
            inner,
            failures_left: failures,
            capture_calls: 0,
        }
    }
}

impl TerritoryService for FlakyTerritory {
    fn capture_region(&mut self, region_id: u64, country_id: u64) -> Result<(), ServiceError> {
        self.capture_calls += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(ServiceError("territory service unavailable".to_string()));
        }
        self.inner.capture_region(region_id, country_id)
    }

    fn current_owner(&self, region_id: u64) -> Option<u64> {
        self.inner.current_owner(region_id)
    }

    fn borders_country(&self, region_id: u64, country_id: u64) -> bool {
        self.inner.borders_country(region_id, country_id)
    }
}

// ---------------------------------------------------------------------------
// Composite scenarios
// ---------------------------------------------------------------------------

pub struct WarSetup {
    pub world: World,
    pub services: Services,
    pub config: EngineConfig,
    pub war_id: u64,
    pub attacker: u64,
    pub defender: u64,
    /// Held by the attacker, borders the contested one.
    pub home_region: u64,
    /// Held by the defender; the natural battle target.
    pub target_region: u64,
}

/// Two countries at war since t=0, attacker holding initiative for 24h.
/// Region 1 (attacker's) borders region 2 (defender's).
pub fn war_scenario() -> WarSetup {
    let mut world = World::new();
    let attacker = world.add_country("Arcadia");
    let defender = world.add_country("Borduria");
    let start = Timestamp::from_unix(0);
    world.current_time = start;
    let war_id = world.add_war(attacker, defender, start, start.plus_days(30));
    if let Some(war) = world.wars.get_mut(&war_id) {
        war.grant_initiative(attacker, start.plus_hours(24));
    }

    let mut territory = MapTerritory::new();
    territory.set_owner(1, attacker);
    territory.set_owner(2, defender);
    territory.connect(1, 2);

    let services = Services {
        territory: Box::new(territory),
        notifier: Box::new(RecordingNotifier::default()),
        treasury: Box::new(NullTreasury),
    };

    WarSetup {
        world,
        services,
        config: EngineConfig::default(),
        war_id,
        attacker,
        defender,
        home_region: 1,
        target_region: 2,
    }
}

pub struct BattleSetup {
    pub setup: WarSetup,
    pub battle_id: u64,
    pub round_id: u64,
}

/// `war_scenario` plus an open battle for the defender's region, started
/// at t=1h by the attacker through the normal command path.
pub fn battle_scenario() -> BattleSetup {
    let mut setup = war_scenario();
    let at = Timestamp::from_unix(0).plus_hours(1);
    setup.world.current_time = at;
    let (battle_id, round_id) = crate::engine::actions::start_battle(
        &mut setup.world,
        &setup.services,
        &setup.config,
        setup.war_id,
        setup.target_region,
        setup.attacker,
        at,
    )
    .unwrap_or_else(|e| panic!("battle_scenario: start_battle failed: {e}"));
    BattleSetup {
        setup,
        battle_id,
        round_id,
    }
}
