use super::config::EngineConfig;
use super::context::PassContext;
use super::services::Services;
use super::signal::Signal;
use super::system::ReconcileSystem;
use crate::model::{Timestamp, World, clock::SECONDS_PER_MINUTE};

/// Run one dispatch cycle over the given passes.
///
/// Signal delivery is **single-pass, non-cascading**:
///
/// 1. **Phase 1 (pass):** each pass runs in registration order; all
///    signals emitted are collected into a shared buffer.
/// 2. **Phase 2 (react):** if any signals were emitted, each pass's
///    `handle_signals()` sees the full buffer as `ctx.inbox`. Passes may
///    mutate the world and push new signals here, but those are discarded
///    at the end of the cycle.
///
/// A signal emitted in Phase 2 therefore never triggers further reactions
/// within the same cycle. This bounds each cycle's side effects; anything
/// a Phase 2 mutation implies (a war whose last battle just resolved, say)
/// is picked up by a later pass re-checking its own preconditions against
/// the store — which every pass must do anyway, since pass ordering within
/// a cycle is not guaranteed.
pub fn dispatch_passes(
    world: &mut World,
    services: &mut Services,
    config: &EngineConfig,
    systems: &mut [Box<dyn ReconcileSystem>],
    now: Timestamp,
) {
    world.current_time = now;

    // Phase 1: run passes, collecting signals
    let mut signals = Vec::new();
    for system in systems.iter_mut() {
        let mut ctx = PassContext {
            world,
            services,
            config,
            signals: &mut signals,
            inbox: &[],
        };
        system.pass(&mut ctx);
    }

    // Phase 2: deliver signals for reaction (only if any were emitted)
    if !signals.is_empty() {
        for system in systems.iter_mut() {
            let mut discarded: Vec<Signal> = Vec::new();
            let mut ctx = PassContext {
                world,
                services,
                config,
                signals: &mut discarded,
                inbox: &signals,
            };
            system.handle_signals(&mut ctx);
        }
    }
}

/// Owns the registered passes and fires each on its own wall-clock
/// cadence. There is deliberately no shared scheduler state beyond the
/// per-pass last-fired instant: each pass re-derives its due work from the
/// store every time, so a missed or duplicated tick can only delay a
/// transition, never lose or double-apply one.
pub struct Reconciler {
    config: EngineConfig,
    systems: Vec<Box<dyn ReconcileSystem>>,
    last_fired: Vec<Option<Timestamp>>,
}

impl Reconciler {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            systems: Vec::new(),
            last_fired: Vec::new(),
        }
    }

    /// The full standard lineup: rounds, battles, wars, laws, alliances.
    pub fn with_standard_passes(config: EngineConfig) -> Self {
        let mut reconciler = Self::new(config);
        reconciler.register(Box::new(super::rounds::RoundSystem));
        reconciler.register(Box::new(super::battles::BattleSystem));
        reconciler.register(Box::new(super::wars::WarSystem));
        reconciler.register(Box::new(super::laws::LawSystem));
        reconciler.register(Box::new(super::alliances::AllianceSystem));
        reconciler
    }

    pub fn register(&mut self, system: Box<dyn ReconcileSystem>) {
        self.systems.push(system);
        self.last_fired.push(None);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fire every pass immediately, ignoring cadence gating. For process
    /// startup: work that came due while the process was down is applied
    /// in one sweep before the regular schedule resumes.
    pub fn catch_up(&mut self, world: &mut World, services: &mut Services, now: Timestamp) {
        self.last_fired.fill(None);
        self.run_at(world, services, now);
    }

    /// Fire every pass whose cadence has elapsed since it last fired.
    /// Never-fired passes are always due, so the first invocation after
    /// construction behaves like `catch_up`.
    pub fn run_at(&mut self, world: &mut World, services: &mut Services, now: Timestamp) {
        let due: Vec<usize> = (0..self.systems.len())
            .filter(|&i| match self.last_fired[i] {
                None => true,
                Some(last) => {
                    let interval = self.systems[i].cadence().minutes as i64 * SECONDS_PER_MINUTE;
                    now.seconds_since(last) >= interval
                }
            })
            .collect();
        if due.is_empty() {
            return;
        }

        world.current_time = now;

        let mut signals = Vec::new();
        for &i in &due {
            tracing::debug!(pass = self.systems[i].name(), "reconciliation pass");
            let mut ctx = PassContext {
                world,
                services,
                config: &self.config,
                signals: &mut signals,
                inbox: &[],
            };
            self.systems[i].pass(&mut ctx);
            self.last_fired[i] = Some(now);
        }

        if !signals.is_empty() {
            for &i in &due {
                let mut discarded = Vec::new();
                let mut ctx = PassContext {
                    world,
                    services,
                    config: &self.config,
                    signals: &mut discarded,
                    inbox: &signals,
                };
                self.systems[i].handle_signals(&mut ctx);
            }
        }
    }
}
