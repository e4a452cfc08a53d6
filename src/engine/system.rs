use super::context::PassContext;

/// How often a reconciliation pass fires, in wall-clock minutes. Passes
/// are deliberately minute-granular, not second-granular: nothing in the
/// domain is due more often than a round deadline, and coarse cadences
/// keep overlapping invocations rare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassCadence {
    pub minutes: u32,
}

impl PassCadence {
    pub const fn minutes(minutes: u32) -> Self {
        Self { minutes }
    }
}

/// One independent reconciliation concern (round completion, battle
/// completion, war lifecycle, law voting, alliance housekeeping). Each
/// pass owns only the question "is there work due" against the shared
/// store; coordination between passes happens through persisted state and
/// the per-cycle signal buffer, never through shared scheduler state.
///
/// Object-safe so the reconciler can hold `Box<dyn ReconcileSystem>`.
pub trait ReconcileSystem {
    fn name(&self) -> &str;
    fn cadence(&self) -> PassCadence;
    fn pass(&mut self, ctx: &mut PassContext);

    /// React to signals emitted by other passes during Phase 1.
    ///
    /// Called once per dispatch cycle with the full buffer in
    /// `ctx.inbox`. Signals pushed here are **not** re-delivered
    /// (single-pass). Default: no-op.
    fn handle_signals(&mut self, ctx: &mut PassContext) {
        let _ = ctx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_is_plain_minutes() {
        assert_eq!(PassCadence::minutes(5).minutes, 5);
        assert_eq!(PassCadence::minutes(5), PassCadence::minutes(5));
        assert_ne!(PassCadence::minutes(5), PassCadence::minutes(10));
    }
}
