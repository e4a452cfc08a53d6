use super::config::EngineConfig;
use super::services::Services;
use super::signal::Signal;
use crate::model::World;

/// Context passed to each reconciliation pass.
///
/// Bundled so fields can be added without touching the `ReconcileSystem`
/// trait signature.
pub struct PassContext<'a> {
    pub world: &'a mut World,
    pub services: &'a mut Services,
    pub config: &'a EngineConfig,
    /// Passes push signals here during `pass`/`handle_signals`.
    pub signals: &'a mut Vec<Signal>,
    /// Signals emitted by other passes in Phase 1 (read-only).
    pub inbox: &'a [Signal],
}
