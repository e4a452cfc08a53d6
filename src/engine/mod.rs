pub mod actions;
pub mod alliances;
pub mod battles;
pub mod config;
pub mod context;
pub mod laws;
pub mod rounds;
pub mod runner;
pub mod services;
pub mod signal;
pub mod system;
pub mod wars;

pub use config::EngineConfig;
pub use context::PassContext;
pub use runner::{Reconciler, dispatch_passes};
pub use services::{Notifier, Services, TerritoryService, Treasury};
pub use signal::{Signal, SignalKind};
pub use system::{PassCadence, ReconcileSystem};

use crate::error::EngineError;
use crate::model::{JournalKind, World};

/// One item failing must not abort the pass. Log it, flag a genuine
/// invariant breach in the journal for inspection, and move on; the item
/// itself is left untouched for the next pass or an operator.
pub(crate) fn report_failure(world: &mut World, pass: &str, item_id: u64, err: &EngineError) {
    tracing::error!(pass, item_id, %err, "pass item failed");
    if matches!(
        err,
        EngineError::Invariant(_) | EngineError::IllegalTransition { .. }
    ) {
        world.record(
            JournalKind::InvariantFlagged,
            format!("{pass} pass flagged item {item_id}: {err}"),
        );
    }
}
