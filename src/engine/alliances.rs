use super::context::PassContext;
use super::system::{PassCadence, ReconcileSystem};
use crate::error::EngineError;
use crate::model::{
    AllianceStatus, DissolutionStatus, JournalKind, LawStatus, Timestamp, World,
};

/// Execute a matured departure: the membership actually ends here, one
/// leave-delay after the leave law passed. Safe to call twice.
fn execute_leave(world: &mut World, leave_id: u64, now: Timestamp) -> Result<(), EngineError> {
    let (alliance_id, country_id, executed) = {
        let leave = world
            .pending_leaves
            .get(&leave_id)
            .ok_or(EngineError::NotFound {
                entity: "pending_leave",
                id: leave_id,
            })?;
        (leave.alliance_id, leave.country_id, leave.executed)
    };
    if executed {
        return Ok(());
    }

    let left = world.leave_alliance(alliance_id, country_id, now)?;
    if let Some(leave) = world.pending_leaves.get_mut(&leave_id) {
        leave.executed = true;
    }
    if left {
        world.record(
            JournalKind::AllianceMembershipChanged {
                alliance_id,
                country_id,
            },
            format!(
                "{} left alliance {alliance_id}",
                world.country_name(country_id)
            ),
        );
        tracing::info!(alliance_id, country_id, "alliance departure executed");
    }
    Ok(())
}

/// Resolve a pending dissolution against its per-member law set.
///
/// Unanimity rules: every member law PASSED approves the dissolution and
/// tears the alliance down in one unit; a single REJECTED law (or any law
/// still open at the deadline) rejects it and the alliance stands.
fn resolve_dissolution(
    world: &mut World,
    dissolution_id: u64,
    now: Timestamp,
) -> Result<Option<bool>, EngineError> {
    let (alliance_id, status, deadline, law_ids) = {
        let dissolution =
            world
                .dissolutions
                .get(&dissolution_id)
                .ok_or(EngineError::NotFound {
                    entity: "dissolution",
                    id: dissolution_id,
                })?;
        (
            dissolution.alliance_id,
            dissolution.status,
            dissolution.deadline,
            dissolution.member_laws.values().copied().collect::<Vec<_>>(),
        )
    };
    if status != DissolutionStatus::Pending {
        return Ok(None);
    }

    let statuses: Vec<Option<LawStatus>> = law_ids
        .iter()
        .map(|id| world.laws.get(id).map(|l| l.status))
        .collect();
    let all_passed = !statuses.is_empty() && statuses.iter().all(|s| *s == Some(LawStatus::Passed));
    let any_rejected = statuses.iter().any(|s| *s == Some(LawStatus::Rejected));

    let approved = if all_passed {
        true
    } else if any_rejected || now >= deadline {
        false
    } else {
        return Ok(None);
    };

    world.transition_dissolution(
        dissolution_id,
        if approved {
            DissolutionStatus::Approved
        } else {
            DissolutionStatus::Rejected
        },
    )?;

    if approved {
        world.transition_alliance(alliance_id, AllianceStatus::Dissolved)?;
        let members: Vec<u64> = world
            .alliances
            .get(&alliance_id)
            .map(|a| a.active_members().map(|m| m.country_id).collect())
            .unwrap_or_default();
        for country_id in members {
            world.leave_alliance(alliance_id, country_id, now)?;
        }
        world.record(
            JournalKind::AllianceDissolved { alliance_id },
            format!("alliance {alliance_id} dissolved by unanimous vote"),
        );
        tracing::info!(alliance_id, "alliance dissolved");
    } else {
        world.record(
            JournalKind::AllianceMembershipChanged {
                alliance_id,
                country_id: 0,
            },
            format!("dissolution of alliance {alliance_id} failed"),
        );
    }
    Ok(Some(approved))
}

/// Alliance Coordinator pass: matured departures first, then dissolution
/// outcomes.
pub struct AllianceSystem;

impl ReconcileSystem for AllianceSystem {
    fn name(&self) -> &str {
        "alliances"
    }

    fn cadence(&self) -> PassCadence {
        PassCadence::minutes(5)
    }

    fn pass(&mut self, ctx: &mut PassContext) {
        let now = ctx.world.current_time;

        let due_leaves: Vec<u64> = ctx
            .world
            .pending_leaves
            .values()
            .filter(|l| !l.executed && l.execute_at <= now)
            .map(|l| l.id)
            .collect();
        for leave_id in due_leaves {
            if let Err(err) = execute_leave(ctx.world, leave_id, now) {
                super::report_failure(ctx.world, "alliances", leave_id, &err);
            }
        }

        let pending: Vec<u64> = ctx
            .world
            .dissolutions
            .values()
            .filter(|d| d.status == DissolutionStatus::Pending)
            .map(|d| d.id)
            .collect();
        for dissolution_id in pending {
            if let Err(err) = resolve_dissolution(ctx.world, dissolution_id, now) {
                super::report_failure(ctx.world, "alliances", dissolution_id, &err);
            }
        }
    }
}
