use super::context::PassContext;
use super::signal::{Signal, SignalKind};
use super::system::{PassCadence, ReconcileSystem};
use crate::model::{JournalKind, WarStatus};

/// War Lifecycle Manager pass: initiative expiry and the 30-day auto-end.
///
/// Both transitions guard on current status, so a duplicate pass in the
/// same tick window applies each exactly once. War creation is not done
/// here — only the law pipeline's declare-war executor creates wars.
pub struct WarSystem;

impl ReconcileSystem for WarSystem {
    fn name(&self) -> &str {
        "wars"
    }

    fn cadence(&self) -> PassCadence {
        PassCadence::minutes(10)
    }

    fn pass(&mut self, ctx: &mut PassContext) {
        let now = ctx.world.current_time;

        // Initiative windows that lapsed unused. The holder keeps the war;
        // they only lose the exclusive right to force new battles.
        let lapsed: Vec<(u64, u64)> = ctx
            .world
            .wars
            .values()
            .filter(|w| {
                !w.is_over()
                    && !w.initiative_lost
                    && w.initiative_expires_at.is_some_and(|expires| now >= expires)
            })
            .filter_map(|w| w.initiative_holder_id.map(|holder| (w.id, holder)))
            .collect();
        for (war_id, holder_id) in lapsed {
            if let Some(war) = ctx.world.wars.get_mut(&war_id) {
                war.initiative_lost = true;
            }
            let journal_id = ctx.world.record(
                JournalKind::InitiativeExpired { war_id },
                format!(
                    "{} let their initiative in war {war_id} lapse",
                    ctx.world.country_name(holder_id)
                ),
            );
            tracing::info!(war_id, holder_id, "initiative expired");
            ctx.signals.push(Signal {
                journal_id,
                kind: SignalKind::InitiativeExpired { war_id, holder_id },
            });
        }

        // Hard 30-day ceiling, independent of battle outcomes and of any
        // pending peace accord.
        let expired: Vec<u64> = ctx
            .world
            .wars
            .values()
            .filter(|w| !w.is_over() && now >= w.scheduled_end_at)
            .map(|w| w.id)
            .collect();
        for war_id in expired {
            match ctx.world.transition_war(war_id, WarStatus::EndedExpired) {
                Ok(()) => {
                    let journal_id = ctx.world.record(
                        JournalKind::WarEnded { war_id },
                        format!("war {war_id} reached its scheduled end"),
                    );
                    tracing::info!(war_id, "war expired");
                    ctx.signals.push(Signal {
                        journal_id,
                        kind: SignalKind::WarEnded { war_id },
                    });
                }
                Err(err) => super::report_failure(ctx.world, "wars", war_id, &err),
            }
        }
    }
}
