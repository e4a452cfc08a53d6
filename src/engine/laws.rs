use super::config::EngineConfig;
use super::context::PassContext;
use super::signal::{Signal, SignalKind};
use super::system::{PassCadence, ReconcileSystem};
use crate::error::EngineError;
use crate::model::{
    JointKind, JointStatus, JournalKind, LawKind, LawStatus, Timestamp, World, WarStatus,
};

/// Close a law whose voting window has ended: tally ballots, flip the
/// status, and on a pass invoke the kind-specific executor. Idempotent —
/// an already-closed law returns `Ok(None)`.
///
/// Returns whether the law passed, with the journal entry recording the
/// closure.
pub fn close_law(
    world: &mut World,
    config: &EngineConfig,
    law_id: u64,
    now: Timestamp,
) -> Result<Option<(bool, u64)>, EngineError> {
    let (status, outcome) = {
        let law = world.laws.get(&law_id).ok_or(EngineError::NotFound {
            entity: "law",
            id: law_id,
        })?;
        (law.status, law.tally())
    };
    if status != LawStatus::Voting {
        return Ok(None);
    }

    world.transition_law(law_id, outcome)?;
    let passed = outcome == LawStatus::Passed;
    let journal_id = world.record(
        JournalKind::LawClosed { law_id, passed },
        format!("law {law_id} voting closed: {outcome:?}"),
    );
    tracing::info!(law_id, passed, "law closed");

    if passed {
        execute_law(world, config, law_id, now)?;
    }
    Ok(Some((passed, journal_id)))
}

/// Kind-specific executor dispatch. A closed, exhaustively-matched set:
/// adding a `LawKind` without deciding its execution is a compile error.
///
/// Joint-proposal kinds (peace halves, invitation halves) deliberately do
/// nothing here — their second-order change commits only when the whole
/// proposal resolves. Dissolution halves likewise resolve in the alliance
/// pass once every member's law has closed.
fn execute_law(
    world: &mut World,
    config: &EngineConfig,
    law_id: u64,
    now: Timestamp,
) -> Result<(), EngineError> {
    let (country_id, kind) = {
        let law = world.laws.get(&law_id).ok_or(EngineError::NotFound {
            entity: "law",
            id: law_id,
        })?;
        (law.country_id, law.kind)
    };

    match kind {
        LawKind::DeclareWar { defender_id } => {
            if world.open_war_between(country_id, defender_id).is_some() {
                // The pair went to war through another channel while this
                // vote ran; the passed declaration is void.
                tracing::warn!(
                    law_id,
                    attacker = country_id,
                    defender = defender_id,
                    "declaration voided: war already open between the pair"
                );
                return Ok(());
            }
            let war_id = world.add_war(
                country_id,
                defender_id,
                now,
                now.plus_days(config.war_duration_days),
            );
            if let Some(war) = world.wars.get_mut(&war_id) {
                war.grant_initiative(country_id, now.plus_hours(config.initiative_hours));
            }
            world.record(
                JournalKind::WarDeclared { war_id },
                format!(
                    "{} declared war on {}",
                    world.country_name(country_id),
                    world.country_name(defender_id)
                ),
            );
            tracing::info!(war_id, attacker = country_id, defender = defender_id, "war declared");
        }

        LawKind::ProposePeace { .. }
        | LawKind::AllianceInvite { .. }
        | LawKind::AllianceJoin { .. }
        | LawKind::AllianceDissolve { .. } => {}

        LawKind::AllianceKick {
            alliance_id,
            member_id,
        } => {
            if world.leave_alliance(alliance_id, member_id, now)? {
                world.record(
                    JournalKind::AllianceMembershipChanged {
                        alliance_id,
                        country_id: member_id,
                    },
                    format!(
                        "{} was expelled from alliance {alliance_id}",
                        world.country_name(member_id)
                    ),
                );
            }
        }

        LawKind::AllianceLeave { alliance_id } => {
            world.add_pending_leave(
                alliance_id,
                country_id,
                now.plus_hours(config.leave_delay_hours),
            );
        }

        LawKind::DeclareEmbargo { target_id } => {
            if !world.has_embargo(country_id, target_id) {
                world.add_embargo(country_id, target_id, now);
                world.record(
                    JournalKind::EmbargoChanged {
                        country_id,
                        target_id,
                    },
                    format!(
                        "{} embargoed {}",
                        world.country_name(country_id),
                        world.country_name(target_id)
                    ),
                );
            }
        }

        LawKind::LiftEmbargo { target_id } => {
            let lifted: Vec<u64> = world
                .embargoes
                .values()
                .filter(|e| e.blocks(country_id, target_id))
                .map(|e| e.id)
                .collect();
            if !lifted.is_empty() {
                for embargo_id in lifted {
                    if let Some(embargo) = world.embargoes.get_mut(&embargo_id) {
                        embargo.lifted_at = Some(now);
                    }
                }
                world.record(
                    JournalKind::EmbargoChanged {
                        country_id,
                        target_id,
                    },
                    format!(
                        "embargo between {} and {} lifted",
                        world.country_name(country_id),
                        world.country_name(target_id)
                    ),
                );
            }
        }
    }
    Ok(())
}

/// Resolve a joint proposal once its halves have spoken.
///
/// Both passed commits the second-order change and resolves ACCEPTED. Any
/// rejected half resolves REJECTED immediately — a one-sided approval
/// never waits for the other half. A half still open at the shared
/// deadline resolves EXPIRED. A pending peace accord reverts its war to
/// ACTIVE on rejection or expiry.
fn resolve_joint_proposal(
    world: &mut World,
    proposal_id: u64,
    now: Timestamp,
) -> Result<Option<(u64, bool)>, EngineError> {
    let (kind, first_law_id, second_law_id, status, deadline) = {
        let proposal =
            world
                .joint_proposals
                .get(&proposal_id)
                .ok_or(EngineError::NotFound {
                    entity: "joint_proposal",
                    id: proposal_id,
                })?;
        (
            proposal.kind,
            proposal.first_law_id,
            proposal.second_law_id,
            proposal.status,
            proposal.deadline,
        )
    };
    if status != JointStatus::Pending {
        return Ok(None);
    }

    let law_status = |world: &World, id: u64| world.laws.get(&id).map(|l| l.status);
    let first = law_status(world, first_law_id);
    let second = law_status(world, second_law_id);

    let resolution = if first == Some(LawStatus::Passed) && second == Some(LawStatus::Passed) {
        JointStatus::Accepted
    } else if first == Some(LawStatus::Rejected) || second == Some(LawStatus::Rejected) {
        JointStatus::Rejected
    } else if now >= deadline {
        JointStatus::Expired
    } else {
        return Ok(None);
    };

    world.transition_joint_proposal(proposal_id, resolution)?;
    let accepted = resolution == JointStatus::Accepted;

    match kind {
        JointKind::AllianceInvitation {
            alliance_id,
            invited_id,
        } => {
            if accepted {
                world.join_alliance(alliance_id, invited_id, now)?;
                world.record(
                    JournalKind::AllianceMembershipChanged {
                        alliance_id,
                        country_id: invited_id,
                    },
                    format!(
                        "{} joined alliance {alliance_id}",
                        world.country_name(invited_id)
                    ),
                );
            }
        }
        JointKind::PeaceAccord { war_id } => {
            let war_open = world.wars.get(&war_id).is_some_and(|w| !w.is_over());
            if war_open {
                if accepted {
                    world.transition_war(war_id, WarStatus::EndedNegotiated)?;
                    world.record(
                        JournalKind::WarEnded { war_id },
                        format!("war {war_id} ended by negotiated peace"),
                    );
                } else {
                    // Back to fighting; the proposal marker comes off.
                    world.transition_war(war_id, WarStatus::Active)?;
                    world.record(
                        JournalKind::PeaceWithdrawn { war_id },
                        format!("peace accord for war {war_id} fell through"),
                    );
                }
            }
        }
    }

    let journal_id = world.record(
        JournalKind::JointProposalResolved { proposal_id },
        format!("joint proposal {proposal_id} resolved {resolution:?}"),
    );
    tracing::info!(proposal_id, ?resolution, "joint proposal resolved");
    Ok(Some((journal_id, accepted)))
}

/// Law pipeline pass: closes due voting windows first, then resolves
/// joint proposals — in that order, so a proposal whose halves closed in
/// this very pass resolves on the tallied results rather than expiring.
pub struct LawSystem;

impl ReconcileSystem for LawSystem {
    fn name(&self) -> &str {
        "laws"
    }

    fn cadence(&self) -> PassCadence {
        PassCadence::minutes(10)
    }

    fn pass(&mut self, ctx: &mut PassContext) {
        let now = ctx.world.current_time;

        let due: Vec<u64> = ctx
            .world
            .laws
            .values()
            .filter(|l| l.status == LawStatus::Voting && l.voting_ends_at <= now)
            .map(|l| l.id)
            .collect();
        for law_id in due {
            match close_law(ctx.world, ctx.config, law_id, now) {
                Ok(Some((passed, journal_id))) => ctx.signals.push(Signal {
                    journal_id,
                    kind: SignalKind::LawClosed { law_id, passed },
                }),
                Ok(None) => {}
                Err(err) => super::report_failure(ctx.world, "laws", law_id, &err),
            }
        }

        let pending: Vec<u64> = ctx
            .world
            .joint_proposals
            .values()
            .filter(|p| p.status == JointStatus::Pending)
            .map(|p| p.id)
            .collect();
        for proposal_id in pending {
            match resolve_joint_proposal(ctx.world, proposal_id, now) {
                Ok(Some((journal_id, accepted))) => ctx.signals.push(Signal {
                    journal_id,
                    kind: SignalKind::JointProposalResolved {
                        proposal_id,
                        accepted,
                    },
                }),
                Ok(None) => {}
                Err(err) => super::report_failure(ctx.world, "laws", proposal_id, &err),
            }
        }
    }
}
