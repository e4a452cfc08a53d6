use super::config::EngineConfig;
use super::context::PassContext;
use super::signal::{Signal, SignalKind};
use super::system::{PassCadence, ReconcileSystem};
use crate::error::EngineError;
use crate::model::{
    BattleStatus, JournalKind, RoundStatus, RoundTotals, Side, Timestamp, World, round_totals,
};

/// Result of resolving one round.
#[derive(Debug, Clone, Copy)]
pub struct RoundOutcome {
    pub round_id: u64,
    pub round_number: u8,
    pub battle_id: u64,
    pub winner: Side,
    pub totals: RoundTotals,
    /// Created follow-up round, when the battle goes on.
    pub next_round_id: Option<u64>,
    pub journal_id: u64,
}

/// Resolve one round from its accumulated ledger damage.
///
/// Idempotent: an already-completed round returns `Ok(None)` with no
/// state change, because an overlapping or retried pass may scan the same
/// overdue row twice. The strictly greater per-side total wins; an exact
/// tie goes to `config.round_tie_break`.
///
/// On completion the winner's rounds-won counter is bumped and, with
/// `create_next` set, when the battle has neither a 2-round majority nor
/// reached its hard ceiling, the next round is created with its deadline
/// clamped to the battle's `ends_at` — a round never outlives its battle.
/// A round that would be born already expired (the clamp lands at or
/// before `now`) is not created; the battle is due for a forced decision
/// instead. The battle resolver settles dangling rounds with
/// `create_next = false`: a battle about to go terminal must not spawn a
/// successor round.
pub fn complete_round(
    world: &mut World,
    config: &EngineConfig,
    round_id: u64,
    now: Timestamp,
    create_next: bool,
) -> Result<Option<RoundOutcome>, EngineError> {
    let (battle_id, round_number, round_status) = {
        let round = world.rounds.get(&round_id).ok_or(EngineError::NotFound {
            entity: "round",
            id: round_id,
        })?;
        (round.battle_id, round.round_number, round.status)
    };
    if round_status == RoundStatus::Completed {
        return Ok(None);
    }

    let (battle_status, battle_ends_at) = {
        let battle = world.battles.get(&battle_id).ok_or(EngineError::NotFound {
            entity: "battle",
            id: battle_id,
        })?;
        (battle.status, battle.ends_at)
    };
    if battle_status != BattleStatus::Active {
        // An active round under a terminal battle means a transition was
        // half-applied somewhere; flag it rather than papering over it.
        return Err(EngineError::Invariant(format!(
            "round {round_id} is active but battle {battle_id} is terminal"
        )));
    }

    let totals = round_totals(&world.damage_ledger, battle_id, round_number);
    let winner = totals.leader().unwrap_or(config.round_tie_break);

    world.transition_round(round_id, RoundStatus::Completed)?;
    if let Some(round) = world.rounds.get_mut(&round_id) {
        round.winner = Some(winner);
    }
    if let Some(battle) = world.battles.get_mut(&battle_id) {
        match winner {
            Side::Attacker => battle.attacker_rounds_won += 1,
            Side::Defender => battle.defender_rounds_won += 1,
        }
    }

    let journal_id = world.record(
        JournalKind::RoundCompleted {
            battle_id,
            round_number,
            winner,
        },
        format!(
            "round {round_number} of battle {battle_id} won by {winner:?} \
             ({} vs {})",
            totals.attacker, totals.defender
        ),
    );
    tracing::info!(battle_id, round_number, ?winner, "round completed");

    let mut next_round_id = None;
    let battle_decided = world
        .battles
        .get(&battle_id)
        .is_some_and(|b| b.majority_winner().is_some());
    if create_next && round_number < super::config::ROUNDS_PER_BATTLE && !battle_decided {
        let ends_at = now.plus_hours(config.round_duration_hours).min(battle_ends_at);
        if ends_at > now {
            next_round_id = Some(world.add_round(battle_id, now, ends_at)?);
        }
    }

    Ok(Some(RoundOutcome {
        round_id,
        round_number,
        battle_id,
        winner,
        totals,
        next_round_id,
        journal_id,
    }))
}

/// Round Resolver pass: completes every ACTIVE round whose deadline has
/// passed. Each round is its own unit of work; a failure is logged and
/// the pass moves on.
pub struct RoundSystem;

impl ReconcileSystem for RoundSystem {
    fn name(&self) -> &str {
        "rounds"
    }

    fn cadence(&self) -> PassCadence {
        PassCadence::minutes(5)
    }

    fn pass(&mut self, ctx: &mut PassContext) {
        let now = ctx.world.current_time;
        let due: Vec<u64> = ctx
            .world
            .rounds
            .values()
            .filter(|r| r.status == RoundStatus::Active && r.ends_at <= now)
            .map(|r| r.id)
            .collect();

        for round_id in due {
            match complete_round(ctx.world, ctx.config, round_id, now, true) {
                Ok(Some(outcome)) => ctx.signals.push(Signal {
                    journal_id: outcome.journal_id,
                    kind: SignalKind::RoundCompleted {
                        battle_id: outcome.battle_id,
                        round_number: outcome.round_number,
                        winner: outcome.winner,
                    },
                }),
                Ok(None) => {}
                Err(err) => super::report_failure(ctx.world, "rounds", round_id, &err),
            }
        }
    }
}
