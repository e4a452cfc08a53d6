use serde::{Deserialize, Serialize};

use super::clock::Timestamp;
use super::machine::StateMachine;

/// Which belligerent a combatant fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    Active,
    AttackerWon,
    DefenderWon,
}

impl StateMachine for BattleStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            BattleStatus::Active => &[BattleStatus::AttackerWon, BattleStatus::DefenderWon],
            // Terminal battles are retained for audit, never reopened.
            BattleStatus::AttackerWon | BattleStatus::DefenderWon => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Active,
    Completed,
}

impl StateMachine for RoundStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            RoundStatus::Active => &[RoundStatus::Completed],
            RoundStatus::Completed => &[],
        }
    }
}

/// A battle for one region inside one war: up to three rounds, first side
/// to two round wins takes it, with a hard `ends_at` ceiling independent
/// of the round timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battle {
    pub id: u64,
    pub war_id: u64,
    pub region_id: u64,
    pub status: BattleStatus,
    /// Round currently being fought, 1..=3. Stays at the last round number
    /// once the battle is terminal.
    pub current_round: u8,
    pub started_at: Timestamp,
    /// Hard ceiling; the battle is forced to a decision at this instant no
    /// matter how many rounds have completed.
    pub ends_at: Timestamp,
    pub attacker_rounds_won: u8,
    pub defender_rounds_won: u8,
}

impl Battle {
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn rounds_won(&self, side: Side) -> u8 {
        match side {
            Side::Attacker => self.attacker_rounds_won,
            Side::Defender => self.defender_rounds_won,
        }
    }

    /// The side with a 2-round majority, if either has one yet.
    pub fn majority_winner(&self) -> Option<Side> {
        if self.attacker_rounds_won >= 2 {
            Some(Side::Attacker)
        } else if self.defender_rounds_won >= 2 {
            Some(Side::Defender)
        } else {
            None
        }
    }
}

/// One round of a battle. Exactly one round is ACTIVE per ACTIVE battle;
/// round numbers are strictly increasing with no gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRound {
    pub id: u64,
    pub battle_id: u64,
    pub round_number: u8,
    pub status: RoundStatus,
    pub started_at: Timestamp,
    /// Never exceeds the parent battle's `ends_at`; the reconciler clamps
    /// at creation and treats a violation as a flagged invariant breach.
    pub ends_at: Timestamp,
    pub winner: Option<Side>,
}
