use serde::{Deserialize, Serialize};

use super::battle::Side;
use super::clock::Timestamp;
use super::machine::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyStatus {
    Open,
    Settled,
    /// The backed side lost; the reward returns to the funder.
    Void,
}

impl StateMachine for BountyStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            BountyStatus::Open => &[BountyStatus::Settled, BountyStatus::Void],
            BountyStatus::Settled | BountyStatus::Void => &[],
        }
    }
}

/// A reward riding on a battle outcome. External to the state machines:
/// it only reads battle identifiers and settles when the battle resolver
/// reports completion, paying out through the treasury hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BountyContract {
    pub id: u64,
    pub battle_id: u64,
    /// The side the funder is backing.
    pub side: Side,
    pub reward: u64,
    pub funder_id: u64,
    pub status: BountyStatus,
    pub opened_at: Timestamp,
    /// Top contributor on the backed side, once settled.
    pub awarded_to: Option<u64>,
}
