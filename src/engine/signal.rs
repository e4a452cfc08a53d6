use serde::{Deserialize, Serialize};

use crate::model::Side;

/// A signal emitted by one pass and consumed by others within the same
/// dispatch cycle — the in-memory event queue that decouples "what
/// changed" (a round completed) from "what else needs re-checking" (does
/// the battle now have a majority).
///
/// Carries the journal entry that recorded the change, so reactions can
/// reference the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub journal_id: u64,
    pub kind: SignalKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalKind {
    /// A round resolved; the parent battle may now have a majority.
    RoundCompleted {
        battle_id: u64,
        round_number: u8,
        winner: Side,
    },

    /// A battle reached a terminal status.
    BattleDecided {
        battle_id: u64,
        war_id: u64,
        region_id: u64,
        winner: Side,
    },

    /// Region ownership moved as part of a battle completion.
    RegionCaptured {
        region_id: u64,
        new_owner_id: u64,
    },

    /// An initiative window lapsed unused.
    InitiativeExpired { war_id: u64, holder_id: u64 },

    /// A war reached a terminal status.
    WarEnded { war_id: u64 },

    /// A law's voting window closed and was tallied.
    LawClosed { law_id: u64, passed: bool },

    /// Both halves of a joint proposal resolved (or the deadline passed).
    JointProposalResolved { proposal_id: u64, accepted: bool },

    /// A bounty contract settled or voided.
    BountyClosed { contract_id: u64, battle_id: u64 },
}
