use serde::{Deserialize, Serialize};

use super::battle::Side;
use super::clock::Timestamp;

/// What a journal entry records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalKind {
    WarDeclared { war_id: u64 },
    WarEnded { war_id: u64 },
    PeaceProposed { war_id: u64 },
    PeaceWithdrawn { war_id: u64 },
    InitiativeExpired { war_id: u64 },
    BattleOpened { battle_id: u64 },
    RoundCompleted { battle_id: u64, round_number: u8, winner: Side },
    BattleCompleted { battle_id: u64, winner: Side },
    RegionCaptured { region_id: u64, new_owner_id: u64 },
    BattleHero { battle_id: u64, user_id: u64, side: Side },
    BountySettled { contract_id: u64 },
    LawProposed { law_id: u64 },
    LawClosed { law_id: u64, passed: bool },
    JointProposalResolved { proposal_id: u64 },
    AllianceMembershipChanged { alliance_id: u64, country_id: u64 },
    AllianceDissolved { alliance_id: u64 },
    EmbargoChanged { country_id: u64, target_id: u64 },
    /// An invariant breach left untouched and flagged for inspection.
    InvariantFlagged,
    /// An operator forced a transition through the override surface.
    ManualOverride,
}

/// One append-only audit record. Every transition the reconciler applies
/// writes one of these; operator overrides write a distinct
/// manually-corrected entry on top of the normal transition entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub at: Timestamp,
    pub kind: JournalKind,
    pub description: String,
    /// True only for entries written by the operator override surface.
    pub manual: bool,
}
