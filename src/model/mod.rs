pub mod alliance;
pub mod battle;
pub mod bounty;
pub mod clock;
pub mod country;
pub mod journal;
pub mod law;
pub mod ledger;
pub mod machine;
pub mod war;
pub mod world;

pub use alliance::{
    Alliance, AllianceStatus, Dissolution, DissolutionStatus, Embargo, Membership, PendingLeave,
};
pub use battle::{Battle, BattleRound, BattleStatus, RoundStatus, Side};
pub use bounty::{BountyContract, BountyStatus};
pub use clock::Timestamp;
pub use country::Country;
pub use journal::{JournalEntry, JournalKind};
pub use law::{Ballot, JointKind, JointProposal, JointStatus, Law, LawKind, LawStatus};
pub use ledger::{DamageRecord, Participation, RoundTotals, round_totals, top_contributor};
pub use machine::StateMachine;
pub use war::{War, WarStatus};
pub use world::World;
