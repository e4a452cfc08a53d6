pub mod db;
pub mod engine;
pub mod error;
pub mod id;
pub mod model;
pub mod testutil;

pub use engine::{EngineConfig, Reconciler, Services};
pub use error::{ActionError, EngineError, ServiceError};
pub use id::IdGenerator;
pub use model::{
    Alliance, Battle, BattleRound, BattleStatus, BountyContract, Country, JournalEntry, Law,
    LawKind, LawStatus, RoundStatus, Side, Timestamp, War, WarStatus, World,
};
