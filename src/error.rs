use thiserror::Error;

/// Failure of an external collaborator (territory, notifier, treasury).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ServiceError(pub String);

/// Errors raised while applying a state transition inside a reconciliation
/// pass. These are caught and logged at the pass loop; they never abort the
/// batch. A benign precondition miss (already-completed round, terminal
/// battle) is *not* an error — resolvers return `Ok(None)` for those.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// An edge not present in the status enum's transition table.
    #[error("illegal {entity} transition {from} -> {to} (id {id})")]
    IllegalTransition {
        entity: &'static str,
        id: u64,
        from: String,
        to: String,
    },

    /// A structural invariant does not hold (round outliving its battle,
    /// two active wars for one pair). The entity is left untouched and
    /// flagged for manual inspection; auto-correcting could mask a deeper
    /// scheduling bug.
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("collaborator failure: {0}")]
    Service(#[from] ServiceError),
}

/// Rejections surfaced to the player-facing command layer. Callers get a
/// clear condition (battle closed, voting closed) rather than a silent
/// drop.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("battle {0} is closed")]
    BattleClosed(u64),

    #[error("round {round_number} of battle {battle_id} is not accepting damage")]
    RoundClosed { battle_id: u64, round_number: u8 },

    #[error("war {0} is not active")]
    WarNotActive(u64),

    #[error("an active war already exists between countries {0} and {1}")]
    DuplicateWar(u64, u64),

    #[error("country {0} cannot declare war on itself")]
    SelfWar(u64),

    #[error("country {country_id} is not a belligerent of war {war_id}")]
    NotABelligerent { war_id: u64, country_id: u64 },

    #[error("country {0} may not open a battle in war {1} right now")]
    NoBattleRights(u64, u64),

    #[error("region {0} already hosts an active battle")]
    RegionContested(u64),

    #[error("war {0} already has an active battle")]
    WarHasActiveBattle(u64),

    #[error("region {region_id} does not border territory of country {country_id}")]
    NotAdjacent { region_id: u64, country_id: u64 },

    #[error("region {0} is not held by the opposing side")]
    RegionNotHostile(u64),

    #[error("voting on law {0} is closed")]
    VotingClosed(u64),

    #[error("user {user_id} already voted on law {law_id}")]
    AlreadyVoted { law_id: u64, user_id: u64 },

    #[error("country {country_id} is not a member of alliance {alliance_id}")]
    NotAMember { alliance_id: u64, country_id: u64 },

    #[error("country {country_id} is already a member of alliance {alliance_id}")]
    AlreadyMember { alliance_id: u64, country_id: u64 },
}
