use crate::model::Side;

// Canonical durations. `EngineConfig::default()` carries these; tests and
// deployments override fields as needed.
pub const ROUND_DURATION_HOURS: i64 = 8;
pub const ROUNDS_PER_BATTLE: u8 = 3;
pub const BATTLE_DURATION_HOURS: i64 = 24;
pub const INITIATIVE_HOURS: i64 = 24;
pub const WAR_DURATION_DAYS: i64 = 30;
pub const LAW_VOTING_HOURS: i64 = 24;
pub const LEAVE_DELAY_HOURS: i64 = 24;

/// Tunable policy for the resolution engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub round_duration_hours: i64,
    pub battle_duration_hours: i64,
    pub initiative_hours: i64,
    pub war_duration_days: i64,
    pub law_voting_hours: i64,
    pub leave_delay_hours: i64,
    /// Who wins a round on an exact damage tie, and a battle on a
    /// rounds-won tie at the hard deadline. Defender by default: the
    /// defense-advantage bias is a policy, not a hardcoded branch.
    pub round_tie_break: Side,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_duration_hours: ROUND_DURATION_HOURS,
            battle_duration_hours: BATTLE_DURATION_HOURS,
            initiative_hours: INITIATIVE_HOURS,
            war_duration_days: WAR_DURATION_DAYS,
            law_voting_hours: LAW_VOTING_HOURS,
            leave_delay_hours: LEAVE_DELAY_HOURS,
            round_tie_break: Side::Defender,
        }
    }
}
