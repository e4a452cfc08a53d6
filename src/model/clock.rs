use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A UTC instant, stored as whole seconds since the Unix epoch.
///
/// Every deadline in the engine (round end, battle ceiling, initiative
/// expiry, voting close, war term) is stored and compared in this single
/// canonical form so the reconciler and the voting pipeline can never skew
/// against each other. `Ord` is the comparison used for "is this due".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_unix(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn unix(self) -> i64 {
        self.0
    }

    pub const fn plus_minutes(self, minutes: i64) -> Self {
        Self(self.0 + minutes * SECONDS_PER_MINUTE)
    }

    pub const fn plus_hours(self, hours: i64) -> Self {
        Self(self.0 + hours * SECONDS_PER_HOUR)
    }

    pub const fn plus_days(self, days: i64) -> Self {
        Self(self.0 + days * SECONDS_PER_DAY)
    }

    /// Seconds elapsed since `earlier` (negative if `earlier` is later).
    pub const fn seconds_since(self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_roundtrip() {
        let t = Timestamp::from_unix(1_700_000_000);
        assert_eq!(t.plus_hours(24), t.plus_days(1));
        assert_eq!(t.plus_minutes(60), t.plus_hours(1));
        assert_eq!(t.plus_days(1).seconds_since(t), SECONDS_PER_DAY);
    }

    #[test]
    fn ordering_is_chronological() {
        let t = Timestamp::from_unix(0);
        assert!(t < t.plus_minutes(1));
        assert!(t.plus_hours(8) < t.plus_hours(24));
        assert_eq!(t.plus_hours(24).min(t.plus_hours(8)), t.plus_hours(8));
    }

    #[test]
    fn serde_transparent() {
        let t = Timestamp::from_unix(42);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "42");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
