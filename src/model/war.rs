use serde::{Deserialize, Serialize};

use super::clock::Timestamp;
use super::machine::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarStatus {
    Active,
    PeaceProposed,
    EndedNegotiated,
    EndedExpired,
}

impl StateMachine for WarStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            WarStatus::Active => &[
                WarStatus::PeaceProposed,
                WarStatus::EndedNegotiated,
                WarStatus::EndedExpired,
            ],
            // A pending peace accord can resolve either way, and the
            // 30-day ceiling still applies while it is pending.
            WarStatus::PeaceProposed => &[
                WarStatus::Active,
                WarStatus::EndedNegotiated,
                WarStatus::EndedExpired,
            ],
            WarStatus::EndedNegotiated | WarStatus::EndedExpired => &[],
        }
    }
}

/// A war between two countries. Created only by the law pipeline's
/// declare-war executor, never directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct War {
    pub id: u64,
    pub attacker_id: u64,
    pub defender_id: u64,
    pub status: WarStatus,
    pub started_at: Timestamp,
    /// Hard 30-day ceiling, immutable once set.
    pub scheduled_end_at: Timestamp,
    /// Country currently holding battle initiative, if any.
    pub initiative_holder_id: Option<u64>,
    pub initiative_expires_at: Option<Timestamp>,
    /// Set when the holder's window lapsed without use. Losing initiative
    /// does not lose the war; it only removes the exclusive right to force
    /// new battles until initiative is re-won.
    pub initiative_lost: bool,
}

impl War {
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn involves(&self, country_id: u64) -> bool {
        self.attacker_id == country_id || self.defender_id == country_id
    }

    /// True if this war is the (unordered) pair `a`/`b`.
    pub fn is_between(&self, a: u64, b: u64) -> bool {
        (self.attacker_id == a && self.defender_id == b)
            || (self.attacker_id == b && self.defender_id == a)
    }

    pub fn opponent_of(&self, country_id: u64) -> Option<u64> {
        if self.attacker_id == country_id {
            Some(self.defender_id)
        } else if self.defender_id == country_id {
            Some(self.attacker_id)
        } else {
            None
        }
    }

    /// Grant `country_id` a fresh initiative window ending at `expires_at`.
    pub fn grant_initiative(&mut self, country_id: u64, expires_at: Timestamp) {
        self.initiative_holder_id = Some(country_id);
        self.initiative_expires_at = Some(expires_at);
        self.initiative_lost = false;
    }

    /// Whether `country_id` may open a new battle in this war: the holder
    /// inside an unexpired window, or either belligerent once the window
    /// has lapsed unused.
    pub fn has_battle_rights(&self, country_id: u64, now: Timestamp) -> bool {
        if !self.involves(country_id) || self.status != WarStatus::Active {
            return false;
        }
        if self.initiative_lost {
            return true;
        }
        match (self.initiative_holder_id, self.initiative_expires_at) {
            (Some(holder), Some(expires)) => holder == country_id && now < expires,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn war(now: Timestamp) -> War {
        War {
            id: 1,
            attacker_id: 10,
            defender_id: 20,
            status: WarStatus::Active,
            started_at: now,
            scheduled_end_at: now.plus_days(30),
            initiative_holder_id: Some(10),
            initiative_expires_at: Some(now.plus_hours(24)),
            initiative_lost: false,
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(WarStatus::EndedNegotiated.is_terminal());
        assert!(WarStatus::EndedExpired.is_terminal());
        assert!(!WarStatus::Active.is_terminal());
    }

    #[test]
    fn peace_proposed_can_revert_or_end() {
        assert!(WarStatus::PeaceProposed.can_transition(WarStatus::Active));
        assert!(WarStatus::PeaceProposed.can_transition(WarStatus::EndedNegotiated));
        assert!(WarStatus::PeaceProposed.can_transition(WarStatus::EndedExpired));
        assert!(!WarStatus::Active.can_transition(WarStatus::Active));
    }

    #[test]
    fn unordered_pair_matching() {
        let now = Timestamp::from_unix(0);
        let w = war(now);
        assert!(w.is_between(10, 20));
        assert!(w.is_between(20, 10));
        assert!(!w.is_between(10, 30));
        assert_eq!(w.opponent_of(10), Some(20));
        assert_eq!(w.opponent_of(30), None);
    }

    #[test]
    fn battle_rights_follow_initiative() {
        let now = Timestamp::from_unix(0);
        let mut w = war(now);
        assert!(w.has_battle_rights(10, now));
        assert!(!w.has_battle_rights(20, now));
        // Window expired but not yet flagged lost: holder loses the right.
        assert!(!w.has_battle_rights(10, now.plus_hours(25)));

        // Once flagged lost, either side may open a battle.
        w.initiative_lost = true;
        assert!(w.has_battle_rights(10, now.plus_hours(25)));
        assert!(w.has_battle_rights(20, now.plus_hours(25)));

        // Re-won initiative restores exclusivity.
        w.grant_initiative(20, now.plus_hours(48));
        assert!(!w.initiative_lost);
        assert!(w.has_battle_rights(20, now.plus_hours(30)));
        assert!(!w.has_battle_rights(10, now.plus_hours(30)));
    }
}
