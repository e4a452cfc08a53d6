use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::clock::Timestamp;
use super::machine::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceStatus {
    Active,
    Dissolved,
}

impl StateMachine for AllianceStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            AllianceStatus::Active => &[AllianceStatus::Dissolved],
            AllianceStatus::Dissolved => &[],
        }
    }
}

/// A membership row. Ended memberships are kept for audit; `left_at`
/// carries the kick/leave/dissolution instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub country_id: u64,
    pub joined_at: Timestamp,
    pub left_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alliance {
    pub id: u64,
    pub name: String,
    pub founder_id: u64,
    pub status: AllianceStatus,
    pub founded_at: Timestamp,
    pub members: Vec<Membership>,
}

impl Alliance {
    pub fn is_member(&self, country_id: u64) -> bool {
        self.members
            .iter()
            .any(|m| m.country_id == country_id && m.left_at.is_none())
    }

    pub fn active_members(&self) -> impl Iterator<Item = &Membership> {
        self.members.iter().filter(|m| m.left_at.is_none())
    }

    /// End `country_id`'s active membership. No-op if none exists, so
    /// kick/leave executors stay idempotent.
    pub fn end_membership(&mut self, country_id: u64, at: Timestamp) -> bool {
        match self
            .members
            .iter_mut()
            .find(|m| m.country_id == country_id && m.left_at.is_none())
        {
            Some(m) => {
                m.left_at = Some(at);
                true
            }
            None => false,
        }
    }
}

/// An approved alliance leave waiting out its delay. The member stays in
/// the alliance until the alliance pass executes this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingLeave {
    pub id: u64,
    pub alliance_id: u64,
    pub country_id: u64,
    pub execute_at: Timestamp,
    pub executed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DissolutionStatus {
    Pending,
    Approved,
    Rejected,
}

impl StateMachine for DissolutionStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            DissolutionStatus::Pending => {
                &[DissolutionStatus::Approved, DissolutionStatus::Rejected]
            }
            DissolutionStatus::Approved | DissolutionStatus::Rejected => &[],
        }
    }
}

/// A dissolution vote spanning every member: one law per member country
/// with a shared deadline. All must pass; a single rejection voids it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dissolution {
    pub id: u64,
    pub alliance_id: u64,
    /// member country id -> that member's law id.
    pub member_laws: BTreeMap<u64, u64>,
    pub status: DissolutionStatus,
    pub deadline: Timestamp,
}

/// A bilateral trade embargo. Direction matters for attribution only;
/// `blocks` checks both orientations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embargo {
    pub id: u64,
    pub country_id: u64,
    pub target_id: u64,
    pub imposed_at: Timestamp,
    pub lifted_at: Option<Timestamp>,
}

impl Embargo {
    pub fn is_active(&self) -> bool {
        self.lifted_at.is_none()
    }

    pub fn blocks(&self, a: u64, b: u64) -> bool {
        self.is_active()
            && ((self.country_id == a && self.target_id == b)
                || (self.country_id == b && self.target_id == a))
    }
}
