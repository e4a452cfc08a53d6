use serde::{Deserialize, Serialize};

use super::clock::Timestamp;
use super::machine::StateMachine;

/// What a law does when enacted. A closed set: the executor dispatch in
/// the law pass is an exhaustive `match`, so adding a variant without an
/// executor fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LawKind {
    DeclareWar { defender_id: u64 },
    /// One half of a joint peace accord; `war_id` ties the two halves to
    /// the same war.
    ProposePeace { war_id: u64 },
    /// Inviter-side half of a joint alliance invitation.
    AllianceInvite { alliance_id: u64, invited_id: u64 },
    /// Invited-side half of a joint alliance invitation.
    AllianceJoin { alliance_id: u64 },
    AllianceKick { alliance_id: u64, member_id: u64 },
    AllianceLeave { alliance_id: u64 },
    /// One per member; the dissolution commits only if every member's law
    /// passes.
    AllianceDissolve { alliance_id: u64 },
    DeclareEmbargo { target_id: u64 },
    LiftEmbargo { target_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawStatus {
    Voting,
    Passed,
    Rejected,
}

impl StateMachine for LawStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            LawStatus::Voting => &[LawStatus::Passed, LawStatus::Rejected],
            LawStatus::Passed | LawStatus::Rejected => &[],
        }
    }
}

/// One citizen's vote on a law. One ballot per voter, cast while the
/// window is open; never changed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ballot {
    pub voter_id: u64,
    pub approve: bool,
    pub cast_at: Timestamp,
}

/// A pending political proposal with a fixed voting window. Sovereign
/// state changes (war, alliance membership, peace) are never direct
/// mutations; they pass through one of these first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Law {
    pub id: u64,
    /// Country whose congress votes on this law.
    pub country_id: u64,
    pub kind: LawKind,
    pub proposed_by: u64,
    pub status: LawStatus,
    pub proposed_at: Timestamp,
    pub voting_ends_at: Timestamp,
    pub ballots: Vec<Ballot>,
    /// The other half of a joint proposal, if this law has one.
    pub linked_law_id: Option<u64>,
}

impl Law {
    pub fn votes_for(&self) -> usize {
        self.ballots.iter().filter(|b| b.approve).count()
    }

    pub fn votes_against(&self) -> usize {
        self.ballots.iter().filter(|b| !b.approve).count()
    }

    /// Strict majority passes; an exact tie (including zero ballots)
    /// rejects.
    pub fn tally(&self) -> LawStatus {
        if self.votes_for() > self.votes_against() {
            LawStatus::Passed
        } else {
            LawStatus::Rejected
        }
    }

    pub fn has_voted(&self, voter_id: u64) -> bool {
        self.ballots.iter().any(|b| b.voter_id == voter_id)
    }
}

/// What a joint proposal commits when both halves pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JointKind {
    AllianceInvitation { alliance_id: u64, invited_id: u64 },
    PeaceAccord { war_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl StateMachine for JointStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            JointStatus::Pending => &[
                JointStatus::Accepted,
                JointStatus::Rejected,
                JointStatus::Expired,
            ],
            JointStatus::Accepted | JointStatus::Rejected | JointStatus::Expired => &[],
        }
    }
}

/// Two linked laws in different countries sharing one deadline. The
/// second-order change commits only once both pass; a one-sided approval
/// resolves to Rejected, and an unresolved half at the deadline resolves
/// to Expired — a joint proposal never waits forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointProposal {
    pub id: u64,
    pub kind: JointKind,
    pub first_law_id: u64,
    pub second_law_id: u64,
    pub status: JointStatus,
    pub deadline: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn law_with_votes(approvals: usize, rejections: usize) -> Law {
        let t = Timestamp::from_unix(0);
        let mut ballots = Vec::new();
        for i in 0..approvals {
            ballots.push(Ballot {
                voter_id: i as u64,
                approve: true,
                cast_at: t,
            });
        }
        for i in 0..rejections {
            ballots.push(Ballot {
                voter_id: (100 + i) as u64,
                approve: false,
                cast_at: t,
            });
        }
        Law {
            id: 1,
            country_id: 1,
            kind: LawKind::DeclareWar { defender_id: 2 },
            proposed_by: 1,
            status: LawStatus::Voting,
            proposed_at: t,
            voting_ends_at: t.plus_hours(24),
            ballots,
            linked_law_id: None,
        }
    }

    #[test]
    fn majority_passes() {
        assert_eq!(law_with_votes(3, 2).tally(), LawStatus::Passed);
        assert_eq!(law_with_votes(1, 0).tally(), LawStatus::Passed);
    }

    #[test]
    fn tie_and_minority_reject() {
        assert_eq!(law_with_votes(2, 2).tally(), LawStatus::Rejected);
        assert_eq!(law_with_votes(1, 3).tally(), LawStatus::Rejected);
        // No ballots at all is a zero-zero tie.
        assert_eq!(law_with_votes(0, 0).tally(), LawStatus::Rejected);
    }

    #[test]
    fn law_statuses_terminal_once_closed() {
        assert!(LawStatus::Voting.can_transition(LawStatus::Passed));
        assert!(LawStatus::Passed.is_terminal());
        assert!(LawStatus::Rejected.is_terminal());
    }

    #[test]
    fn joint_statuses_resolve_once() {
        assert!(JointStatus::Pending.can_transition(JointStatus::Expired));
        assert!(JointStatus::Accepted.is_terminal());
        assert!(JointStatus::Rejected.is_terminal());
        assert!(JointStatus::Expired.is_terminal());
    }
}
