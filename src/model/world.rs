use std::collections::BTreeMap;

use super::alliance::{
    Alliance, AllianceStatus, Dissolution, DissolutionStatus, Embargo, Membership, PendingLeave,
};
use super::battle::{Battle, BattleRound, BattleStatus, RoundStatus, Side};
use super::bounty::{BountyContract, BountyStatus};
use super::clock::Timestamp;
use super::country::Country;
use super::journal::{JournalEntry, JournalKind};
use super::law::{JointKind, JointProposal, JointStatus, Law, LawKind, LawStatus};
use super::ledger::{DamageRecord, Participation};
use super::machine::guard_transition;
use super::war::{War, WarStatus};
use crate::error::EngineError;
use crate::id::IdGenerator;

/// In-memory image of the persisted state: one `BTreeMap` per entity
/// table, append-only vectors for the ledgers, a shared ID sequence, and
/// the reconciler's notion of "now".
///
/// Mutators come in two flavors, mirroring the error taxonomy: `add_*`
/// constructors assert referential integrity (a missing foreign row is a
/// programmer error), while every status change goes through a
/// `transition_*` helper that consults the status enum's transition table
/// and returns an error instead of mutating on an illegal edge.
#[derive(Debug)]
pub struct World {
    pub countries: BTreeMap<u64, Country>,
    pub wars: BTreeMap<u64, War>,
    pub battles: BTreeMap<u64, Battle>,
    pub rounds: BTreeMap<u64, BattleRound>,
    pub participations: Vec<Participation>,
    pub damage_ledger: Vec<DamageRecord>,
    pub laws: BTreeMap<u64, Law>,
    pub joint_proposals: BTreeMap<u64, JointProposal>,
    pub alliances: BTreeMap<u64, Alliance>,
    pub pending_leaves: BTreeMap<u64, PendingLeave>,
    pub dissolutions: BTreeMap<u64, Dissolution>,
    pub embargoes: BTreeMap<u64, Embargo>,
    pub bounties: BTreeMap<u64, BountyContract>,
    pub journal: Vec<JournalEntry>,
    pub id_gen: IdGenerator,
    pub current_time: Timestamp,
}

impl World {
    pub fn new() -> Self {
        Self {
            countries: BTreeMap::new(),
            wars: BTreeMap::new(),
            battles: BTreeMap::new(),
            rounds: BTreeMap::new(),
            participations: Vec::new(),
            damage_ledger: Vec::new(),
            laws: BTreeMap::new(),
            joint_proposals: BTreeMap::new(),
            alliances: BTreeMap::new(),
            pending_leaves: BTreeMap::new(),
            dissolutions: BTreeMap::new(),
            embargoes: BTreeMap::new(),
            bounties: BTreeMap::new(),
            journal: Vec::new(),
            id_gen: IdGenerator::new(),
            current_time: Timestamp::from_unix(0),
        }
    }

    // -- Journal --

    /// Append an audit entry at the current time. Returns its ID so
    /// signals can reference it.
    pub fn record(&mut self, kind: JournalKind, description: String) -> u64 {
        self.record_entry(kind, description, false)
    }

    /// Append a manually-corrected audit entry (operator override surface).
    pub fn record_manual(&mut self, kind: JournalKind, description: String) -> u64 {
        self.record_entry(kind, description, true)
    }

    fn record_entry(&mut self, kind: JournalKind, description: String, manual: bool) -> u64 {
        let id = self.id_gen.next_id();
        self.journal.push(JournalEntry {
            id,
            at: self.current_time,
            kind,
            description,
            manual,
        });
        id
    }

    // -- Countries --

    pub fn add_country(&mut self, name: &str) -> u64 {
        let id = self.id_gen.next_id();
        self.countries.insert(
            id,
            Country {
                id,
                name: name.to_string(),
                alliance_id: None,
            },
        );
        id
    }

    pub fn country_name(&self, id: u64) -> &str {
        self.countries
            .get(&id)
            .map(|c| c.name.as_str())
            .unwrap_or("unknown country")
    }

    // -- Wars --

    /// Insert a new war. Callers (the declare-war executor) are
    /// responsible for the duplicate-active-war check first.
    ///
    /// # Panics
    /// Panics if either country does not exist.
    pub fn add_war(
        &mut self,
        attacker_id: u64,
        defender_id: u64,
        started_at: Timestamp,
        scheduled_end_at: Timestamp,
    ) -> u64 {
        assert!(
            self.countries.contains_key(&attacker_id),
            "add_war: attacker {attacker_id} not found"
        );
        assert!(
            self.countries.contains_key(&defender_id),
            "add_war: defender {defender_id} not found"
        );
        assert!(
            attacker_id != defender_id,
            "add_war: a country cannot declare war on itself"
        );
        let id = self.id_gen.next_id();
        self.wars.insert(
            id,
            War {
                id,
                attacker_id,
                defender_id,
                status: WarStatus::Active,
                started_at,
                scheduled_end_at,
                initiative_holder_id: None,
                initiative_expires_at: None,
                initiative_lost: false,
            },
        );
        id
    }

    /// The non-terminal war between the unordered pair, if one exists.
    /// Checked in both directions; PEACE_PROPOSED still counts as open.
    pub fn open_war_between(&self, a: u64, b: u64) -> Option<&War> {
        self.wars
            .values()
            .find(|w| !w.is_over() && w.is_between(a, b))
    }

    pub fn transition_war(&mut self, war_id: u64, to: WarStatus) -> Result<(), EngineError> {
        let war = self.wars.get_mut(&war_id).ok_or(EngineError::NotFound {
            entity: "war",
            id: war_id,
        })?;
        guard_transition("war", war_id, war.status, to)?;
        war.status = to;
        Ok(())
    }

    // -- Battles and rounds --

    /// Open a battle and its first round in one step, clamping the round
    /// deadline to the battle ceiling. Eligibility checks (initiative,
    /// adjacency, contested region) belong to the caller.
    pub fn add_battle(
        &mut self,
        war_id: u64,
        region_id: u64,
        now: Timestamp,
        ends_at: Timestamp,
        first_round_ends_at: Timestamp,
    ) -> Result<(u64, u64), EngineError> {
        if !self.wars.contains_key(&war_id) {
            return Err(EngineError::NotFound {
                entity: "war",
                id: war_id,
            });
        }
        let battle_id = self.id_gen.next_id();
        let round_id = self.id_gen.next_id();
        let round_ends = first_round_ends_at.min(ends_at);
        self.battles.insert(
            battle_id,
            Battle {
                id: battle_id,
                war_id,
                region_id,
                status: BattleStatus::Active,
                current_round: 1,
                started_at: now,
                ends_at,
                attacker_rounds_won: 0,
                defender_rounds_won: 0,
            },
        );
        self.rounds.insert(
            round_id,
            BattleRound {
                id: round_id,
                battle_id,
                round_number: 1,
                status: RoundStatus::Active,
                started_at: now,
                ends_at: round_ends,
                winner: None,
            },
        );
        Ok((battle_id, round_id))
    }

    /// Create the next round of an ACTIVE battle. The caller supplies the
    /// already-clamped deadline; a deadline past the battle ceiling is an
    /// invariant breach and leaves the store untouched.
    pub fn add_round(
        &mut self,
        battle_id: u64,
        started_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<u64, EngineError> {
        let battle = self.battles.get(&battle_id).ok_or(EngineError::NotFound {
            entity: "battle",
            id: battle_id,
        })?;
        if battle.status != BattleStatus::Active {
            return Err(EngineError::Invariant(format!(
                "cannot add a round to non-active battle {battle_id}"
            )));
        }
        if ends_at > battle.ends_at {
            return Err(EngineError::Invariant(format!(
                "round deadline would outlive battle {battle_id}"
            )));
        }
        if self.active_round_of(battle_id).is_some() {
            return Err(EngineError::Invariant(format!(
                "battle {battle_id} already has an active round"
            )));
        }
        let number = battle.current_round + 1;
        let id = self.id_gen.next_id();
        self.rounds.insert(
            id,
            BattleRound {
                id,
                battle_id,
                round_number: number,
                status: RoundStatus::Active,
                started_at,
                ends_at,
                winner: None,
            },
        );
        // Checked above that the battle exists.
        if let Some(battle) = self.battles.get_mut(&battle_id) {
            battle.current_round = number;
        }
        Ok(id)
    }

    pub fn transition_battle(
        &mut self,
        battle_id: u64,
        to: BattleStatus,
    ) -> Result<(), EngineError> {
        let battle = self.battles.get_mut(&battle_id).ok_or(EngineError::NotFound {
            entity: "battle",
            id: battle_id,
        })?;
        guard_transition("battle", battle_id, battle.status, to)?;
        battle.status = to;
        Ok(())
    }

    pub fn transition_round(&mut self, round_id: u64, to: RoundStatus) -> Result<(), EngineError> {
        let round = self.rounds.get_mut(&round_id).ok_or(EngineError::NotFound {
            entity: "round",
            id: round_id,
        })?;
        guard_transition("round", round_id, round.status, to)?;
        round.status = to;
        Ok(())
    }

    pub fn active_battle_for_war(&self, war_id: u64) -> Option<&Battle> {
        self.battles
            .values()
            .find(|b| b.war_id == war_id && b.status == BattleStatus::Active)
    }

    pub fn active_battle_in_region(&self, region_id: u64) -> Option<&Battle> {
        self.battles
            .values()
            .find(|b| b.region_id == region_id && b.status == BattleStatus::Active)
    }

    pub fn active_round_of(&self, battle_id: u64) -> Option<&BattleRound> {
        self.rounds
            .values()
            .find(|r| r.battle_id == battle_id && r.status == RoundStatus::Active)
    }

    pub fn battles_for_war(&self, war_id: u64) -> impl Iterator<Item = &Battle> {
        self.battles.values().filter(move |b| b.war_id == war_id)
    }

    pub fn wars_for_country(&self, country_id: u64) -> impl Iterator<Item = &War> {
        self.wars.values().filter(move |w| w.involves(country_id))
    }

    // -- Laws and joint proposals --

    /// # Panics
    /// Panics if the proposing country does not exist.
    pub fn add_law(
        &mut self,
        country_id: u64,
        kind: LawKind,
        proposed_by: u64,
        proposed_at: Timestamp,
        voting_ends_at: Timestamp,
    ) -> u64 {
        assert!(
            self.countries.contains_key(&country_id),
            "add_law: country {country_id} not found"
        );
        let id = self.id_gen.next_id();
        self.laws.insert(
            id,
            Law {
                id,
                country_id,
                kind,
                proposed_by,
                status: LawStatus::Voting,
                proposed_at,
                voting_ends_at,
                ballots: Vec::new(),
                linked_law_id: None,
            },
        );
        id
    }

    /// Link two laws as halves of one joint proposal.
    ///
    /// # Panics
    /// Panics if either law does not exist.
    pub fn add_joint_proposal(
        &mut self,
        kind: JointKind,
        first_law_id: u64,
        second_law_id: u64,
        deadline: Timestamp,
    ) -> u64 {
        assert!(
            self.laws.contains_key(&first_law_id),
            "add_joint_proposal: law {first_law_id} not found"
        );
        assert!(
            self.laws.contains_key(&second_law_id),
            "add_joint_proposal: law {second_law_id} not found"
        );
        let id = self.id_gen.next_id();
        if let Some(law) = self.laws.get_mut(&first_law_id) {
            law.linked_law_id = Some(second_law_id);
        }
        if let Some(law) = self.laws.get_mut(&second_law_id) {
            law.linked_law_id = Some(first_law_id);
        }
        self.joint_proposals.insert(
            id,
            JointProposal {
                id,
                kind,
                first_law_id,
                second_law_id,
                status: JointStatus::Pending,
                deadline,
            },
        );
        id
    }

    pub fn transition_law(&mut self, law_id: u64, to: LawStatus) -> Result<(), EngineError> {
        let law = self.laws.get_mut(&law_id).ok_or(EngineError::NotFound {
            entity: "law",
            id: law_id,
        })?;
        guard_transition("law", law_id, law.status, to)?;
        law.status = to;
        Ok(())
    }

    pub fn transition_joint_proposal(
        &mut self,
        proposal_id: u64,
        to: JointStatus,
    ) -> Result<(), EngineError> {
        let proposal = self
            .joint_proposals
            .get_mut(&proposal_id)
            .ok_or(EngineError::NotFound {
                entity: "joint_proposal",
                id: proposal_id,
            })?;
        guard_transition("joint_proposal", proposal_id, proposal.status, to)?;
        proposal.status = to;
        Ok(())
    }

    pub fn transition_bounty(
        &mut self,
        contract_id: u64,
        to: BountyStatus,
    ) -> Result<(), EngineError> {
        let contract = self.bounties.get_mut(&contract_id).ok_or(EngineError::NotFound {
            entity: "bounty",
            id: contract_id,
        })?;
        guard_transition("bounty", contract_id, contract.status, to)?;
        contract.status = to;
        Ok(())
    }

    pub fn transition_dissolution(
        &mut self,
        dissolution_id: u64,
        to: DissolutionStatus,
    ) -> Result<(), EngineError> {
        let dissolution = self
            .dissolutions
            .get_mut(&dissolution_id)
            .ok_or(EngineError::NotFound {
                entity: "dissolution",
                id: dissolution_id,
            })?;
        guard_transition("dissolution", dissolution_id, dissolution.status, to)?;
        dissolution.status = to;
        Ok(())
    }

    pub fn transition_alliance(
        &mut self,
        alliance_id: u64,
        to: AllianceStatus,
    ) -> Result<(), EngineError> {
        let alliance = self
            .alliances
            .get_mut(&alliance_id)
            .ok_or(EngineError::NotFound {
                entity: "alliance",
                id: alliance_id,
            })?;
        guard_transition("alliance", alliance_id, alliance.status, to)?;
        alliance.status = to;
        Ok(())
    }

    // -- Alliances --

    pub fn add_alliance(&mut self, name: &str, founder_id: u64, founded_at: Timestamp) -> u64 {
        assert!(
            self.countries.contains_key(&founder_id),
            "add_alliance: founder {founder_id} not found"
        );
        let id = self.id_gen.next_id();
        self.alliances.insert(
            id,
            Alliance {
                id,
                name: name.to_string(),
                founder_id,
                status: AllianceStatus::Active,
                founded_at,
                members: vec![Membership {
                    country_id: founder_id,
                    joined_at: founded_at,
                    left_at: None,
                }],
            },
        );
        if let Some(country) = self.countries.get_mut(&founder_id) {
            country.alliance_id = Some(id);
        }
        id
    }

    /// Add a membership row and mirror it on the country.
    pub fn join_alliance(
        &mut self,
        alliance_id: u64,
        country_id: u64,
        at: Timestamp,
    ) -> Result<(), EngineError> {
        let alliance = self
            .alliances
            .get_mut(&alliance_id)
            .ok_or(EngineError::NotFound {
                entity: "alliance",
                id: alliance_id,
            })?;
        if alliance.is_member(country_id) {
            // Duplicate joins happen on overlapping passes; keep idempotent.
            return Ok(());
        }
        alliance.members.push(Membership {
            country_id,
            joined_at: at,
            left_at: None,
        });
        if let Some(country) = self.countries.get_mut(&country_id) {
            country.alliance_id = Some(alliance_id);
        }
        Ok(())
    }

    /// End a membership row and clear the country mirror.
    pub fn leave_alliance(
        &mut self,
        alliance_id: u64,
        country_id: u64,
        at: Timestamp,
    ) -> Result<bool, EngineError> {
        let alliance = self
            .alliances
            .get_mut(&alliance_id)
            .ok_or(EngineError::NotFound {
                entity: "alliance",
                id: alliance_id,
            })?;
        let ended = alliance.end_membership(country_id, at);
        if ended
            && let Some(country) = self.countries.get_mut(&country_id)
        {
            country.alliance_id = None;
        }
        Ok(ended)
    }

    pub fn add_pending_leave(
        &mut self,
        alliance_id: u64,
        country_id: u64,
        execute_at: Timestamp,
    ) -> u64 {
        let id = self.id_gen.next_id();
        self.pending_leaves.insert(
            id,
            PendingLeave {
                id,
                alliance_id,
                country_id,
                execute_at,
                executed: false,
            },
        );
        id
    }

    pub fn add_dissolution(
        &mut self,
        alliance_id: u64,
        member_laws: BTreeMap<u64, u64>,
        deadline: Timestamp,
    ) -> u64 {
        let id = self.id_gen.next_id();
        self.dissolutions.insert(
            id,
            Dissolution {
                id,
                alliance_id,
                member_laws,
                status: DissolutionStatus::Pending,
                deadline,
            },
        );
        id
    }

    pub fn add_embargo(&mut self, country_id: u64, target_id: u64, at: Timestamp) -> u64 {
        let id = self.id_gen.next_id();
        self.embargoes.insert(
            id,
            Embargo {
                id,
                country_id,
                target_id,
                imposed_at: at,
                lifted_at: None,
            },
        );
        id
    }

    pub fn has_embargo(&self, a: u64, b: u64) -> bool {
        self.embargoes.values().any(|e| e.blocks(a, b))
    }

    // -- Bounties --

    pub fn add_bounty(
        &mut self,
        battle_id: u64,
        side: Side,
        reward: u64,
        funder_id: u64,
        at: Timestamp,
    ) -> Result<u64, EngineError> {
        if !self.battles.contains_key(&battle_id) {
            return Err(EngineError::NotFound {
                entity: "battle",
                id: battle_id,
            });
        }
        let id = self.id_gen.next_id();
        self.bounties.insert(
            id,
            BountyContract {
                id,
                battle_id,
                side,
                reward,
                funder_id,
                status: BountyStatus::Open,
                opened_at: at,
                awarded_to: None,
            },
        );
        Ok(id)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
