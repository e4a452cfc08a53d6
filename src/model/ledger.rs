use serde::{Deserialize, Serialize};

use super::battle::Side;
use super::clock::Timestamp;

/// A combatant joining one side of a battle. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub battle_id: u64,
    pub user_id: u64,
    pub side: Side,
    pub joined_at: Timestamp,
}

/// A single damage contribution. Append-only: rows are never updated or
/// deleted, and no aggregate row is maintained incrementally, so many
/// in-flight player actions can write concurrently without ever touching
/// the round record. The per-side sum is the sole input to round
/// resolution, computed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageRecord {
    pub battle_id: u64,
    pub round_number: u8,
    pub user_id: u64,
    pub side: Side,
    pub amount: u64,
    pub dealt_at: Timestamp,
}

/// Damage summed per side for one `(battle, round)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTotals {
    pub attacker: u64,
    pub defender: u64,
}

impl RoundTotals {
    pub fn for_side(&self, side: Side) -> u64 {
        match side {
            Side::Attacker => self.attacker,
            Side::Defender => self.defender,
        }
    }

    /// The strictly stronger side, or `None` on an exact tie. Tie
    /// resolution is a policy decision and deliberately lives with the
    /// caller, not in the ledger.
    pub fn leader(&self) -> Option<Side> {
        if self.attacker > self.defender {
            Some(Side::Attacker)
        } else if self.defender > self.attacker {
            Some(Side::Defender)
        } else {
            None
        }
    }
}

/// Sum ledger damage per side for one round of one battle.
pub fn round_totals(ledger: &[DamageRecord], battle_id: u64, round_number: u8) -> RoundTotals {
    let mut totals = RoundTotals::default();
    for rec in ledger {
        if rec.battle_id == battle_id && rec.round_number == round_number {
            match rec.side {
                Side::Attacker => totals.attacker += rec.amount,
                Side::Defender => totals.defender += rec.amount,
            }
        }
    }
    totals
}

/// The top damage dealer on `side` across the whole battle, with their
/// total. Used for battle-hero awards and bounty settlement.
pub fn top_contributor(ledger: &[DamageRecord], battle_id: u64, side: Side) -> Option<(u64, u64)> {
    let mut by_user: Vec<(u64, u64)> = Vec::new();
    for rec in ledger {
        if rec.battle_id != battle_id || rec.side != side {
            continue;
        }
        match by_user.iter_mut().find(|(user, _)| *user == rec.user_id) {
            Some((_, total)) => *total += rec.amount,
            None => by_user.push((rec.user_id, rec.amount)),
        }
    }
    // Ties go to the earliest contributor, which max_by_key's last-wins
    // semantics would invert; scan explicitly.
    let mut best: Option<(u64, u64)> = None;
    for (user, total) in by_user {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((user, total)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(round: u8, user: u64, side: Side, amount: u64) -> DamageRecord {
        DamageRecord {
            battle_id: 7,
            round_number: round,
            user_id: user,
            side,
            amount,
            dealt_at: Timestamp::from_unix(0),
        }
    }

    #[test]
    fn totals_filter_by_battle_and_round() {
        let ledger = vec![
            rec(1, 100, Side::Attacker, 50),
            rec(1, 101, Side::Attacker, 30),
            rec(1, 200, Side::Defender, 60),
            rec(2, 100, Side::Attacker, 999),
        ];
        let totals = round_totals(&ledger, 7, 1);
        assert_eq!(totals.attacker, 80);
        assert_eq!(totals.defender, 60);
        assert_eq!(totals.leader(), Some(Side::Attacker));

        // Other battles do not leak in.
        assert_eq!(round_totals(&ledger, 8, 1), RoundTotals::default());
    }

    #[test]
    fn exact_tie_has_no_leader() {
        let ledger = vec![
            rec(1, 100, Side::Attacker, 200),
            rec(1, 200, Side::Defender, 200),
        ];
        assert_eq!(round_totals(&ledger, 7, 1).leader(), None);
    }

    #[test]
    fn top_contributor_sums_across_rounds() {
        let ledger = vec![
            rec(1, 100, Side::Attacker, 50),
            rec(2, 100, Side::Attacker, 50),
            rec(1, 101, Side::Attacker, 70),
            rec(1, 200, Side::Defender, 500),
        ];
        assert_eq!(top_contributor(&ledger, 7, Side::Attacker), Some((100, 100)));
        assert_eq!(top_contributor(&ledger, 7, Side::Defender), Some((200, 500)));
        assert_eq!(top_contributor(&ledger, 9, Side::Attacker), None);
    }

    #[test]
    fn top_contributor_tie_goes_to_earliest() {
        let ledger = vec![
            rec(1, 100, Side::Attacker, 80),
            rec(1, 101, Side::Attacker, 80),
        ];
        assert_eq!(top_contributor(&ledger, 7, Side::Attacker), Some((100, 80)));
    }
}
