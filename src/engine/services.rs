use std::collections::BTreeMap;

use crate::error::ServiceError;

/// Territory-ownership collaborator. The region owner relation is the one
/// piece of shared mutable state the battle resolver touches, so
/// `capture_region` must be idempotent: capturing for the current owner is
/// a no-op, and a retried capture after a partial failure applies nothing
/// twice.
pub trait TerritoryService {
    fn capture_region(&mut self, region_id: u64, country_id: u64) -> Result<(), ServiceError>;
    fn current_owner(&self, region_id: u64) -> Option<u64>;
    /// Whether `region_id` borders territory held by `country_id` —
    /// the adjacency half of battle-opening eligibility.
    fn borders_country(&self, region_id: u64, country_id: u64) -> bool;
}

/// Outbound alerting collaborator. Fire-and-forget: the engine logs
/// failures and moves on, never retrying synchronously.
pub trait Notifier {
    fn notify(
        &mut self,
        user_id: u64,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), ServiceError>;
}

/// Treasury side-effect hook (hero gold, bounty payouts). Bookkeeping
/// itself is out of scope.
pub trait Treasury {
    fn deposit(&mut self, account_id: u64, amount: u64) -> Result<(), ServiceError>;
}

/// The collaborator bundle handed to every reconciliation pass.
pub struct Services {
    pub territory: Box<dyn TerritoryService>,
    pub notifier: Box<dyn Notifier>,
    pub treasury: Box<dyn Treasury>,
}

impl Services {
    /// In-memory defaults: map-backed territory, log-only notifier, no-op
    /// treasury.
    pub fn in_memory() -> Self {
        Self {
            territory: Box::new(MapTerritory::new()),
            notifier: Box::new(LogNotifier),
            treasury: Box::new(NullTreasury),
        }
    }

    /// Fire-and-forget notify with the logging policy applied.
    pub fn notify(&mut self, user_id: u64, event: &str, payload: serde_json::Value) {
        if let Err(err) = self.notifier.notify(user_id, event, payload) {
            tracing::warn!(user_id, event, %err, "notification failed, not retrying");
        }
    }
}

/// Map-backed territory: region -> owner plus an undirected region
/// adjacency list.
pub struct MapTerritory {
    owners: BTreeMap<u64, u64>,
    adjacency: Vec<(u64, u64)>,
}

impl MapTerritory {
    pub fn new() -> Self {
        Self {
            owners: BTreeMap::new(),
            adjacency: Vec::new(),
        }
    }

    pub fn set_owner(&mut self, region_id: u64, country_id: u64) {
        self.owners.insert(region_id, country_id);
    }

    pub fn connect(&mut self, region_a: u64, region_b: u64) {
        self.adjacency.push((region_a, region_b));
    }

    fn neighbors(&self, region_id: u64) -> impl Iterator<Item = u64> + '_ {
        self.adjacency.iter().filter_map(move |&(a, b)| {
            if a == region_id {
                Some(b)
            } else if b == region_id {
                Some(a)
            } else {
                None
            }
        })
    }
}

impl Default for MapTerritory {
    fn default() -> Self {
        Self::new()
    }
}

impl TerritoryService for MapTerritory {
    fn capture_region(&mut self, region_id: u64, country_id: u64) -> Result<(), ServiceError> {
        match self.owners.get_mut(&region_id) {
            Some(owner) => {
                *owner = country_id;
                Ok(())
            }
            None => Err(ServiceError(format!("unknown region {region_id}"))),
        }
    }

    fn current_owner(&self, region_id: u64) -> Option<u64> {
        self.owners.get(&region_id).copied()
    }

    fn borders_country(&self, region_id: u64, country_id: u64) -> bool {
        self.neighbors(region_id)
            .any(|n| self.owners.get(&n) == Some(&country_id))
    }
}

/// Notifier that only logs.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(
        &mut self,
        user_id: u64,
        event: &str,
        _payload: serde_json::Value,
    ) -> Result<(), ServiceError> {
        tracing::info!(user_id, event, "notify");
        Ok(())
    }
}

/// Treasury hook that accepts every deposit and does nothing.
pub struct NullTreasury;

impl Treasury for NullTreasury {
    fn deposit(&mut self, _account_id: u64, _amount: u64) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_is_idempotent() {
        let mut territory = MapTerritory::new();
        territory.set_owner(1, 10);
        territory.capture_region(1, 20).unwrap();
        assert_eq!(territory.current_owner(1), Some(20));
        territory.capture_region(1, 20).unwrap();
        assert_eq!(territory.current_owner(1), Some(20));
    }

    #[test]
    fn capture_unknown_region_fails() {
        let mut territory = MapTerritory::new();
        assert!(territory.capture_region(99, 10).is_err());
    }

    #[test]
    fn adjacency_is_undirected_and_owner_aware() {
        let mut territory = MapTerritory::new();
        territory.set_owner(1, 10);
        territory.set_owner(2, 20);
        territory.connect(1, 2);
        assert!(territory.borders_country(2, 10));
        assert!(territory.borders_country(1, 20));
        assert!(!territory.borders_country(2, 30));
    }
}
