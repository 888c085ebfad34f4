//! AttributeCatalog - Configured attributes and their purchased ranks

mod definition;

pub use definition::AttributeDefinition;

use crate::error::ProgressionError;
use crate::progress::ResourcePool;
use crate::types::AttributeId;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a direct attribute upgrade is not possible right now
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpgradeBlocked {
    #[error("No such attribute.")]
    UnknownAttribute,
    #[error("Max rank reached.")]
    MaxRankReached,
    #[error("Requires player level {0}.")]
    LevelTooLow(u32),
    #[error("Missing prerequisite attribute(s).")]
    MissingPrerequisites,
    #[error("Requires {0} point(s).")]
    NotEnoughPoints(u32),
}

/// Attribute definitions plus the rank track bought with points
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    definitions: BTreeMap<AttributeId, AttributeDefinition>,
    ranks: BTreeMap<AttributeId, u32>,
}

impl AttributeCatalog {
    pub fn new() -> Self {
        AttributeCatalog::default()
    }

    /// Register (or replace) a definition
    pub fn register(&mut self, definition: AttributeDefinition) {
        self.definitions.insert(definition.id, definition);
    }

    pub fn get(&self, id: AttributeId) -> Option<&AttributeDefinition> {
        self.definitions.get(&id)
    }

    pub fn contains(&self, id: AttributeId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.definitions.values()
    }

    pub fn rank_of(&self, id: AttributeId) -> u32 {
        self.ranks.get(&id).copied().unwrap_or(0)
    }

    /// Non-zero ranks, for snapshots
    pub fn ranks(&self) -> &BTreeMap<AttributeId, u32> {
        &self.ranks
    }

    /// Base value at the current rank, or 0 for undefined attributes
    pub fn ranked_base(&self, id: AttributeId) -> f64 {
        let Some(def) = self.definitions.get(&id) else {
            return 0.0;
        };
        match self.rank_of(id) {
            0 => def.base_value,
            rank => def.value_at_rank(rank),
        }
    }

    /// Raise the rank by one, returning the new rank
    pub fn upgrade(&mut self, id: AttributeId) -> Result<u32, ProgressionError> {
        let def = self
            .definitions
            .get(&id)
            .ok_or(ProgressionError::UnknownAttribute(id))?;
        let rank = self.rank_of(id);
        if rank >= def.max_rank {
            return Err(ProgressionError::MaxRankReached(id));
        }
        self.ranks.insert(id, rank + 1);
        Ok(rank + 1)
    }

    /// Set a rank directly, clamped to the definition's max rank
    ///
    /// Returns the rank actually stored.
    pub fn set_rank(&mut self, id: AttributeId, rank: u32) -> Result<u32, ProgressionError> {
        let def = self
            .definitions
            .get(&id)
            .ok_or(ProgressionError::UnknownAttribute(id))?;
        let rank = rank.min(def.max_rank);
        if rank == 0 {
            self.ranks.remove(&id);
        } else {
            self.ranks.insert(id, rank);
        }
        Ok(rank)
    }

    pub fn reset_ranks(&mut self) {
        self.ranks.clear();
    }

    /// Check a direct upgrade against the shared resource pool
    pub fn can_upgrade(&self, id: AttributeId, pool: &ResourcePool) -> Result<(), UpgradeBlocked> {
        let def = self.definitions.get(&id).ok_or(UpgradeBlocked::UnknownAttribute)?;
        if self.rank_of(id) >= def.max_rank {
            return Err(UpgradeBlocked::MaxRankReached);
        }
        if pool.level() < def.required_level {
            return Err(UpgradeBlocked::LevelTooLow(def.required_level));
        }
        if !def.prerequisites.iter().all(|p| self.rank_of(*p) > 0) {
            return Err(UpgradeBlocked::MissingPrerequisites);
        }
        if pool.spendable_points() < def.upgrade_cost {
            return Err(UpgradeBlocked::NotEnoughPoints(def.upgrade_cost));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AttributeCatalog {
        let mut catalog = AttributeCatalog::new();
        catalog.register(AttributeDefinition::new(AttributeId::MaxHp, 100.0).with_increment(25.0, 2));
        catalog
    }

    #[test]
    fn test_ranked_base_uses_rank_track() {
        let mut catalog = catalog();
        assert!((catalog.ranked_base(AttributeId::MaxHp) - 100.0).abs() < f64::EPSILON);

        catalog.upgrade(AttributeId::MaxHp).unwrap();
        assert!((catalog.ranked_base(AttributeId::MaxHp) - 100.0).abs() < f64::EPSILON);

        catalog.upgrade(AttributeId::MaxHp).unwrap();
        assert!((catalog.ranked_base(AttributeId::MaxHp) - 125.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_upgrade_stops_at_max_rank() {
        let mut catalog = catalog();
        assert_eq!(catalog.upgrade(AttributeId::MaxHp), Ok(1));
        assert_eq!(catalog.upgrade(AttributeId::MaxHp), Ok(2));
        assert_eq!(
            catalog.upgrade(AttributeId::MaxHp),
            Err(ProgressionError::MaxRankReached(AttributeId::MaxHp))
        );
        assert_eq!(catalog.rank_of(AttributeId::MaxHp), 2);
    }

    #[test]
    fn test_undefined_attribute() {
        let mut catalog = catalog();
        assert_eq!(catalog.rank_of(AttributeId::Thorns), 0);
        assert!((catalog.ranked_base(AttributeId::Thorns)).abs() < f64::EPSILON);
        assert!(catalog.upgrade(AttributeId::Thorns).is_err());
    }

    #[test]
    fn test_set_rank_clamps() {
        let mut catalog = catalog();
        assert_eq!(catalog.set_rank(AttributeId::MaxHp, 9), Ok(2));
        assert_eq!(catalog.set_rank(AttributeId::MaxHp, 0), Ok(0));
        assert!(catalog.ranks().is_empty());
    }

    #[test]
    fn test_can_upgrade_order() {
        let mut catalog = catalog();
        let mut armor = AttributeDefinition::new(AttributeId::Armor, 0.0).with_increment(1.0, 3);
        armor.required_level = 3;
        armor.prerequisites = vec![AttributeId::MaxHp];
        armor.upgrade_cost = 2;
        catalog.register(armor);

        let mut pool = ResourcePool::new(1, 0);
        assert_eq!(
            catalog.can_upgrade(AttributeId::Armor, &pool),
            Err(UpgradeBlocked::LevelTooLow(3))
        );

        pool = ResourcePool::new(3, 0);
        assert_eq!(
            catalog.can_upgrade(AttributeId::Armor, &pool),
            Err(UpgradeBlocked::MissingPrerequisites)
        );

        catalog.upgrade(AttributeId::MaxHp).unwrap();
        assert_eq!(
            catalog.can_upgrade(AttributeId::Armor, &pool),
            Err(UpgradeBlocked::NotEnoughPoints(2))
        );

        pool = ResourcePool::new(3, 2);
        assert_eq!(catalog.can_upgrade(AttributeId::Armor, &pool), Ok(()));
    }
}
