//! Attribute definitions loaded from configuration

use crate::types::AttributeId;
use serde::{Deserialize, Serialize};

/// Configured base value and rank track for one attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: AttributeId,
    /// Display name (falls back to the built-in name when empty)
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_value: f64,
    /// Added once per rank above the first
    #[serde(default)]
    pub increment_per_rank: f64,
    #[serde(default = "default_max_rank")]
    pub max_rank: u32,

    // === Direct upgrade requirements ===
    #[serde(default = "default_one")]
    pub upgrade_cost: u32,
    #[serde(default = "default_one")]
    pub required_level: u32,
    /// Attributes that need at least one rank before this one can be raised
    #[serde(default)]
    pub prerequisites: Vec<AttributeId>,
}

fn default_max_rank() -> u32 {
    5
}

fn default_one() -> u32 {
    1
}

impl AttributeDefinition {
    /// Definition with the given base and no rank increments
    pub fn new(id: AttributeId, base_value: f64) -> Self {
        AttributeDefinition {
            id,
            display_name: String::new(),
            description: String::new(),
            base_value,
            increment_per_rank: 0.0,
            max_rank: default_max_rank(),
            upgrade_cost: 1,
            required_level: 1,
            prerequisites: Vec::new(),
        }
    }

    pub fn with_increment(mut self, increment_per_rank: f64, max_rank: u32) -> Self {
        self.increment_per_rank = increment_per_rank;
        self.max_rank = max_rank;
        self
    }

    /// `base + max(0, rank - 1) × increment`
    pub fn value_at_rank(&self, rank: u32) -> f64 {
        self.base_value + rank.saturating_sub(1) as f64 * self.increment_per_rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_at_rank() {
        let def = AttributeDefinition::new(AttributeId::MaxHp, 100.0).with_increment(20.0, 5);
        assert!((def.value_at_rank(0) - 100.0).abs() < f64::EPSILON);
        assert!((def.value_at_rank(1) - 100.0).abs() < f64::EPSILON);
        assert!((def.value_at_rank(3) - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toml_defaults() {
        let def: AttributeDefinition = toml::from_str("id = \"armor\"\nbase_value = 2.0").unwrap();
        assert_eq!(def.max_rank, 5);
        assert_eq!(def.upgrade_cost, 1);
        assert_eq!(def.required_level, 1);
        assert!(def.prerequisites.is_empty());
    }
}
