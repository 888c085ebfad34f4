//! Skill definitions loaded from configuration

use crate::types::{ModifierEntry, SkillId};
use serde::{Deserialize, Serialize};

/// How a skill's prerequisite list is evaluated against pick history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerequisiteMode {
    /// Every prerequisite must have been picked
    #[default]
    All,
    /// At least one prerequisite must have been picked
    Any,
}

/// Static description of a pickable skill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Unique skill identifier (e.g., "firebolt")
    pub id: SkillId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,

    // === Requirements ===
    #[serde(default = "default_one")]
    pub required_level: u32,
    #[serde(default = "default_one")]
    pub cost: u32,
    #[serde(default)]
    pub prerequisite_mode: PrerequisiteMode,
    #[serde(default)]
    pub prerequisites: Vec<SkillId>,
    /// 0 = unlimited
    #[serde(default = "default_one")]
    pub max_picks: u32,

    /// Relative chance of appearing in a level-up panel; 0 removes it
    #[serde(default = "default_weight")]
    pub drop_weight: f64,

    #[serde(default)]
    pub effects: Vec<ModifierEntry>,
}

fn default_one() -> u32 {
    1
}

fn default_weight() -> f64 {
    1.0
}

impl SkillDefinition {
    /// Level 1, cost 1, single pick, weight 1, no prerequisites or effects
    pub fn new(id: impl Into<SkillId>) -> Self {
        SkillDefinition {
            id: id.into(),
            display_name: String::new(),
            description: String::new(),
            required_level: 1,
            cost: 1,
            prerequisite_mode: PrerequisiteMode::All,
            prerequisites: Vec::new(),
            max_picks: 1,
            drop_weight: default_weight(),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: ModifierEntry) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_prerequisites(mut self, mode: PrerequisiteMode, prerequisites: &[&str]) -> Self {
        self.prerequisite_mode = mode;
        self.prerequisites = prerequisites.iter().map(|p| SkillId::from(*p)).collect();
        self
    }

    pub fn with_requirements(mut self, required_level: u32, cost: u32) -> Self {
        self.required_level = required_level;
        self.cost = cost;
        self
    }

    pub fn with_max_picks(mut self, max_picks: u32) -> Self {
        self.max_picks = max_picks;
        self
    }

    pub fn with_weight(mut self, drop_weight: f64) -> Self {
        self.drop_weight = drop_weight;
        self
    }

    /// Name for UI, falling back to the id
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            self.id.as_str()
        } else {
            &self.display_name
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_picks == 0
    }
}
