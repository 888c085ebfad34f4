//! Level-specific skill pools for level-up panels

use crate::types::SkillId;
use serde::{Deserialize, Serialize};

/// One configured pool and the levels it applies to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEntry {
    /// If not empty, the pool matches only these exact levels
    #[serde(default)]
    pub exact_levels: Vec<u32>,
    /// Inclusive range used when `exact_levels` is empty
    #[serde(default = "default_min_level")]
    pub min_level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    pub skills: Vec<SkillId>,
    /// Top up from the whole catalog when this pool runs short
    #[serde(default)]
    pub allow_fallback: bool,
}

fn default_min_level() -> u32 {
    1
}

fn default_max_level() -> u32 {
    999
}

impl PoolEntry {
    pub fn for_levels(levels: &[u32], skills: &[&str]) -> Self {
        PoolEntry {
            exact_levels: levels.to_vec(),
            min_level: default_min_level(),
            max_level: default_max_level(),
            skills: skills.iter().map(|s| SkillId::from(*s)).collect(),
            allow_fallback: false,
        }
    }

    pub fn for_range(min_level: u32, max_level: u32, skills: &[&str]) -> Self {
        PoolEntry {
            exact_levels: Vec::new(),
            min_level,
            max_level,
            skills: skills.iter().map(|s| SkillId::from(*s)).collect(),
            allow_fallback: false,
        }
    }

    pub fn with_fallback(mut self) -> Self {
        self.allow_fallback = true;
        self
    }

    pub fn matches(&self, level: u32) -> bool {
        if self.exact_levels.is_empty() {
            (self.min_level..=self.max_level).contains(&level)
        } else {
            self.exact_levels.contains(&level)
        }
    }
}

/// Ordered pool list; the first matching entry wins
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelPools {
    entries: Vec<PoolEntry>,
}

impl LevelPools {
    pub fn new(entries: Vec<PoolEntry>) -> Self {
        LevelPools { entries }
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn resolve(&self, level: u32) -> Option<&PoolEntry> {
        self.entries.iter().find(|entry| entry.matches(level))
    }
}
