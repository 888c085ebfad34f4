//! Game configuration: settings, attribute and skill catalogs, level pools

use super::ConfigError;
use crate::attribute::{AttributeCatalog, AttributeDefinition};
use crate::progress::ProgressSettings;
use crate::progression::Progression;
use crate::sequencer::{LevelPools, LevelUpSequencer, SequencerSettings};
use crate::skill::{SkillCatalog, SkillDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Everything a game ships to drive progression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default)]
    pub progress: ProgressSettings,
    #[serde(default)]
    pub sequencer: SequencerSettings,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
    #[serde(default)]
    pub pools: LevelPools,
}

impl ProgressionConfig {
    /// Reject configurations that would break catalog lookups or sampling
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequencer.panels_to_win == 0 {
            return invalid("sequencer.panels_to_win must be at least 1".into());
        }
        if self.sequencer.choices_per_panel == 0 {
            return invalid("sequencer.choices_per_panel must be at least 1".into());
        }

        let mut attribute_ids = HashSet::new();
        for attribute in &self.attributes {
            if !attribute_ids.insert(attribute.id) {
                return invalid(format!("duplicate attribute '{:?}'", attribute.id));
            }
        }
        for attribute in &self.attributes {
            if let Some(missing) = attribute
                .prerequisites
                .iter()
                .find(|p| !attribute_ids.contains(*p))
            {
                return invalid(format!(
                    "attribute '{:?}' requires undefined attribute '{:?}'",
                    attribute.id, missing
                ));
            }
        }

        let mut skill_ids = HashSet::new();
        for skill in &self.skills {
            if !skill_ids.insert(&skill.id) {
                return invalid(format!("duplicate skill '{}'", skill.id));
            }
            if skill.drop_weight.is_nan() || skill.drop_weight < 0.0 {
                return invalid(format!("skill '{}' has a negative drop weight", skill.id));
            }
            if let Some(effect) = skill
                .effects
                .iter()
                .find(|e| !attribute_ids.contains(&e.attribute))
            {
                return invalid(format!(
                    "skill '{}' modifies undefined attribute '{:?}'",
                    skill.id, effect.attribute
                ));
            }
        }
        if let Some((skill, missing)) = self.skill_catalog().dangling_prerequisites().first() {
            return invalid(format!(
                "skill '{}' requires unknown skill '{}'",
                skill, missing
            ));
        }

        for (i, entry) in self.pools.entries().iter().enumerate() {
            if entry.exact_levels.is_empty() && entry.min_level > entry.max_level {
                return invalid(format!(
                    "pool {} has min_level {} above max_level {}",
                    i, entry.min_level, entry.max_level
                ));
            }
            if let Some(missing) = entry.skills.iter().find(|s| !skill_ids.contains(s)) {
                return invalid(format!("pool {} lists unknown skill '{}'", i, missing));
            }
        }

        Ok(())
    }

    pub fn attribute_catalog(&self) -> AttributeCatalog {
        let mut catalog = AttributeCatalog::new();
        for definition in &self.attributes {
            catalog.register(definition.clone());
        }
        catalog
    }

    pub fn skill_catalog(&self) -> SkillCatalog {
        SkillCatalog::from_definitions(self.skills.iter().cloned())
    }

    /// Fresh per-player context built from this configuration
    pub fn build_progression(&self) -> Progression {
        Progression::new(
            self.progress.clone(),
            self.attribute_catalog(),
            self.skill_catalog(),
        )
    }

    pub fn build_sequencer(&self) -> LevelUpSequencer {
        LevelUpSequencer::new(self.sequencer.clone(), self.pools.clone())
    }
}

fn invalid(msg: String) -> Result<(), ConfigError> {
    Err(ConfigError::ValidationError(msg))
}

/// Load and validate a configuration file
pub fn load_config(path: &Path) -> Result<ProgressionConfig, ConfigError> {
    let config: ProgressionConfig = super::load_toml(path)?;
    config.validate()?;
    info!(
        path = %path.display(),
        attributes = config.attributes.len(),
        skills = config.skills.len(),
        "progression config loaded"
    );
    Ok(config)
}

/// Parse and validate a configuration string
pub fn parse_config(content: &str) -> Result<ProgressionConfig, ConfigError> {
    let config: ProgressionConfig = super::parse_toml(content)?;
    config.validate()?;
    Ok(config)
}

/// The bundled game configuration
pub fn default_config() -> ProgressionConfig {
    let toml = include_str!("../../config/progression.toml");
    parse_config(toml).unwrap_or_default()
}
