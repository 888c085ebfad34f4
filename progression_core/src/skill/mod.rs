//! SkillCatalog - Static skill definitions

mod definition;

pub use definition::{PrerequisiteMode, SkillDefinition};

use crate::error::ProgressionError;
use crate::types::SkillId;
use std::collections::HashMap;

/// Skill definitions in configuration order
///
/// Order is preserved so that seeded sampling over the whole catalog is
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: Vec<SkillDefinition>,
    index: HashMap<SkillId, usize>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        SkillCatalog::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = SkillDefinition>) -> Self {
        let mut catalog = SkillCatalog::new();
        for definition in definitions {
            catalog.register(definition);
        }
        catalog
    }

    /// Register a skill, replacing any definition with the same id in place
    pub fn register(&mut self, definition: SkillDefinition) {
        match self.index.get(&definition.id) {
            Some(&slot) => self.skills[slot] = definition,
            None => {
                self.index.insert(definition.id.clone(), self.skills.len());
                self.skills.push(definition);
            }
        }
    }

    pub fn get(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.index.get(id).map(|&slot| &self.skills[slot])
    }

    /// Like [`get`](Self::get), for callers that treat a missing skill as an error
    pub fn require(&self, id: &SkillId) -> Result<&SkillDefinition, ProgressionError> {
        self.get(id)
            .ok_or_else(|| ProgressionError::UnknownSkill(id.clone()))
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SkillId> {
        self.skills.iter().map(|s| &s.id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Prerequisite ids that do not resolve to a registered skill
    pub fn dangling_prerequisites(&self) -> Vec<(SkillId, SkillId)> {
        self.skills
            .iter()
            .flat_map(|skill| {
                skill
                    .prerequisites
                    .iter()
                    .filter(|p| !self.contains(p))
                    .map(move |p| (skill.id.clone(), p.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_keeps_order_and_replaces() {
        let mut catalog = SkillCatalog::new();
        catalog.register(SkillDefinition::new("a"));
        catalog.register(SkillDefinition::new("b"));
        catalog.register(SkillDefinition::new("a").with_weight(5.0));

        let ids: Vec<&str> = catalog.ids().map(SkillId::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!((catalog.get(&"a".into()).unwrap().drop_weight - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_require_reports_unknown_skill() {
        let catalog = SkillCatalog::from_definitions([SkillDefinition::new("a")]);
        assert!(catalog.require(&"a".into()).is_ok());
        assert_eq!(
            catalog.require(&"zzz".into()).err(),
            Some(ProgressionError::UnknownSkill("zzz".into()))
        );
    }

    #[test]
    fn test_dangling_prerequisites() {
        let catalog = SkillCatalog::from_definitions([
            SkillDefinition::new("a"),
            SkillDefinition::new("b").with_prerequisites(PrerequisiteMode::Any, &["a", "ghost"]),
        ]);
        assert_eq!(
            catalog.dangling_prerequisites(),
            vec![(SkillId::from("b"), SkillId::from("ghost"))]
        );
    }

    #[test]
    fn test_parse_skill_defaults() {
        let skill: SkillDefinition = toml::from_str(
            r#"
id = "iron_skin"
display_name = "Iron Skin"

[[effects]]
attribute = "armor"
op = "add"
amount = 3.0
"#,
        )
        .unwrap();

        assert_eq!(skill.name(), "Iron Skin");
        assert_eq!(skill.prerequisite_mode, PrerequisiteMode::All);
        assert_eq!(skill.max_picks, 1);
        assert!((skill.drop_weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(skill.effects.len(), 1);
    }
}
