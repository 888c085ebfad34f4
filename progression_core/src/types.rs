//! Core types shared across the progression modules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Character attribute queried by gameplay formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    MoveSpeed,
    AttackSpeed,
    MaxHp,
    HpRegen,
    Armor,
    XpGain,
    Thorns,
    LifeSteal,
    Damage,
    CritChance,
    CritDamage,
    AoeDamage,
    AoeRadius,
    AoeTickRate,
    // Turrets
    TurretCount,
    TurretDamage,
}

impl AttributeId {
    /// Get all attributes in declaration order
    pub fn all() -> &'static [AttributeId] {
        &[
            AttributeId::MoveSpeed,
            AttributeId::AttackSpeed,
            AttributeId::MaxHp,
            AttributeId::HpRegen,
            AttributeId::Armor,
            AttributeId::XpGain,
            AttributeId::Thorns,
            AttributeId::LifeSteal,
            AttributeId::Damage,
            AttributeId::CritChance,
            AttributeId::CritDamage,
            AttributeId::AoeDamage,
            AttributeId::AoeRadius,
            AttributeId::AoeTickRate,
            AttributeId::TurretCount,
            AttributeId::TurretDamage,
        ]
    }
}

/// How a modifier entry combines with the base value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOp {
    /// Flat addition to the base
    Add,
    /// Fractional bonus (0.10 = +10%), summed with other bonuses
    Mult,
}

/// A single contribution to one attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierEntry {
    pub attribute: AttributeId,
    #[serde(rename = "op")]
    pub operation: ModifierOp,
    pub amount: f64,
}

impl ModifierEntry {
    pub fn add(attribute: AttributeId, amount: f64) -> Self {
        ModifierEntry {
            attribute,
            operation: ModifierOp::Add,
            amount,
        }
    }

    pub fn mult(attribute: AttributeId, amount: f64) -> Self {
        ModifierEntry {
            attribute,
            operation: ModifierOp::Mult,
            amount,
        }
    }
}

/// Identifier for a skill definition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

impl SkillId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        SkillId(s.to_string())
    }
}

impl From<String> for SkillId {
    fn from(s: String) -> Self {
        SkillId(s)
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one contribution batch in the modifier ledger
///
/// Ordering is used by the ledger to fold sources in a fixed order, so the
/// derived `Ord` must stay total.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceId {
    /// One pick instance of a skill (1-based pick index)
    SkillPick { skill: SkillId, pick: u32 },
    /// Temporary tooltip preview
    Preview,
    /// Any other caller-owned source, e.g. a timed buff
    Named(String),
}

impl SourceId {
    pub fn skill_pick(skill: &SkillId, pick: u32) -> Self {
        SourceId::SkillPick {
            skill: skill.clone(),
            pick,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        SourceId::Named(name.into())
    }

    pub fn is_skill_pick(&self) -> bool {
        matches!(self, SourceId::SkillPick { .. })
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::SkillPick { skill, pick } => write!(f, "{}#{}", skill, pick),
            SourceId::Preview => f.write_str("skill_preview"),
            SourceId::Named(name) => f.write_str(name),
        }
    }
}
