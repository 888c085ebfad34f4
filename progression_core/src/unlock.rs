//! Unlock graph - Validation and commit of skill picks
//!
//! A pick is validated against the pick history (cap and prerequisites), the
//! skill's drop weight and the shared [`ResourcePool`]. Committing a pick
//! spends its cost and registers one [`SourceId::SkillPick`] per pick
//! instance in the [`ModifierLedger`].

use crate::ledger::ModifierLedger;
use crate::progress::ResourcePool;
use crate::skill::{PrerequisiteMode, SkillCatalog, SkillDefinition};
use crate::types::{SkillId, SourceId};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Why a skill cannot be taken right now
///
/// Variants are listed in check order; the first failing check wins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnlockBlocked {
    #[error("No skill selected.")]
    UnknownSkill,
    #[error("Already picked {0} time(s).")]
    MaxPicksReached(u32),
    #[error("Not available as a choice.")]
    ZeroWeight,
    #[error("Missing prerequisite skill(s).")]
    MissingPrerequisites,
    #[error("Requires player level {0}.")]
    LevelTooLow(u32),
    #[error("Requires {0} skill point(s).")]
    NotEnoughPoints(u32),
}

/// How many times each skill has been picked this session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickHistory {
    counts: BTreeMap<SkillId, u32>,
}

impl PickHistory {
    pub fn new() -> Self {
        PickHistory::default()
    }

    pub fn pick_count(&self, skill: &SkillId) -> u32 {
        self.counts.get(skill).copied().unwrap_or(0)
    }

    pub fn has_picked(&self, skill: &SkillId) -> bool {
        self.pick_count(skill) > 0
    }

    pub fn counts(&self) -> &BTreeMap<SkillId, u32> {
        &self.counts
    }

    pub fn total_picks(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Record one more pick and return the new count
    pub fn record_pick(&mut self, skill: &SkillId) -> u32 {
        let count = self.counts.entry(skill.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Overwrite a count, used when restoring a snapshot
    pub fn set_count(&mut self, skill: SkillId, count: u32) {
        if count == 0 {
            self.counts.remove(&skill);
        } else {
            self.counts.insert(skill, count);
        }
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Whether the skill's prerequisite predicate holds
    pub fn meets_prerequisites(&self, skill: &SkillDefinition) -> bool {
        if skill.prerequisites.is_empty() {
            return true;
        }
        match skill.prerequisite_mode {
            PrerequisiteMode::All => skill.prerequisites.iter().all(|p| self.has_picked(p)),
            PrerequisiteMode::Any => skill.prerequisites.iter().any(|p| self.has_picked(p)),
        }
    }

    /// Drop every skill-pick source and register one per recorded pick
    ///
    /// Skips validation entirely; the history is trusted as-is.
    pub fn reapply_all(&self, catalog: &SkillCatalog, ledger: &mut ModifierLedger) {
        ledger.retain(|source| !source.is_skill_pick());
        for (skill_id, &count) in &self.counts {
            let skill = match catalog.require(skill_id) {
                Ok(skill) => skill,
                Err(e) => {
                    warn!(error = %e, "skipping recorded picks");
                    continue;
                }
            };
            for pick in 1..=count {
                ledger.apply_from(SourceId::skill_pick(skill_id, pick), skill.effects.clone());
            }
        }
    }
}

/// Evaluate every unlock precondition in fixed order
pub fn check_unlock(
    skill: Option<&SkillDefinition>,
    history: &PickHistory,
    pool: &ResourcePool,
) -> Result<(), UnlockBlocked> {
    let skill = skill.ok_or(UnlockBlocked::UnknownSkill)?;

    if skill.max_picks > 0 && history.pick_count(&skill.id) >= skill.max_picks {
        return Err(UnlockBlocked::MaxPicksReached(skill.max_picks));
    }
    if skill.drop_weight.is_nan() || skill.drop_weight <= 0.0 {
        return Err(UnlockBlocked::ZeroWeight);
    }
    if !history.meets_prerequisites(skill) {
        return Err(UnlockBlocked::MissingPrerequisites);
    }
    if pool.level() < skill.required_level {
        return Err(UnlockBlocked::LevelTooLow(skill.required_level));
    }
    if pool.spendable_points() < skill.cost {
        return Err(UnlockBlocked::NotEnoughPoints(skill.cost));
    }
    Ok(())
}

/// Validate and commit one pick of `skill`
///
/// Nothing is mutated unless every step succeeds. Returns the source the
/// pick registered.
pub fn commit_unlock(
    skill: &SkillDefinition,
    history: &mut PickHistory,
    pool: &mut ResourcePool,
    ledger: &mut ModifierLedger,
) -> Result<SourceId, UnlockBlocked> {
    check_unlock(Some(skill), history, pool)?;
    pool.spend(skill.cost)
        .map_err(|_| UnlockBlocked::NotEnoughPoints(skill.cost))?;

    let pick = history.record_pick(&skill.id);
    let source = SourceId::skill_pick(&skill.id, pick);

    debug_assert!(!ledger.contains(&source), "pick source {source} registered twice");
    if ledger.contains(&source) {
        warn!(source = %source, "pick source already registered, replacing");
    }
    ledger.apply_from(source.clone(), skill.effects.clone());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeId, ModifierEntry};

    fn rich_pool() -> ResourcePool {
        ResourcePool::new(10, 10)
    }

    #[test]
    fn test_check_order_first_failure_wins() {
        let history = PickHistory::new();
        let pool = ResourcePool::new(1, 0);

        // Level, points and prerequisites all fail; prerequisites are checked first
        let skill = SkillDefinition::new("c")
            .with_requirements(5, 3)
            .with_prerequisites(PrerequisiteMode::All, &["a"]);
        assert_eq!(
            check_unlock(Some(&skill), &history, &pool),
            Err(UnlockBlocked::MissingPrerequisites)
        );

        let skill = SkillDefinition::new("c").with_requirements(5, 3);
        assert_eq!(
            check_unlock(Some(&skill), &history, &pool),
            Err(UnlockBlocked::LevelTooLow(5))
        );

        let skill = SkillDefinition::new("c").with_requirements(1, 3);
        assert_eq!(
            check_unlock(Some(&skill), &history, &pool),
            Err(UnlockBlocked::NotEnoughPoints(3))
        );

        assert_eq!(check_unlock(None, &history, &pool), Err(UnlockBlocked::UnknownSkill));
    }

    #[test]
    fn test_zero_weight_blocks_before_prerequisites() {
        let skill = SkillDefinition::new("c")
            .with_weight(0.0)
            .with_prerequisites(PrerequisiteMode::All, &["a"]);
        assert_eq!(
            check_unlock(Some(&skill), &PickHistory::new(), &rich_pool()),
            Err(UnlockBlocked::ZeroWeight)
        );
    }

    #[test]
    fn test_empty_prerequisites_pass_in_any_mode() {
        let skill = SkillDefinition::new("solo").with_prerequisites(PrerequisiteMode::Any, &[]);
        assert!(PickHistory::new().meets_prerequisites(&skill));
    }

    #[test]
    fn test_commit_failure_leaves_state_untouched() {
        let skill = SkillDefinition::new("pricey")
            .with_requirements(1, 5)
            .with_effect(ModifierEntry::add(AttributeId::Damage, 1.0));
        let mut history = PickHistory::new();
        let mut pool = ResourcePool::new(1, 4);
        let mut ledger = ModifierLedger::new();

        let result = commit_unlock(&skill, &mut history, &mut pool, &mut ledger);
        assert_eq!(result, Err(UnlockBlocked::NotEnoughPoints(5)));
        assert_eq!(history.total_picks(), 0);
        assert_eq!(pool.spendable_points(), 4);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_commit_registers_numbered_sources() {
        let skill = SkillDefinition::new("spark")
            .with_max_picks(0)
            .with_effect(ModifierEntry::add(AttributeId::Damage, 2.0));
        let mut history = PickHistory::new();
        let mut pool = rich_pool();
        let mut ledger = ModifierLedger::new();

        let first = commit_unlock(&skill, &mut history, &mut pool, &mut ledger).unwrap();
        let second = commit_unlock(&skill, &mut history, &mut pool, &mut ledger).unwrap();

        assert_eq!(first.to_string(), "spark#1");
        assert_eq!(second.to_string(), "spark#2");
        assert_eq!(pool.spendable_points(), 8);
        assert!((ledger.value(AttributeId::Damage, 0.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reapply_all_rebuilds_skill_sources_only() {
        let catalog = SkillCatalog::from_definitions([SkillDefinition::new("spark")
            .with_max_picks(0)
            .with_effect(ModifierEntry::add(AttributeId::Damage, 2.0))]);
        let mut ledger = ModifierLedger::new();
        ledger.apply_from(
            SourceId::named("buff"),
            vec![ModifierEntry::add(AttributeId::Damage, 1.0)],
        );
        ledger.apply_from(
            SourceId::skill_pick(&"stale".into(), 1),
            vec![ModifierEntry::add(AttributeId::Damage, 100.0)],
        );

        let mut history = PickHistory::new();
        history.set_count("spark".into(), 3);
        history.set_count("ghost".into(), 1);
        history.reapply_all(&catalog, &mut ledger);

        // 3 × 2 from picks + 1 from the untouched buff
        assert!((ledger.value(AttributeId::Damage, 0.0) - 7.0).abs() < f64::EPSILON);
        assert_eq!(ledger.len(), 4);
    }
}
