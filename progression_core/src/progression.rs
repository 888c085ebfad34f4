//! Progression - Owned per-player context tying catalogs, ledger and resources together
//!
//! Every consumer (UI panels, combat formulas, the level-up sequencer) is
//! handed a reference to one `Progression`; there is no global instance.

use crate::attribute::{AttributeCatalog, UpgradeBlocked};
use crate::display::StatDelta;
use crate::ledger::{ModifierLedger, StatValue};
use crate::progress::{scaled_xp, ProgressSettings, ResourcePool};
use crate::skill::{SkillCatalog, SkillDefinition};
use crate::snapshot::ProgressSnapshot;
use crate::types::{AttributeId, ModifierEntry, SkillId, SourceId};
use crate::unlock::{check_unlock, commit_unlock, PickHistory, UnlockBlocked};
use tracing::{debug, info, warn};

/// Notification raised after the mutation that caused it
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    SkillUnlocked { skill: SkillId, source: SourceId },
    AttributeUpgraded { attribute: AttributeId, rank: u32 },
    LevelUp { level: u32 },
    PointsChanged { points: u32 },
    /// State was rebuilt from a snapshot or reset
    Reloaded,
}

/// Observers get read-only access, so they cannot re-enter a command
type Listener = Box<dyn FnMut(&ProgressionEvent, &Progression)>;

pub struct Progression {
    settings: ProgressSettings,
    attributes: AttributeCatalog,
    skills: SkillCatalog,
    ledger: ModifierLedger,
    pool: ResourcePool,
    history: PickHistory,
    listeners: Vec<Listener>,
}

impl Progression {
    pub fn new(settings: ProgressSettings, attributes: AttributeCatalog, skills: SkillCatalog) -> Self {
        let pool = ResourcePool::from_settings(&settings);
        Progression {
            settings,
            attributes,
            skills,
            ledger: ModifierLedger::new(),
            pool,
            history: PickHistory::new(),
            listeners: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn settings(&self) -> &ProgressSettings {
        &self.settings
    }

    pub fn attributes(&self) -> &AttributeCatalog {
        &self.attributes
    }

    pub fn skills(&self) -> &SkillCatalog {
        &self.skills
    }

    pub fn ledger(&self) -> &ModifierLedger {
        &self.ledger
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn history(&self) -> &PickHistory {
        &self.history
    }

    pub fn level(&self) -> u32 {
        self.pool.level()
    }

    pub fn spendable_points(&self) -> u32 {
        self.pool.spendable_points()
    }

    pub fn pick_count(&self, skill: &SkillId) -> u32 {
        self.history.pick_count(skill)
    }

    // === Reads ===

    /// The single read path for gameplay formulas
    pub fn get_value(&self, attribute: AttributeId) -> f64 {
        self.ledger.value(attribute, self.attributes.ranked_base(attribute))
    }

    pub fn breakdown(&self, attribute: AttributeId) -> StatValue {
        self.ledger.breakdown(attribute, self.attributes.ranked_base(attribute))
    }

    // === Skills ===

    pub fn can_unlock(&self, skill: &SkillId) -> Result<(), UnlockBlocked> {
        check_unlock(self.skills.get(skill), &self.history, &self.pool)
    }

    pub fn can_unlock_definition(&self, skill: &SkillDefinition) -> Result<(), UnlockBlocked> {
        check_unlock(Some(skill), &self.history, &self.pool)
    }

    /// Commit one pick of `skill`, all-or-nothing
    pub fn try_unlock(&mut self, skill: &SkillId) -> Result<SourceId, UnlockBlocked> {
        let definition = self.skills.get(skill).ok_or(UnlockBlocked::UnknownSkill)?;
        let source = commit_unlock(definition, &mut self.history, &mut self.pool, &mut self.ledger)?;

        info!(
            skill = %skill,
            source = %source,
            points = self.pool.spendable_points(),
            "skill unlocked"
        );
        self.emit(ProgressionEvent::SkillUnlocked {
            skill: skill.clone(),
            source: source.clone(),
        });
        self.emit(ProgressionEvent::PointsChanged {
            points: self.pool.spendable_points(),
        });
        Ok(source)
    }

    /// Rebuild all skill-pick sources from the pick history
    pub fn reapply_all(&mut self) {
        self.history.reapply_all(&self.skills, &mut self.ledger);
        debug!(sources = self.ledger.len(), "reapplied pick history");
    }

    /// Before/after values of every attribute the skill touches
    ///
    /// Applies the effects under the preview source and removes it again,
    /// leaving the ledger as it was.
    pub fn preview_skill(&mut self, skill: &SkillId) -> Vec<StatDelta> {
        let Some(definition) = self.skills.get(skill) else {
            return Vec::new();
        };
        let effects = definition.effects.clone();

        let mut affected: Vec<AttributeId> = effects.iter().map(|e| e.attribute).collect();
        affected.sort();
        affected.dedup();

        let before: Vec<f64> = affected.iter().map(|a| self.get_value(*a)).collect();
        self.ledger.apply_from(SourceId::Preview, effects);
        let after: Vec<f64> = affected.iter().map(|a| self.get_value(*a)).collect();
        self.ledger.remove_from(&SourceId::Preview);

        affected
            .into_iter()
            .zip(before.into_iter().zip(after))
            .filter(|(_, (b, a))| (a - b).abs() > f64::EPSILON)
            .map(|(attribute, (before, after))| StatDelta {
                attribute,
                before,
                after,
            })
            .collect()
    }

    // === Attributes ===

    pub fn can_upgrade_attribute(&self, attribute: AttributeId) -> Result<(), UpgradeBlocked> {
        self.attributes.can_upgrade(attribute, &self.pool)
    }

    /// Spend points to raise an attribute's rank directly
    pub fn try_upgrade_attribute(&mut self, attribute: AttributeId) -> Result<u32, UpgradeBlocked> {
        self.can_upgrade_attribute(attribute)?;
        let cost = self
            .attributes
            .get(attribute)
            .map(|def| def.upgrade_cost)
            .ok_or(UpgradeBlocked::UnknownAttribute)?;
        self.pool
            .spend(cost)
            .map_err(|_| UpgradeBlocked::NotEnoughPoints(cost))?;
        let rank = self
            .attributes
            .upgrade(attribute)
            .map_err(|_| UpgradeBlocked::MaxRankReached)?;

        info!(attribute = ?attribute, rank, "attribute upgraded");
        self.emit(ProgressionEvent::AttributeUpgraded { attribute, rank });
        self.emit(ProgressionEvent::PointsChanged {
            points: self.pool.spendable_points(),
        });
        Ok(rank)
    }

    // === External modifier sources ===

    /// Register a caller-owned source such as a timed buff
    pub fn apply_modifiers(&mut self, source: SourceId, entries: Vec<ModifierEntry>) {
        self.ledger.apply_from(source, entries);
    }

    pub fn remove_modifiers(&mut self, source: &SourceId) {
        self.ledger.remove_from(source);
    }

    // === Experience ===

    /// Add raw experience, returning the levels reached
    pub fn add_xp(&mut self, amount: u32) -> Vec<u32> {
        let gained = self.pool.add_xp(amount, &self.settings);
        for &level in &gained {
            info!(level, points = self.pool.spendable_points(), "level up");
            self.emit(ProgressionEvent::LevelUp { level });
        }
        if !gained.is_empty() {
            self.emit(ProgressionEvent::PointsChanged {
                points: self.pool.spendable_points(),
            });
        }
        gained
    }

    /// Add experience scaled by level bonus and the XpGain attribute
    pub fn grant_xp(&mut self, base_amount: u32, extra_multiplier: f64) -> Vec<u32> {
        let stat_multiplier =
            if self.settings.use_xp_gain_stat && self.attributes.contains(AttributeId::XpGain) {
                self.get_value(AttributeId::XpGain)
            } else {
                1.0
            };
        let amount = scaled_xp(
            base_amount,
            extra_multiplier,
            self.pool.level(),
            self.settings.xp_gain_bonus_per_level,
            stat_multiplier,
        );
        debug!(base_amount, amount, "experience granted");
        self.add_xp(amount)
    }

    pub fn grant_points(&mut self, amount: u32) {
        self.pool.grant_points(amount);
        self.emit(ProgressionEvent::PointsChanged {
            points: self.pool.spendable_points(),
        });
    }

    // === Session boundaries ===

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            pick_counts: self.history.counts().clone(),
            ranks: self.attributes.ranks().clone(),
            level: self.pool.level(),
            xp: self.pool.xp(),
            points: self.pool.spendable_points(),
        }
    }

    /// Replace the session state with a snapshot and rebuild the ledger
    ///
    /// Unknown skills and attributes are dropped; counts above a skill's
    /// cap are clamped.
    pub fn restore(&mut self, snapshot: &ProgressSnapshot) {
        self.pool = ResourcePool::restore(snapshot.level, snapshot.xp, snapshot.points);

        self.attributes.reset_ranks();
        for (&attribute, &rank) in &snapshot.ranks {
            match self.attributes.set_rank(attribute, rank) {
                Ok(stored) if stored != rank => {
                    warn!(attribute = ?attribute, rank, stored, "rank clamped to max rank");
                }
                Ok(_) => {}
                Err(_) => warn!(attribute = ?attribute, "dropping rank for undefined attribute"),
            }
        }

        self.history.clear();
        for (skill_id, &count) in &snapshot.pick_counts {
            let Some(skill) = self.skills.get(skill_id) else {
                warn!(skill = %skill_id, "dropping picks for unknown skill");
                continue;
            };
            let count = if skill.max_picks > 0 && count > skill.max_picks {
                warn!(skill = %skill_id, count, max = skill.max_picks, "pick count clamped");
                skill.max_picks
            } else {
                count
            };
            self.history.set_count(skill_id.clone(), count);
        }

        self.reapply_all();
        info!(
            level = self.pool.level(),
            picks = self.history.total_picks(),
            "progression restored"
        );
        self.emit(ProgressionEvent::Reloaded);
    }

    /// Back to starting resources with no picks, ranks or modifiers
    pub fn reset(&mut self) {
        self.pool = ResourcePool::from_settings(&self.settings);
        self.attributes.reset_ranks();
        self.history.clear();
        self.ledger.clear();
        info!("progression reset");
        self.emit(ProgressionEvent::Reloaded);
    }

    // === Notifications ===

    pub fn subscribe(&mut self, listener: impl FnMut(&ProgressionEvent, &Progression) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: ProgressionEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(&event, self);
        }
        self.listeners = listeners;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeDefinition;
    use crate::skill::PrerequisiteMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn progression(points: u32) -> Progression {
        let mut attributes = AttributeCatalog::new();
        attributes.register(AttributeDefinition::new(AttributeId::Damage, 10.0));
        attributes.register(AttributeDefinition::new(AttributeId::XpGain, 1.0));
        attributes.register(AttributeDefinition::new(AttributeId::MaxHp, 100.0).with_increment(10.0, 3));

        let skills = SkillCatalog::from_definitions([
            SkillDefinition::new("s1").with_effect(ModifierEntry::add(AttributeId::Damage, 5.0)),
            SkillDefinition::new("s2").with_effect(ModifierEntry::mult(AttributeId::Damage, 0.5)),
            SkillDefinition::new("scholar").with_effect(ModifierEntry::mult(AttributeId::XpGain, 1.0)),
            SkillDefinition::new("capstone")
                .with_prerequisites(PrerequisiteMode::All, &["s1", "s2"])
                .with_effect(ModifierEntry::add(AttributeId::Damage, 100.0)),
        ]);

        let settings = ProgressSettings {
            start_points: points,
            ..Default::default()
        };
        Progression::new(settings, attributes, skills)
    }

    #[test]
    fn test_unlock_order_independence() {
        let mut forward = progression(2);
        forward.try_unlock(&"s1".into()).unwrap();
        forward.try_unlock(&"s2".into()).unwrap();

        let mut backward = progression(2);
        backward.try_unlock(&"s2".into()).unwrap();
        backward.try_unlock(&"s1".into()).unwrap();

        assert!((forward.get_value(AttributeId::Damage) - 22.5).abs() < 1e-9);
        assert_eq!(
            forward.get_value(AttributeId::Damage),
            backward.get_value(AttributeId::Damage)
        );
    }

    #[test]
    fn test_unknown_skill_is_blocked() {
        let mut p = progression(5);
        assert_eq!(p.can_unlock(&"nope".into()), Err(UnlockBlocked::UnknownSkill));
        assert_eq!(p.try_unlock(&"nope".into()), Err(UnlockBlocked::UnknownSkill));
        assert_eq!(p.spendable_points(), 5);
    }

    #[test]
    fn test_listener_sees_post_mutation_state() {
        let mut p = progression(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        p.subscribe(move |event, progression| {
            if let ProgressionEvent::SkillUnlocked { skill, .. } = event {
                sink.borrow_mut().push((
                    skill.clone(),
                    progression.pick_count(skill),
                    progression.get_value(AttributeId::Damage),
                    progression.can_unlock(skill).is_ok(),
                ));
            }
        });

        p.try_unlock(&"s1".into()).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_str(), "s1");
        assert_eq!(seen[0].1, 1);
        assert!((seen[0].2 - 15.0).abs() < f64::EPSILON);
        assert!(!seen[0].3);
    }

    #[test]
    fn test_preview_leaves_ledger_untouched() {
        let mut p = progression(1);
        let before = p.get_value(AttributeId::Damage);

        let deltas = p.preview_skill(&"s1".into());
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].describe(), "Damage: 10 -> 15");

        assert!(!p.ledger().contains(&SourceId::Preview));
        assert_eq!(p.get_value(AttributeId::Damage), before);
        assert!(p.preview_skill(&"missing".into()).is_empty());
    }

    #[test]
    fn test_attribute_upgrade_spends_shared_points() {
        let mut p = progression(2);
        assert_eq!(p.try_upgrade_attribute(AttributeId::MaxHp), Ok(1));
        assert_eq!(p.try_upgrade_attribute(AttributeId::MaxHp), Ok(2));
        assert!((p.get_value(AttributeId::MaxHp) - 110.0).abs() < f64::EPSILON);

        // Same pool feeds skill unlocks
        assert_eq!(p.can_unlock(&"s1".into()), Err(UnlockBlocked::NotEnoughPoints(1)));
        assert_eq!(
            p.try_upgrade_attribute(AttributeId::MaxHp),
            Err(UpgradeBlocked::NotEnoughPoints(1))
        );
    }

    #[test]
    fn test_grant_xp_uses_xp_gain_stat() {
        let mut p = progression(1);
        p.try_unlock(&"scholar".into()).unwrap();
        // XpGain 1.0 × (1 + 1.0) = 2.0 at level 1
        let levels = p.grant_xp(50, 1.0);
        assert_eq!(levels, vec![2]);
        assert_eq!(p.pool().xp(), 0);
        assert_eq!(p.spendable_points(), 1);
    }

    #[test]
    fn test_level_up_events() {
        let mut p = progression(0);
        let levels = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&levels);
        p.subscribe(move |event, _| {
            if let ProgressionEvent::LevelUp { level } = event {
                sink.borrow_mut().push(*level);
            }
        });

        p.add_xp(300);
        assert_eq!(*levels.borrow(), vec![2, 3]);
    }

    #[test]
    fn test_snapshot_restore_rebuilds_values() {
        let mut p = progression(3);
        p.try_unlock(&"s1".into()).unwrap();
        p.try_unlock(&"s2".into()).unwrap();
        p.try_upgrade_attribute(AttributeId::MaxHp).unwrap();
        let snapshot = p.snapshot();
        let damage = p.get_value(AttributeId::Damage);

        let mut fresh = progression(0);
        fresh.restore(&snapshot);

        assert_eq!(fresh.get_value(AttributeId::Damage), damage);
        assert_eq!(fresh.pick_count(&"s1".into()), 1);
        assert_eq!(fresh.attributes().rank_of(AttributeId::MaxHp), 1);
        assert_eq!(fresh.spendable_points(), 0);
        assert_eq!(fresh.snapshot(), snapshot);
    }

    #[test]
    fn test_restore_clamps_and_drops_bad_entries() {
        let mut p = progression(0);
        let mut snapshot = ProgressSnapshot {
            level: 3,
            ..Default::default()
        };
        snapshot.pick_counts.insert("s1".into(), 4);
        snapshot.pick_counts.insert("ghost".into(), 1);
        snapshot.ranks.insert(AttributeId::MaxHp, 10);
        snapshot.ranks.insert(AttributeId::Thorns, 1);

        p.restore(&snapshot);

        assert_eq!(p.pick_count(&"s1".into()), 1);
        assert_eq!(p.pick_count(&"ghost".into()), 0);
        assert_eq!(p.attributes().rank_of(AttributeId::MaxHp), 3);
        assert_eq!(p.attributes().rank_of(AttributeId::Thorns), 0);
        assert!((p.get_value(AttributeId::Damage) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_clears_picks_and_modifiers() {
        let mut p = progression(2);
        p.try_unlock(&"s1".into()).unwrap();
        p.apply_modifiers(SourceId::named("buff"), vec![ModifierEntry::add(AttributeId::Damage, 1.0)]);
        p.reset();

        assert_eq!(p.spendable_points(), 2);
        assert_eq!(p.history().total_picks(), 0);
        assert!(p.ledger().is_empty());
        assert!((p.get_value(AttributeId::Damage) - 10.0).abs() < f64::EPSILON);
    }
}
