//! ModifierLedger - Runtime store of modifier entries keyed by source

mod stat_value;

pub use stat_value::StatValue;

use crate::types::{AttributeId, ModifierEntry, ModifierOp, SourceId};
use std::collections::BTreeMap;
use tracing::debug;

/// Registered contributions, one entry list per source
///
/// Values are recomputed on every read by folding all sources in key order,
/// which makes the result a pure function of the registered set.
#[derive(Debug, Clone, Default)]
pub struct ModifierLedger {
    sources: BTreeMap<SourceId, Vec<ModifierEntry>>,
    /// Bumped on every mutation
    revision: u64,
}

impl ModifierLedger {
    pub fn new() -> Self {
        ModifierLedger::default()
    }

    /// Replace whatever `source` contributed with `entries`
    ///
    /// An empty list clears the source.
    pub fn apply_from(&mut self, source: SourceId, entries: Vec<ModifierEntry>) {
        debug!(source = %source, entries = entries.len(), "apply modifiers");
        if entries.is_empty() {
            self.sources.remove(&source);
        } else {
            self.sources.insert(source, entries);
        }
        self.revision += 1;
    }

    /// Remove a source's contribution. No-op if nothing was registered.
    pub fn remove_from(&mut self, source: &SourceId) {
        if self.sources.remove(source).is_some() {
            debug!(source = %source, "removed modifiers");
            self.revision += 1;
        }
    }

    /// Keep only the sources for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&SourceId) -> bool) {
        let before = self.sources.len();
        self.sources.retain(|source, _| keep(source));
        if self.sources.len() != before {
            self.revision += 1;
        }
    }

    pub fn clear(&mut self) {
        if !self.sources.is_empty() {
            self.sources.clear();
            self.revision += 1;
        }
    }

    pub fn contains(&self, source: &SourceId) -> bool {
        self.sources.contains_key(source)
    }

    /// Entries registered under a source
    pub fn entries(&self, source: &SourceId) -> Option<&[ModifierEntry]> {
        self.sources.get(source).map(Vec::as_slice)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceId> {
        self.sources.keys()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Mutation counter, usable as a cache key by callers
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Fold every registered entry for `attribute` on top of `base`
    pub fn breakdown(&self, attribute: AttributeId, base: f64) -> StatValue {
        let mut value = StatValue::with_base(base);
        for entry in self
            .sources
            .values()
            .flatten()
            .filter(|e| e.attribute == attribute)
        {
            match entry.operation {
                ModifierOp::Add => value.add_flat(entry.amount),
                ModifierOp::Mult => value.add_increased(entry.amount),
            }
        }
        value
    }

    /// `(base + Σ adds) × (1 + Σ mults)` over all registered sources
    pub fn value(&self, attribute: AttributeId, base: f64) -> f64 {
        self.breakdown(attribute, base).compute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn damage_add(amount: f64) -> ModifierEntry {
        ModifierEntry::add(AttributeId::Damage, amount)
    }

    #[test]
    fn test_apply_replaces_not_merges() {
        let mut ledger = ModifierLedger::new();
        let source = SourceId::named("buff");
        ledger.apply_from(source.clone(), vec![damage_add(5.0)]);
        ledger.apply_from(source.clone(), vec![damage_add(2.0)]);

        assert!((ledger.value(AttributeId::Damage, 10.0) - 12.0).abs() < f64::EPSILON);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_empty_apply_clears_source() {
        let mut ledger = ModifierLedger::new();
        let source = SourceId::named("buff");
        ledger.apply_from(source.clone(), vec![damage_add(5.0)]);
        ledger.apply_from(source.clone(), Vec::new());

        assert!(!ledger.contains(&source));
        assert!((ledger.value(AttributeId::Damage, 10.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut ledger = ModifierLedger::new();
        let source = SourceId::named("buff");
        ledger.remove_from(&source);
        assert_eq!(ledger.revision(), 0);

        ledger.apply_from(source.clone(), vec![damage_add(5.0)]);
        ledger.remove_from(&source);
        ledger.remove_from(&source);
        assert_eq!(ledger.revision(), 2);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unrelated_attributes_ignored() {
        let mut ledger = ModifierLedger::new();
        ledger.apply_from(
            SourceId::named("boots"),
            vec![ModifierEntry::mult(AttributeId::MoveSpeed, 0.2)],
        );
        assert!((ledger.value(AttributeId::Damage, 10.0) - 10.0).abs() < f64::EPSILON);
        assert!((ledger.value(AttributeId::MoveSpeed, 5.0) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_retain_drops_skill_sources() {
        let mut ledger = ModifierLedger::new();
        ledger.apply_from(SourceId::skill_pick(&"s1".into(), 1), vec![damage_add(1.0)]);
        ledger.apply_from(SourceId::named("buff"), vec![damage_add(1.0)]);
        ledger.retain(|s| !s.is_skill_pick());

        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(&SourceId::named("buff")));
    }

    fn arb_entry() -> impl Strategy<Value = ModifierEntry> {
        (0usize..3, any::<bool>(), -50.0f64..50.0).prop_map(|(attr, is_add, amount)| {
            let attribute = [AttributeId::Damage, AttributeId::MaxHp, AttributeId::Armor][attr];
            if is_add {
                ModifierEntry::add(attribute, amount)
            } else {
                ModifierEntry::mult(attribute, amount / 100.0)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_value_independent_of_insertion_order(
            batches in prop::collection::vec(prop::collection::vec(arb_entry(), 0..4), 0..8)
        ) {
            let mut forward = ModifierLedger::new();
            let mut backward = ModifierLedger::new();
            for (i, batch) in batches.iter().enumerate() {
                forward.apply_from(SourceId::named(format!("src{i}")), batch.clone());
            }
            for (i, batch) in batches.iter().enumerate().rev() {
                backward.apply_from(SourceId::named(format!("src{i}")), batch.clone());
            }

            for attr in [AttributeId::Damage, AttributeId::MaxHp, AttributeId::Armor] {
                let a = forward.value(attr, 10.0);
                prop_assert_eq!(a, backward.value(attr, 10.0));
                prop_assert_eq!(a, forward.value(attr, 10.0));
            }
        }

        #[test]
        fn prop_remove_restores_previous_value(
            existing in prop::collection::vec(prop::collection::vec(arb_entry(), 0..4), 0..6),
            added in prop::collection::vec(arb_entry(), 0..6)
        ) {
            let mut ledger = ModifierLedger::new();
            for (i, batch) in existing.into_iter().enumerate() {
                ledger.apply_from(SourceId::named(format!("src{i}")), batch);
            }
            let attrs = [AttributeId::Damage, AttributeId::MaxHp, AttributeId::Armor];
            let before: Vec<f64> = attrs.iter().map(|a| ledger.value(*a, 7.5)).collect();

            let probe = SourceId::named("probe");
            ledger.apply_from(probe.clone(), added);
            ledger.remove_from(&probe);

            let after: Vec<f64> = attrs.iter().map(|a| ledger.value(*a, 7.5)).collect();
            prop_assert_eq!(before, after);
        }
    }
}
