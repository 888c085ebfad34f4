//! Session - One player's progression plus the level-up sequencer and RNG

use crate::progression::Progression;
use crate::sequencer::{LevelUpSequencer, PanelState, PickOutcome, SequencerError};
use crate::snapshot::{SnapshotStore, StoreError};
use crate::types::SkillId;
use rand::Rng;
use tracing::info;

/// Owns the pieces that must move together at runtime
///
/// Every level gained through XP intake is forwarded to the sequencer.
pub struct Session<R: Rng> {
    progression: Progression,
    sequencer: LevelUpSequencer,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(progression: Progression, sequencer: LevelUpSequencer, rng: R) -> Self {
        Session {
            progression,
            sequencer,
            rng,
        }
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Mutable access for direct commands such as attribute upgrades
    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    pub fn sequencer(&self) -> &LevelUpSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut LevelUpSequencer {
        &mut self.sequencer
    }

    pub fn state(&self) -> PanelState {
        self.sequencer.state()
    }

    pub fn current_choices(&self) -> &[Option<SkillId>] {
        self.sequencer.current_choices()
    }

    /// Scaled XP intake; returns the levels gained
    pub fn grant_xp(&mut self, base_amount: u32, extra_multiplier: f64) -> Vec<u32> {
        let levels = self.progression.grant_xp(base_amount, extra_multiplier);
        self.forward_levels(&levels);
        levels
    }

    /// Unscaled XP intake; returns the levels gained
    pub fn add_xp(&mut self, amount: u32) -> Vec<u32> {
        let levels = self.progression.add_xp(amount);
        self.forward_levels(&levels);
        levels
    }

    pub fn pick(&mut self, index: usize) -> Result<PickOutcome, SequencerError> {
        self.sequencer
            .pick(index, &mut self.progression, &mut self.rng)
    }

    pub fn reroll(&mut self) -> Result<(), SequencerError> {
        self.sequencer.reroll(&self.progression, &mut self.rng)
    }

    pub fn dismiss(&mut self) -> Result<(), SequencerError> {
        self.sequencer.dismiss(&self.progression, &mut self.rng)
    }

    pub fn resume(&mut self) -> bool {
        self.sequencer.resume()
    }

    /// Start over: starting resources and a fresh level-up run
    pub fn reset(&mut self) {
        self.progression.reset();
        self.sequencer.reset();
    }

    pub fn save(&self, store: &impl SnapshotStore) -> Result<(), StoreError> {
        store.save(&self.progression.snapshot())?;
        info!(level = self.progression.level(), "session saved");
        Ok(())
    }

    /// Restore from the store; `Ok(false)` when nothing was saved
    ///
    /// Snapshots carry no sequencer state, so a successful load also starts
    /// a fresh level-up run.
    pub fn load(&mut self, store: &impl SnapshotStore) -> Result<bool, StoreError> {
        match store.load()? {
            Some(snapshot) => {
                self.progression.restore(&snapshot);
                self.sequencer.reset();
                info!(level = self.progression.level(), "session loaded");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn forward_levels(&mut self, levels: &[u32]) {
        for &level in levels {
            self.sequencer
                .on_level_gained(level, &self.progression, &mut self.rng);
        }
    }
}
