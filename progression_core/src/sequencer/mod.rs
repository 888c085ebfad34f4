//! LevelUpSequencer - One-at-a-time skill choice panels driven by level-ups
//!
//! Levels gained are queued. While the sequencer is idle the head of the
//! queue opens a panel holding a weighted sample of unlockable skills; a
//! successful pick consumes the level and opens the next panel, if any.
//! After `panels_to_win` panels the sequencer completes and stops offering
//! choices.

mod pools;

pub use pools::{LevelPools, PoolEntry};

use crate::progression::Progression;
use crate::sampler;
use crate::skill::SkillDefinition;
use crate::types::{SkillId, SourceId};
use crate::unlock::UnlockBlocked;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, info};

/// Panel count and size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencerSettings {
    /// Opening this many panels completes the run
    #[serde(default = "default_panels_to_win")]
    pub panels_to_win: u32,
    #[serde(default = "default_choices_per_panel")]
    pub choices_per_panel: usize,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        SequencerSettings {
            panels_to_win: default_panels_to_win(),
            choices_per_panel: default_choices_per_panel(),
        }
    }
}

fn default_panels_to_win() -> u32 {
    10
}

fn default_choices_per_panel() -> usize {
    3
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    PanelOpen,
    /// Terminal until `resume` is called
    Complete,
}

/// The choice set currently shown to the player
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Level this panel resolves
    pub level: u32,
    /// 1-based count of panels opened so far
    pub number: u32,
    /// One entry per slot; `None` is a disabled slot
    pub choices: Vec<Option<SkillId>>,
    pub reroll_available: bool,
}

impl Panel {
    pub fn has_choices(&self) -> bool {
        self.choices.iter().any(Option::is_some)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    PanelOpened { level: u32, number: u32 },
    PanelClosed,
    Completed { panels_shown: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Unlocked { skill: SkillId, source: SourceId },
    /// The unlock was refused; the same level was re-presented with new choices
    Redrawn(UnlockBlocked),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequencerError {
    #[error("no choice panel is open")]
    NoPanelOpen,
    #[error("slot {0} does not exist")]
    SlotOutOfRange(usize),
    #[error("slot {0} has no skill")]
    EmptySlot(usize),
    #[error("this panel was already rerolled")]
    RerollSpent,
    #[error("the panel still has choices to pick from")]
    ChoicesAvailable,
}

pub struct LevelUpSequencer {
    settings: SequencerSettings,
    pools: LevelPools,
    pending: VecDeque<u32>,
    panels_shown: u32,
    state: PanelState,
    panel: Option<Panel>,
    /// Set by `resume`; the panel cap stays reached, so level-ups are ignored
    resumed: bool,
    listeners: Vec<Box<dyn FnMut(&SequencerEvent)>>,
}

impl LevelUpSequencer {
    pub fn new(settings: SequencerSettings, pools: LevelPools) -> Self {
        LevelUpSequencer {
            settings,
            pools,
            pending: VecDeque::new(),
            panels_shown: 0,
            state: PanelState::Idle,
            panel: None,
            resumed: false,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn settings(&self) -> &SequencerSettings {
        &self.settings
    }

    pub fn current_panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    /// Slots of the open panel, empty when no panel is open
    pub fn current_choices(&self) -> &[Option<SkillId>] {
        self.panel.as_ref().map(|p| p.choices.as_slice()).unwrap_or(&[])
    }

    pub fn pending_levels(&self) -> usize {
        self.pending.len()
    }

    pub fn panels_shown(&self) -> u32 {
        self.panels_shown
    }

    pub fn reroll_available(&self) -> bool {
        self.panel.as_ref().is_some_and(|p| p.reroll_available)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SequencerEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Queue a level-up; opens a panel when idle
    pub fn on_level_gained<R: Rng + ?Sized>(
        &mut self,
        level: u32,
        progression: &Progression,
        rng: &mut R,
    ) -> PanelState {
        if self.state == PanelState::Complete || self.resumed {
            debug!(level, "level-up ignored, panel cap reached");
            return self.state;
        }

        self.pending.push_back(level);
        if self.state == PanelState::Idle {
            self.open_next_panel(progression, rng);
        }
        self.state
    }

    /// Take the skill in slot `index`
    pub fn pick<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        progression: &mut Progression,
        rng: &mut R,
    ) -> Result<PickOutcome, SequencerError> {
        let panel = self.open_panel()?;
        let skill = panel
            .choices
            .get(index)
            .ok_or(SequencerError::SlotOutOfRange(index))?
            .clone()
            .ok_or(SequencerError::EmptySlot(index))?;

        match progression.try_unlock(&skill) {
            Ok(source) => {
                self.pending.pop_front();
                self.advance(progression, rng);
                Ok(PickOutcome::Unlocked { skill, source })
            }
            Err(reason) => {
                debug!(skill = %skill, %reason, "pick refused, redrawing");
                self.redraw(progression, rng);
                Ok(PickOutcome::Redrawn(reason))
            }
        }
    }

    /// Redraw the open panel's choices, once per panel
    pub fn reroll<R: Rng + ?Sized>(
        &mut self,
        progression: &Progression,
        rng: &mut R,
    ) -> Result<(), SequencerError> {
        if !self.open_panel()?.reroll_available {
            return Err(SequencerError::RerollSpent);
        }
        self.redraw(progression, rng);
        if let Some(panel) = self.panel.as_mut() {
            panel.reroll_available = false;
        }
        Ok(())
    }

    /// Skip a panel that has nothing to pick, consuming its level
    pub fn dismiss<R: Rng + ?Sized>(
        &mut self,
        progression: &Progression,
        rng: &mut R,
    ) -> Result<(), SequencerError> {
        if self.open_panel()?.has_choices() {
            return Err(SequencerError::ChoicesAvailable);
        }
        self.pending.pop_front();
        self.advance(progression, rng);
        Ok(())
    }

    /// Leave the terminal state so play can continue
    ///
    /// The panel cap stays reached: later level-ups open no panels.
    pub fn resume(&mut self) -> bool {
        if self.state != PanelState::Complete {
            return false;
        }
        info!(panels_shown = self.panels_shown, "resumed after completion");
        self.state = PanelState::Idle;
        self.resumed = true;
        true
    }

    /// Back to a fresh run: no queued levels, no panels shown
    pub fn reset(&mut self) {
        self.pending.clear();
        self.panels_shown = 0;
        self.state = PanelState::Idle;
        self.panel = None;
        self.resumed = false;
        debug!("sequencer reset");
    }

    fn open_panel(&self) -> Result<&Panel, SequencerError> {
        match (&self.state, &self.panel) {
            (PanelState::PanelOpen, Some(panel)) => Ok(panel),
            _ => Err(SequencerError::NoPanelOpen),
        }
    }

    /// After a level is consumed: next panel or back to idle
    fn advance<R: Rng + ?Sized>(&mut self, progression: &Progression, rng: &mut R) {
        if self.pending.is_empty() {
            self.state = PanelState::Idle;
            self.panel = None;
            self.emit(SequencerEvent::PanelClosed);
        } else {
            self.open_next_panel(progression, rng);
        }
    }

    fn open_next_panel<R: Rng + ?Sized>(&mut self, progression: &Progression, rng: &mut R) {
        let Some(&level) = self.pending.front() else {
            self.state = PanelState::Idle;
            self.panel = None;
            return;
        };

        self.panels_shown += 1;
        if self.panels_shown >= self.settings.panels_to_win {
            self.complete();
            return;
        }

        let choices = draw_choices(&self.pools, self.settings.choices_per_panel, level, progression, rng);
        info!(level, number = self.panels_shown, "panel opened");
        self.panel = Some(Panel {
            level,
            number: self.panels_shown,
            choices,
            reroll_available: true,
        });
        self.state = PanelState::PanelOpen;
        self.emit(SequencerEvent::PanelOpened {
            level,
            number: self.panels_shown,
        });
    }

    fn redraw<R: Rng + ?Sized>(&mut self, progression: &Progression, rng: &mut R) {
        let Some(level) = self.panel.as_ref().map(|p| p.level) else {
            return;
        };
        let choices = draw_choices(&self.pools, self.settings.choices_per_panel, level, progression, rng);
        if let Some(panel) = self.panel.as_mut() {
            panel.choices = choices;
        }
    }

    fn complete(&mut self) {
        info!(panels_shown = self.panels_shown, "level-up sequence complete");
        self.state = PanelState::Complete;
        self.panel = None;
        self.pending.clear();
        self.emit(SequencerEvent::Completed {
            panels_shown: self.panels_shown,
        });
    }

    fn emit(&mut self, event: SequencerEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

/// Sample the slots for one level, padding with disabled slots
fn draw_choices<R: Rng + ?Sized>(
    pools: &LevelPools,
    slots: usize,
    level: u32,
    progression: &Progression,
    rng: &mut R,
) -> Vec<Option<SkillId>> {
    let catalog = progression.skills();
    let everything: Vec<&SkillDefinition> = catalog.iter().collect();

    let (primary, allow_fallback): (Vec<&SkillDefinition>, bool) = match pools.resolve(level) {
        Some(entry) => (
            entry.skills.iter().filter_map(|id| catalog.get(id)).collect(),
            entry.allow_fallback,
        ),
        None => (everything.clone(), false),
    };
    let fallback = allow_fallback.then_some(everything.as_slice());

    let sample = sampler::sample(
        &primary,
        slots,
        fallback,
        |skill| progression.can_unlock_definition(skill).is_ok(),
        rng,
    );
    if sample.is_exhausted() {
        debug!(level, drawn = sample.choices.len(), slots, "not enough unlockable skills");
    }

    let mut choices: Vec<Option<SkillId>> = sample.choices.into_iter().map(Some).collect();
    choices.resize(slots, None);
    choices
}
