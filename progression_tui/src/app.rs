//! Application state

use progression_core::{
    default_config, load_config, AttributeId, ConfigError, JsonFileStore, PanelState,
    PickOutcome, ProgressionConfig, ProgressionEvent, SequencerEvent, Session, SkillDefinition,
    StatDelta,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{info, warn};

const SAVE_FILE: &str = "progression_save.json";
const XP_PER_PRESS: u32 = 40;
const MAX_LOG_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Stats,
    Skills,
    LevelUp,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Stats, Tab::Skills, Tab::LevelUp, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Stats => "Stats",
            Tab::Skills => "Skills",
            Tab::LevelUp => "Level Up",
            Tab::Help => "Help",
        }
    }
}

pub struct App {
    pub current_tab: Tab,
    pub session: Session<ChaCha8Rng>,
    pub store: JsonFileStore,
    /// Newest last; filled by the progression and sequencer observers
    pub log: Rc<RefCell<Vec<String>>>,
    pub selected_attribute: usize,
    pub selected_skill: usize,
    pub preview: Vec<StatDelta>,
    pub show_help: bool,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(default_config())
    }

    pub fn from_config_file(path: &str) -> Result<Self, ConfigError> {
        load_config(Path::new(path)).map(Self::with_config)
    }

    fn with_config(config: ProgressionConfig) -> Self {
        let mut session = Session::new(
            config.build_progression(),
            config.build_sequencer(),
            ChaCha8Rng::from_entropy(),
        );

        let log = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&log);
        session
            .progression_mut()
            .subscribe(move |event, progression| {
                let line = match event {
                    ProgressionEvent::SkillUnlocked { skill, .. } => {
                        let name = progression
                            .skills()
                            .get(skill)
                            .map(SkillDefinition::name)
                            .unwrap_or(skill.as_str());
                        format!("Unlocked {} (x{})", name, progression.pick_count(skill))
                    }
                    ProgressionEvent::AttributeUpgraded { attribute, rank } => format!(
                        "{} raised to rank {}",
                        progression_core::display::display_name(*attribute),
                        rank
                    ),
                    ProgressionEvent::LevelUp { level } => format!("Reached level {}", level),
                    ProgressionEvent::Reloaded => {
                        format!("Progress reloaded at level {}", progression.level())
                    }
                    ProgressionEvent::PointsChanged { .. } => return,
                };
                push_line(&sink, line);
            });

        let sink = Rc::clone(&log);
        session.sequencer_mut().subscribe(move |event| {
            let line = match event {
                SequencerEvent::PanelOpened { level, number } => {
                    format!("Choice {} opened for level {}", number, level)
                }
                SequencerEvent::PanelClosed => return,
                SequencerEvent::Completed { panels_shown } => {
                    format!("Run complete after {} choices! Press c to keep playing", panels_shown)
                }
            };
            push_line(&sink, line);
        });

        let mut app = App {
            current_tab: Tab::Stats,
            session,
            store: JsonFileStore::new(SAVE_FILE),
            log,
            selected_attribute: 0,
            selected_skill: 0,
            preview: Vec::new(),
            show_help: false,
        };
        app.refresh_preview();
        app
    }

    fn message(&self, line: impl Into<String>) {
        push_line(&self.log, line.into());
    }

    // === Navigation ===

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(current_idx + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        let prev_idx = if current_idx == 0 {
            tabs.len() - 1
        } else {
            current_idx - 1
        };
        self.current_tab = tabs[prev_idx];
    }

    pub fn set_tab(&mut self, index: usize) {
        if let Some(tab) = Tab::all().get(index) {
            self.current_tab = *tab;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.current_tab = if self.show_help { Tab::Help } else { Tab::Stats };
    }

    /// Number keys pick a slot while a panel is shown, otherwise switch tabs
    pub fn on_digit(&mut self, index: usize) {
        if self.current_tab == Tab::LevelUp && self.session.state() == PanelState::PanelOpen {
            self.pick(index);
        } else {
            self.set_tab(index);
        }
    }

    pub fn on_up(&mut self) {
        match self.current_tab {
            Tab::Stats => self.selected_attribute = self.selected_attribute.saturating_sub(1),
            Tab::Skills => self.selected_skill = self.selected_skill.saturating_sub(1),
            _ => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab {
            Tab::Stats => {
                if self.selected_attribute + 1 < AttributeId::all().len() {
                    self.selected_attribute += 1;
                }
            }
            Tab::Skills => {
                if self.selected_skill + 1 < self.session.progression().skills().len() {
                    self.selected_skill += 1;
                }
            }
            _ => {}
        }
    }

    pub fn on_enter(&mut self) {
        match self.current_tab {
            Tab::Stats => self.upgrade_selected_attribute(),
            Tab::Skills => self.unlock_selected_skill(),
            _ => {}
        }
    }

    // === Selection ===

    pub fn selected_attribute_id(&self) -> AttributeId {
        let all = AttributeId::all();
        all[self.selected_attribute.min(all.len() - 1)]
    }

    pub fn selected_skill_def(&self) -> Option<&SkillDefinition> {
        self.session
            .progression()
            .skills()
            .iter()
            .nth(self.selected_skill)
    }

    /// Recompute the stat changes the selected skill would make if picked now
    pub fn refresh_preview(&mut self) {
        let Some(skill) = self.selected_skill_def().map(|s| s.id.clone()) else {
            self.preview.clear();
            return;
        };
        self.preview = self.session.progression_mut().preview_skill(&skill);
    }

    // === Commands ===

    pub fn gain_xp(&mut self) {
        let before = self.session.progression().pool().xp();
        let levels = self.session.grant_xp(XP_PER_PRESS, 1.0);
        if levels.is_empty() {
            let gained = self.session.progression().pool().xp().saturating_sub(before);
            self.message(format!("+{} XP", gained));
        }
        self.jump_to_open_panel();
    }

    pub fn gain_level(&mut self) {
        let progression = self.session.progression();
        let needed = progression
            .pool()
            .xp_required_for_next_level(progression.settings())
            .saturating_sub(progression.pool().xp());
        self.session.add_xp(needed);
        self.jump_to_open_panel();
    }

    pub fn pick(&mut self, index: usize) {
        match self.session.pick(index) {
            Ok(PickOutcome::Unlocked { .. }) => {}
            Ok(PickOutcome::Redrawn(reason)) => {
                self.message(format!("Could not take that skill: {}. New choices drawn", reason))
            }
            Err(e) => self.message(e.to_string()),
        }
    }

    pub fn reroll(&mut self) {
        match self.session.reroll() {
            Ok(()) => self.message("Choices rerolled"),
            Err(e) => self.message(e.to_string()),
        }
    }

    pub fn dismiss(&mut self) {
        match self.session.dismiss() {
            Ok(()) => self.message("Skipped a level with nothing to choose"),
            Err(e) => self.message(e.to_string()),
        }
    }

    pub fn resume(&mut self) {
        if self.session.resume() {
            self.message("Continuing past the end of the run");
        }
    }

    fn upgrade_selected_attribute(&mut self) {
        let attribute = self.selected_attribute_id();
        if let Err(reason) = self
            .session
            .progression_mut()
            .try_upgrade_attribute(attribute)
        {
            self.message(format!(
                "Cannot upgrade {}: {}",
                progression_core::display::display_name(attribute),
                reason
            ));
        }
    }

    fn unlock_selected_skill(&mut self) {
        let Some(skill) = self.selected_skill_def().map(|s| s.id.clone()) else {
            return;
        };
        if let Err(reason) = self.session.progression_mut().try_unlock(&skill) {
            self.message(format!("Cannot unlock {}: {}", skill, reason));
        }
    }

    pub fn save(&mut self) {
        match self.session.save(&self.store) {
            Ok(()) => self.message(format!("Saved to {}", self.store.path().display())),
            Err(e) => {
                warn!(error = %e, path = %self.store.path().display(), "save failed");
                self.message(format!("Save failed: {}", e))
            }
        }
    }

    pub fn load(&mut self) {
        match self.session.load(&self.store) {
            Ok(true) => {
                if self.current_tab == Tab::LevelUp {
                    self.current_tab = Tab::Stats;
                }
            }
            Ok(false) => {
                info!(path = %self.store.path().display(), "no save file to load");
                self.message("No save file yet")
            }
            Err(e) => {
                warn!(error = %e, path = %self.store.path().display(), "load failed");
                self.message(format!("Load failed: {}", e))
            }
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
        info!("progress reset from the TUI");
        self.message("Progress reset");
    }

    fn jump_to_open_panel(&mut self) {
        if self.session.state() == PanelState::PanelOpen {
            self.current_tab = Tab::LevelUp;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn push_line(log: &Rc<RefCell<Vec<String>>>, line: String) {
    let mut log = log.borrow_mut();
    log.push(line);
    if log.len() > MAX_LOG_LINES {
        let excess = log.len() - MAX_LOG_LINES;
        log.drain(..excess);
    }
}
