//! Prelude module for convenient imports
//!
//! ```rust
//! use progression_core::prelude::*;
//! ```

// Core types
pub use crate::types::{AttributeId, ModifierEntry, ModifierOp, SkillId, SourceId};

// Per-player state
pub use crate::progression::{Progression, ProgressionEvent};
pub use crate::unlock::UnlockBlocked;
pub use crate::attribute::UpgradeBlocked;

// Level-up flow
pub use crate::sequencer::{LevelUpSequencer, PanelState, PickOutcome};
pub use crate::session::Session;

// Config
pub use crate::config::default_config;
