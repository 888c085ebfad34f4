//! progression_core - Character progression for action games
//!
//! This library provides:
//! - ModifierLedger: Per-source additive and multiplicative attribute modifiers
//! - AttributeCatalog: Base values and rank tracks for every attribute
//! - Skill unlock graph: Prerequisites, pick caps and point costs
//! - LevelUpSequencer: Weighted skill choice panels driven by level-ups
//! - Progression: The per-player context tying it all together

pub mod attribute;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod prelude;
pub mod progress;
pub mod progression;
pub mod sampler;
pub mod sequencer;
pub mod session;
pub mod skill;
pub mod snapshot;
pub mod types;
pub mod unlock;

// Re-export core types for convenience
pub use attribute::{AttributeCatalog, AttributeDefinition, UpgradeBlocked};
pub use config::{default_config, load_config, parse_config, ConfigError, ProgressionConfig};
pub use display::StatDelta;
pub use error::ProgressionError;
pub use ledger::{ModifierLedger, StatValue};
pub use progress::{ProgressSettings, ResourcePool};
pub use progression::{Progression, ProgressionEvent};
pub use sampler::Sample;
pub use sequencer::{
    LevelPools, LevelUpSequencer, Panel, PanelState, PickOutcome, PoolEntry, SequencerError,
    SequencerEvent, SequencerSettings,
};
pub use session::Session;
pub use skill::{PrerequisiteMode, SkillCatalog, SkillDefinition};
pub use snapshot::{JsonFileStore, ProgressSnapshot, SnapshotStore, StoreError};
pub use types::{AttributeId, ModifierEntry, ModifierOp, SkillId, SourceId};
pub use unlock::{PickHistory, UnlockBlocked};
