//! Error types for progression commands

use crate::types::{AttributeId, SkillId};
use thiserror::Error;

/// Errors raised by progression commands that are not player-facing probes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgressionError {
    #[error("{0:?} is already at its maximum rank")]
    MaxRankReached(AttributeId),
    #[error("not enough points: need {needed}, have {available}")]
    InsufficientPoints { needed: u32, available: u32 },
    #[error("unknown skill: {0}")]
    UnknownSkill(SkillId),
    #[error("no definition registered for attribute {0:?}")]
    UnknownAttribute(AttributeId),
}
