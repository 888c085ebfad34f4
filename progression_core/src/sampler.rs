//! WeightedSampler - Weighted draws without replacement over skill pools

use crate::skill::SkillDefinition;
use crate::types::SkillId;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Outcome of one panel draw
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub choices: Vec<SkillId>,
    /// How many choices were asked for
    pub requested: usize,
}

impl Sample {
    /// Fewer candidates than requested; a partial result, not an error
    pub fn is_exhausted(&self) -> bool {
        self.choices.len() < self.requested
    }
}

fn effective_weight(skill: &SkillDefinition) -> f64 {
    if skill.drop_weight.is_nan() {
        0.0
    } else {
        skill.drop_weight.max(0.0)
    }
}

/// Draw up to `count` distinct unlockable skills from `pool`
///
/// When the unlockable part of `pool` is smaller than `count` and a
/// `fallback` pool is given, its unlockable skills that are not already
/// candidates are appended before drawing.
pub fn sample<'a, R: Rng + ?Sized>(
    pool: &[&'a SkillDefinition],
    count: usize,
    fallback: Option<&[&'a SkillDefinition]>,
    is_unlockable: impl Fn(&SkillDefinition) -> bool,
    rng: &mut R,
) -> Sample {
    let mut seen: HashSet<&SkillId> = HashSet::new();
    let mut candidates: Vec<&'a SkillDefinition> = Vec::new();

    for &skill in pool {
        if is_unlockable(skill) && seen.insert(&skill.id) {
            candidates.push(skill);
        }
    }

    if candidates.len() < count {
        if let Some(fallback) = fallback {
            for &skill in fallback {
                if is_unlockable(skill) && seen.insert(&skill.id) {
                    candidates.push(skill);
                }
            }
        }
    }

    let picked = draw_weighted(candidates, count, rng);
    debug!(requested = count, drawn = picked.len(), "sampled skill choices");

    Sample {
        choices: picked.into_iter().map(|s| s.id.clone()).collect(),
        requested: count,
    }
}

/// Roulette-wheel selection with removal
///
/// Each round draws a value in `[0, total remaining weight)`, walks the
/// candidates accumulating weight and removes the one whose running sum
/// passes the draw. Stops early once the remaining weight is zero.
pub fn draw_weighted<'a, R: Rng + ?Sized>(
    mut remaining: Vec<&'a SkillDefinition>,
    count: usize,
    rng: &mut R,
) -> Vec<&'a SkillDefinition> {
    let mut picked = Vec::with_capacity(count.min(remaining.len()));

    while picked.len() < count && !remaining.is_empty() {
        let total: f64 = remaining.iter().map(|s| effective_weight(s)).sum();
        if total <= 0.0 || !total.is_finite() {
            break;
        }

        let roll = rng.gen_range(0.0..total);
        // Rounding can leave the roll just past the final sum
        let mut chosen = remaining
            .iter()
            .rposition(|s| effective_weight(s) > 0.0)
            .unwrap_or(remaining.len() - 1);
        let mut running = 0.0;
        for (i, skill) in remaining.iter().enumerate() {
            running += effective_weight(skill);
            if roll < running {
                chosen = i;
                break;
            }
        }

        picked.push(remaining.remove(chosen));
    }

    picked
}
