//! ResourcePool - Player level, experience and spendable points

use crate::error::ProgressionError;
use serde::{Deserialize, Serialize};

/// Tunables for the leveling curve and starting resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSettings {
    #[serde(default = "default_start_level")]
    pub start_level: u32,
    #[serde(default)]
    pub start_xp: u32,
    #[serde(default)]
    pub start_points: u32,
    /// Experience needed for the next level is `level × xp_per_level`
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,
    #[serde(default = "default_points_per_level")]
    pub points_per_level: u32,
    /// XP bonus per level above the first (0.10 = +10% per level)
    #[serde(default = "default_xp_gain_bonus")]
    pub xp_gain_bonus_per_level: f64,
    /// Whether the XpGain attribute scales incoming experience
    #[serde(default = "default_true")]
    pub use_xp_gain_stat: bool,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        ProgressSettings {
            start_level: default_start_level(),
            start_xp: 0,
            start_points: 0,
            xp_per_level: default_xp_per_level(),
            points_per_level: default_points_per_level(),
            xp_gain_bonus_per_level: default_xp_gain_bonus(),
            use_xp_gain_stat: true,
        }
    }
}

fn default_start_level() -> u32 {
    1
}
fn default_xp_per_level() -> u32 {
    100
}
fn default_points_per_level() -> u32 {
    1
}
fn default_xp_gain_bonus() -> f64 {
    0.10
}
fn default_true() -> bool {
    true
}

/// Level, experience and unspent points of one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    level: u32,
    xp: u32,
    spendable_points: u32,
}

impl ResourcePool {
    pub fn new(level: u32, spendable_points: u32) -> Self {
        ResourcePool {
            level: level.max(1),
            xp: 0,
            spendable_points,
        }
    }

    /// Starting pool for the given settings
    pub fn from_settings(settings: &ProgressSettings) -> Self {
        ResourcePool {
            level: settings.start_level.max(1),
            xp: settings.start_xp,
            spendable_points: settings.start_points,
        }
    }

    /// Restore raw values, e.g. from a snapshot
    pub fn restore(level: u32, xp: u32, spendable_points: u32) -> Self {
        ResourcePool {
            level: level.max(1),
            xp,
            spendable_points,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn spendable_points(&self) -> u32 {
        self.spendable_points
    }

    pub fn xp_required_for_next_level(&self, settings: &ProgressSettings) -> u32 {
        self.level.saturating_mul(settings.xp_per_level)
    }

    /// Take `amount` points, failing without change when short
    pub fn spend(&mut self, amount: u32) -> Result<(), ProgressionError> {
        if self.spendable_points < amount {
            return Err(ProgressionError::InsufficientPoints {
                needed: amount,
                available: self.spendable_points,
            });
        }
        self.spendable_points -= amount;
        Ok(())
    }

    pub fn grant_points(&mut self, amount: u32) {
        self.spendable_points = self.spendable_points.saturating_add(amount);
    }

    /// Add raw experience, returning every level reached in order
    pub fn add_xp(&mut self, amount: u32, settings: &ProgressSettings) -> Vec<u32> {
        let mut gained = Vec::new();
        if amount == 0 {
            return gained;
        }
        self.xp = self.xp.saturating_add(amount);

        // A zero curve would loop forever
        if settings.xp_per_level == 0 {
            return gained;
        }
        while self.xp >= self.xp_required_for_next_level(settings) {
            self.xp -= self.xp_required_for_next_level(settings);
            self.level += 1;
            self.grant_points(settings.points_per_level);
            gained.push(self.level);
        }
        gained
    }
}

/// Experience after the level bonus and the XpGain multiplier
///
/// `round(base × max(0, extra) × (1 + max(0, level - 1) × bonus) × max(0, stat))`
pub fn scaled_xp(
    base_amount: u32,
    extra_multiplier: f64,
    level: u32,
    bonus_per_level: f64,
    stat_multiplier: f64,
) -> u32 {
    let level_mult = 1.0 + level.saturating_sub(1) as f64 * bonus_per_level.max(0.0);
    let total = base_amount as f64 * extra_multiplier.max(0.0) * level_mult * stat_multiplier.max(0.0);
    total.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_fails_without_change() {
        let mut pool = ResourcePool::new(1, 2);
        assert_eq!(
            pool.spend(3),
            Err(ProgressionError::InsufficientPoints {
                needed: 3,
                available: 2
            })
        );
        assert_eq!(pool.spendable_points(), 2);
        pool.spend(2).unwrap();
        assert_eq!(pool.spendable_points(), 0);
    }

    #[test]
    fn test_add_xp_levels_up_repeatedly() {
        let settings = ProgressSettings::default();
        let mut pool = ResourcePool::from_settings(&settings);

        // 100 for level 2, 200 for level 3, 50 left over
        let gained = pool.add_xp(350, &settings);
        assert_eq!(gained, vec![2, 3]);
        assert_eq!(pool.level(), 3);
        assert_eq!(pool.xp(), 50);
        assert_eq!(pool.spendable_points(), 2);
    }

    #[test]
    fn test_add_xp_below_threshold() {
        let settings = ProgressSettings::default();
        let mut pool = ResourcePool::from_settings(&settings);
        assert!(pool.add_xp(99, &settings).is_empty());
        assert_eq!(pool.xp(), 99);
    }

    #[test]
    fn test_scaled_xp() {
        // Level 3 with 10% per level: 1.2 × 1.5 stat = 1.8
        assert_eq!(scaled_xp(10, 1.0, 3, 0.10, 1.5), 18);
        assert_eq!(scaled_xp(10, -1.0, 3, 0.10, 1.5), 0);
        assert_eq!(scaled_xp(10, 1.0, 1, 0.10, 1.0), 10);
    }
}
