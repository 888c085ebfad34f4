//! Display names and value formatting for attributes

use crate::types::AttributeId;

/// Attributes shown as percentages of a fractional value
const PERCENT_STATS: &[AttributeId] = &[
    AttributeId::CritChance,
    AttributeId::CritDamage,
    AttributeId::LifeSteal,
    AttributeId::AttackSpeed,
    AttributeId::XpGain,
];

pub fn display_name(id: AttributeId) -> &'static str {
    match id {
        AttributeId::MoveSpeed => "Move Speed",
        AttributeId::AttackSpeed => "Attack Speed",
        AttributeId::MaxHp => "Max HP",
        AttributeId::HpRegen => "HP Regen",
        AttributeId::Armor => "Armor",
        AttributeId::XpGain => "XP Gain",
        AttributeId::Thorns => "Thorns",
        AttributeId::LifeSteal => "Life Steal",
        AttributeId::Damage => "Damage",
        AttributeId::CritChance => "Crit Chance",
        AttributeId::CritDamage => "Crit Damage",
        AttributeId::AoeDamage => "AOE Damage",
        AttributeId::AoeRadius => "AOE Radius",
        AttributeId::AoeTickRate => "AOE Tick Rate",
        AttributeId::TurretCount => "Turret Count",
        AttributeId::TurretDamage => "Turret Damage",
    }
}

pub fn is_percent(id: AttributeId) -> bool {
    PERCENT_STATS.contains(&id)
}

/// Format a value the way the stat panel shows it
pub fn format_value(id: AttributeId, value: f64) -> String {
    if id == AttributeId::TurretCount {
        return format!("{}", value.round() as i64);
    }
    if is_percent(id) {
        return format!("{}%", trim_decimals(value * 100.0, 1));
    }

    let abs = value.abs();
    if abs >= 100.0 {
        format!("{:.0}", value)
    } else if abs >= 10.0 {
        trim_decimals(value, 1)
    } else {
        trim_decimals(value, 2)
    }
}

/// Fixed decimals with trailing zeros removed ("2.50" → "2.5", "3.00" → "3")
fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if !text.contains('.') {
        return text;
    }
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Before/after value of one attribute for a skill preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatDelta {
    pub attribute: AttributeId,
    pub before: f64,
    pub after: f64,
}

impl StatDelta {
    pub fn change(&self) -> f64 {
        self.after - self.before
    }

    /// "Damage: 10 -> 15"
    pub fn describe(&self) -> String {
        format!(
            "{}: {} -> {}",
            display_name(self.attribute),
            format_value(self.attribute, self.before),
            format_value(self.attribute, self.after)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(AttributeId::TurretCount, 2.6), "3");
        assert_eq!(format_value(AttributeId::CritChance, 0.055), "5.5%");
        assert_eq!(format_value(AttributeId::XpGain, 1.0), "100%");
        assert_eq!(format_value(AttributeId::MaxHp, 150.4), "150");
        assert_eq!(format_value(AttributeId::Damage, 22.5), "22.5");
        assert_eq!(format_value(AttributeId::MoveSpeed, 5.0), "5");
        assert_eq!(format_value(AttributeId::HpRegen, 0.126), "0.13");
    }

    #[test]
    fn test_describe_delta() {
        let delta = StatDelta {
            attribute: AttributeId::Damage,
            before: 10.0,
            after: 15.0,
        };
        assert_eq!(delta.describe(), "Damage: 10 -> 15");
        assert!((delta.change() - 5.0).abs() < f64::EPSILON);
    }
}
