//! Playable rogue races and their racial traits

use crate::build::stats::WeaponKind;
use crate::types::StatKey;
use serde::{Deserialize, Serialize};

/// Level 85 rogue base strength and agility before racial adjustments
const CLASS_BASE_STR: f64 = 113.0;
const CLASS_BASE_AGI: f64 = 189.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    #[default]
    Human,
    Dwarf,
    NightElf,
    Gnome,
    Worgen,
    Orc,
    Undead,
    Troll,
    BloodElf,
    Goblin,
}

/// An on-use racial that boosts a convergence stat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RacialBoost {
    pub stat: StatKey,
    pub value: f64,
    pub duration: f64,
    pub cooldown: f64,
}

impl Race {
    /// (strength, agility) adjustments relative to a human
    fn stat_adjustments(&self) -> (f64, f64) {
        match self {
            Race::Human => (0.0, 0.0),
            Race::Dwarf => (5.0, -4.0),
            Race::NightElf => (-4.0, 4.0),
            Race::Gnome => (-5.0, 2.0),
            Race::Worgen => (3.0, 2.0),
            Race::Orc => (3.0, -3.0),
            Race::Undead => (-1.0, -2.0),
            Race::Troll => (1.0, 2.0),
            Race::BloodElf => (-3.0, 2.0),
            Race::Goblin => (-3.0, 2.0),
        }
    }

    pub fn racial_str(&self) -> f64 {
        CLASS_BASE_STR + self.stat_adjustments().0
    }

    pub fn racial_agi(&self) -> f64 {
        CLASS_BASE_AGI + self.stat_adjustments().1
    }

    /// Expertise granted when wielding a weapon of this kind
    pub fn racial_expertise(&self, kind: WeaponKind) -> f64 {
        let favoured = match self {
            Race::Human => matches!(kind, WeaponKind::Sword | WeaponKind::Mace),
            Race::Dwarf => matches!(kind, WeaponKind::Mace),
            Race::Gnome => matches!(kind, WeaponKind::Dagger | WeaponKind::Sword),
            Race::Orc => matches!(kind, WeaponKind::Axe | WeaponKind::Fist),
            _ => false,
        };
        if favoured {
            3.0
        } else {
            0.0
        }
    }

    /// Flat crit chance bonus (Worgen Viciousness)
    pub fn racial_crit_chance(&self) -> f64 {
        if *self == Race::Worgen {
            0.01
        } else {
            0.0
        }
    }

    pub fn arcane_torrent(&self) -> bool {
        *self == Race::BloodElf
    }

    pub fn berserking(&self) -> bool {
        *self == Race::Troll
    }

    pub fn time_is_money(&self) -> bool {
        *self == Race::Goblin
    }

    pub fn rocket_barrage(&self) -> bool {
        *self == Race::Goblin
    }

    /// Rocket Barrage base damage at the given attack power and level
    pub fn rocket_barrage_damage(&self, ap: f64, level: u32) -> f64 {
        1.0 + 0.25 * ap + 2.0 * level as f64
    }

    pub fn racial_stat_boosts(&self) -> Vec<RacialBoost> {
        match self {
            Race::Orc => vec![RacialBoost {
                stat: StatKey::Ap,
                value: 1170.0,
                duration: 15.0,
                cooldown: 120.0,
            }],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_elf_agility() {
        assert!((Race::NightElf.racial_agi() - 193.0).abs() < f64::EPSILON);
        assert!((Race::NightElf.racial_str() - 109.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weapon_expertise() {
        assert_eq!(Race::Gnome.racial_expertise(WeaponKind::Dagger), 3.0);
        assert_eq!(Race::Human.racial_expertise(WeaponKind::Dagger), 0.0);
        assert_eq!(Race::Orc.racial_expertise(WeaponKind::Fist), 3.0);
    }

    #[test]
    fn test_racial_traits() {
        assert!(Race::Goblin.rocket_barrage());
        assert!(Race::Goblin.time_is_money());
        assert!(Race::Troll.berserking());
        assert_eq!(Race::Orc.racial_stat_boosts().len(), 1);
        assert!(Race::Human.racial_stat_boosts().is_empty());
    }
}
