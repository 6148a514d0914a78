//! Gear stats, weapons and set/gear bonuses

use crate::procs::{ProcDef, ProcEffect, ProcRate, ProcsList, TriggerSources};
use crate::types::{Hand, StatKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Dagger,
    Sword,
    Mace,
    Axe,
    Fist,
    Thrown,
    Bow,
    Gun,
    Crossbow,
}

impl WeaponKind {
    /// Swing speed used by normalized (instant) attacks
    pub fn normalization_speed(&self) -> f64 {
        match self {
            WeaponKind::Dagger => 1.7,
            WeaponKind::Thrown | WeaponKind::Bow | WeaponKind::Gun | WeaponKind::Crossbow => 2.8,
            _ => 2.4,
        }
    }
}

/// Weapon enchants that are modelled as hand-bound procs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponEnchant {
    Landslide,
    Hurricane,
}

impl WeaponEnchant {
    pub fn all() -> &'static [WeaponEnchant] {
        &[WeaponEnchant::Landslide, WeaponEnchant::Hurricane]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponEnchant::Landslide => "landslide",
            WeaponEnchant::Hurricane => "hurricane",
        }
    }

    /// Proc definition bound to the hand carrying the enchant
    pub fn proc_def(&self, hand: Hand) -> ProcDef {
        let (effect, value) = match self {
            WeaponEnchant::Landslide => (ProcEffect::Ap, 1000.0),
            WeaponEnchant::Hurricane => (ProcEffect::Haste, 450.0),
        };
        let suffix = match hand {
            Hand::MainHand => "mh",
            Hand::OffHand => "oh",
        };
        ProcDef {
            name: format!("{}_{}", suffix, self.as_str()),
            effect,
            value,
            duration: 12.0,
            max_stacks: 1,
            icd: None,
            rate: ProcRate::Ppm(1.0),
            triggers: TriggerSources {
                auto_attacks: true,
                strikes: true,
                ..Default::default()
            },
            hand: Some(hand),
        }
    }
}

impl fmt::Display for WeaponEnchant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Average damage per swing
    pub damage: f64,
    /// Swing time in seconds
    pub speed: f64,
    pub kind: WeaponKind,
    #[serde(default)]
    pub enchant: Option<WeaponEnchant>,
}

impl Weapon {
    pub fn new(damage: f64, speed: f64, kind: WeaponKind) -> Self {
        Weapon {
            damage,
            speed,
            kind,
            enchant: None,
        }
    }

    pub fn with_enchant(mut self, enchant: WeaponEnchant) -> Self {
        self.enchant = Some(enchant);
        self
    }

    pub fn dps(&self) -> f64 {
        self.damage / self.speed
    }

    pub fn is_dagger(&self) -> bool {
        self.kind == WeaponKind::Dagger
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GearBuff {
    #[serde(rename = "rogue_t11_2pc")]
    RogueT11TwoPiece,
    #[serde(rename = "leather_specialization")]
    LeatherSpecialization,
    #[serde(rename = "chaotic_metagem")]
    ChaoticMetagem,
    #[serde(rename = "potion_of_the_tolvir")]
    PotionOfTheTolvir,
}

impl GearBuff {
    pub fn all() -> &'static [GearBuff] {
        &[
            GearBuff::RogueT11TwoPiece,
            GearBuff::LeatherSpecialization,
            GearBuff::ChaoticMetagem,
            GearBuff::PotionOfTheTolvir,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GearBuff::RogueT11TwoPiece => "rogue_t11_2pc",
            GearBuff::LeatherSpecialization => "leather_specialization",
            GearBuff::ChaoticMetagem => "chaotic_metagem",
            GearBuff::PotionOfTheTolvir => "potion_of_the_tolvir",
        }
    }
}

impl FromStr for GearBuff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GearBuff::all()
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown gear buff: {}", s))
    }
}

/// An on-use stat boost; `cooldown: None` means once per fight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivatedBoost {
    pub stat: StatKey,
    pub value: f64,
    pub duration: f64,
    #[serde(default)]
    pub cooldown: Option<f64>,
}

/// Set bonuses, meta gem, armour specialization and on-use effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GearBuffs {
    #[serde(default)]
    pub active: BTreeSet<GearBuff>,
    #[serde(default)]
    pub activated: Vec<ActivatedBoost>,
}

impl GearBuffs {
    pub fn new(buffs: impl IntoIterator<Item = GearBuff>) -> Self {
        GearBuffs {
            active: buffs.into_iter().collect(),
            activated: Vec::new(),
        }
    }

    pub fn has(&self, buff: GearBuff) -> bool {
        self.active.contains(&buff)
    }

    pub fn set(&mut self, buff: GearBuff, active: bool) {
        if active {
            self.active.insert(buff);
        } else {
            self.active.remove(&buff);
        }
    }

    /// Crit chance added to Backstab, Mutilate and Sinister Strike
    pub fn rogue_t11_2pc_crit_bonus(&self) -> f64 {
        if self.has(GearBuff::RogueT11TwoPiece) {
            0.05
        } else {
            0.0
        }
    }

    pub fn leather_specialization_multiplier(&self) -> f64 {
        if self.has(GearBuff::LeatherSpecialization) {
            1.05
        } else {
            1.0
        }
    }

    pub fn metagem_crit_multiplier(&self) -> f64 {
        if self.has(GearBuff::ChaoticMetagem) {
            1.03
        } else {
            1.0
        }
    }

    /// Every on-use boost for a stat, including the potion
    pub fn activated_boosts_for_stat(&self, stat: StatKey) -> Vec<ActivatedBoost> {
        let mut boosts: Vec<ActivatedBoost> = self
            .activated
            .iter()
            .filter(|b| b.stat == stat)
            .copied()
            .collect();
        if stat == StatKey::Agi && self.has(GearBuff::PotionOfTheTolvir) {
            boosts.push(ActivatedBoost {
                stat: StatKey::Agi,
                value: 1200.0,
                duration: 25.0,
                cooldown: None,
            });
        }
        boosts
    }
}

fn default_ranged() -> Weapon {
    Weapon::new(1371.5, 2.2, WeaponKind::Thrown)
}

/// Character sheet: attributes, ratings, weapons, procs and gear buffs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub str: f64,
    #[serde(default)]
    pub agi: f64,
    #[serde(default)]
    pub ap: f64,
    #[serde(default)]
    pub crit: f64,
    #[serde(default)]
    pub hit: f64,
    #[serde(default)]
    pub exp: f64,
    #[serde(default)]
    pub haste: f64,
    #[serde(default)]
    pub mastery: f64,
    pub mh: Weapon,
    pub oh: Weapon,
    #[serde(default = "default_ranged")]
    pub ranged: Weapon,
    #[serde(default)]
    pub procs: ProcsList,
    #[serde(default)]
    pub gear_buffs: GearBuffs,
}

impl Stats {
    pub fn weapon(&self, hand: Hand) -> &Weapon {
        match hand {
            Hand::MainHand => &self.mh,
            Hand::OffHand => &self.oh,
        }
    }

    pub fn weapon_mut(&mut self, hand: Hand) -> &mut Weapon {
        match hand {
            Hand::MainHand => &mut self.mh,
            Hand::OffHand => &mut self.oh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_dps() {
        let dagger = Weapon::new(939.5, 1.8, WeaponKind::Dagger);
        assert!((dagger.dps() - 521.944).abs() < 0.01);
        assert!(dagger.is_dagger());
        assert!((dagger.kind.normalization_speed() - 1.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enchant_proc_is_hand_bound() {
        let def = WeaponEnchant::Landslide.proc_def(Hand::OffHand);
        assert_eq!(def.hand, Some(Hand::OffHand));
        assert_eq!(def.effect.stat(), Some(StatKey::Ap));
        assert_eq!(def.name, "oh_landslide");
    }

    #[test]
    fn test_potion_counts_as_agility_boost() {
        let gear = GearBuffs::new([GearBuff::PotionOfTheTolvir]);
        let boosts = gear.activated_boosts_for_stat(StatKey::Agi);
        assert_eq!(boosts.len(), 1);
        assert_eq!(boosts[0].cooldown, None);
        assert!(gear.activated_boosts_for_stat(StatKey::Haste).is_empty());
    }

    #[test]
    fn test_gear_buff_names() {
        assert_eq!("rogue_t11_2pc".parse::<GearBuff>().unwrap(), GearBuff::RogueT11TwoPiece);
        let json = serde_json::to_string(&GearBuff::ChaoticMetagem).unwrap();
        assert_eq!(json, "\"chaotic_metagem\"");
    }
}
