//! Raid buffs, target debuffs and consumables

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Buff {
    // Raid buffs
    ShortTermHasteBuff,
    StatMultiplierBuff,
    CritChanceBuff,
    AllDamageBuff,
    MeleeHasteBuff,
    AttackPowerBuff,
    StrAndAgiBuff,
    // Target debuffs
    ArmorDebuff,
    PhysicalVulnerabilityDebuff,
    SpellDamageDebuff,
    SpellCritDebuff,
    BleedDamageDebuff,
    // Consumables
    AgiFlask,
    GuildFeast,
    AgiFood,
}

/// Active buffs and debuffs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Buffs {
    active: BTreeSet<Buff>,
}

impl Buffs {
    pub fn new(buffs: impl IntoIterator<Item = Buff>) -> Self {
        Buffs {
            active: buffs.into_iter().collect(),
        }
    }

    pub fn has(&self, buff: Buff) -> bool {
        self.active.contains(&buff)
    }

    fn pick(&self, buff: Buff, value: f64, otherwise: f64) -> f64 {
        if self.has(buff) {
            value
        } else {
            otherwise
        }
    }

    /// Flat agility from raid buffs and consumables
    pub fn buff_agi(&self) -> f64 {
        self.pick(Buff::StrAndAgiBuff, 1395.0, 0.0)
            + self.pick(Buff::AgiFlask, 300.0, 0.0)
            + self.pick(Buff::GuildFeast, 90.0, 0.0)
            + self.pick(Buff::AgiFood, 90.0, 0.0)
    }

    pub fn buff_str(&self) -> f64 {
        self.pick(Buff::StrAndAgiBuff, 1395.0, 0.0)
    }

    pub fn stat_multiplier(&self) -> f64 {
        self.pick(Buff::StatMultiplierBuff, 1.05, 1.0)
    }

    pub fn melee_haste_multiplier(&self) -> f64 {
        self.pick(Buff::MeleeHasteBuff, 1.10, 1.0)
    }

    pub fn attack_power_multiplier(&self) -> f64 {
        self.pick(Buff::AttackPowerBuff, 1.10, 1.0)
    }

    pub fn crit_chance_bonus(&self) -> f64 {
        self.pick(Buff::CritChanceBuff, 0.05, 0.0)
    }

    pub fn spell_crit_debuff_bonus(&self) -> f64 {
        self.pick(Buff::SpellCritDebuff, 0.05, 0.0)
    }

    pub fn all_damage_multiplier(&self) -> f64 {
        self.pick(Buff::AllDamageBuff, 1.03, 1.0)
    }

    pub fn physical_damage_multiplier(&self) -> f64 {
        self.pick(Buff::PhysicalVulnerabilityDebuff, 1.04, 1.0)
    }

    pub fn spell_damage_multiplier(&self) -> f64 {
        self.pick(Buff::SpellDamageDebuff, 1.08, 1.0)
    }

    pub fn bleed_damage_multiplier(&self) -> f64 {
        self.pick(Buff::BleedDamageDebuff, 1.30, 1.0)
    }

    /// Fraction of target armour left after armour debuffs
    pub fn armor_reduction_multiplier(&self) -> f64 {
        self.pick(Buff::ArmorDebuff, 0.88, 1.0)
    }
}
