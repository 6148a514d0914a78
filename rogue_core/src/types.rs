//! Core identifiers shared by the build model, the cycle models and the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rogue specialization (talent tree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spec {
    Assassination,
    Combat,
    Subtlety,
}

impl Spec {
    /// All specializations in tree order
    pub fn all() -> &'static [Spec] {
        &[Spec::Assassination, Spec::Combat, Spec::Subtlety]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Spec::Assassination => "assassination",
            Spec::Combat => "combat",
            Spec::Subtlety => "subtlety",
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weapon hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    MainHand,
    OffHand,
}

/// Keys of the stats that move during proc convergence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Agi,
    Ap,
    Crit,
    Haste,
    Mastery,
}

impl StatKey {
    pub fn all() -> &'static [StatKey] {
        &[
            StatKey::Agi,
            StatKey::Ap,
            StatKey::Crit,
            StatKey::Haste,
            StatKey::Mastery,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::Agi => "agi",
            StatKey::Ap => "ap",
            StatKey::Crit => "crit",
            StatKey::Haste => "haste",
            StatKey::Mastery => "mastery",
        }
    }
}

/// Stat values for one convergence pass; each pass starts from a fresh copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStats {
    pub agi: f64,
    pub ap: f64,
    pub crit: f64,
    pub haste: f64,
    pub mastery: f64,
}

impl EffectiveStats {
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Agi => self.agi,
            StatKey::Ap => self.ap,
            StatKey::Crit => self.crit,
            StatKey::Haste => self.haste,
            StatKey::Mastery => self.mastery,
        }
    }

    pub fn add(&mut self, key: StatKey, value: f64) {
        match key {
            StatKey::Agi => self.agi += value,
            StatKey::Ap => self.ap += value,
            StatKey::Crit => self.crit += value,
            StatKey::Haste => self.haste += value,
            StatKey::Mastery => self.mastery += value,
        }
    }
}

/// Every attack, tick or poison application a cycle can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    MhAutoattacks,
    OhAutoattacks,
    MhAutoattackHits,
    OhAutoattackHits,
    Mutilate,
    Backstab,
    SinisterStrike,
    RevealingStrike,
    Hemorrhage,
    Ambush,
    MainGauche,
    MhKillingSpree,
    OhKillingSpree,
    Rupture,
    RuptureTicks,
    Envenom,
    Eviscerate,
    VenomousWounds,
    InstantPoison,
    DeadlyPoison,
    WoundPoison,
}

impl Ability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::MhAutoattacks => "mh_autoattacks",
            Ability::OhAutoattacks => "oh_autoattacks",
            Ability::MhAutoattackHits => "mh_autoattack_hits",
            Ability::OhAutoattackHits => "oh_autoattack_hits",
            Ability::Mutilate => "mutilate",
            Ability::Backstab => "backstab",
            Ability::SinisterStrike => "sinister_strike",
            Ability::RevealingStrike => "revealing_strike",
            Ability::Hemorrhage => "hemorrhage",
            Ability::Ambush => "ambush",
            Ability::MainGauche => "main_gauche",
            Ability::MhKillingSpree => "mh_killing_spree",
            Ability::OhKillingSpree => "oh_killing_spree",
            Ability::Rupture => "rupture",
            Ability::RuptureTicks => "rupture_ticks",
            Ability::Envenom => "envenom",
            Ability::Eviscerate => "eviscerate",
            Ability::VenomousWounds => "venomous_wounds",
            Ability::InstantPoison => "instant_poison",
            Ability::DeadlyPoison => "deadly_poison",
            Ability::WoundPoison => "wound_poison",
        }
    }

    /// Main-hand strikes that can trigger weapon procs
    pub fn mh_strikes() -> &'static [Ability] {
        &[
            Ability::Mutilate,
            Ability::Backstab,
            Ability::RevealingStrike,
            Ability::SinisterStrike,
            Ability::Ambush,
            Ability::Hemorrhage,
            Ability::MhKillingSpree,
        ]
    }

    /// Off-hand strikes that can trigger weapon procs
    pub fn oh_strikes() -> &'static [Ability] {
        &[Ability::Mutilate, Ability::MainGauche, Ability::OhKillingSpree]
    }

    /// Finishers whose damage lands directly (not over time)
    pub fn direct_finishers() -> &'static [Ability] {
        &[Ability::Envenom, Ability::Eviscerate]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
