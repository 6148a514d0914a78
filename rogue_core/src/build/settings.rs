//! Fight settings and per-specialization cycle knobs

use crate::types::Spec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weapon poison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Poison {
    #[serde(alias = "ip")]
    Instant,
    #[serde(alias = "dp")]
    Deadly,
    #[serde(alias = "wp")]
    Wound,
}

impl fmt::Display for Poison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Poison::Instant => "instant",
            Poison::Deadly => "deadly",
            Poison::Wound => "wound",
        };
        f.write_str(name)
    }
}

fn default_envenom_mutilate() -> u8 {
    4
}
fn default_envenom_backstab() -> u8 {
    5
}
fn default_use_revealing_strike() -> String {
    "always".to_string()
}
fn default_true() -> bool {
    true
}
fn default_raid_crits() -> f64 {
    5.0
}

/// Cycle configuration, tagged by the specialization it models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cycle {
    Assassination {
        #[serde(default = "default_envenom_mutilate")]
        min_envenom_size_mutilate: u8,
        #[serde(default = "default_envenom_backstab")]
        min_envenom_size_backstab: u8,
    },
    Combat {
        /// One of `always`, `sometimes` or `never`
        #[serde(default = "default_use_revealing_strike")]
        use_revealing_strike: String,
        #[serde(default)]
        ksp_immediately: bool,
        #[serde(default = "default_true")]
        use_rupture: bool,
    },
    Subtlety {
        /// Raid-wide crits per second feeding Honor Among Thieves
        #[serde(default = "default_raid_crits")]
        raid_crits_per_second: f64,
        #[serde(default)]
        clip_recuperate: bool,
    },
}

impl Cycle {
    pub fn assassination() -> Self {
        Cycle::Assassination {
            min_envenom_size_mutilate: default_envenom_mutilate(),
            min_envenom_size_backstab: default_envenom_backstab(),
        }
    }

    pub fn combat() -> Self {
        Cycle::Combat {
            use_revealing_strike: default_use_revealing_strike(),
            ksp_immediately: false,
            use_rupture: true,
        }
    }

    pub fn subtlety() -> Self {
        Cycle::Subtlety {
            raid_crits_per_second: default_raid_crits(),
            clip_recuperate: false,
        }
    }

    pub fn spec(&self) -> Spec {
        match self {
            Cycle::Assassination { .. } => Spec::Assassination,
            Cycle::Combat { .. } => Spec::Combat,
            Cycle::Subtlety { .. } => Spec::Subtlety,
        }
    }
}

fn default_response_time() -> f64 {
    0.5
}
fn default_duration() -> f64 {
    300.0
}
fn default_mh_poison() -> Poison {
    Poison::Instant
}
fn default_oh_poison() -> Poison {
    Poison::Deadly
}
fn default_execute_range() -> f64 {
    0.35
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub cycle: Cycle,
    /// Reaction time added to every cooldown, in seconds
    #[serde(default = "default_response_time")]
    pub response_time: f64,
    /// Fight length in seconds
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_mh_poison")]
    pub mh_poison: Poison,
    #[serde(default = "default_oh_poison")]
    pub oh_poison: Poison,
    /// Fraction of the fight spent below 35% target health
    #[serde(default = "default_execute_range")]
    pub time_in_execute_range: f64,
    #[serde(default = "default_true")]
    pub tricks_on_cooldown: bool,
}

impl Settings {
    pub fn new(cycle: Cycle) -> Self {
        Settings {
            cycle,
            response_time: default_response_time(),
            duration: default_duration(),
            mh_poison: default_mh_poison(),
            oh_poison: default_oh_poison(),
            time_in_execute_range: default_execute_range(),
            tricks_on_cooldown: true,
        }
    }

    pub fn with_response_time(mut self, response_time: f64) -> Self {
        self.response_time = response_time;
        self
    }

    pub fn uses_poison(&self, poison: Poison) -> bool {
        self.mh_poison == poison || self.oh_poison == poison
    }
}
