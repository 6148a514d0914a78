//! Level 85 combat constants

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub ratings: RatingConstants,
    #[serde(default)]
    pub combat_table: CombatTableConstants,
    #[serde(default)]
    pub target: TargetConstants,
}

/// Rating to percentage conversions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConstants {
    #[serde(default = "default_haste_rating")]
    pub haste_rating_per_percent: f64,
    #[serde(default = "default_crit_rating")]
    pub crit_rating_per_percent: f64,
    #[serde(default = "default_mastery_rating")]
    pub mastery_rating_per_point: f64,
    #[serde(default = "default_melee_hit_rating")]
    pub melee_hit_rating_per_percent: f64,
    #[serde(default = "default_spell_hit_rating")]
    pub spell_hit_rating_per_percent: f64,
    #[serde(default = "default_expertise_rating")]
    pub expertise_rating_per_point: f64,
    #[serde(default = "default_agi_per_crit")]
    pub agi_per_crit_percent: f64,
    /// Rogue crit chance before agility and rating
    #[serde(default = "default_base_crit")]
    pub base_melee_crit: f64,
    /// Mastery points every character has
    #[serde(default = "default_base_mastery")]
    pub base_mastery: f64,
}

impl Default for RatingConstants {
    fn default() -> Self {
        RatingConstants {
            haste_rating_per_percent: default_haste_rating(),
            crit_rating_per_percent: default_crit_rating(),
            mastery_rating_per_point: default_mastery_rating(),
            melee_hit_rating_per_percent: default_melee_hit_rating(),
            spell_hit_rating_per_percent: default_spell_hit_rating(),
            expertise_rating_per_point: default_expertise_rating(),
            agi_per_crit_percent: default_agi_per_crit(),
            base_melee_crit: default_base_crit(),
            base_mastery: default_base_mastery(),
        }
    }
}

fn default_haste_rating() -> f64 {
    128.057
}
fn default_crit_rating() -> f64 {
    179.28
}
fn default_mastery_rating() -> f64 {
    179.28
}
fn default_melee_hit_rating() -> f64 {
    120.109
}
fn default_spell_hit_rating() -> f64 {
    102.446
}
fn default_expertise_rating() -> f64 {
    30.0272
}
fn default_agi_per_crit() -> f64 {
    324.85
}
fn default_base_crit() -> f64 {
    -0.00295
}
fn default_base_mastery() -> f64 {
    8.0
}

impl RatingConstants {
    /// Multiplier applied to attack and energy speed
    pub fn haste_multiplier(&self, rating: f64) -> f64 {
        1.0 + rating / self.haste_rating_per_percent / 100.0
    }

    pub fn mastery_points(&self, rating: f64) -> f64 {
        self.base_mastery + rating / self.mastery_rating_per_point
    }

    /// Crit chance (fraction) from crit rating
    pub fn crit_chance(&self, rating: f64) -> f64 {
        rating / self.crit_rating_per_percent / 100.0
    }

    /// Crit chance (fraction) from agility
    pub fn agi_crit_chance(&self, agi: f64) -> f64 {
        agi / self.agi_per_crit_percent / 100.0
    }

    pub fn melee_hit_chance(&self, rating: f64) -> f64 {
        rating / self.melee_hit_rating_per_percent / 100.0
    }

    pub fn spell_hit_chance(&self, rating: f64) -> f64 {
        rating / self.spell_hit_rating_per_percent / 100.0
    }

    /// Expertise points from expertise rating
    pub fn expertise(&self, rating: f64) -> f64 {
        rating / self.expertise_rating_per_point
    }
}

/// Attack table against a raid boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatTableConstants {
    #[serde(default = "default_glance_rate")]
    pub glance_rate: f64,
    #[serde(default = "default_glance_multiplier")]
    pub glance_multiplier: f64,
    #[serde(default = "default_melee_miss")]
    pub melee_miss: f64,
    #[serde(default = "default_dual_wield_miss")]
    pub dual_wield_miss: f64,
    #[serde(default = "default_dodge")]
    pub dodge: f64,
    #[serde(default = "default_dodge_per_expertise")]
    pub dodge_per_expertise: f64,
    #[serde(default = "default_spell_miss")]
    pub spell_miss: f64,
    #[serde(default = "default_melee_crit_suppression")]
    pub melee_crit_suppression: f64,
    #[serde(default = "default_spell_crit_suppression")]
    pub spell_crit_suppression: f64,
    #[serde(default = "default_physical_crit")]
    pub physical_crit_multiplier: f64,
    #[serde(default = "default_spell_crit")]
    pub spell_crit_multiplier: f64,
}

impl Default for CombatTableConstants {
    fn default() -> Self {
        CombatTableConstants {
            glance_rate: default_glance_rate(),
            glance_multiplier: default_glance_multiplier(),
            melee_miss: default_melee_miss(),
            dual_wield_miss: default_dual_wield_miss(),
            dodge: default_dodge(),
            dodge_per_expertise: default_dodge_per_expertise(),
            spell_miss: default_spell_miss(),
            melee_crit_suppression: default_melee_crit_suppression(),
            spell_crit_suppression: default_spell_crit_suppression(),
            physical_crit_multiplier: default_physical_crit(),
            spell_crit_multiplier: default_spell_crit(),
        }
    }
}

fn default_glance_rate() -> f64 {
    0.24
}
fn default_glance_multiplier() -> f64 {
    0.75
}
fn default_melee_miss() -> f64 {
    0.08
}
fn default_dual_wield_miss() -> f64 {
    0.27
}
fn default_dodge() -> f64 {
    0.065
}
fn default_dodge_per_expertise() -> f64 {
    0.0025
}
fn default_spell_miss() -> f64 {
    0.17
}
fn default_melee_crit_suppression() -> f64 {
    0.048
}
fn default_spell_crit_suppression() -> f64 {
    0.021
}
fn default_physical_crit() -> f64 {
    2.0
}
fn default_spell_crit() -> f64 {
    1.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConstants {
    #[serde(default = "default_boss_armor")]
    pub armor: f64,
    /// Damage taken = constant / (constant + armor)
    #[serde(default = "default_armor_constant")]
    pub armor_constant: f64,
}

impl Default for TargetConstants {
    fn default() -> Self {
        TargetConstants {
            armor: default_boss_armor(),
            armor_constant: default_armor_constant(),
        }
    }
}

fn default_boss_armor() -> f64 {
    11977.0
}
fn default_armor_constant() -> f64 {
    26070.0
}

impl TargetConstants {
    /// Fraction of physical damage that gets through `armor`
    pub fn mitigation_multiplier(&self, armor: f64) -> f64 {
        self.armor_constant / (self.armor_constant + armor)
    }
}
