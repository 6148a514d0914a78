//! Build inputs: everything describing one character configuration

mod buffs;
mod glyphs;
mod race;
mod settings;
mod stats;
mod talents;

pub use buffs::{Buff, Buffs};
pub use glyphs::{Glyph, RogueGlyphs};
pub use race::{RacialBoost, Race};
pub use settings::{Cycle, Poison, Settings};
pub use stats::{ActivatedBoost, GearBuff, GearBuffs, Stats, Weapon, WeaponEnchant, WeaponKind};
pub use talents::{RogueTalents, Talent, TalentParseError, TalentStrings, SPEC_THRESHOLD, TREE_SIZE};

use serde::{Deserialize, Serialize};

/// The only character level the model supports
pub const MODELED_LEVEL: u32 = 85;

fn default_level() -> u32 {
    MODELED_LEVEL
}

/// Stats, talents, glyphs, buffs, race and settings of one character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub stats: Stats,
    pub talents: RogueTalents,
    #[serde(default)]
    pub glyphs: RogueGlyphs,
    #[serde(default)]
    pub buffs: Buffs,
    #[serde(default)]
    pub race: Race,
    pub settings: Settings,
    #[serde(default = "default_level")]
    pub level: u32,
}
