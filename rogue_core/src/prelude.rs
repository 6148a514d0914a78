//! Prelude module for convenient imports
//!
//! ```rust
//! use rogue_core::prelude::*;
//! ```

// Build inputs
pub use crate::build::{
    Buff, Buffs, Build, Cycle, GearBuff, GearBuffs, Glyph, Poison, Race, RogueGlyphs, RogueTalents,
    Settings, Stats, Talent, Weapon, WeaponEnchant, WeaponKind,
};

// Calculator
pub use crate::calculator::{EpStat, RogueDamageCalculator, TalentRanking, WeaponEp, WeaponEpQuery};
pub use crate::engine::DamageBreakdown;

// Errors
pub use crate::error::{DpsError, English, Locale, Unmodeled};

// Procs and config
pub use crate::config::{default_catalog, load_build, parse_build, GameConstants};
pub use crate::procs::{ProcDef, ProcsList};

pub use crate::types::{Ability, Spec};
