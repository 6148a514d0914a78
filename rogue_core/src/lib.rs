//! rogue_core - Steady-state DPS estimation for melee rogue builds
//!
//! This library provides:
//! - Build: stats, weapons, procs, talents, glyphs, buffs and cycle settings
//! - Cycle models: attack and crit rates per second for each specialization
//! - Proc convergence: uptimes and stats solved to a fixed point
//! - RogueDamageCalculator: DPS, per-source breakdowns, stat weights and rankings

pub mod build;
pub mod calculator;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod model;
pub mod prelude;
pub mod procs;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export core types for convenience
pub use build::{Build, Cycle, Glyph, Settings, Stats, Talent, Weapon, WeaponEnchant};
pub use calculator::{
    normalize_ep, EpStat, RogueDamageCalculator, SpecBuild, TalentRanking, WeaponEp, WeaponEpQuery,
};
pub use config::{default_catalog, load_build, parse_build, ConfigError, GameConstants};
pub use engine::DamageBreakdown;
pub use error::{DpsError, English, Locale, Unmodeled};
pub use types::{Ability, Spec};
