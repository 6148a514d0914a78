//! Steady-state cycle models
//!
//! Each specialization maps a stat snapshot to attack and crit rates for
//! every ability it uses. Models are pure: the same stats always give the
//! same [`CycleSnapshot`].

mod assassination;
mod combat;
mod cp_distribution;
mod poisons;
mod subtlety;
mod table;

pub use assassination::{AssassinationCycle, AssassinationPhase};
pub use combat::{CombatCycle, RevealingStrikeUsage};
pub use cp_distribution::{cp_distribution_for_cycle, CpDistribution, FinisherProfile, MAX_COMBO_POINTS};
pub use poisons::apply_poison_counts;
pub use subtlety::SubtletyCycle;
pub use table::{AttackRateTable, CritRateTable, Rate};

use crate::types::EffectiveStats;

/// Cycle-level damage multipliers derived alongside the rates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CycleModifiers {
    #[default]
    None,
    Combat {
        bandits_guile: f64,
        killing_spree: f64,
        revealing_strike: f64,
    },
    Subtlety {
        find_weakness_uptime: f64,
        /// Share of Ambushes opened from stealth with Shadowstep
        ambush_shadowstep_rate: f64,
    },
}

/// Output of one cycle evaluation
#[derive(Debug, Clone, Default)]
pub struct CycleSnapshot {
    pub attacks: AttackRateTable,
    pub crits: CritRateTable,
    pub modifiers: CycleModifiers,
}

/// A specialization's attack-rate generator
pub trait CycleModel: Send + Sync {
    fn attack_counts(&self, stats: &EffectiveStats) -> CycleSnapshot;
}
