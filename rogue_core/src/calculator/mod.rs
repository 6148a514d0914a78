//! Public entry point: DPS, damage breakdowns and rankings for one build
//!
//! Every call builds its own model and proc scratch, so one calculator can
//! be shared across threads.

mod ranking;
mod specialization;

pub use ranking::{normalize_ep, EpStat, TalentRanking, WeaponEp, WeaponEpQuery, EP_DELTA};
pub use specialization::SpecBuild;

use crate::build::{Build, Glyph, Talent, MODELED_LEVEL};
use crate::config::GameConstants;
use crate::cycle::{
    AssassinationCycle, AssassinationPhase, CombatCycle, CycleModifiers, RevealingStrikeUsage,
    SubtletyCycle,
};
use crate::engine::{compute_damage, DamageBreakdown};
use crate::error::{DpsError, English, Locale, Unmodeled};
use crate::model::RogueModel;
use crate::types::Spec;
use tracing::debug;

/// Steady-state damage calculator for one build
pub struct RogueDamageCalculator<'a> {
    build: &'a Build,
    constants: GameConstants,
    locale: &'a dyn Locale,
}

impl<'a> RogueDamageCalculator<'a> {
    pub fn new(build: &'a Build) -> Self {
        RogueDamageCalculator {
            build,
            constants: GameConstants::default(),
            locale: &English,
        }
    }

    pub fn with_constants(mut self, constants: GameConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Render input errors with another message catalog
    pub fn with_locale(mut self, locale: &'a dyn Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn build(&self) -> &Build {
        self.build
    }

    pub fn get_dps(&self) -> Result<f64, DpsError> {
        self.dps_for(self.build)
    }

    /// DPS by source; the values sum to [`Self::get_dps`]
    pub fn get_dps_breakdown(&self) -> Result<DamageBreakdown, DpsError> {
        self.breakdown_for(self.build)
    }

    fn not_modeled(&self, reason: Unmodeled) -> DpsError {
        DpsError::not_modeled(reason, self.locale)
    }

    pub(crate) fn dps_for(&self, build: &Build) -> Result<f64, DpsError> {
        Ok(self.breakdown_for(build)?.total())
    }

    /// Breakdown for any build, using this calculator's constants and locale
    pub(crate) fn breakdown_for(&self, build: &Build) -> Result<DamageBreakdown, DpsError> {
        if build.level != MODELED_LEVEL {
            return Err(self.not_modeled(Unmodeled::UnsupportedLevel(build.level)));
        }
        let spec_build = SpecBuild::classify(build);
        debug!(?spec_build, "Classified build");
        match spec_build {
            SpecBuild::Assassination {
                min_envenom_size_mutilate,
                min_envenom_size_backstab,
            } => self.assassination(build, min_envenom_size_mutilate, min_envenom_size_backstab),
            SpecBuild::Combat {
                revealing_strike,
                ksp_immediately,
                use_rupture,
            } => self.combat(build, revealing_strike, ksp_immediately, use_rupture),
            SpecBuild::Subtlety {
                raid_crits_per_second,
                clip_recuperate,
            } => self.subtlety(build, raid_crits_per_second, clip_recuperate),
            SpecBuild::Unmodeled(reason) => Err(self.not_modeled(reason)),
        }
    }

    /// Mutilate above execute range, Backstab inside it, blended by time
    fn assassination(
        &self,
        build: &Build,
        min_envenom_size_mutilate: u8,
        min_envenom_size_backstab: u8,
    ) -> Result<DamageBreakdown, DpsError> {
        let model = RogueModel::new(build, &self.constants, Spec::Assassination);
        let vendetta = if model.has_talent(Talent::Vendetta) {
            1.05 + 0.01 * model.glyph(Glyph::Vendetta)
        } else {
            1.0
        };

        let execute = build.settings.time_in_execute_range;
        let phases = [
            (AssassinationPhase::Mutilate, min_envenom_size_mutilate, 1.0 - execute),
            (AssassinationPhase::Backstab, min_envenom_size_backstab, execute),
        ];

        let mut breakdown = DamageBreakdown::new();
        for (phase, min_envenom_size, weight) in phases {
            if weight <= 0.0 {
                continue;
            }
            let cycle = AssassinationCycle::new(&model, phase, min_envenom_size);
            let mut phase_breakdown = compute_damage(&model, &cycle, self.locale)?.breakdown;
            phase_breakdown.scale_each(|_| vendetta);
            breakdown.merge_weighted(&phase_breakdown, weight);
        }
        Ok(breakdown)
    }

    fn combat(
        &self,
        build: &Build,
        revealing_strike: RevealingStrikeUsage,
        ksp_immediately: bool,
        use_rupture: bool,
    ) -> Result<DamageBreakdown, DpsError> {
        let model = RogueModel::new(build, &self.constants, Spec::Combat);
        let cycle = CombatCycle::new(&model, revealing_strike, ksp_immediately, use_rupture);
        let converged = compute_damage(&model, &cycle, self.locale)?;
        let mut breakdown = converged.breakdown;

        if let CycleModifiers::Combat {
            bandits_guile,
            killing_spree,
            revealing_strike,
        } = converged.modifiers
        {
            let ksp_bonus = 1.2 + 0.1 * model.glyph(Glyph::KillingSpree);
            // Killing Spree used on cooldown lands at whatever Bandit's Guile is up
            let ksp_guile = if cycle.ksp_immediately() {
                bandits_guile
            } else {
                cycle.max_bandits_guile_multiplier()
            };
            breakdown.scale_each(|source| match source {
                "killing_spree" => ksp_guile * ksp_bonus,
                "sinister_strike" | "revealing_strike" => bandits_guile,
                "eviscerate" => bandits_guile * revealing_strike,
                "rupture" => bandits_guile * killing_spree * revealing_strike,
                _ => bandits_guile * killing_spree,
            });
        }
        Ok(breakdown)
    }

    fn subtlety(
        &self,
        build: &Build,
        raid_crits_per_second: f64,
        clip_recuperate: bool,
    ) -> Result<DamageBreakdown, DpsError> {
        let model = RogueModel::new(build, &self.constants, Spec::Subtlety);
        let cycle = SubtletyCycle::new(&model, raid_crits_per_second, clip_recuperate);
        let converged = compute_damage(&model, &cycle, self.locale)?;
        let mut breakdown = converged.breakdown;

        if let CycleModifiers::Subtlety {
            find_weakness_uptime,
            ambush_shadowstep_rate,
        } = converged.modifiers
        {
            let boost = find_weakness_boost(&model);
            let find_weakness = 1.0 + (boost - 1.0) * find_weakness_uptime;
            breakdown.scale_each(|source| match source {
                "autoattack" | "backstab" | "eviscerate" | "hemorrhage" => find_weakness,
                "ambush" => 1.3 * ambush_shadowstep_rate + (1.0 - ambush_shadowstep_rate) * boost,
                _ => 1.0,
            });
        }
        Ok(breakdown)
    }
}

/// Physical damage gain while Find Weakness ignores part of the target's armour
fn find_weakness_boost(model: &RogueModel<'_>) -> f64 {
    let points = model.talent(Talent::FindWeakness);
    if points <= 0.0 {
        return 1.0;
    }
    let armor = model.target_armor();
    model.armor_mitigation_multiplier((1.0 - 0.25 * points) * armor)
        / model.armor_mitigation_multiplier(armor)
}
