//! Assassination: Rupture upkeep with Envenom spam
//!
//! The fight is split in two phases. Above execute range Mutilate builds
//! combo points; inside it Backstab takes over. Both phases keep Rupture up
//! for Venomous Wounds and spend everything else on Envenom.

use super::{
    cp_distribution_for_cycle, AttackRateTable, CritRateTable, CycleModel, CycleModifiers,
    CycleSnapshot, FinisherProfile,
};
use crate::build::{Glyph, Poison, Talent};
use crate::model::RogueModel;
use crate::types::{Ability, EffectiveStats, Hand};

/// Which builder the phase uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssassinationPhase {
    Mutilate,
    Backstab,
}

impl AssassinationPhase {
    pub fn builder(&self) -> Ability {
        match self {
            AssassinationPhase::Mutilate => Ability::Mutilate,
            AssassinationPhase::Backstab => Ability::Backstab,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssassinationCycle<'m, 'a> {
    model: &'m RogueModel<'a>,
    phase: AssassinationPhase,
    min_envenom_size: u8,
    base_energy_regen: f64,
    bonus_energy_regen: f64,
    envenom_energy_cost: f64,
}

impl<'m, 'a> AssassinationCycle<'m, 'a> {
    pub fn new(model: &'m RogueModel<'a>, phase: AssassinationPhase, min_envenom_size: u8) -> Self {
        let response = model.response_time();

        let mut base_energy_regen = 10.0;
        if model.has_talent(Talent::Overkill) {
            base_energy_regen += 60.0 / (180.0 + response);
        }
        let mut bonus_energy_regen = model.bonus_energy_regen;
        if model.has_talent(Talent::ColdBlood) {
            bonus_energy_regen += 25.0 / (120.0 + response);
        }

        AssassinationCycle {
            model,
            phase,
            min_envenom_size,
            base_energy_regen,
            bonus_energy_regen,
            envenom_energy_cost: 28.0 + 7.0 / model.strike_hit_chance,
        }
    }

    pub fn phase(&self) -> AssassinationPhase {
        self.phase
    }

    /// Energy per builder and its combo-point outcomes, given its crit rate
    fn builder_economy(&self, builder_crit: f64) -> (f64, Vec<(u8, f64)>) {
        let model = self.model;
        let seal_fate = builder_crit * 0.5 * model.talent(Talent::SealFate);
        let base_cost = 48.0 + 12.0 / model.strike_hit_chance;
        match self.phase {
            AssassinationPhase::Mutilate => {
                let cost = base_cost - 5.0 * model.glyph(Glyph::Mutilate);
                // two hands, each can crit into a Seal Fate point
                let proc_rate = 1.0 - (1.0 - seal_fate).powi(2);
                (cost, vec![(2, 1.0 - proc_rate), (3, proc_rate)])
            }
            AssassinationPhase::Backstab => {
                let mut cost = base_cost - 15.0 * model.talent(Talent::MurderousIntent);
                cost -= 5.0 * builder_crit * model.glyph(Glyph::Backstab);
                (cost, vec![(1, 1.0 - seal_fate), (2, seal_fate)])
            }
        }
    }

    fn builder_crit_rate(&self, base_melee_crit: f64) -> f64 {
        let bonus = match self.phase {
            AssassinationPhase::Mutilate => 0.05,
            AssassinationPhase::Backstab => 0.1,
        };
        let crit = base_melee_crit
            + self.model.build.stats.gear_buffs.rogue_t11_2pc_crit_bonus()
            + bonus * self.model.talent(Talent::PuncturingWounds);
        crit.min(1.0)
    }
}

impl CycleModel for AssassinationCycle<'_, '_> {
    fn attack_counts(&self, stats: &EffectiveStats) -> CycleSnapshot {
        let model = self.model;
        let base_melee_crit = model.melee_crit_rate(stats.agi, stats.crit);
        let base_spell_crit = model.spell_crit_rate(stats.crit);
        let haste_multiplier = model.haste_multiplier(stats.haste);

        let energy_regen = self.base_energy_regen * haste_multiplier + self.bonus_energy_regen;
        let energy_regen_with_rupture = energy_regen + 1.5 * model.talent(Talent::VenomousWounds);
        let attack_speed_multiplier = model.base_speed_multiplier * haste_multiplier;

        let builder = self.phase.builder();
        let builder_crit = self.builder_crit_rate(base_melee_crit);

        let mut crits = CritRateTable::new();
        crits.set(Ability::MhAutoattacks, model.autoattack_crit_rate(Hand::MainHand, base_melee_crit));
        crits.set(Ability::OhAutoattacks, model.autoattack_crit_rate(Hand::OffHand, base_melee_crit));
        crits.set(builder, builder_crit);
        crits.set(Ability::Envenom, base_melee_crit);
        crits.set(Ability::RuptureTicks, base_melee_crit);
        crits.set(Ability::VenomousWounds, base_spell_crit);
        crits.set(Ability::InstantPoison, base_spell_crit);
        crits.set(Ability::DeadlyPoison, base_spell_crit);

        let (builder_cost, cp_per_builder) = self.builder_economy(builder_crit);
        let distribution = cp_distribution_for_cycle(
            &cp_per_builder,
            self.min_envenom_size,
            0.2 * model.talent(Talent::Ruthlessness),
        );
        let profile = FinisherProfile::from_distribution(&distribution);
        let relentless_return = profile.cp_per_finisher * model.relentless_strikes_per_cp;
        let build_up_cost = profile.actions_per_finisher * builder_cost;

        // Half the Rupture build-up happens while the previous one still ticks
        let energy_for_rupture = build_up_cost + model.base_rupture_energy_cost - relentless_return;
        let rupture_downtime = 0.5 * energy_for_rupture / energy_regen;
        let average_rupture_length =
            2.0 * (3.0 + profile.cp_per_finisher + 2.0 * model.glyph(Glyph::Rupture));
        let average_cycle_length = rupture_downtime + average_rupture_length;

        let energy_for_envenoms =
            average_rupture_length * energy_regen_with_rupture - 0.5 * energy_for_rupture;
        let envenom_cost = build_up_cost + self.envenom_energy_cost - relentless_return;
        let envenoms_per_cycle = energy_for_envenoms / envenom_cost;

        let mut attacks = AttackRateTable::new();
        let envenoms_per_second = envenoms_per_cycle / average_cycle_length;
        let rupture_rate = 1.0 / average_cycle_length;
        attacks.set(Ability::Rupture, rupture_rate);
        attacks.set(
            builder,
            (envenoms_per_second + rupture_rate) * profile.actions_per_finisher,
        );

        if model.has_talent(Talent::ColdBlood) {
            let envenoms_per_cold_blood = 120.0 * envenoms_per_second;
            if envenoms_per_cold_blood > 0.0 {
                let crit = crits.get(Ability::Envenom);
                crits.set(
                    Ability::Envenom,
                    ((envenoms_per_cold_blood - 1.0) * crit + 1.0) / envenoms_per_cold_blood,
                );
            }
        }

        let envenoms = profile.rates(envenoms_per_second);
        attacks.set_per_cp(Ability::Envenom, envenoms);

        let mut rupture_ticks = [0.0; 6];
        for (size, ticks) in rupture_ticks.iter_mut().enumerate().skip(1) {
            let ticks_per_rupture = 3.0 + size as f64 + 2.0 * model.glyph(Glyph::Rupture);
            *ticks = ticks_per_rupture * rupture_rate * profile.size_breakdown[size];
        }
        attacks.set_per_cp(Ability::RuptureTicks, rupture_ticks);

        let total_rupture_ticks: f64 = rupture_ticks.iter().sum();
        attacks.set(
            Ability::VenomousWounds,
            total_rupture_ticks * 0.3 * model.talent(Talent::VenomousWounds) * model.spell_hit_chance(),
        );

        let mh_autoattacks = attack_speed_multiplier / model.weapon_speed(Hand::MainHand);
        let oh_autoattacks = attack_speed_multiplier / model.weapon_speed(Hand::OffHand);
        let mh_autoattack_hits = mh_autoattacks * model.dual_wield_mh_hit_chance();
        let oh_autoattack_hits = oh_autoattacks * model.dual_wield_oh_hit_chance();
        attacks.set(Ability::MhAutoattacks, mh_autoattacks);
        attacks.set(Ability::OhAutoattacks, oh_autoattacks);
        attacks.set(Ability::MhAutoattackHits, mh_autoattack_hits);
        attacks.set(Ability::OhAutoattackHits, oh_autoattack_hits);

        let builder_rate = attacks.total(builder);
        let total_mh_hits = mh_autoattack_hits + builder_rate + envenoms_per_second + rupture_rate;
        let total_oh_hits = match self.phase {
            AssassinationPhase::Mutilate => oh_autoattack_hits + builder_rate,
            AssassinationPhase::Backstab => oh_autoattack_hits,
        };

        let envenom_uptime = (1..=5)
            .map(|cps| (1.0 / model.strike_hit_chance + cps as f64) * envenoms[cps])
            .sum::<f64>()
            .min(1.0);

        let settings = &model.build.settings;
        let instant_hand = if settings.mh_poison == Poison::Instant {
            Hand::MainHand
        } else {
            Hand::OffHand
        };
        let ip_base_proc_rate = 0.3 * model.weapon_speed(instant_hand) / 1.4;
        let ip_envenom_proc_rate = ip_base_proc_rate * 1.5;
        let dp_base_proc_rate = 0.5;
        let dp_envenom_proc_rate = dp_base_proc_rate + 0.15;

        let average_ip = ip_base_proc_rate * (1.0 - envenom_uptime) + ip_envenom_proc_rate * envenom_uptime;
        let average_dp = dp_base_proc_rate * (1.0 - envenom_uptime) + dp_envenom_proc_rate * envenom_uptime;

        // Deadly Poison applications at five stacks apply Instant Poison
        let (mh_poison_procs, oh_poison_procs) = match instant_hand {
            Hand::MainHand => (average_ip * total_mh_hits, average_dp * total_oh_hits),
            Hand::OffHand => (average_dp * total_mh_hits, average_ip * total_oh_hits),
        };
        attacks.set(
            Ability::InstantPoison,
            (mh_poison_procs + oh_poison_procs) * model.spell_hit_chance(),
        );
        attacks.set(Ability::DeadlyPoison, 1.0 / 3.0);

        CycleSnapshot {
            attacks,
            crits,
            modifiers: CycleModifiers::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConstants;
    use crate::testing::assassination_build;
    use crate::types::Spec;

    #[test]
    fn test_mutilate_phase_rates() {
        let build = assassination_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let cycle = AssassinationCycle::new(&model, AssassinationPhase::Mutilate, 4);
        let snapshot = cycle.attack_counts(&model.seed_stats());

        let attacks = &snapshot.attacks;
        assert!(attacks.total(Ability::Mutilate) > 0.0);
        assert!(!attacks.contains(Ability::Backstab));
        assert!(attacks.total(Ability::Envenom) > 0.0);
        assert!(attacks.total(Ability::Rupture) > 0.0);
        assert!((attacks.total(Ability::DeadlyPoison) - 1.0 / 3.0).abs() < 1e-12);

        // minimum Envenom size 4 never spends fewer combo points
        let envenoms = attacks.per_cp(Ability::Envenom).unwrap();
        assert_eq!(envenoms[1], 0.0);
        assert_eq!(envenoms[2], 0.0);
        assert_eq!(envenoms[3], 0.0);
    }

    #[test]
    fn test_backstab_phase_uses_backstab() {
        let build = assassination_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let cycle = AssassinationCycle::new(&model, AssassinationPhase::Backstab, 5);
        let stats = model.seed_stats();
        let snapshot = cycle.attack_counts(&stats);

        assert!(snapshot.attacks.total(Ability::Backstab) > 0.0);
        assert!(!snapshot.attacks.contains(Ability::Mutilate));
        // Puncturing Wounds and the T11 two-piece
        let base = model.melee_crit_rate(stats.agi, stats.crit);
        assert!(snapshot.crits.get(Ability::Backstab) > base);
    }

    #[test]
    fn test_cold_blood_raises_envenom_crit() {
        let build = assassination_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let cycle = AssassinationCycle::new(&model, AssassinationPhase::Mutilate, 4);
        let stats = model.seed_stats();
        let snapshot = cycle.attack_counts(&stats);

        let base = model.melee_crit_rate(stats.agi, stats.crit);
        assert!(snapshot.crits.get(Ability::Envenom) > base);
        assert!(snapshot.crits.get(Ability::Envenom) <= 1.0);
    }

    #[test]
    fn test_more_haste_more_envenoms() {
        let build = assassination_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let cycle = AssassinationCycle::new(&model, AssassinationPhase::Mutilate, 4);

        let stats = model.seed_stats();
        let mut hasted = stats;
        hasted.haste += 1000.0;

        let slow = cycle.attack_counts(&stats);
        let fast = cycle.attack_counts(&hasted);
        assert!(fast.attacks.total(Ability::Envenom) > slow.attacks.total(Ability::Envenom));
        assert!(fast.attacks.total(Ability::MhAutoattacks) > slow.attacks.total(Ability::MhAutoattacks));
    }
}
