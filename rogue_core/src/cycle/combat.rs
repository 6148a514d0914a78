//! Combat: Sinister Strike into Eviscerate under Slice and Dice
//!
//! Energy comes from base regen and Combat Potency; Restless Blades turns
//! spent combo points into Adrenaline Rush and Killing Spree cooldown.

use super::{
    apply_poison_counts, cp_distribution_for_cycle, AttackRateTable, CritRateTable, CycleModel,
    CycleModifiers, CycleSnapshot, FinisherProfile, MAX_COMBO_POINTS,
};
use crate::build::{Glyph, Talent};
use crate::error::Unmodeled;
use crate::model::RogueModel;
use crate::types::{Ability, EffectiveStats, Hand};
use std::str::FromStr;

/// When Revealing Strike replaces the last Sinister Strike before a finisher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealingStrikeUsage {
    Always,
    /// Only when the finisher would not already reach five combo points
    Sometimes,
    Never,
}

impl FromStr for RevealingStrikeUsage {
    type Err = Unmodeled;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(RevealingStrikeUsage::Always),
            "sometimes" => Ok(RevealingStrikeUsage::Sometimes),
            "never" => Ok(RevealingStrikeUsage::Never),
            other => Err(Unmodeled::RevealingStrikeUsage(other.to_string())),
        }
    }
}

/// Builder actions and finisher sizes once Revealing Strike is placed
struct CombatFinisher {
    revealing_strikes: f64,
    sinister_strikes: f64,
    cp_per_finisher: f64,
    size_breakdown: [f64; 6],
}

#[derive(Debug, Clone)]
pub struct CombatCycle<'m, 'a> {
    model: &'m RogueModel<'a>,
    revealing_strike: RevealingStrikeUsage,
    ksp_immediately: bool,
    use_rupture: bool,
    base_energy_regen: f64,
    revealing_strike_energy_cost: f64,
    sinister_strike_energy_cost: f64,
}

impl<'m, 'a> CombatCycle<'m, 'a> {
    pub fn new(
        model: &'m RogueModel<'a>,
        revealing_strike: RevealingStrikeUsage,
        ksp_immediately: bool,
        use_rupture: bool,
    ) -> Self {
        let hit = model.strike_hit_chance;
        CombatCycle {
            model,
            revealing_strike,
            ksp_immediately,
            use_rupture,
            base_energy_regen: 12.5,
            revealing_strike_energy_cost: 32.0 + 8.0 / hit,
            sinister_strike_energy_cost: 36.0 + 9.0 / hit
                - 2.0 * model.talent(Talent::ImprovedSinisterStrike),
        }
    }

    pub fn ksp_immediately(&self) -> bool {
        self.ksp_immediately
    }

    /// Bandit's Guile damage bonus at full stacks
    pub fn max_bandits_guile_multiplier(&self) -> f64 {
        if self.model.has_talent(Talent::BanditsGuile) {
            1.3
        } else {
            1.0
        }
    }

    fn finisher(&self, cp_per_ss: &[(u8, f64)]) -> CombatFinisher {
        let bonus_cp_chance = 0.2 * self.model.talent(Talent::Ruthlessness);
        let mut finisher = CombatFinisher {
            revealing_strikes: 0.0,
            sinister_strikes: 0.0,
            cp_per_finisher: 0.0,
            size_breakdown: [0.0; 6],
        };

        if self.revealing_strike == RevealingStrikeUsage::Never {
            let dist = cp_distribution_for_cycle(cp_per_ss, MAX_COMBO_POINTS, bonus_cp_chance);
            let profile = FinisherProfile::from_distribution(&dist);
            finisher.sinister_strikes = profile.actions_per_finisher;
            finisher.cp_per_finisher = profile.cp_per_finisher;
            finisher.size_breakdown = profile.size_breakdown;
            return finisher;
        }

        let dist = cp_distribution_for_cycle(cp_per_ss, MAX_COMBO_POINTS - 1, bonus_cp_chance);
        for (&(cps, strikes), &prob) in &dist {
            finisher.sinister_strikes += strikes as f64 * prob;
            let actual = match self.revealing_strike {
                RevealingStrikeUsage::Sometimes if cps < MAX_COMBO_POINTS => {
                    finisher.revealing_strikes += prob;
                    cps + 1
                }
                RevealingStrikeUsage::Sometimes => cps,
                _ => (cps + 1).min(MAX_COMBO_POINTS),
            };
            finisher.cp_per_finisher += actual as f64 * prob;
            finisher.size_breakdown[actual as usize] += prob;
        }
        if self.revealing_strike == RevealingStrikeUsage::Always {
            finisher.revealing_strikes = 1.0;
        }
        finisher
    }
}

impl CycleModel for CombatCycle<'_, '_> {
    fn attack_counts(&self, stats: &EffectiveStats) -> CycleSnapshot {
        let model = self.model;
        let response = model.response_time();
        let base_melee_crit = model.melee_crit_rate(stats.agi, stats.crit);
        let base_spell_crit = model.spell_crit_rate(stats.crit);
        let haste_multiplier = model.haste_multiplier(stats.haste);

        let attack_speed_multiplier = model.base_speed_multiplier
            * haste_multiplier
            * (1.0 + 0.02 * model.talent(Talent::LightningReflexes));

        let mut mh_autoattacks = attack_speed_multiplier / model.weapon_speed(Hand::MainHand);
        let mut oh_autoattacks = attack_speed_multiplier / model.weapon_speed(Hand::OffHand);
        let mut mh_autoattack_hits = mh_autoattacks * model.dual_wield_mh_hit_chance();
        let mut oh_autoattack_hits = oh_autoattacks * model.dual_wield_oh_hit_chance();

        let main_gauche_proc_rate = 0.02
            * model.mastery_points(stats.mastery)
            * model.off_hand_melee_hit_chance();
        let mut main_gauche = main_gauche_proc_rate * mh_autoattacks;

        let combat_potency = model.talent(Talent::CombatPotency);
        let autoattack_cp_regen = combat_potency * (oh_autoattack_hits + main_gauche);
        let energy_regen =
            self.base_energy_regen * haste_multiplier + model.bonus_energy_regen + autoattack_cp_regen;

        // Main Gauche procs off every strike and feed Combat Potency
        let refund = main_gauche_proc_rate * combat_potency;
        let rupture_energy_cost = model.base_rupture_energy_cost - refund;
        let eviscerate_energy_cost = model.base_eviscerate_energy_cost - refund;
        let revealing_strike_energy_cost = self.revealing_strike_energy_cost - refund;
        let sinister_strike_energy_cost = self.sinister_strike_energy_cost - refund;

        let mut crits = CritRateTable::new();
        crits.set(Ability::MhAutoattacks, model.autoattack_crit_rate(Hand::MainHand, base_melee_crit));
        crits.set(Ability::OhAutoattacks, model.autoattack_crit_rate(Hand::OffHand, base_melee_crit));
        crits.set(Ability::MainGauche, base_melee_crit);
        crits.set(
            Ability::SinisterStrike,
            (base_melee_crit + model.build.stats.gear_buffs.rogue_t11_2pc_crit_bonus()).min(1.0),
        );
        crits.set(Ability::RevealingStrike, base_melee_crit);
        crits.set(
            Ability::Eviscerate,
            (base_melee_crit + 0.1 * model.glyph(Glyph::Eviscerate)).min(1.0),
        );
        crits.set(Ability::MhKillingSpree, base_melee_crit);
        crits.set(Ability::OhKillingSpree, base_melee_crit);
        crits.set(Ability::RuptureTicks, base_melee_crit);
        crits.set(Ability::InstantPoison, base_spell_crit);
        crits.set(Ability::DeadlyPoison, base_spell_crit);
        crits.set(Ability::WoundPoison, base_spell_crit);

        let extra_cp_chance = 0.2 * model.glyph(Glyph::SinisterStrike);
        let cp_per_ss = [(1, 1.0 - extra_cp_chance), (2, extra_cp_chance)];
        let finisher = self.finisher(&cp_per_ss);
        let cp_per_finisher = finisher.cp_per_finisher;

        let revealing_strike_multiplier = 1.0
            + (0.2 + 0.1 * model.glyph(Glyph::RevealingStrike)) * finisher.revealing_strikes;

        let relentless = model.relentless_strikes_per_cp;
        let energy_to_generate_cps = finisher.revealing_strikes * revealing_strike_energy_cost
            + finisher.sinister_strikes * sinister_strike_energy_cost;
        let total_eviscerate_cost =
            energy_to_generate_cps + eviscerate_energy_cost - cp_per_finisher * relentless;
        let total_rupture_cost =
            energy_to_generate_cps + rupture_energy_cost - cp_per_finisher * relentless;

        let ss_per_snd = (total_eviscerate_cost - cp_per_finisher * relentless + 25.0)
            / sinister_strike_energy_cost;
        let snd_size = ss_per_snd * (1.0 + extra_cp_chance) + 0.2 * model.talent(Talent::Ruthlessness);
        let snd_cost = ss_per_snd * sinister_strike_energy_cost + 25.0 - snd_size * relentless;
        let snd_duration = model.snd_length(snd_size);
        let energy_spent_on_snd = snd_cost / (snd_duration - response);

        let rupture = if self.use_rupture {
            let gap = (total_rupture_cost - 0.5 * total_eviscerate_cost) / energy_regen;
            let duration = 2.0 * (3.0 + 2.0 * model.glyph(Glyph::Rupture) + cp_per_finisher);
            1.0 / (duration + gap)
        } else {
            0.0
        };
        let energy_spent_on_rupture = total_rupture_cost * rupture;

        let energy_for_eviscerates = energy_regen - energy_spent_on_snd - energy_spent_on_rupture;
        let eviscerates_per_second = energy_for_eviscerates / total_eviscerate_cost;

        let restless_blades = model.talent(Talent::RestlessBlades);
        let cp_on_damage_finishers = (rupture + eviscerates_per_second) * cp_per_finisher;

        let ar_duration = if model.has_talent(Talent::AdrenalineRush) {
            15.0 + 5.0 * model.glyph(Glyph::AdrenalineRush)
        } else {
            0.0
        };
        let ar_bonus_cp_regen = autoattack_cp_regen * 0.2;
        let ar_bonus_energy = ar_duration * (ar_bonus_cp_regen + 10.0 * haste_multiplier);
        let ar_bonus_eviscerates = ar_bonus_energy / total_eviscerate_cost;
        let ar_self_reduction = ar_bonus_eviscerates * cp_per_finisher * restless_blades;
        let ar_cooldown = (180.0 - ar_self_reduction)
            / (1.0 + cp_on_damage_finishers * restless_blades)
            + response;
        let total_eviscerates = eviscerates_per_second + ar_bonus_eviscerates / ar_cooldown;

        let ar_uptime = ar_duration / ar_cooldown;
        let ar_autoattack_multiplier = 1.0 + 0.2 * ar_uptime;
        mh_autoattacks *= ar_autoattack_multiplier;
        oh_autoattacks *= ar_autoattack_multiplier;
        mh_autoattack_hits *= ar_autoattack_multiplier;
        oh_autoattack_hits *= ar_autoattack_multiplier;
        main_gauche *= ar_autoattack_multiplier;

        let finishers_per_second = total_eviscerates + rupture;
        let restless_blades_benefit = finishers_per_second * cp_per_finisher * restless_blades;
        let mut ksp_cooldown = 120.0 / (1.0 + restless_blades_benefit) + response;

        let sinister_strikes = finishers_per_second * finisher.sinister_strikes
            + ss_per_snd / (snd_duration - response);
        let revealing_strikes = finishers_per_second * finisher.revealing_strikes;
        main_gauche += (sinister_strikes + revealing_strikes + finishers_per_second) * main_gauche_proc_rate;

        let bandits_guile_points = model.talent(Talent::BanditsGuile);
        let bandits_guile = if bandits_guile_points > 0.0 {
            let time_at_level = 9.0 / ((sinister_strikes + revealing_strikes) * bandits_guile_points);
            let cycle_duration = 3.0 * time_at_level + 15.0;
            if !self.ksp_immediately {
                ksp_cooldown += 1.5 * time_at_level / cycle_duration;
            }
            let average_stacks = (3.0 * time_at_level + 45.0) / cycle_duration;
            1.0 + 0.1 * average_stacks
        } else {
            1.0
        };

        let mut attacks = AttackRateTable::new();
        let killing_spree = if model.has_talent(Talent::KillingSpree) {
            attacks.set(Ability::MhKillingSpree, 5.0 * model.strike_hit_chance / ksp_cooldown);
            attacks.set(
                Ability::OhKillingSpree,
                5.0 * model.off_hand_melee_hit_chance() / ksp_cooldown,
            );
            let ksp_uptime = 2.0 / ksp_cooldown;
            let ksp_buff = 0.2 + 0.1 * model.glyph(Glyph::KillingSpree);
            if self.ksp_immediately {
                1.0 + ksp_uptime * ksp_buff
            } else {
                1.0 + ksp_uptime * ksp_buff * self.max_bandits_guile_multiplier() / bandits_guile
            }
        } else {
            1.0
        };

        attacks.set(Ability::MhAutoattacks, mh_autoattacks);
        attacks.set(Ability::OhAutoattacks, oh_autoattacks);
        attacks.set(Ability::MhAutoattackHits, mh_autoattack_hits);
        attacks.set(Ability::OhAutoattackHits, oh_autoattack_hits);
        attacks.set(Ability::MainGauche, main_gauche);
        attacks.set(Ability::SinisterStrike, sinister_strikes);
        attacks.set(Ability::RevealingStrike, revealing_strikes);
        attacks.set(Ability::Rupture, rupture);
        attacks.set_per_cp(
            Ability::Eviscerate,
            finisher.size_breakdown.map(|p| p * total_eviscerates),
        );

        let mut rupture_ticks = [0.0; 6];
        for (size, ticks) in rupture_ticks.iter_mut().enumerate().skip(1) {
            let ticks_per_rupture = 3.0 + size as f64 + 2.0 * model.glyph(Glyph::Rupture);
            *ticks = ticks_per_rupture * rupture * finisher.size_breakdown[size];
        }
        attacks.set_per_cp(Ability::RuptureTicks, rupture_ticks);

        let total_mh_hits = mh_autoattack_hits
            + sinister_strikes
            + revealing_strikes
            + attacks.total(Ability::MhKillingSpree)
            + rupture
            + total_eviscerates;
        let total_oh_hits = oh_autoattack_hits + main_gauche + attacks.total(Ability::OhKillingSpree);
        apply_poison_counts(model, total_mh_hits, total_oh_hits, &mut attacks);

        CycleSnapshot {
            attacks,
            crits,
            modifiers: CycleModifiers::Combat {
                bandits_guile,
                killing_spree,
                revealing_strike: revealing_strike_multiplier,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Cycle;
    use crate::config::GameConstants;
    use crate::testing::combat_build;
    use crate::types::Spec;

    fn snapshot_for(usage: RevealingStrikeUsage, ksp_immediately: bool, use_rupture: bool) -> CycleSnapshot {
        let build = combat_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Combat);
        let cycle = CombatCycle::new(&model, usage, ksp_immediately, use_rupture);
        cycle.attack_counts(&model.seed_stats())
    }

    #[test]
    fn test_parse_usage() {
        assert_eq!("sometimes".parse::<RevealingStrikeUsage>().unwrap(), RevealingStrikeUsage::Sometimes);
        assert_eq!(
            "often".parse::<RevealingStrikeUsage>(),
            Err(Unmodeled::RevealingStrikeUsage("often".to_string()))
        );
    }

    #[test]
    fn test_never_skips_revealing_strike() {
        let snapshot = snapshot_for(RevealingStrikeUsage::Never, false, true);
        assert_eq!(snapshot.attacks.total(Ability::RevealingStrike), 0.0);
        match snapshot.modifiers {
            CycleModifiers::Combat { revealing_strike, .. } => {
                assert!((revealing_strike - 1.0).abs() < f64::EPSILON)
            }
            other => panic!("unexpected modifiers {:?}", other),
        }
    }

    #[test]
    fn test_always_one_revealing_strike_per_finisher() {
        let snapshot = snapshot_for(RevealingStrikeUsage::Always, false, true);
        let attacks = &snapshot.attacks;
        let finishers = attacks.total(Ability::Eviscerate) + attacks.total(Ability::Rupture);
        assert!((attacks.total(Ability::RevealingStrike) - finishers).abs() < 1e-12);
        match snapshot.modifiers {
            CycleModifiers::Combat { revealing_strike, bandits_guile, killing_spree } => {
                // glyphed: 30% on every finisher
                assert!((revealing_strike - 1.3).abs() < 1e-12);
                assert!(bandits_guile > 1.0 && bandits_guile < 1.3);
                assert!(killing_spree > 1.0);
            }
            other => panic!("unexpected modifiers {:?}", other),
        }
    }

    #[test]
    fn test_rupture_optional() {
        let without = snapshot_for(RevealingStrikeUsage::Always, false, false);
        assert_eq!(without.attacks.total(Ability::Rupture), 0.0);
        assert_eq!(without.attacks.total(Ability::RuptureTicks), 0.0);

        let with = snapshot_for(RevealingStrikeUsage::Always, false, true);
        assert!(with.attacks.total(Ability::RuptureTicks) > 0.0);
        assert!(without.attacks.total(Ability::Eviscerate) > with.attacks.total(Ability::Eviscerate));
    }

    #[test]
    fn test_main_gauche_and_poisons_present() {
        let snapshot = snapshot_for(RevealingStrikeUsage::Always, true, true);
        assert!(snapshot.attacks.total(Ability::MainGauche) > 0.0);
        assert!(snapshot.attacks.total(Ability::InstantPoison) > 0.0);
        assert!(snapshot.attacks.total(Ability::MhKillingSpree) > 0.0);
    }

    #[test]
    fn test_default_cycle_is_combat() {
        assert_eq!(Cycle::combat().spec(), Spec::Combat);
    }
}
