//! Subtlety: Backstab and Eviscerate under Recuperate and Slice and Dice
//!
//! Honor Among Thieves feeds combo points from raid crits. Vanish,
//! Preparation and Shadow Dance open Ambush windows that also drive Find
//! Weakness uptime.

use super::{
    apply_poison_counts, AttackRateTable, CritRateTable, CycleModel, CycleModifiers, CycleSnapshot,
};
use crate::build::{Glyph, Talent};
use crate::model::RogueModel;
use crate::types::{Ability, EffectiveStats, Hand};

/// Backstab and Ambush cost reduction from Slaughter from the Shadows, by rank
const SLAUGHTER_COST_REDUCTION: [f64; 4] = [0.0, 7.0, 14.0, 20.0];

const RECUPERATE_DURATION: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct SubtletyCycle<'m, 'a> {
    model: &'m RogueModel<'a>,
    raid_crits_per_second: f64,
    clip_recuperate: bool,
    base_energy_regen: f64,
    base_backstab_energy_cost: f64,
    base_ambush_energy_cost: f64,
}

impl<'m, 'a> SubtletyCycle<'m, 'a> {
    pub fn new(model: &'m RogueModel<'a>, raid_crits_per_second: f64, clip_recuperate: bool) -> Self {
        let rank = model.build.talents.rank(Talent::SlaughterFromTheShadows) as usize;
        let reduction = SLAUGHTER_COST_REDUCTION[rank.min(SLAUGHTER_COST_REDUCTION.len() - 1)];
        let strike_cost = 48.0 + 12.0 / model.strike_hit_chance - reduction;
        SubtletyCycle {
            model,
            raid_crits_per_second,
            clip_recuperate,
            base_energy_regen: 10.0,
            base_backstab_energy_cost: strike_cost,
            base_ambush_energy_cost: strike_cost,
        }
    }

    /// Combo points per second from Honor Among Thieves
    fn hat_cp_gen(&self) -> f64 {
        let points = self.model.talent(Talent::HonorAmongThieves);
        if points <= 0.0 {
            return 0.0;
        }
        let triggers_per_second = self.raid_crits_per_second * points / 3.0;
        1.0 / (5.0 - points + 1.0 / triggers_per_second)
    }
}

impl CycleModel for SubtletyCycle<'_, '_> {
    fn attack_counts(&self, stats: &EffectiveStats) -> CycleSnapshot {
        let model = self.model;
        let response = model.response_time();
        let base_melee_crit = model.melee_crit_rate(stats.agi, stats.crit);
        let base_spell_crit = model.spell_crit_rate(stats.crit);
        let haste_multiplier = model.haste_multiplier(stats.haste);

        // Master of Subtlety's mastery raises the Slice and Dice haste bonus
        let mastery_snd_speed = 1.0 + 0.4 * (1.0 + 0.02 * model.mastery_points(stats.mastery));
        let attack_speed_multiplier =
            model.base_speed_multiplier * haste_multiplier * mastery_snd_speed / 1.4;

        let mh_autoattacks = attack_speed_multiplier / model.weapon_speed(Hand::MainHand);
        let oh_autoattacks = attack_speed_multiplier / model.weapon_speed(Hand::OffHand);
        let mh_autoattack_hits = mh_autoattacks * model.dual_wield_mh_hit_chance();
        let oh_autoattack_hits = oh_autoattacks * model.dual_wield_oh_hit_chance();

        let backstab_crit = (base_melee_crit
            + model.build.stats.gear_buffs.rogue_t11_2pc_crit_bonus()
            + 0.1 * model.talent(Talent::PuncturingWounds))
        .min(1.0);
        let ambush_crit = (base_melee_crit + 0.2 * model.talent(Talent::ImprovedAmbush)).min(1.0);

        let mut crits = CritRateTable::new();
        crits.set(Ability::MhAutoattacks, model.autoattack_crit_rate(Hand::MainHand, base_melee_crit));
        crits.set(Ability::OhAutoattacks, model.autoattack_crit_rate(Hand::OffHand, base_melee_crit));
        crits.set(
            Ability::Eviscerate,
            (base_melee_crit + 0.1 * model.glyph(Glyph::Eviscerate)).min(1.0),
        );
        crits.set(Ability::Backstab, backstab_crit);
        crits.set(Ability::Ambush, ambush_crit);
        crits.set(Ability::Hemorrhage, base_melee_crit);
        crits.set(Ability::RuptureTicks, base_melee_crit);
        crits.set(Ability::InstantPoison, base_spell_crit);
        crits.set(Ability::DeadlyPoison, base_spell_crit);
        crits.set(Ability::WoundPoison, base_spell_crit);

        let backstab_energy_cost =
            self.base_backstab_energy_cost - 5.0 * backstab_crit * model.glyph(Glyph::Backstab);
        let hat_cp_gen = self.hat_cp_gen();
        let relentless = model.relentless_strikes_per_cp;
        let ruthlessness = 0.2 * model.talent(Talent::Ruthlessness);
        let cp_per_eviscerate = 5.0 - ruthlessness;

        let energy_regen = self.base_energy_regen * haste_multiplier + model.bonus_energy_regen;
        let energy_regen_with_recuperate =
            energy_regen + model.talent(Talent::EnergeticRecovery) * 4.0 / 3.0;

        let backstab_time_during_recuperate = backstab_energy_cost / energy_regen_with_recuperate;
        let cp_per_backstab_during_recuperate = 1.0 + backstab_time_during_recuperate * hat_cp_gen;

        let eviscerate_net_energy_cost = model.base_eviscerate_energy_cost - 5.0 * relentless;
        let eviscerate_net_cp_cost = cp_per_eviscerate
            - eviscerate_net_energy_cost * hat_cp_gen / energy_regen_with_recuperate;

        let backstabs_per_eviscerate = eviscerate_net_cp_cost / cp_per_backstab_during_recuperate;
        let total_eviscerate_cost =
            eviscerate_net_energy_cost + backstabs_per_eviscerate * backstab_energy_cost;
        let total_eviscerate_duration = total_eviscerate_cost / energy_regen_with_recuperate;

        let (cycle_length, total_cycle_regen) = if self.clip_recuperate {
            let length = RECUPERATE_DURATION - 0.5 * total_eviscerate_duration;
            (length, length * energy_regen_with_recuperate)
        } else {
            let recuperate_net_energy_cost = 30.0 - 5.0 * relentless;
            let recuperate_net_cp_cost = recuperate_net_energy_cost * hat_cp_gen / energy_regen;
            let backstabs_under_previous = 0.5 * total_eviscerate_duration / backstab_energy_cost;
            let cp_under_previous = backstabs_under_previous * cp_per_backstab_during_recuperate;
            let cp_needed_outside = recuperate_net_cp_cost - cp_under_previous;
            let backstabs_after = cp_needed_outside / cp_per_backstab_during_recuperate;
            let energy_after = backstabs_after * backstab_energy_cost + recuperate_net_energy_cost;
            (
                RECUPERATE_DURATION + energy_after / energy_regen,
                RECUPERATE_DURATION * energy_regen_with_recuperate + energy_after,
            )
        };

        let snd_build_time = total_eviscerate_duration / 2.0;
        let snd_build_energy_for_backstabs =
            5.0 * relentless + energy_regen_with_recuperate * snd_build_time - 25.0;
        let backstabs_per_snd = snd_build_energy_for_backstabs / backstab_energy_cost;
        let hat_cp_per_snd = snd_build_time * hat_cp_gen;

        let snd_size = ruthlessness + hat_cp_per_snd + backstabs_per_snd;
        let snd_duration = model.snd_length(snd_size);
        let snd_per_cycle = cycle_length / snd_duration;

        let vanish_cooldown = 180.0 - 30.0 * model.talent(Talent::Elusiveness);
        let ambushes_from_vanish = 1.0 / (vanish_cooldown + response)
            + model.talent(Talent::Preparation) / (300.0 + response);
        let mut find_weakness_uptime = if model.has_talent(Talent::FindWeakness) {
            10.0 * ambushes_from_vanish
        } else {
            0.0
        };

        let premeditation = model.talent(Talent::Premeditation);
        let cp_per_ambush = 2.0 + 0.5 * model.talent(Talent::Initiative);

        let bonus_cp_per_cycle =
            (hat_cp_gen + ambushes_from_vanish * (cp_per_ambush + 2.0 * premeditation)) * cycle_length;
        let cp_used_on_buffs = 5.0 + snd_size * snd_per_cycle - (1.0 + snd_per_cycle) * ruthlessness;
        let bonus_eviscerates = (bonus_cp_per_cycle - cp_used_on_buffs) / cp_per_eviscerate;
        let energy_spent_on_bonus_finishers = 30.0 + 25.0 * snd_per_cycle + 35.0 * bonus_eviscerates
            - (5.0 + snd_size * snd_per_cycle + 5.0 * bonus_eviscerates) * relentless
            + cycle_length * ambushes_from_vanish * self.base_ambush_energy_cost;
        let energy_for_eviscerate_spam = total_cycle_regen - energy_spent_on_bonus_finishers;
        let total_cost_of_extra_eviscerate = cp_per_eviscerate * backstab_energy_cost
            + model.base_eviscerate_energy_cost
            - 5.0 * relentless;
        let extra_eviscerates_per_cycle = energy_for_eviscerate_spam / total_cost_of_extra_eviscerate;

        let mut backstabs = cp_per_eviscerate * extra_eviscerates_per_cycle / cycle_length;
        let mut eviscerates = (bonus_eviscerates + extra_eviscerates_per_cycle) / cycle_length;
        let mut ambushes = ambushes_from_vanish;

        let ambush_shadowstep_rate = if model.has_talent(Talent::ShadowDance) {
            let duration = 6.0 + 2.0 * model.glyph(Glyph::ShadowDance);
            let frequency = 1.0 / (60.0 + response);
            let eviscerate_energy = 35.0 - 5.0 * relentless;

            let dance_bonus_cp = duration * hat_cp_gen + 2.0 * premeditation;
            let dance_bonus_eviscerates = dance_bonus_cp / cp_per_eviscerate;
            let dance_available_energy = duration * energy_regen_with_recuperate
                - dance_bonus_eviscerates * eviscerate_energy;
            let dance_eviscerate_cost =
                cp_per_eviscerate / cp_per_ambush * self.base_ambush_energy_cost + eviscerate_energy;
            let dance_eviscerates = dance_available_energy / dance_eviscerate_cost;

            // The same window spent on the normal rotation
            let base_bonus_eviscerates = duration * hat_cp_gen / cp_per_eviscerate;
            let base_available_energy = duration * energy_regen_with_recuperate
                - base_bonus_eviscerates * eviscerate_energy;
            let base_eviscerates = base_available_energy / total_cost_of_extra_eviscerate;

            let extra_eviscerates =
                dance_eviscerates + dance_bonus_eviscerates - base_eviscerates - base_bonus_eviscerates;
            let extra_ambushes = cp_per_eviscerate / cp_per_ambush * dance_eviscerates;
            let replaced_backstabs = cp_per_eviscerate * base_eviscerates;

            backstabs -= replaced_backstabs * frequency;
            ambushes += extra_ambushes * frequency;
            eviscerates += extra_eviscerates * frequency;
            find_weakness_uptime += (10.0 + duration - response) * frequency;

            (frequency + ambushes_from_vanish) / (extra_ambushes + ambushes_from_vanish)
        } else {
            1.0
        };

        let mut attacks = AttackRateTable::new();
        attacks.set(Ability::MhAutoattacks, mh_autoattacks);
        attacks.set(Ability::OhAutoattacks, oh_autoattacks);
        attacks.set(Ability::MhAutoattackHits, mh_autoattack_hits);
        attacks.set(Ability::OhAutoattackHits, oh_autoattack_hits);
        attacks.set(Ability::Backstab, backstabs);
        attacks.set(Ability::Ambush, ambushes);
        attacks.set_per_cp(Ability::Eviscerate, [0.0, 0.0, 0.0, 0.0, 0.0, eviscerates]);
        // Rupture is kept up at five points for Sanguinary Vein
        attacks.set_per_cp(Ability::RuptureTicks, [0.0, 0.0, 0.0, 0.0, 0.0, 0.5]);

        let total_mh_hits = mh_autoattack_hits + backstabs + eviscerates + ambushes;
        apply_poison_counts(model, total_mh_hits, oh_autoattack_hits, &mut attacks);

        CycleSnapshot {
            attacks,
            crits,
            modifiers: CycleModifiers::Subtlety {
                find_weakness_uptime,
                ambush_shadowstep_rate,
            },
        }
    }
}
