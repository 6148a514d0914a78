//! Build-derived constants shared by every cycle model
//!
//! [`RogueModel`] is computed once per calculation from the build and the
//! game constants: base stats before procs, attack tables, energy
//! constants and raid modifiers. Cycles and the breakdown read it; nothing
//! mutates it after construction.

mod damage;

pub use damage::DamageModel;

use crate::build::{Build, Glyph, Talent};
use crate::config::GameConstants;
use crate::types::{EffectiveStats, Hand, Spec, StatKey};

/// Energy returned per combo point by Relentless Strikes, by rank
const RELENTLESS_STRIKES_ENERGY: [f64; 4] = [0.0, 1.75, 3.5, 5.0];

/// Which raid modifiers and crit multiplier apply to a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Physical,
    Bleed,
    Spell,
}

#[derive(Debug, Clone)]
pub struct RogueModel<'a> {
    pub build: &'a Build,
    pub constants: &'a GameConstants,
    pub spec: Spec,
    /// Stats before procs; agility not yet multiplied
    pub base_stats: EffectiveStats,
    pub agi_multiplier: f64,
    pub base_strength: f64,
    pub bonus_energy_regen: f64,
    pub relentless_strikes_per_cp: f64,
    pub base_speed_multiplier: f64,
    pub strike_hit_chance: f64,
    pub base_rupture_energy_cost: f64,
    pub base_eviscerate_energy_cost: f64,
}

impl<'a> RogueModel<'a> {
    pub fn new(build: &'a Build, constants: &'a GameConstants, spec: Spec) -> Self {
        let mut model = RogueModel {
            build,
            constants,
            spec,
            base_stats: EffectiveStats::default(),
            agi_multiplier: 1.0,
            base_strength: 0.0,
            bonus_energy_regen: 0.0,
            relentless_strikes_per_cp: 0.0,
            base_speed_multiplier: 1.0,
            strike_hit_chance: 1.0,
            base_rupture_energy_cost: 0.0,
            base_eviscerate_energy_cost: 0.0,
        };
        model.set_constants();
        model
    }

    fn set_constants(&mut self) {
        let build = self.build;
        let settings = &build.settings;
        let response = settings.response_time;

        if settings.tricks_on_cooldown && !build.glyphs.has(Glyph::TricksOfTheTrade) {
            self.bonus_energy_regen -= 15.0 / (30.0 + response);
        }
        if build.race.arcane_torrent() {
            self.bonus_energy_regen += 15.0 / (120.0 + response);
        }

        let stats = &build.stats;
        self.base_stats = EffectiveStats {
            agi: stats.agi + build.buffs.buff_agi() + build.race.racial_agi(),
            ap: stats.ap + 140.0,
            crit: stats.crit,
            haste: stats.haste,
            mastery: stats.mastery,
        };

        for boost in build.race.racial_stat_boosts() {
            self.base_stats.add(
                boost.stat,
                boost.value * boost.duration / (boost.cooldown + response),
            );
        }
        for stat in StatKey::all() {
            for boost in stats.gear_buffs.activated_boosts_for_stat(*stat) {
                let average = match boost.cooldown {
                    Some(cooldown) => boost.value * boost.duration / (cooldown + response),
                    None => boost.value * boost.duration / settings.duration,
                };
                self.base_stats.add(*stat, average);
            }
        }

        self.agi_multiplier =
            build.buffs.stat_multiplier() * stats.gear_buffs.leather_specialization_multiplier();
        if self.spec == Spec::Subtlety {
            // Sinister Calling
            self.agi_multiplier *= 1.25;
        }

        self.base_strength =
            (stats.str + build.buffs.buff_str() + build.race.racial_str()) * build.buffs.stat_multiplier();

        self.relentless_strikes_per_cp =
            RELENTLESS_STRIKES_ENERGY[build.talents.rank(Talent::RelentlessStrikes) as usize];

        self.base_speed_multiplier =
            1.4 * build.buffs.melee_haste_multiplier() * self.heroism_haste_multiplier();
        if build.race.berserking() {
            self.base_speed_multiplier *= 1.0 + 0.2 * 10.0 / (180.0 + response);
        }
        if build.race.time_is_money() {
            self.base_speed_multiplier *= 1.01;
        }

        self.strike_hit_chance = self.one_hand_melee_hit_chance();
        self.base_rupture_energy_cost = 20.0 + 5.0 / self.strike_hit_chance;
        self.base_eviscerate_energy_cost = 28.0 + 7.0 / self.strike_hit_chance;
    }

    /// Stats for the first cycle evaluation: base stats, agility multiplied
    pub fn seed_stats(&self) -> EffectiveStats {
        let mut stats = self.base_stats;
        stats.agi *= self.agi_multiplier;
        stats
    }

    pub fn response_time(&self) -> f64 {
        self.build.settings.response_time
    }

    pub fn talent(&self, talent: Talent) -> f64 {
        self.build.talents.points(talent)
    }

    pub fn has_talent(&self, talent: Talent) -> bool {
        self.build.talents.has(talent)
    }

    pub fn glyph(&self, glyph: Glyph) -> f64 {
        self.build.glyphs.flag(glyph)
    }

    pub fn haste_multiplier(&self, rating: f64) -> f64 {
        self.constants.ratings.haste_multiplier(rating)
    }

    pub fn mastery_points(&self, rating: f64) -> f64 {
        self.constants.ratings.mastery_points(rating)
    }

    pub fn weapon_speed(&self, hand: Hand) -> f64 {
        self.build.stats.weapon(hand).speed
    }

    fn melee_hit_bonus(&self) -> f64 {
        self.constants.ratings.melee_hit_chance(self.build.stats.hit)
            + 0.01 * self.talent(Talent::Precision)
    }

    fn dodge_chance(&self, hand: Hand) -> f64 {
        let weapon = self.build.stats.weapon(hand);
        let expertise = self.constants.ratings.expertise(self.build.stats.exp)
            + self.build.race.racial_expertise(weapon.kind);
        let table = &self.constants.combat_table;
        (table.dodge - expertise * table.dodge_per_expertise).max(0.0)
    }

    fn special_hit_chance(&self, hand: Hand) -> f64 {
        let miss = (self.constants.combat_table.melee_miss - self.melee_hit_bonus()).max(0.0);
        (1.0 - miss - self.dodge_chance(hand)).max(0.0)
    }

    /// Chance for a main-hand special attack to land
    pub fn one_hand_melee_hit_chance(&self) -> f64 {
        self.special_hit_chance(Hand::MainHand)
    }

    /// Chance for an off-hand special attack to land
    pub fn off_hand_melee_hit_chance(&self) -> f64 {
        self.special_hit_chance(Hand::OffHand)
    }

    fn dual_wield_hit_chance(&self, hand: Hand) -> f64 {
        let miss = (self.constants.combat_table.dual_wield_miss - self.melee_hit_bonus()).max(0.0);
        (1.0 - miss - self.dodge_chance(hand)).max(0.0)
    }

    /// Chance for a main-hand autoattack to connect (glancing included)
    pub fn dual_wield_mh_hit_chance(&self) -> f64 {
        self.dual_wield_hit_chance(Hand::MainHand)
    }

    pub fn dual_wield_oh_hit_chance(&self) -> f64 {
        self.dual_wield_hit_chance(Hand::OffHand)
    }

    /// Autoattack crit chance, limited by the one-roll attack table
    pub fn autoattack_crit_rate(&self, hand: Hand, melee_crit: f64) -> f64 {
        let connect = match hand {
            Hand::MainHand => self.dual_wield_mh_hit_chance(),
            Hand::OffHand => self.dual_wield_oh_hit_chance(),
        };
        melee_crit.min(connect - self.constants.combat_table.glance_rate)
    }

    pub fn spell_hit_chance(&self) -> f64 {
        let hit = self.constants.ratings.spell_hit_chance(self.build.stats.hit);
        1.0 - (self.constants.combat_table.spell_miss - hit).max(0.0)
    }

    /// Melee crit chance from (already multiplied) agility and crit rating
    pub fn melee_crit_rate(&self, agi: f64, crit: f64) -> f64 {
        let ratings = &self.constants.ratings;
        let rate = ratings.base_melee_crit
            + ratings.agi_crit_chance(agi)
            + ratings.crit_chance(crit)
            + self.build.buffs.crit_chance_bonus()
            + self.build.race.racial_crit_chance()
            - self.constants.combat_table.melee_crit_suppression;
        rate.clamp(0.0, 1.0)
    }

    pub fn spell_crit_rate(&self, crit: f64) -> f64 {
        let rate = self.constants.ratings.crit_chance(crit)
            + self.build.buffs.crit_chance_bonus()
            + self.build.buffs.spell_crit_debuff_bonus()
            + self.build.race.racial_crit_chance()
            - self.constants.combat_table.spell_crit_suppression;
        rate.clamp(0.0, 1.0)
    }

    /// Fraction of the fight covered by Heroism/Bloodlust
    pub fn heroism_uptime_per_fight(&self) -> f64 {
        if !self.build.buffs.has(crate::build::Buff::ShortTermHasteBuff) {
            return 0.0;
        }
        let duration = self.build.settings.duration;
        let mut total = 0.0;
        let mut remaining = duration;
        while remaining > 0.0 {
            total += remaining.min(40.0);
            remaining -= 600.0;
        }
        total / duration
    }

    pub fn heroism_haste_multiplier(&self) -> f64 {
        1.0 + 0.3 * self.heroism_uptime_per_fight()
    }

    /// Slice and Dice duration for a finisher of `size` combo points
    pub fn snd_length(&self, size: f64) -> f64 {
        let duration = 6.0 + 3.0 * size + 6.0 * self.glyph(Glyph::SliceAndDice);
        duration * (1.0 + 0.25 * self.talent(Talent::ImprovedSliceAndDice))
    }

    pub fn target_armor(&self) -> f64 {
        self.constants.target.armor * self.build.buffs.armor_reduction_multiplier()
    }

    pub fn armor_mitigation_multiplier(&self, armor: f64) -> f64 {
        self.constants.target.mitigation_multiplier(armor)
    }

    /// Assassin's Resolve
    fn spec_damage_multiplier(&self) -> f64 {
        if self.spec == Spec::Assassination && self.build.stats.mh.is_dagger() {
            1.2
        } else {
            1.0
        }
    }

    /// Raid buffs, target debuffs and armour for one damage kind
    pub fn raid_settings_modifier(&self, kind: DamageKind) -> f64 {
        let buffs = &self.build.buffs;
        let base = buffs.all_damage_multiplier() * self.spec_damage_multiplier();
        match kind {
            DamageKind::Physical => {
                base * buffs.physical_damage_multiplier()
                    * self.armor_mitigation_multiplier(self.target_armor())
            }
            DamageKind::Bleed => {
                base * buffs.physical_damage_multiplier() * buffs.bleed_damage_multiplier()
            }
            DamageKind::Spell => base * buffs.spell_damage_multiplier(),
        }
    }

    /// Crit damage multiplier; `bonus` scales the crit bonus (Lethality)
    pub fn crit_damage_modifier(&self, kind: DamageKind, bonus: f64) -> f64 {
        let table = &self.constants.combat_table;
        let base = match kind {
            DamageKind::Spell => table.spell_crit_multiplier,
            DamageKind::Physical | DamageKind::Bleed => table.physical_crit_multiplier,
        };
        let with_meta = base * self.build.stats.gear_buffs.metagem_crit_multiplier();
        1.0 + (with_meta - 1.0) * (1.0 + bonus)
    }

    /// Attack power used for damage, from converged stats
    pub fn average_ap(&self, stats: &EffectiveStats) -> f64 {
        let mut ap = stats.ap + 2.0 * stats.agi + self.base_strength;
        ap *= self.build.buffs.attack_power_multiplier();
        if self.spec == Spec::Combat {
            // Vitality
            ap *= 1.2;
        }
        ap * (1.0 + 0.01 * self.talent(Talent::SavageCombat))
    }
}
