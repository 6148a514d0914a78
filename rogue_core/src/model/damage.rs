//! Per-ability (hit, crit) damage at level 85

use super::{DamageKind, RogueModel};
use crate::build::{Talent, WeaponKind};
use crate::types::{Hand, Spec};

/// Talent bonuses with 7/14/20% steps
const TIERED_BONUS: [f64; 4] = [0.0, 0.07, 0.14, 0.20];

/// Rupture damage per tick by combo points: (base, AP coefficient)
const RUPTURE_TICKS: [(f64, f64); 6] = [
    (0.0, 0.0),
    (142.0, 0.015),
    (209.0, 0.024),
    (276.0, 0.03),
    (343.0, 0.034_285_71),
    (410.0, 0.0375),
];

/// Damage formulas evaluated at one attack power and mastery
pub struct DamageModel<'m, 'a> {
    model: &'m RogueModel<'a>,
    ap: f64,
    mastery: f64,
    /// Extra multiplier while a bleed is up on the target (Sanguinary Vein)
    bleeding_multiplier: f64,
}

impl<'m, 'a> DamageModel<'m, 'a> {
    pub fn new(model: &'m RogueModel<'a>, ap: f64, mastery_rating: f64, target_bleeding: bool) -> Self {
        let bleeding_multiplier = if target_bleeding {
            1.0 + 0.08 * model.talent(Talent::SanguinaryVein)
        } else {
            1.0
        };
        DamageModel {
            model,
            ap,
            mastery: model.mastery_points(mastery_rating),
            bleeding_multiplier,
        }
    }

    pub fn ap(&self) -> f64 {
        self.ap
    }

    fn tiered(&self, talent: Talent) -> f64 {
        TIERED_BONUS[self.model.build.talents.rank(talent).min(3) as usize]
    }

    fn lethality(&self) -> f64 {
        0.1 * self.model.talent(Talent::Lethality)
    }

    /// Wrap a pre-modifier hit into a (hit, crit) pair
    fn pair(&self, raw: f64, kind: DamageKind, crit_bonus: f64) -> (f64, f64) {
        let mut hit = raw * self.model.raid_settings_modifier(kind);
        if kind != DamageKind::Bleed {
            hit *= self.bleeding_multiplier;
        }
        (hit, hit * self.model.crit_damage_modifier(kind, crit_bonus))
    }

    fn weapon_damage(&self, hand: Hand) -> f64 {
        let weapon = self.model.build.stats.weapon(hand);
        weapon.damage + weapon.speed * self.ap / 14.0
    }

    fn normalized_damage(&self, hand: Hand) -> f64 {
        let weapon = self.model.build.stats.weapon(hand);
        weapon.damage + weapon.kind.normalization_speed() * self.ap / 14.0
    }

    /// Off-hand penalty, reduced by Ambidexterity for Combat
    fn off_hand_multiplier(&self) -> f64 {
        if self.model.spec == Spec::Combat {
            0.875
        } else {
            0.5
        }
    }

    /// Mastery bonus to poisons and Envenom (Potent Poisons)
    fn potent_poisons(&self) -> f64 {
        if self.model.spec == Spec::Assassination {
            1.0 + 0.035 * self.mastery
        } else {
            1.0
        }
    }

    fn poison_multiplier(&self) -> f64 {
        (1.0 + self.tiered(Talent::VilePoisons)) * self.potent_poisons()
    }

    pub fn mh_damage(&self) -> (f64, f64) {
        self.pair(self.weapon_damage(Hand::MainHand), DamageKind::Physical, 0.0)
    }

    pub fn oh_damage(&self) -> (f64, f64) {
        let raw = self.weapon_damage(Hand::OffHand) * self.off_hand_multiplier();
        self.pair(raw, DamageKind::Physical, 0.0)
    }

    fn mutilate_hand(&self, hand: Hand) -> (f64, f64) {
        let raw = (1.5 * self.weapon_damage(hand) + 201.0)
            * (1.0 + 0.1 * self.model.talent(Talent::Opportunity));
        self.pair(raw, DamageKind::Physical, self.lethality())
    }

    pub fn mh_mutilate_damage(&self) -> (f64, f64) {
        self.mutilate_hand(Hand::MainHand)
    }

    pub fn oh_mutilate_damage(&self) -> (f64, f64) {
        self.mutilate_hand(Hand::OffHand)
    }

    pub fn backstab_damage(&self) -> (f64, f64) {
        let raw = (2.0 * self.weapon_damage(Hand::MainHand) + 345.0)
            * (1.0 + self.tiered(Talent::Aggression))
            * (1.0 + 0.1 * self.model.talent(Talent::Opportunity));
        self.pair(raw, DamageKind::Physical, self.lethality())
    }

    pub fn sinister_strike_damage(&self) -> (f64, f64) {
        let raw = (self.normalized_damage(Hand::MainHand) + 200.0)
            * (1.0 + self.tiered(Talent::Aggression))
            * (1.0 + 0.1 * self.model.talent(Talent::ImprovedSinisterStrike));
        self.pair(raw, DamageKind::Physical, self.lethality())
    }

    pub fn revealing_strike_damage(&self) -> (f64, f64) {
        let raw = 1.25 * self.weapon_damage(Hand::MainHand);
        self.pair(raw, DamageKind::Physical, self.lethality())
    }

    pub fn hemorrhage_damage(&self) -> (f64, f64) {
        let percent = if self.model.build.stats.mh.kind == WeaponKind::Dagger {
            2.175
        } else {
            1.5
        };
        let raw = percent * self.normalized_damage(Hand::MainHand);
        self.pair(raw, DamageKind::Physical, self.lethality())
    }

    pub fn ambush_damage(&self) -> (f64, f64) {
        let dagger = if self.model.build.stats.mh.kind == WeaponKind::Dagger {
            1.447
        } else {
            1.0
        };
        let raw = (1.9 * self.normalized_damage(Hand::MainHand) + 367.0)
            * dagger
            * (1.0 + 0.05 * self.model.talent(Talent::ImprovedAmbush))
            * (1.0 + 0.1 * self.model.talent(Talent::Opportunity));
        self.pair(raw, DamageKind::Physical, self.lethality())
    }

    pub fn main_gauche_damage(&self) -> (f64, f64) {
        self.pair(self.weapon_damage(Hand::OffHand), DamageKind::Physical, 0.0)
    }

    pub fn mh_killing_spree_damage(&self) -> (f64, f64) {
        self.pair(self.weapon_damage(Hand::MainHand), DamageKind::Physical, 0.0)
    }

    pub fn oh_killing_spree_damage(&self) -> (f64, f64) {
        let raw = self.weapon_damage(Hand::OffHand) * self.off_hand_multiplier();
        self.pair(raw, DamageKind::Physical, 0.0)
    }

    pub fn rupture_tick_damage(&self, cp: usize) -> (f64, f64) {
        let (base, coefficient) = RUPTURE_TICKS[cp.min(5)];
        self.pair(base + coefficient * self.ap, DamageKind::Bleed, 0.0)
    }

    pub fn eviscerate_damage(&self, cp: usize) -> (f64, f64) {
        let cp = cp as f64;
        let raw = (254.0 + 370.0 * cp + 0.091 * cp * self.ap)
            * (1.0 + self.tiered(Talent::Aggression))
            * (1.0 + self.tiered(Talent::CoupDeGrace));
        self.pair(raw, DamageKind::Physical, 0.0)
    }

    pub fn envenom_damage(&self, cp: usize) -> (f64, f64) {
        let cp = cp as f64;
        let raw = (241.0 * cp + 0.09 * cp * self.ap)
            * (1.0 + self.tiered(Talent::CoupDeGrace))
            * self.poison_multiplier();
        let (hit, _) = self.pair(raw, DamageKind::Spell, 0.0);
        // nature damage, melee crit multiplier
        (hit, hit * self.model.crit_damage_modifier(DamageKind::Physical, 0.0))
    }

    pub fn venomous_wounds_damage(&self) -> (f64, f64) {
        let raw = (675.0 + 0.176 * self.ap) * self.potent_poisons();
        self.pair(raw, DamageKind::Spell, 0.0)
    }

    pub fn instant_poison_damage(&self) -> (f64, f64) {
        let raw = (309.0 + 0.09 * self.ap) * self.poison_multiplier();
        self.pair(raw, DamageKind::Spell, 0.0)
    }

    /// One tick of a full five-stack Deadly Poison
    pub fn deadly_poison_tick_damage(&self) -> (f64, f64) {
        let raw = 5.0 * (135.0 + 0.027 * self.ap) * self.poison_multiplier();
        self.pair(raw, DamageKind::Spell, 0.0)
    }

    pub fn wound_poison_damage(&self) -> (f64, f64) {
        let raw = (231.0 + 0.036 * self.ap) * self.poison_multiplier();
        self.pair(raw, DamageKind::Spell, 0.0)
    }

    /// Goblin Rocket Barrage hit
    pub fn rocket_barrage_damage(&self) -> (f64, f64) {
        let build = self.model.build;
        let raw = build.race.rocket_barrage_damage(self.ap, build.level);
        self.pair(raw, DamageKind::Spell, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{
        Build, Buffs, Cycle, GearBuffs, Race, RogueGlyphs, RogueTalents, Settings, Stats, Weapon,
    };
    use crate::config::GameConstants;
    use crate::procs::ProcsList;

    fn build(talents: RogueTalents) -> Build {
        Build {
            stats: Stats {
                str: 0.0,
                agi: 0.0,
                ap: 0.0,
                crit: 0.0,
                hit: 0.0,
                exp: 0.0,
                haste: 0.0,
                mastery: 0.0,
                mh: Weapon::new(1000.0, 1.8, WeaponKind::Dagger),
                oh: Weapon::new(700.0, 1.4, WeaponKind::Dagger),
                ranged: Weapon::new(1371.5, 2.2, WeaponKind::Thrown),
                procs: ProcsList::default(),
                gear_buffs: GearBuffs::default(),
            },
            talents,
            glyphs: RogueGlyphs::default(),
            buffs: Buffs::default(),
            race: Race::Human,
            settings: Settings::new(Cycle::subtlety()),
            level: 85,
        }
    }

    #[test]
    fn test_off_hand_penalty() {
        let build = build(RogueTalents::default());
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Subtlety);
        let damage = DamageModel::new(&model, 0.0, 0.0, false);
        let (mh, mh_crit) = damage.mh_damage();
        let (oh, _) = damage.oh_damage();
        assert!((mh_crit / mh - 2.0).abs() < 1e-12);
        assert!((oh / mh - 0.5 * 700.0 / 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_finishers_scale_with_combo_points() {
        let build = build(RogueTalents::default());
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Subtlety);
        let damage = DamageModel::new(&model, 10000.0, 0.0, false);
        for cp in 1..5 {
            assert!(damage.eviscerate_damage(cp + 1).0 > damage.eviscerate_damage(cp).0);
            assert!(damage.rupture_tick_damage(cp + 1).0 > damage.rupture_tick_damage(cp).0);
        }
    }

    #[test]
    fn test_sanguinary_vein_skips_bleeds() {
        let talents = RogueTalents::new("", "", "000000000000000200").unwrap();
        let build = build(talents);
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Subtlety);
        let plain = DamageModel::new(&model, 5000.0, 0.0, false);
        let bleeding = DamageModel::new(&model, 5000.0, 0.0, true);
        assert!((bleeding.backstab_damage().0 / plain.backstab_damage().0 - 1.16).abs() < 1e-12);
        assert_eq!(bleeding.rupture_tick_damage(5), plain.rupture_tick_damage(5));
    }

    #[test]
    fn test_potent_poisons_only_for_assassination() {
        let build = build(RogueTalents::default());
        let constants = GameConstants::default();
        let assassination = RogueModel::new(&build, &constants, Spec::Assassination);
        let subtlety = RogueModel::new(&build, &constants, Spec::Subtlety);
        let a = DamageModel::new(&assassination, 5000.0, 0.0, false);
        let s = DamageModel::new(&subtlety, 5000.0, 0.0, false);
        // 8 base mastery points at 3.5% each, plus Assassin's Resolve
        let ratio = a.instant_poison_damage().0 / s.instant_poison_damage().0;
        assert!((ratio - 1.28 * 1.2).abs() < 1e-9);
    }
}
