//! Per-source DPS from converged attack and crit rates

use crate::cycle::CycleSnapshot;
use crate::model::{DamageKind, DamageModel, RogueModel};
use crate::procs::{ProcDef, ProcEffect};
use crate::types::{Ability, EffectiveStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// DPS by damage source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageBreakdown {
    entries: BTreeMap<String, f64>,
}

impl DamageBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add DPS to a source, creating it when absent
    pub fn add(&mut self, source: impl Into<String>, dps: f64) {
        *self.entries.entry(source.into()).or_insert(0.0) += dps;
    }

    pub fn get(&self, source: &str) -> Option<f64> {
        self.entries.get(source).copied()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Multiply one source; no-op when absent
    pub fn scale(&mut self, source: &str, factor: f64) {
        if let Some(dps) = self.entries.get_mut(source) {
            *dps *= factor;
        }
    }

    /// Multiply every source by the factor `f` returns for it
    pub fn scale_each(&mut self, mut f: impl FnMut(&str) -> f64) {
        for (source, dps) in self.entries.iter_mut() {
            *dps *= f(source);
        }
    }

    /// Add `weight` times every source of `other`
    pub fn merge_weighted(&mut self, other: &DamageBreakdown, weight: f64) {
        for (source, dps) in &other.entries {
            self.add(source.clone(), dps * weight);
        }
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sources ordered from largest to smallest
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finisher (hit, crit) at one combo-point size
fn finisher_damage(damage: &DamageModel<'_, '_>, ability: Ability, cp: usize) -> (f64, f64) {
    match ability {
        Ability::Envenom => damage.envenom_damage(cp),
        Ability::Eviscerate => damage.eviscerate_damage(cp),
        _ => damage.rupture_tick_damage(cp),
    }
}

fn contribution((hit, crit): (f64, f64), crit_rate: f64, frequency: f64) -> f64 {
    (hit * (1.0 - crit_rate) + crit * crit_rate) * frequency
}

/// Autoattack DPS for one hand from the glance/hit/crit table
fn autoattack_dps(
    model: &RogueModel<'_>,
    (hit, crit): (f64, f64),
    connect: f64,
    crit_rate: f64,
    swings: f64,
) -> f64 {
    let table = &model.constants.combat_table;
    let hit_rate = connect - table.glance_rate - crit_rate;
    let average = table.glance_rate * table.glance_multiplier * hit + hit_rate * hit + crit_rate * crit;
    average * swings
}

/// Damage of a proc that deals damage directly
pub fn proc_damage_contribution(
    model: &RogueModel<'_>,
    def: &ProcDef,
    rate: f64,
    stats: &EffectiveStats,
) -> f64 {
    let (kind, crit_rate) = match def.effect {
        ProcEffect::SpellDamage => (DamageKind::Spell, model.spell_crit_rate(stats.crit)),
        ProcEffect::PhysicalDamage => (
            DamageKind::Physical,
            model.melee_crit_rate(stats.agi, stats.crit),
        ),
        _ => return 0.0,
    };
    let crit_multiplier = model.crit_damage_modifier(kind, 0.0);
    def.value * model.raid_settings_modifier(kind) * (1.0 + crit_rate * (crit_multiplier - 1.0)) * rate
}

/// Assemble the breakdown for converged stats and rates. Abilities with no
/// rate produce no entry; `autoattack` is always present.
pub fn damage_breakdown(
    model: &RogueModel<'_>,
    stats: &EffectiveStats,
    snapshot: &CycleSnapshot,
    damage_procs: &[&ProcDef],
) -> DamageBreakdown {
    let attacks = &snapshot.attacks;
    let crits = &snapshot.crits;
    let ap = model.average_ap(stats);
    let bleeding = attacks.total(Ability::RuptureTicks) > 0.0;
    let damage = DamageModel::new(model, ap, stats.mastery, bleeding);

    let mut breakdown = DamageBreakdown::new();

    let mh = autoattack_dps(
        model,
        damage.mh_damage(),
        model.dual_wield_mh_hit_chance(),
        crits.get(Ability::MhAutoattacks),
        attacks.total(Ability::MhAutoattacks),
    );
    let oh = autoattack_dps(
        model,
        damage.oh_damage(),
        model.dual_wield_oh_hit_chance(),
        crits.get(Ability::OhAutoattacks),
        attacks.total(Ability::OhAutoattacks),
    );
    breakdown.add("autoattack", mh + oh);

    let present = |ability: Ability| attacks.total(ability) > 0.0;
    let simple = |ability: Ability, pair: (f64, f64)| {
        contribution(pair, crits.get(ability), attacks.total(ability))
    };

    if present(Ability::Mutilate) {
        breakdown.add(
            "mutilate",
            simple(Ability::Mutilate, damage.mh_mutilate_damage())
                + simple(Ability::Mutilate, damage.oh_mutilate_damage()),
        );
    }
    let strikes = [
        (Ability::Hemorrhage, damage.hemorrhage_damage()),
        (Ability::Backstab, damage.backstab_damage()),
        (Ability::SinisterStrike, damage.sinister_strike_damage()),
        (Ability::RevealingStrike, damage.revealing_strike_damage()),
        (Ability::MainGauche, damage.main_gauche_damage()),
        (Ability::Ambush, damage.ambush_damage()),
    ];
    for (ability, pair) in strikes {
        if present(ability) {
            breakdown.add(ability.as_str(), simple(ability, pair));
        }
    }
    if present(Ability::MhKillingSpree) {
        breakdown.add(
            "killing_spree",
            simple(Ability::MhKillingSpree, damage.mh_killing_spree_damage())
                + simple(Ability::OhKillingSpree, damage.oh_killing_spree_damage()),
        );
    }

    for (ability, source) in [
        (Ability::RuptureTicks, "rupture"),
        (Ability::Envenom, "envenom"),
        (Ability::Eviscerate, "eviscerate"),
    ] {
        if !present(ability) {
            continue;
        }
        if let Some(per_cp) = attacks.per_cp(ability) {
            let crit_rate = crits.get(ability);
            let dps: f64 = (1..=5)
                .map(|cp| contribution(finisher_damage(&damage, ability, cp), crit_rate, per_cp[cp]))
                .sum();
            breakdown.add(source, dps);
        }
    }

    let spells = [
        (Ability::VenomousWounds, damage.venomous_wounds_damage()),
        (Ability::InstantPoison, damage.instant_poison_damage()),
        (Ability::DeadlyPoison, damage.deadly_poison_tick_damage()),
        (Ability::WoundPoison, damage.wound_poison_damage()),
    ];
    for (ability, pair) in spells {
        if present(ability) {
            breakdown.add(ability.as_str(), simple(ability, pair));
        }
    }

    for def in damage_procs {
        let rate = attacks.proc_rate(&def.name);
        breakdown.add(def.name.clone(), proc_damage_contribution(model, def, rate, stats));
    }

    if model.build.race.rocket_barrage() {
        let crit_rate = model.spell_crit_rate(stats.crit);
        let per_use = contribution(damage.rocket_barrage_damage(), crit_rate, 1.0);
        breakdown.add("rocket_barrage", per_use / (120.0 + model.response_time()));
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConstants;
    use crate::cycle::{AssassinationCycle, AssassinationPhase, CycleModel};
    use crate::testing::assassination_build;
    use crate::types::Spec;

    #[test]
    fn test_breakdown_sources() {
        let build = assassination_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let stats = model.seed_stats();
        let snapshot = AssassinationCycle::new(&model, AssassinationPhase::Mutilate, 4).attack_counts(&stats);

        let breakdown = damage_breakdown(&model, &stats, &snapshot, &[]);
        for source in ["autoattack", "mutilate", "rupture", "envenom", "venomous_wounds", "instant_poison", "deadly_poison"] {
            assert!(breakdown.get(source).unwrap() > 0.0, "{} missing", source);
        }
        assert!(!breakdown.contains("backstab"));
        assert!(!breakdown.contains("rocket_barrage"));
        let sum: f64 = breakdown.iter().map(|(_, dps)| dps).sum();
        assert!((breakdown.total() - sum).abs() < 1e-9);
    }

    #[test]
    fn test_merge_and_scale() {
        let mut a = DamageBreakdown::new();
        a.add("autoattack", 100.0);
        a.add("envenom", 50.0);
        let mut b = DamageBreakdown::new();
        b.add("autoattack", 200.0);
        b.add("backstab", 80.0);

        let mut blended = DamageBreakdown::new();
        blended.merge_weighted(&a, 0.75);
        blended.merge_weighted(&b, 0.25);
        assert!((blended.get("autoattack").unwrap() - 125.0).abs() < 1e-12);
        assert!((blended.get("backstab").unwrap() - 20.0).abs() < 1e-12);

        blended.scale("envenom", 2.0);
        assert!((blended.get("envenom").unwrap() - 75.0).abs() < 1e-12);
        assert_eq!(blended.sorted()[0].0, "autoattack");
    }

    #[test]
    fn test_serializes_as_map() {
        let mut breakdown = DamageBreakdown::new();
        breakdown.add("ambush", 1.5);
        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"{"ambush":1.5}"#);
    }
}
