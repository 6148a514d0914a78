//! Fixed-point iteration between proc uptimes and cycle rates

use super::breakdown::{damage_breakdown, DamageBreakdown};
use crate::cycle::{CycleModel, CycleModifiers, CycleSnapshot};
use crate::error::{DpsError, Locale, Unmodeled};
use crate::model::RogueModel;
use crate::procs::{icd_limited_rate, procs_per_second, uptime, ProcDef, ProcEffect, ProcState};
use crate::types::{Ability, Hand, StatKey};
use tracing::{debug, trace};

/// Largest element-wise change between passes that counts as converged
pub const PRECISION_REQUIRED: f64 = 1e-7;

/// Passes allowed before giving up
pub const MAX_PASSES: usize = 100;

/// Converged damage plus the cycle multipliers of the final evaluation
#[derive(Debug, Clone)]
pub struct Converged {
    pub breakdown: DamageBreakdown,
    pub modifiers: CycleModifiers,
}

/// Procs of one build, split by how they feed back into the model
struct ActiveProcs<'a> {
    stat_procs: Vec<ProcState<'a>>,
    damage_procs: Vec<&'a ProcDef>,
    finisher_crit: Option<&'a ProcDef>,
    autoattack_bonus: Option<&'a ProcDef>,
}

impl<'a> ActiveProcs<'a> {
    fn collect(model: &'a RogueModel<'_>, enchants: &'a [ProcDef]) -> Self {
        let procs = &model.build.stats.procs;
        let stat_procs = procs
            .iter()
            .chain(enchants.iter())
            .filter(|def| def.effect.stat().is_some())
            .map(ProcState::new)
            .collect();
        let damage_procs = procs.iter().filter(|def| def.effect.is_damage()).collect();
        ActiveProcs {
            stat_procs,
            damage_procs,
            finisher_crit: procs.by_effect(ProcEffect::FinisherCrit),
            autoattack_bonus: procs.by_effect(ProcEffect::AutoattackDamage),
        }
    }
}

/// Weapon enchant procs, each restricted to its own hand
fn enchant_procs(model: &RogueModel<'_>) -> Vec<ProcDef> {
    [Hand::MainHand, Hand::OffHand]
        .into_iter()
        .filter_map(|hand| {
            model
                .build
                .stats
                .weapon(hand)
                .enchant
                .map(|enchant| enchant.proc_def(hand))
        })
        .collect()
}

struct Converger<'m, 'a, 'c> {
    model: &'m RogueModel<'a>,
    cycle: &'c dyn CycleModel,
}

impl Converger<'_, '_, '_> {
    fn procs_per_second(&self, def: &ProcDef, snapshot: &CycleSnapshot) -> Result<f64, Unmodeled> {
        procs_per_second(
            def,
            &snapshot.attacks,
            &snapshot.crits,
            self.model.weapon_speed(Hand::MainHand),
            self.model.weapon_speed(Hand::OffHand),
        )
    }

    /// Hit rate of a damage proc; ICD procs are capped by their cooldown
    fn damage_proc_rate(&self, def: &ProcDef, snapshot: &CycleSnapshot) -> Result<f64, Unmodeled> {
        let mut rate = self.procs_per_second(def, snapshot)?;
        if let Some(icd) = def.active_icd() {
            rate = icd_limited_rate(icd, rate);
        }
        let landed = match def.effect {
            ProcEffect::SpellDamage => self.model.spell_hit_chance(),
            _ => self.model.strike_hit_chance,
        };
        Ok(rate * landed)
    }

    fn update_damage_procs(
        &self,
        procs: &ActiveProcs<'_>,
        snapshot: &mut CycleSnapshot,
        include_icd: bool,
    ) -> Result<(), Unmodeled> {
        for def in &procs.damage_procs {
            if def.active_icd().is_some() && !include_icd {
                continue;
            }
            let rate = self.damage_proc_rate(def, snapshot)?;
            snapshot.attacks.set_proc_rate(&def.name, rate);
        }
        Ok(())
    }

    /// Chance of a free finisher crit from the T11 four-piece bonus
    fn update_finisher_crit(
        &self,
        procs: &ActiveProcs<'_>,
        snapshot: &mut CycleSnapshot,
    ) -> Result<(), Unmodeled> {
        let def = match procs.finisher_crit {
            Some(def) => def,
            None => return Ok(()),
        };

        let mut finisher = None;
        for ability in Ability::direct_finishers() {
            if snapshot.attacks.total(*ability) != 0.0 {
                if finisher.is_some() {
                    return Err(Unmodeled::T11WithBothFinishers);
                }
                finisher = Some(*ability);
            }
        }
        let finisher = match finisher {
            Some(ability) => ability,
            None => return Ok(()),
        };

        let procs_per_second = self.procs_per_second(def, snapshot)?;
        let spacing = (1.0 / snapshot.attacks.total(finisher)).min(def.duration);
        let p = 1.0 - (1.0 - procs_per_second).powf(spacing);
        let crit = snapshot.crits.get(finisher);
        snapshot.crits.set(finisher, p + (1.0 - p) * crit);
        Ok(())
    }

    fn run(&self) -> Result<Converged, ConvergeError> {
        let model = self.model;
        let enchants = enchant_procs(model);
        let mut procs = ActiveProcs::collect(model, &enchants);

        let mut stats = model.seed_stats();
        let mut snapshot = self.cycle.attack_counts(&stats);

        let mut passes = 0;
        loop {
            if passes == MAX_PASSES {
                return Err(ConvergeError::NotConverged(passes));
            }
            passes += 1;

            stats = model.base_stats;
            self.update_finisher_crit(&procs, &mut snapshot)?;
            self.update_damage_procs(&procs, &mut snapshot, false)?;
            for state in procs.stat_procs.iter_mut() {
                if state.def.active_icd().is_some() {
                    continue;
                }
                state.uptime = uptime(state.def, self.procs_per_second(state.def, &snapshot)?);
                if let Some(stat) = state.def.effect.stat() {
                    stats.add(stat, state.expected_value());
                }
            }
            stats.agi *= model.agi_multiplier;

            let previous = snapshot;
            snapshot = self.cycle.attack_counts(&stats);
            let delta = snapshot.attacks.max_delta(&previous.attacks);
            trace!(pass = passes, delta, "Convergence pass");
            if delta <= PRECISION_REQUIRED {
                debug!(passes, "Proc uptimes converged");
                break;
            }
        }

        // ICD procs are resolved once against the converged rates
        for state in procs.stat_procs.iter_mut() {
            if state.def.active_icd().is_none() {
                continue;
            }
            state.uptime = uptime(state.def, self.procs_per_second(state.def, &snapshot)?);
            if let Some(stat) = state.def.effect.stat() {
                let mut value = state.expected_value();
                if stat == StatKey::Agi {
                    value *= model.agi_multiplier;
                }
                stats.add(stat, value);
            }
        }

        let mut snapshot = self.cycle.attack_counts(&stats);
        self.update_finisher_crit(&procs, &mut snapshot)?;
        self.update_damage_procs(&procs, &mut snapshot, true)?;

        let mut breakdown = damage_breakdown(model, &stats, &snapshot, &procs.damage_procs);
        if let Some(def) = procs.autoattack_bonus {
            let bonus_uptime = uptime(def, self.procs_per_second(def, &snapshot)?);
            breakdown.scale("autoattack", 1.0 + def.value * bonus_uptime);
        }
        Ok(Converged {
            breakdown,
            modifiers: snapshot.modifiers,
        })
    }
}

enum ConvergeError {
    Unmodeled(Unmodeled),
    NotConverged(usize),
}

impl From<Unmodeled> for ConvergeError {
    fn from(reason: Unmodeled) -> Self {
        ConvergeError::Unmodeled(reason)
    }
}

/// Converged stats and rates for one cycle, assembled into a breakdown
pub fn compute_damage(
    model: &RogueModel<'_>,
    cycle: &dyn CycleModel,
    locale: &dyn Locale,
) -> Result<Converged, DpsError> {
    Converger { model, cycle }.run().map_err(|err| match err {
        ConvergeError::Unmodeled(reason) => DpsError::not_modeled(reason, locale),
        ConvergeError::NotConverged(iterations) => DpsError::ConvergenceFailure { iterations },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_catalog, GameConstants};
    use crate::cycle::{AssassinationCycle, AssassinationPhase, AttackRateTable};
    use crate::error::English;
    use crate::procs::{ProcRate, ProcsList, TriggerSources};
    use crate::testing::assassination_build;
    use crate::types::{EffectiveStats, Spec};

    /// Autoattacks stop whenever agility is above the threshold
    struct Flip {
        threshold: f64,
    }

    impl CycleModel for Flip {
        fn attack_counts(&self, stats: &EffectiveStats) -> CycleSnapshot {
            let mut attacks = AttackRateTable::new();
            let rate = if stats.agi > self.threshold { 0.0 } else { 2.0 };
            attacks.set(Ability::MhAutoattackHits, rate);
            CycleSnapshot {
                attacks,
                ..Default::default()
            }
        }
    }

    /// Uses both direct-damage finishers
    struct BothFinishers;

    impl CycleModel for BothFinishers {
        fn attack_counts(&self, _stats: &EffectiveStats) -> CycleSnapshot {
            let mut attacks = AttackRateTable::new();
            attacks.set(Ability::MhAutoattackHits, 1.0);
            attacks.set_per_cp(Ability::Envenom, [0.0, 0.0, 0.0, 0.0, 0.1, 0.0]);
            attacks.set_per_cp(Ability::Eviscerate, [0.0, 0.0, 0.0, 0.0, 0.0, 0.1]);
            CycleSnapshot {
                attacks,
                ..Default::default()
            }
        }
    }

    fn agility_proc() -> ProcDef {
        ProcDef {
            name: "flip".to_string(),
            effect: ProcEffect::Agi,
            value: 1000.0,
            duration: 10.0,
            max_stacks: 1,
            icd: None,
            rate: ProcRate::Chance(1.0),
            triggers: TriggerSources::melee(),
            hand: None,
        }
    }

    #[test]
    fn test_assassination_converges() {
        let build = assassination_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let cycle = AssassinationCycle::new(&model, AssassinationPhase::Mutilate, 4);

        let first = compute_damage(&model, &cycle, &English).unwrap();
        let second = compute_damage(&model, &cycle, &English).unwrap();
        assert!(first.breakdown.total() > 0.0);
        assert!((first.breakdown.total() - second.breakdown.total()).abs() < 1e-7);
        assert_eq!(first.modifiers, CycleModifiers::None);
    }

    #[test]
    fn test_oscillation_hits_pass_cap() {
        let mut build = assassination_build();
        build.stats.mh.enchant = None;
        build.stats.oh.enchant = None;
        build.stats.procs = ProcsList::new([agility_proc()]);
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let cycle = Flip {
            threshold: model.seed_stats().agi + 500.0,
        };

        let err = compute_damage(&model, &cycle, &English).unwrap_err();
        assert_eq!(err, DpsError::ConvergenceFailure { iterations: MAX_PASSES });
    }

    #[test]
    fn test_t11_with_both_finishers_rejected() {
        let mut build = assassination_build();
        build.stats.procs = ProcsList::from_names(&["rogue_t11_4pc"], default_catalog().unwrap()).unwrap();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);

        let err = compute_damage(&model, &BothFinishers, &English).unwrap_err();
        assert_eq!(err.reason(), Some(&Unmodeled::T11WithBothFinishers));
    }

    #[test]
    fn test_finisher_crit_raises_envenom_crit() {
        let build = assassination_build();
        let constants = GameConstants::default();
        let model = RogueModel::new(&build, &constants, Spec::Assassination);
        let cycle = AssassinationCycle::new(&model, AssassinationPhase::Mutilate, 4);
        let converger = Converger {
            model: &model,
            cycle: &cycle,
        };
        let enchants = enchant_procs(&model);
        let procs = ActiveProcs::collect(&model, &enchants);
        assert!(procs.finisher_crit.is_some());
        assert_eq!(procs.stat_procs.len(), 4);

        let mut snapshot = cycle.attack_counts(&model.seed_stats());
        let before = snapshot.crits.get(Ability::Envenom);
        converger.update_finisher_crit(&procs, &mut snapshot).unwrap();
        assert!(snapshot.crits.get(Ability::Envenom) > before);
    }
}
