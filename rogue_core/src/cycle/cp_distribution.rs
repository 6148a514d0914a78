//! Combo-point distribution of a builder sequence ending in a finisher

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Combo points are capped at this value
pub const MAX_COMBO_POINTS: u8 = 5;

/// Probability mass keyed by (combo points reached, builder actions used)
pub type CpDistribution = BTreeMap<(u8, u32), f64>;

/// Distribution over (combo points, actions) needed to reach `target` combo
/// points, given the combo points one builder grants.
///
/// `per_move` pairs a combo-point gain with its probability.
/// `bonus_cp_chance` is the chance of starting with one free combo point
/// (Ruthlessness). Entries with zero mass are never stored.
pub fn cp_distribution_for_cycle(
    per_move: &[(u8, f64)],
    target: u8,
    bonus_cp_chance: f64,
) -> CpDistribution {
    let mut current = CpDistribution::new();
    add_mass(&mut current, (0, 0), 1.0 - bonus_cp_chance);
    add_mass(&mut current, (1, 0), bonus_cp_chance);

    for threshold in 1..=target.min(MAX_COMBO_POINTS) {
        let mut next = CpDistribution::new();
        for (&(cps, moves), &prob) in &current {
            if cps >= threshold {
                add_mass(&mut next, (cps, moves), prob);
                continue;
            }
            for &(gain, move_prob) in per_move {
                let total = cps.saturating_add(gain).min(MAX_COMBO_POINTS);
                add_mass(&mut next, (total, moves + 1), move_prob * prob);
            }
        }
        current = next;
    }

    current
}

fn add_mass(dist: &mut CpDistribution, key: (u8, u32), prob: f64) {
    if prob != 0.0 {
        *dist.entry(key).or_insert(0.0) += prob;
    }
}

/// Expected shape of one finisher's build-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinisherProfile {
    /// Builder actions spent per finisher
    pub actions_per_finisher: f64,
    /// Combo points consumed per finisher
    pub cp_per_finisher: f64,
    /// Probability of finishing at each size, indexed by combo points
    pub size_breakdown: [f64; 6],
}

impl FinisherProfile {
    pub fn from_distribution(dist: &CpDistribution) -> Self {
        let mut profile = FinisherProfile {
            actions_per_finisher: 0.0,
            cp_per_finisher: 0.0,
            size_breakdown: [0.0; 6],
        };
        for (&(cps, moves), &prob) in dist {
            profile.actions_per_finisher += moves as f64 * prob;
            profile.cp_per_finisher += cps as f64 * prob;
            profile.size_breakdown[cps as usize] += prob;
        }
        profile
    }

    /// Per-size rates for a finisher cast `per_second` times a second
    pub fn rates(&self, per_second: f64) -> [f64; 6] {
        self.size_breakdown.map(|p| p * per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn total_mass(dist: &CpDistribution) -> f64 {
        dist.values().sum()
    }

    #[test]
    fn test_deterministic_collapse() {
        let dist = cp_distribution_for_cycle(&[(1, 1.0)], 3, 0.0);
        assert_eq!(dist.len(), 1);
        assert!((dist[&(3, 3)] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_capped_at_five() {
        let dist = cp_distribution_for_cycle(&[(3, 1.0)], 5, 0.0);
        assert_eq!(dist.len(), 1);
        assert!((dist[&(5, 2)] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ruthlessness_seed() {
        // a free point 60% of the time with 1 cp builders
        let dist = cp_distribution_for_cycle(&[(1, 1.0)], 2, 0.6);
        assert!((dist[&(2, 1)] - 0.6).abs() < 1e-12);
        assert!((dist[&(2, 2)] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_mutilate_profile() {
        // Mutilate grants 2, or 3 with a Seal Fate proc
        let dist = cp_distribution_for_cycle(&[(2, 0.7), (3, 0.3)], 4, 0.0);
        let profile = FinisherProfile::from_distribution(&dist);
        // 2+2, 2+3, 3+2 and 3+3 (capped) all need two Mutilates
        assert!((profile.actions_per_finisher - 2.0).abs() < 1e-12);
        assert!((profile.size_breakdown[4] - 0.49).abs() < 1e-12);
        assert!((profile.size_breakdown[5] - 0.51).abs() < 1e-12);
        assert!((profile.cp_per_finisher - (4.0 * 0.49 + 5.0 * 0.51)).abs() < 1e-12);
    }

    #[test]
    fn test_profile_rates() {
        let dist = cp_distribution_for_cycle(&[(1, 1.0)], 5, 0.0);
        let rates = FinisherProfile::from_distribution(&dist).rates(0.25);
        assert_eq!(rates, [0.0, 0.0, 0.0, 0.0, 0.0, 0.25]);
    }

    proptest! {
        #[test]
        fn mass_is_conserved(
            weights in prop::collection::vec(0.01f64..1.0, 3),
            target in 1u8..=5,
            bonus in 0.0f64..=1.0,
        ) {
            let sum: f64 = weights.iter().sum();
            let per_move: Vec<(u8, f64)> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (i as u8 + 1, w / sum))
                .collect();
            let dist = cp_distribution_for_cycle(&per_move, target, bonus);
            prop_assert!((total_mass(&dist) - 1.0).abs() < 1e-9);
            for &(cps, _) in dist.keys() {
                prop_assert!(cps <= MAX_COMBO_POINTS);
            }
        }

        #[test]
        fn finishers_reach_target(
            p in 0.0f64..=1.0,
            target in 1u8..=5,
        ) {
            let dist = cp_distribution_for_cycle(&[(1, 1.0 - p), (2, p)], target, 0.0);
            for &(cps, moves) in dist.keys() {
                prop_assert!(cps >= target);
                prop_assert!(moves >= 1);
            }
        }
    }
}
