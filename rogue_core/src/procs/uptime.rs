//! Steady-state uptime of procs and stacking buffs

use super::ProcDef;

/// Expected uptime (or expected stack count) of a proc firing at
/// `procs_per_second`
pub fn uptime(def: &ProcDef, procs_per_second: f64) -> f64 {
    if procs_per_second <= 0.0 || !procs_per_second.is_finite() {
        return 0.0;
    }

    if let Some(icd) = def.active_icd() {
        return def.duration / (icd + 1.0 / procs_per_second);
    }

    let max_stacks = def.max_stacks as f64;
    if procs_per_second >= 1.0 && def.duration >= 1.0 {
        return max_stacks;
    }

    let q = (1.0 - procs_per_second).clamp(0.0, 1.0);
    let big_q = q.powf(def.duration);
    if big_q <= 0.0 {
        return max_stacks;
    }
    let p = 1.0 - big_q;
    p * (1.0 - p.powf(max_stacks)) / big_q
}

/// Rate at which a proc with an ICD actually fires
pub fn icd_limited_rate(icd: f64, procs_per_second: f64) -> f64 {
    if procs_per_second <= 0.0 {
        return 0.0;
    }
    1.0 / (icd + 1.0 / procs_per_second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procs::{ProcEffect, ProcRate, TriggerSources};
    use proptest::prelude::*;

    fn proc_def(duration: f64, max_stacks: u32, icd: Option<f64>) -> ProcDef {
        ProcDef {
            name: "test".to_string(),
            effect: ProcEffect::Agi,
            value: 100.0,
            duration,
            max_stacks,
            icd,
            rate: ProcRate::Chance(1.0),
            triggers: TriggerSources::melee(),
            hand: None,
        }
    }

    #[test]
    fn test_icd_formula() {
        let def = proc_def(15.0, 1, Some(75.0));
        // one trigger every two seconds
        let up = uptime(&def, 0.5);
        assert!((up - 15.0 / 77.0).abs() < 1e-12);
    }

    #[test]
    fn test_saturates_at_max_stacks() {
        let def = proc_def(10.0, 5, None);
        assert_eq!(uptime(&def, 1.5), 5.0);
    }

    #[test]
    fn test_single_stack_fraction() {
        let def = proc_def(10.0, 1, None);
        let rate: f64 = 0.05;
        let expected = 1.0 - (1.0 - rate).powf(10.0);
        assert!((uptime(&def, rate) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate_has_no_uptime() {
        assert_eq!(uptime(&proc_def(10.0, 1, Some(45.0)), 0.0), 0.0);
        assert_eq!(uptime(&proc_def(10.0, 3, None), 0.0), 0.0);
    }

    #[test]
    fn test_sub_second_duration_at_high_rate() {
        let def = proc_def(0.5, 2, None);
        assert_eq!(uptime(&def, 1.0), 2.0);
    }

    #[test]
    fn test_icd_limited_rate() {
        assert!((icd_limited_rate(45.0, 0.2) - 1.0 / 50.0).abs() < 1e-12);
        assert_eq!(icd_limited_rate(45.0, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn icd_uptime_bounded(
            rate in 0.0f64..50.0,
            duration in 1.0f64..30.0,
            icd in 1.0f64..120.0,
        ) {
            let def = proc_def(duration, 1, Some(icd));
            let up = uptime(&def, rate);
            prop_assert!(up >= 0.0);
            prop_assert!(up <= duration / icd + 1e-12);
        }

        #[test]
        fn stacking_uptime_non_negative(
            rate in 0.0f64..2.0,
            duration in 0.1f64..30.0,
            stacks in 1u32..10,
        ) {
            let def = proc_def(duration, stacks, None);
            let up = uptime(&def, rate);
            prop_assert!(up >= 0.0);
            prop_assert!(up.is_finite());
        }
    }

    #[test]
    fn test_icd_uptime_approaches_ceiling() {
        let def = proc_def(20.0, 1, Some(60.0));
        let up = uptime(&def, 1e6);
        assert!((up - 20.0 / 60.0).abs() < 1e-5);
    }
}
