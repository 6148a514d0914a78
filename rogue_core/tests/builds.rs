//! Integration test: load build file -> classify -> converge -> breakdown
//!
//! Drives the public API with the sample builds in the workspace `builds/`
//! directory.

use rogue_core::prelude::*;
use rogue_core::{parse_build, Unmodeled};
use std::path::PathBuf;

fn build_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("builds")
        .join(format!("{}.toml", name))
}

fn load(name: &str) -> Build {
    load_build(&build_path(name)).unwrap()
}

/// Helper to print a breakdown, largest source first
fn print_breakdown(title: &str, breakdown: &DamageBreakdown) {
    println!("\n  {}", title);
    for (source, dps) in breakdown.sorted() {
        println!("    {:<24} {:>10.1}", source, dps);
    }
    println!("    {:<24} {:>10.1}", "total", breakdown.total());
}

#[test]
fn test_sample_builds_are_additive() {
    for name in ["assassination", "combat", "subtlety"] {
        let build = load(name);
        let calculator = RogueDamageCalculator::new(&build);
        let breakdown = calculator.get_dps_breakdown().unwrap();
        let dps = calculator.get_dps().unwrap();
        print_breakdown(name, &breakdown);

        assert!(dps > 0.0, "{} produced no damage", name);
        assert!((breakdown.total() - dps).abs() <= 1e-6 * dps);
        assert!(breakdown.contains("autoattack"));
        for (source, value) in breakdown.iter() {
            assert!(value >= 0.0, "{} has negative {}", name, source);
        }
    }
}

#[test]
fn test_specialization_matches_file() {
    assert!(load("assassination").talents.is_assassination());
    assert!(load("combat").talents.is_combat());
    assert!(load("subtlety").talents.is_subtlety());
}

#[test]
fn test_repeated_calls_agree() {
    let build = load("combat");
    let calculator = RogueDamageCalculator::new(&build);
    let first = calculator.get_dps().unwrap();
    let second = calculator.get_dps().unwrap();
    assert!((first - second).abs() < 1e-7);

    // A clone evaluated on another thread gives the same answer
    let copy = build.clone();
    let threaded = std::thread::spawn(move || RogueDamageCalculator::new(&copy).get_dps().unwrap())
        .join()
        .unwrap();
    assert!((first - threaded).abs() < 1e-7);
}

#[test]
fn test_cycle_mismatch_rejected() {
    let mut build = load("combat");
    build.settings.cycle = Cycle::subtlety();
    let err = RogueDamageCalculator::new(&build).get_dps().unwrap_err();
    assert_eq!(err.reason(), Some(&Unmodeled::CycleMismatch { spec: Spec::Combat }));
    assert!(err.to_string().contains("combat cycle"));
}

#[test]
fn test_missing_specialization_rejected() {
    let mut build = load("subtlety");
    build.talents = RogueTalents::new("0230000000000000000", "0020000000000000000", "0332032321").unwrap();
    let err = RogueDamageCalculator::new(&build).get_dps_breakdown().unwrap_err();
    assert_eq!(err.reason(), Some(&Unmodeled::NoSpecialization));
}

#[test]
fn test_unknown_proc_in_build_file() {
    let content = std::fs::read_to_string(build_path("subtlety"))
        .unwrap()
        .replace("\"fluid_death\"", "\"mystery_trinket\"");
    assert!(parse_build(&content).is_err());
}

#[test]
fn test_ep_favours_agility_over_attack_power() {
    let build = load("subtlety");
    let ep = RogueDamageCalculator::new(&build).get_ep().unwrap();
    assert!(ep[&EpStat::Agi] > ep[&EpStat::Ap]);
    assert!(ep[&EpStat::Ap] > 0.0);

    let normalized = rogue_core::normalize_ep(&ep, EpStat::Ap).unwrap();
    assert!((normalized[&EpStat::Ap] - 1.0).abs() < 1e-12);
}
