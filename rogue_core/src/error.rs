//! Model errors and the message catalog used to describe them

use crate::build::Talent;
use crate::types::Spec;
use thiserror::Error;

/// Why a build could not be modelled
#[derive(Debug, Clone, PartialEq)]
pub enum Unmodeled {
    /// No tree reaches 31 points
    NoSpecialization,
    UnsupportedLevel(u32),
    /// The configured cycle does not match the talent specialization
    CycleMismatch { spec: Spec },
    AssassinationNeedsDaggers,
    AssassinationNeedsPoisonPair,
    TalentRequirement { talent: Talent, points: u8 },
    MinEnvenomSize(u8),
    RevealingStrikeUsage(String),
    RevealingStrikeWithoutTalent,
    SubtletyNeedsMainHandDagger,
    PpmOffSpells { proc_name: String },
    T11WithBothFinishers,
    UnknownEffect(String),
}

/// Renders [`Unmodeled`] reasons as user-facing text
pub trait Locale: Send + Sync {
    fn describe(&self, reason: &Unmodeled) -> String;
}

/// Default English messages
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl Locale for English {
    fn describe(&self, reason: &Unmodeled) -> String {
        match reason {
            Unmodeled::NoSpecialization => {
                "You must have 31 points in at least one talent tree.".to_string()
            }
            Unmodeled::UnsupportedLevel(level) => {
                format!("Only level 85 characters are modeled, got level {}.", level)
            }
            Unmodeled::CycleMismatch { spec } => format!(
                "You must specify a {} cycle to match your {} spec.",
                spec, spec
            ),
            Unmodeled::AssassinationNeedsDaggers => {
                "Assassination modeling requires daggers in both hands.".to_string()
            }
            Unmodeled::AssassinationNeedsPoisonPair => {
                "Assassination modeling requires instant poison on one weapon and deadly on the other."
                    .to_string()
            }
            Unmodeled::TalentRequirement { talent, points } => format!(
                "This spec's modeling requires {} point(s) in {}.",
                points, talent
            ),
            Unmodeled::MinEnvenomSize(size) => format!(
                "Minimum envenom size must be between 1 and 5, got {}.",
                size
            ),
            Unmodeled::RevealingStrikeUsage(value) => format!(
                "Revealing strike usage must be set to always, sometimes, or never (got '{}').",
                value
            ),
            Unmodeled::RevealingStrikeWithoutTalent => {
                "Cannot specify revealing strike usage in cycle without taking the talent."
                    .to_string()
            }
            Unmodeled::SubtletyNeedsMainHandDagger => {
                "Subtlety modeling currently requires a main hand dagger.".to_string()
            }
            Unmodeled::PpmOffSpells { proc_name } => format!(
                "PPM procs that also proc off spells are not yet modeled ({}).",
                proc_name
            ),
            Unmodeled::T11WithBothFinishers => {
                "Unable to model the 4pc T11 set bonus in a cycle that uses both eviscerate and envenom."
                    .to_string()
            }
            Unmodeled::UnknownEffect(name) => format!("'{}' is not a modeled proc or gear buff.", name),
        }
    }
}

/// Errors returned by the DPS calculator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DpsError {
    #[error("Input not modeled: {message}")]
    InputNotModeled { reason: Unmodeled, message: String },
    #[error("Proc convergence did not settle after {iterations} passes")]
    ConvergenceFailure { iterations: usize },
}

impl DpsError {
    pub fn not_modeled(reason: Unmodeled, locale: &dyn Locale) -> Self {
        let message = locale.describe(&reason);
        DpsError::InputNotModeled { reason, message }
    }

    /// The typed reason for an input error
    pub fn reason(&self) -> Option<&Unmodeled> {
        match self {
            DpsError::InputNotModeled { reason, .. } => Some(reason),
            DpsError::ConvergenceFailure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Terse;

    impl Locale for Terse {
        fn describe(&self, _reason: &Unmodeled) -> String {
            "nope".to_string()
        }
    }

    #[test]
    fn test_message_comes_from_locale() {
        let err = DpsError::not_modeled(Unmodeled::NoSpecialization, &Terse);
        assert_eq!(err.to_string(), "Input not modeled: nope");
        assert_eq!(err.reason(), Some(&Unmodeled::NoSpecialization));
    }

    #[test]
    fn test_english_mentions_talent() {
        let err = DpsError::not_modeled(
            Unmodeled::TalentRequirement {
                talent: Talent::CutToTheChase,
                points: 3,
            },
            &English,
        );
        assert!(err.to_string().contains("cut_to_the_chase"));
    }

    #[test]
    fn test_convergence_failure_has_no_reason() {
        let err = DpsError::ConvergenceFailure { iterations: 100 };
        assert!(err.reason().is_none());
        assert!(err.to_string().contains("100"));
    }
}
