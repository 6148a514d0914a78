//! Proc convergence and damage assembly shared by every specialization

mod breakdown;
mod converge;

pub use breakdown::{damage_breakdown, proc_damage_contribution, DamageBreakdown};
pub use converge::{compute_damage, Converged, MAX_PASSES, PRECISION_REQUIRED};
