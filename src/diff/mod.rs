//! Diff engine - Comparison logic and plan generation

mod compare;
mod plan;

pub use compare::compare_records;
pub use plan::{generate_sync_plan, DiffPlan, PlanStats};
