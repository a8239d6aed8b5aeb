//! Business logic services for Greenhouse Harvest Planning

pub mod planner;
pub mod plans;

pub use planner::HarvestPlanner;
pub use plans::{CommitOutcome, PlanService};
