//! Goal progress evaluation for a personal weight tracker
//!
//! Pure, deterministic computation over caller-supplied data: a weight goal
//! plus a series of measurements in, a progress snapshot and a weekly
//! trajectory comparison out. Persistence, health-data import, and the UI
//! all live with the callers; nothing here holds state between calls.

pub mod evaluation;
pub mod models;
pub mod report;
pub mod trajectory;

pub use evaluation::{
  evaluate_snapshot, resolve_direction, round_to_tenth, Direction, GoalStatus,
  SnapshotEvaluation, DEFAULT_TOLERANCE_KG,
};
pub use models::{Goal, WeightSample};
pub use report::GoalProgressReport;
pub use trajectory::{evaluate_weekly, resolve_target_date, WeeklyEvaluation};
