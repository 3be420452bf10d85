use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's weight goal as recorded at creation time.
///
/// The goal is an immutable input to the evaluators; nothing in this crate
/// mutates it or stores derived state back onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
  pub start_weight_kg: f64,
  pub start_date: DateTime<Utc>,
  pub target_weight_kg: f64,
  /// Absent means the user left the end open; the trajectory evaluator
  /// resolves it to 28 days after the start.
  pub target_date: Option<DateTime<Utc>>,
}

impl Goal {
  pub fn new(
    start_weight_kg: f64,
    start_date: DateTime<Utc>,
    target_weight_kg: f64,
    target_date: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      start_weight_kg,
      start_date,
      target_weight_kg,
      target_date,
    }
  }
}
