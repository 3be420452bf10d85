use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded body-weight measurement.
///
/// Series handed to the evaluators need not be pre-sorted; duplicate
/// timestamps are resolved last-one-wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
  pub recorded_at: DateTime<Utc>,
  pub weight_kg: f64,
}

impl WeightSample {
  pub fn new(recorded_at: DateTime<Utc>, weight_kg: f64) -> Self {
    Self {
      recorded_at,
      weight_kg,
    }
  }
}
