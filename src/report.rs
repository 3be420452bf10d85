//! Combined progress report for presentation surfaces
//!
//! Widgets and summary cards show the snapshot and the weekly trajectory
//! together; this bundles both evaluations from one measurement series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evaluation::{evaluate_snapshot, SnapshotEvaluation};
use crate::models::{Goal, WeightSample};
use crate::trajectory::{evaluate_weekly, WeeklyEvaluation};

/// Both evaluations for one goal. Either side may be absent on its own
/// terms: the snapshot when there is no measurement at all, the weekly
/// comparison when the series is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgressReport {
  pub goal: Goal,
  pub tolerance_kg: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub snapshot: Option<SnapshotEvaluation>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weekly: Option<WeeklyEvaluation>,
}

impl GoalProgressReport {
  /// Build a report from a goal and its measurement series. The latest
  /// recorded sample doubles as the snapshot's current weight.
  pub fn build(
    goal: &Goal,
    baseline_override: Option<f64>,
    samples: &[WeightSample],
    reference: DateTime<Utc>,
    tolerance: f64,
  ) -> Self {
    let current = samples
      .iter()
      .max_by_key(|s| s.recorded_at)
      .map(|s| s.weight_kg);

    Self {
      goal: goal.clone(),
      tolerance_kg: tolerance,
      snapshot: evaluate_snapshot(goal, baseline_override, current, tolerance),
      weekly: evaluate_weekly(goal, baseline_override, samples, reference, tolerance),
    }
  }

  /// Serialize for the presentation layer.
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::evaluation::{Direction, GoalStatus, DEFAULT_TOLERANCE_KG};
  use chrono::{Duration, TimeZone};

  fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap() + Duration::days(n)
  }

  #[test]
  fn test_report_bundles_both_evaluations() {
    // Arrange
    let goal = Goal::new(60.0, day(0), 65.0, Some(day(28)));
    let samples = vec![
      WeightSample::new(day(1), 60.2),
      WeightSample::new(day(4), 61.0),
    ];

    // Act
    let report =
      GoalProgressReport::build(&goal, None, &samples, day(4), DEFAULT_TOLERANCE_KG);

    // Assert: snapshot runs off the latest sample
    let snapshot = report.snapshot.expect("snapshot present");
    assert_eq!(snapshot.current_kg, 61.0);
    assert_eq!(snapshot.direction, Direction::Gain);

    let weekly = report.weekly.expect("weekly present");
    assert_eq!(weekly.week_index, 0);
    assert_eq!(weekly.status, GoalStatus::OnTrack);
  }

  #[test]
  fn test_report_with_no_measurements() {
    let goal = Goal::new(60.0, day(0), 65.0, None);

    let report = GoalProgressReport::build(&goal, None, &[], day(4), DEFAULT_TOLERANCE_KG);

    assert!(report.snapshot.is_none());
    assert!(report.weekly.is_none());

    // Still serializes cleanly for the presentation layer
    let json = report.to_json();
    assert!(json.contains("tolerance_kg"));
    assert!(!json.contains("\"snapshot\""));
  }

  #[test]
  fn test_report_json_includes_goal_echo() {
    let goal = Goal::new(80.0, day(0), 70.0, Some(day(70)));
    let samples = vec![WeightSample::new(day(2), 79.4)];

    let report =
      GoalProgressReport::build(&goal, None, &samples, day(2), DEFAULT_TOLERANCE_KG);
    let json = report.to_json();

    assert!(json.contains("\"start_weight_kg\": 80.0"));
    assert!(json.contains("\"weekly\""));
  }
}
