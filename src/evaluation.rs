//! Snapshot evaluation for weight goals
//!
//! This module classifies a goal's direction and computes an instantaneous
//! progress/status reading from a single current weight. The week-bucketed
//! trajectory comparison lives in `crate::trajectory` and shares the
//! direction and threshold logic defined here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Goal;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

/// Dead-band around a target within which the user counts as on track.
/// Callers may override per evaluation.
pub const DEFAULT_TOLERANCE_KG: f64 = 0.5;

/// Round to the nearest 0.1 kg. Planned and displayed weights are compared
/// at this resolution; keeping it in one place keeps the threshold math
/// independent of display formatting.
pub fn round_to_tenth(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("Unknown direction: {0}")]
  Direction(String),

  #[error("Unknown goal status: {0}")]
  Status(String),
}

/// ---------------------------------------------------------------------------
/// Direction
/// ---------------------------------------------------------------------------

/// Whether the goal implies gaining, losing, or holding weight, inferred
/// from baseline vs target within the tolerance dead-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  Gain,
  Lose,
  Maintain,
}

impl std::fmt::Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Gain => write!(f, "gain"),
      Self::Lose => write!(f, "lose"),
      Self::Maintain => write!(f, "maintain"),
    }
  }
}

impl std::str::FromStr for Direction {
  type Err = ParseError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "gain" => Ok(Self::Gain),
      "lose" => Ok(Self::Lose),
      "maintain" => Ok(Self::Maintain),
      _ => Err(ParseError::Direction(s.to_string())),
    }
  }
}

/// Classify a goal as gain / lose / maintain.
///
/// Total over all finite floats; a target within `tolerance` of the
/// baseline collapses to maintain.
pub fn resolve_direction(baseline: f64, target: f64, tolerance: f64) -> Direction {
  if target > baseline + tolerance {
    Direction::Gain
  } else if target < baseline - tolerance {
    Direction::Lose
  } else {
    Direction::Maintain
  }
}

/// ---------------------------------------------------------------------------
/// Goal Status
/// ---------------------------------------------------------------------------

/// Five-state progress classification. There is no ordering between the
/// states; each evaluator derives one from its own threshold rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
  NotStarted,
  InProgress,
  OnTrack,
  Ahead,
  Behind,
}

impl std::fmt::Display for GoalStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NotStarted => write!(f, "not_started"),
      Self::InProgress => write!(f, "in_progress"),
      Self::OnTrack => write!(f, "on_track"),
      Self::Ahead => write!(f, "ahead"),
      Self::Behind => write!(f, "behind"),
    }
  }
}

impl std::str::FromStr for GoalStatus {
  type Err = ParseError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "not_started" => Ok(Self::NotStarted),
      "in_progress" => Ok(Self::InProgress),
      "on_track" => Ok(Self::OnTrack),
      "ahead" => Ok(Self::Ahead),
      "behind" => Ok(Self::Behind),
      _ => Err(ParseError::Status(s.to_string())),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Snapshot Evaluation
/// ---------------------------------------------------------------------------

/// Single-point-in-time progress reading against baseline and target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEvaluation {
  pub direction: Direction,
  pub status: GoalStatus,
  /// Clamped to [0, 1].
  pub progress: f64,
  pub baseline_kg: f64,
  pub current_kg: f64,
  pub target_kg: f64,
  pub tolerance_kg: f64,
}

impl SnapshotEvaluation {
  pub fn delta_to_target(&self) -> f64 {
    self.current_kg - self.target_kg
  }

  pub fn delta_from_baseline(&self) -> f64 {
    self.current_kg - self.baseline_kg
  }

  /// Whether the status satisfies the goal's intent: maintain only counts
  /// on track, gain/lose also count ahead.
  pub fn is_completed(&self) -> bool {
    match self.direction {
      Direction::Maintain => self.status == GoalStatus::OnTrack,
      Direction::Gain | Direction::Lose => {
        matches!(self.status, GoalStatus::OnTrack | GoalStatus::Ahead)
      }
    }
  }

  /// Serialize for the presentation layer.
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// Evaluate a goal against a single current weight.
///
/// Returns `None` when no current weight is supplied; that is not an error,
/// it means there is nothing to evaluate yet. The baseline defaults to the
/// goal's recorded start weight unless overridden.
pub fn evaluate_snapshot(
  goal: &Goal,
  baseline_override: Option<f64>,
  current_weight: Option<f64>,
  tolerance: f64,
) -> Option<SnapshotEvaluation> {
  let current = current_weight?;
  let baseline = baseline_override.unwrap_or(goal.start_weight_kg);
  let target = goal.target_weight_kg;
  let direction = resolve_direction(baseline, target, tolerance);

  let (raw_progress, status) = match direction {
    Direction::Gain => {
      let total_change = target - baseline;
      if total_change <= 1e-4 {
        // Degenerate goal (baseline override at or above target): progress
        // is all-or-nothing, never a division.
        let raw = if current >= target { 1.0 } else { 0.0 };
        let status = if (current - target).abs() <= tolerance {
          GoalStatus::OnTrack
        } else if current > target + tolerance {
          GoalStatus::Ahead
        } else if current <= baseline - tolerance {
          GoalStatus::Behind
        } else {
          GoalStatus::InProgress
        };
        (raw, status)
      } else {
        let raw = (current - baseline) / total_change;
        let status = if (current - target).abs() <= tolerance {
          GoalStatus::OnTrack
        } else if current > target + tolerance {
          GoalStatus::Ahead
        } else if current <= baseline - tolerance {
          GoalStatus::Behind
        } else if raw <= 0.01 {
          GoalStatus::NotStarted
        } else {
          GoalStatus::InProgress
        };
        (raw, status)
      }
    }
    Direction::Lose => {
      let total_change = baseline - target;
      if total_change <= 1e-4 {
        let raw = if current <= target { 1.0 } else { 0.0 };
        let status = if (current - target).abs() <= tolerance {
          GoalStatus::OnTrack
        } else if current < target - tolerance {
          GoalStatus::Ahead
        } else if current >= baseline - tolerance {
          GoalStatus::Behind
        } else {
          GoalStatus::InProgress
        };
        (raw, status)
      } else {
        let raw = (baseline - current) / total_change;
        let status = if (current - target).abs() <= tolerance {
          GoalStatus::OnTrack
        } else if current < target - tolerance {
          GoalStatus::Ahead
        } else if current >= baseline - tolerance {
          // Still at or near the starting weight counts as behind, even
          // within the tolerance band below it.
          GoalStatus::Behind
        } else if raw <= 0.01 {
          GoalStatus::NotStarted
        } else {
          GoalStatus::InProgress
        };
        (raw, status)
      }
    }
    Direction::Maintain => {
      let distance = (current - target).abs();
      let raw = 1.0 - (distance / tolerance).min(1.0);
      let status = if distance <= tolerance {
        GoalStatus::OnTrack
      } else if current < target - tolerance {
        GoalStatus::Ahead
      } else {
        GoalStatus::Behind
      };
      (raw, status)
    }
  };

  Some(SnapshotEvaluation {
    direction,
    status,
    progress: raw_progress.clamp(0.0, 1.0),
    baseline_kg: baseline,
    current_kg: current,
    target_kg: target,
    tolerance_kg: tolerance,
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};

  fn make_goal(start: f64, target: f64) -> Goal {
    Goal::new(
      start,
      Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
      target,
      None,
    )
  }

  #[test]
  fn test_direction_gain_lose_maintain() {
    assert_eq!(resolve_direction(60.0, 65.0, 0.5), Direction::Gain);
    assert_eq!(resolve_direction(80.0, 70.0, 0.5), Direction::Lose);
    assert_eq!(resolve_direction(70.0, 70.0, 0.5), Direction::Maintain);

    // Targets inside the dead-band collapse to maintain
    assert_eq!(resolve_direction(70.0, 70.4, 0.5), Direction::Maintain);
    assert_eq!(resolve_direction(70.0, 69.6, 0.5), Direction::Maintain);

    // Just outside the band flips
    assert_eq!(resolve_direction(70.0, 70.6, 0.5), Direction::Gain);
    assert_eq!(resolve_direction(70.0, 69.4, 0.5), Direction::Lose);
  }

  #[test]
  fn test_direction_same_weight_always_maintain() {
    for tolerance in [0.1, 0.5, 2.0] {
      assert_eq!(resolve_direction(72.5, 72.5, tolerance), Direction::Maintain);
    }
  }

  #[test]
  fn test_round_to_tenth() {
    assert_eq!(round_to_tenth(61.25), 61.3);
    assert_eq!(round_to_tenth(61.24), 61.2);
    assert_eq!(round_to_tenth(-0.05), -0.1);
    assert_eq!(round_to_tenth(70.0), 70.0);
  }

  #[test]
  fn test_snapshot_no_current_weight() {
    let goal = make_goal(60.0, 65.0);
    assert!(evaluate_snapshot(&goal, None, None, DEFAULT_TOLERANCE_KG).is_none());
  }

  #[test]
  fn test_snapshot_gain_in_progress() {
    // Arrange: halfway from 60 to 65
    let goal = make_goal(60.0, 65.0);

    // Act
    let eval = evaluate_snapshot(&goal, None, Some(62.5), 0.5).unwrap();

    // Assert
    assert_eq!(eval.direction, Direction::Gain);
    assert_eq!(eval.status, GoalStatus::InProgress);
    assert!((eval.progress - 0.5).abs() < 1e-9);
    assert!(!eval.is_completed());
    assert_eq!(eval.delta_to_target(), -2.5);
    assert_eq!(eval.delta_from_baseline(), 2.5);
  }

  #[test]
  fn test_snapshot_gain_on_track_and_ahead() {
    let goal = make_goal(60.0, 65.0);

    // Within tolerance of target
    let eval = evaluate_snapshot(&goal, None, Some(64.6), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::OnTrack);
    assert!(eval.is_completed());

    // Past the target by more than tolerance
    let eval = evaluate_snapshot(&goal, None, Some(66.0), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::Ahead);
    assert!(eval.is_completed());
    assert_eq!(eval.progress, 1.0, "progress clamps at 1");
  }

  #[test]
  fn test_snapshot_gain_behind_and_not_started() {
    let goal = make_goal(60.0, 65.0);

    // Dropped below baseline by more than tolerance
    let eval = evaluate_snapshot(&goal, None, Some(59.0), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::Behind);
    assert_eq!(eval.progress, 0.0, "progress clamps at 0");

    // Sitting at baseline: raw progress 0 <= 0.01
    let eval = evaluate_snapshot(&goal, None, Some(60.0), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::NotStarted);
  }

  #[test]
  fn test_snapshot_lose_mirror() {
    let goal = make_goal(80.0, 70.0);

    // Halfway down
    let eval = evaluate_snapshot(&goal, None, Some(75.0), 0.5).unwrap();
    assert_eq!(eval.direction, Direction::Lose);
    assert_eq!(eval.status, GoalStatus::InProgress);
    assert!((eval.progress - 0.5).abs() < 1e-9);

    // Within tolerance of target
    let eval = evaluate_snapshot(&goal, None, Some(70.3), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::OnTrack);
    assert!(eval.is_completed());

    // Below target by more than tolerance
    let eval = evaluate_snapshot(&goal, None, Some(69.0), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::Ahead);

    // At or near the starting weight counts as behind
    let eval = evaluate_snapshot(&goal, None, Some(80.2), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::Behind);
    let eval = evaluate_snapshot(&goal, None, Some(79.6), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::Behind);
  }

  #[test]
  fn test_snapshot_maintain_bands() {
    let goal = make_goal(70.0, 70.0);

    // Inside the band
    let eval = evaluate_snapshot(&goal, None, Some(70.3), 0.5).unwrap();
    assert_eq!(eval.direction, Direction::Maintain);
    assert_eq!(eval.status, GoalStatus::OnTrack);
    assert!((eval.progress - 0.4).abs() < 1e-9);
    assert!(eval.is_completed());

    // A full kilo under: distance 1.0 > tolerance, progress bottoms out
    let eval = evaluate_snapshot(&goal, None, Some(69.0), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::Ahead);
    assert_eq!(eval.progress, 0.0);
    assert!(!eval.is_completed(), "maintain only completes on track");

    // Over the band
    let eval = evaluate_snapshot(&goal, None, Some(71.0), 0.5).unwrap();
    assert_eq!(eval.status, GoalStatus::Behind);
  }

  #[test]
  fn test_snapshot_degenerate_gain_no_division() {
    // A baseline override at the target weight forces total change to zero
    // while the stored goal still reads as gain.
    let goal = make_goal(60.0, 65.0);

    let eval = evaluate_snapshot(&goal, Some(65.0), Some(65.0), 0.5).unwrap();
    assert_eq!(eval.direction, Direction::Maintain);
    assert_eq!(eval.status, GoalStatus::OnTrack);
    assert_eq!(eval.progress, 1.0);

    // With zero tolerance the direction stays gain even when the override
    // sits a hair under the target; total change is below the epsilon and
    // progress must stay finite and all-or-nothing.
    let eval = evaluate_snapshot(&goal, Some(64.99995), Some(65.0), 0.0).unwrap();
    assert_eq!(eval.direction, Direction::Gain);
    assert_eq!(eval.progress, 1.0);

    let eval = evaluate_snapshot(&goal, Some(64.99995), Some(64.9), 0.0).unwrap();
    assert_eq!(eval.direction, Direction::Gain);
    assert_eq!(eval.progress, 0.0);
  }

  #[test]
  fn test_snapshot_progress_always_clamped() {
    let goal = make_goal(60.0, 65.0);
    for current in [40.0, 55.0, 60.0, 62.5, 65.0, 70.0, 90.0] {
      let eval = evaluate_snapshot(&goal, None, Some(current), 0.5).unwrap();
      assert!(
        (0.0..=1.0).contains(&eval.progress),
        "progress {} out of range for current {}",
        eval.progress,
        current
      );
    }
  }

  #[test]
  fn test_snapshot_baseline_override() {
    let goal = make_goal(60.0, 65.0);

    // Override moves the reference point: 64 is 80% of the way from 60,
    // but only 50% of the way from 63.
    let eval = evaluate_snapshot(&goal, Some(63.0), Some(64.0), 0.5).unwrap();
    assert_eq!(eval.baseline_kg, 63.0);
    assert!((eval.progress - 0.5).abs() < 1e-9);
  }

  #[test]
  fn test_status_string_roundtrip() {
    for status in [
      GoalStatus::NotStarted,
      GoalStatus::InProgress,
      GoalStatus::OnTrack,
      GoalStatus::Ahead,
      GoalStatus::Behind,
    ] {
      let parsed: GoalStatus = status.to_string().parse().unwrap();
      assert_eq!(parsed, status);
    }

    let err = "paused".parse::<GoalStatus>().unwrap_err();
    assert_eq!(err, ParseError::Status("paused".to_string()));

    let parsed: Direction = Direction::Lose.to_string().parse().unwrap();
    assert_eq!(parsed, Direction::Lose);
    assert!("sideways".parse::<Direction>().is_err());
  }
}
