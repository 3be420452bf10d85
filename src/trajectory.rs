//! Week-Bucketed Trajectory Evaluation
//!
//! Builds a straight-line planned weight path from baseline to target
//! across the goal's duration, buckets it into 7-day weeks, and compares
//! the latest applicable measurement against the planned path for the
//! current week.
//!
//! Key principles:
//! - Comparisons are plan-relative: the reference for this week's change
//!   is the planned week-start weight, never the recorded one.
//! - Week endpoints are pinned: the path starts exactly at the rounded
//!   baseline and lands exactly on the rounded target, whatever rounding
//!   drift the intermediate weeks accumulate.
//! - Degenerate goals (zero duration, zero planned change) go through
//!   explicit branches, not epsilon-guarded division.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evaluation::{resolve_direction, round_to_tenth, Direction, GoalStatus};
use crate::models::{Goal, WeightSample};

/// Open-ended goals run for four weeks from the start date.
const DEFAULT_GOAL_LENGTH_DAYS: i64 = 28;

// ---------------------------------------------------------------------------
// Date Helpers
// ---------------------------------------------------------------------------

fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Resolve a goal's end date: the explicit target date when present,
/// otherwise 28 days after the start. Normalized to midnight either way.
pub fn resolve_target_date(goal: &Goal) -> DateTime<Utc> {
    match goal.target_date {
        Some(date) => start_of_day(date),
        None => start_of_day(goal.start_date + Duration::days(DEFAULT_GOAL_LENGTH_DAYS)),
    }
}

// ---------------------------------------------------------------------------
// Weekly Evaluation
// ---------------------------------------------------------------------------

/// One week of the planned trajectory compared against the latest
/// applicable measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyEvaluation {
    pub direction: Direction,
    pub status: GoalStatus,
    /// Clamped to [0, 1].
    pub progress: f64,
    /// 0-based; `week_number()` is the 1-based convenience.
    pub week_index: i64,
    pub total_weeks: i64,
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub planned_start_weight_kg: f64,
    pub planned_end_weight_kg: f64,
    pub planned_change_kg: f64,
    /// Magnitude of the planned change for this week.
    pub target_delta_kg: f64,
    /// Last recorded weight at or before the week start, informational
    /// only; comparisons run against `planned_start_weight_kg`.
    pub actual_start_weight_kg: f64,
    pub latest_weight_kg: f64,
    pub latest_recorded_at: DateTime<Utc>,
    pub has_record_this_week: bool,
    pub achieved_delta_kg: f64,
    pub remaining_delta_kg: f64,
    pub tolerance_kg: f64,
}

impl WeeklyEvaluation {
    pub fn week_number(&self) -> i64 {
        self.week_index + 1
    }

    /// Serialize for the presentation layer.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Evaluate the current week of a goal's planned trajectory.
///
/// Returns `None` when the measurement series is empty; there is nothing
/// to compare yet. The series need not be sorted and may contain duplicate
/// timestamps (last one wins). `reference` is the evaluation instant,
/// normally now.
pub fn evaluate_weekly(
    goal: &Goal,
    baseline_override: Option<f64>,
    samples: &[WeightSample],
    reference: DateTime<Utc>,
    tolerance: f64,
) -> Option<WeeklyEvaluation> {
    if samples.is_empty() {
        return None;
    }

    let baseline = baseline_override.unwrap_or(goal.start_weight_kg);
    let target = goal.target_weight_kg;
    let direction = resolve_direction(baseline, target, tolerance);

    let plan_start = start_of_day(goal.start_date);
    let today = start_of_day(reference);

    // The effective end never precedes the day after the start, so the plan
    // always spans at least one day and one week.
    let target_end = resolve_target_date(goal).max(plan_start + Duration::days(1));

    let duration_days = (target_end - plan_start).num_days();
    let total_weeks = (duration_days + 6) / 7;

    let elapsed_days = (today - plan_start).num_days().max(0);
    let week_index = (elapsed_days / 7).min(total_weeks - 1);

    let week_start = plan_start + Duration::weeks(week_index);
    let week_end = (plan_start + Duration::weeks(week_index + 1)).min(target_end);

    // Linear plan sampled at week boundaries. The first week starts at the
    // rounded baseline and the last week lands on the rounded target; a
    // maintain goal holds flat at the target instead.
    let change_per_week = (target - baseline) / total_weeks as f64;
    let (planned_start, planned_end) = if direction == Direction::Maintain {
        (round_to_tenth(target), round_to_tenth(target))
    } else {
        let start = if week_index == 0 {
            round_to_tenth(baseline)
        } else {
            round_to_tenth(baseline + week_index as f64 * change_per_week)
        };
        let end = if week_index == total_weeks - 1 {
            round_to_tenth(target)
        } else {
            round_to_tenth(baseline + (week_index + 1) as f64 * change_per_week)
        };
        (start, end)
    };

    let planned_change = planned_end - planned_start;
    let target_delta = planned_change.abs();

    // Pick the sample that represents this week: the last one at or before
    // the cutoff, falling back to the last one recorded at all.
    let mut ordered: Vec<WeightSample> = samples.to_vec();
    ordered.sort_by_key(|s| s.recorded_at);
    let cutoff = reference.min(week_end);
    let latest = ordered
        .iter()
        .rev()
        .find(|s| s.recorded_at <= cutoff)
        .or_else(|| ordered.last())
        .copied()?;

    let has_record_this_week =
        latest.recorded_at >= week_start && latest.recorded_at <= week_end;

    let actual_start_weight = round_to_tenth(
        ordered
            .iter()
            .rev()
            .find(|s| s.recorded_at <= week_start)
            .map(|s| s.weight_kg)
            .unwrap_or(baseline),
    );

    let (progress, achieved, remaining, status) = if has_record_this_week {
        week_outcome(
            direction,
            latest.weight_kg,
            planned_start,
            planned_end,
            target_delta,
            tolerance,
        )
    } else {
        // No measurement inside this week yet
        (0.0, 0.0, target_delta, GoalStatus::NotStarted)
    };

    Some(WeeklyEvaluation {
        direction,
        status,
        progress,
        week_index,
        total_weeks,
        week_start,
        week_end,
        planned_start_weight_kg: planned_start,
        planned_end_weight_kg: planned_end,
        planned_change_kg: planned_change,
        target_delta_kg: target_delta,
        actual_start_weight_kg: actual_start_weight,
        latest_weight_kg: latest.weight_kg,
        latest_recorded_at: latest.recorded_at,
        has_record_this_week,
        achieved_delta_kg: achieved,
        remaining_delta_kg: remaining,
        tolerance_kg: tolerance,
    })
}

/// Direction-specific outcome for a week with a measurement in it.
/// Returns (progress, achieved, remaining, status).
fn week_outcome(
    direction: Direction,
    latest: f64,
    planned_start: f64,
    planned_end: f64,
    target_delta: f64,
    tolerance: f64,
) -> (f64, f64, f64, GoalStatus) {
    match direction {
        Direction::Gain => {
            let achieved = (latest - planned_start).max(0.0);
            let (progress, remaining) = if target_delta > 0.0 {
                (
                    (achieved / target_delta).clamp(0.0, 1.0),
                    (target_delta - achieved).max(0.0),
                )
            } else {
                // Flat planned week: all-or-nothing against the endpoint
                (
                    if latest >= planned_end { 1.0 } else { 0.0 },
                    (planned_end - latest).max(0.0),
                )
            };
            let status = if (latest - planned_end).abs() <= tolerance {
                GoalStatus::OnTrack
            } else if latest > planned_end + tolerance {
                GoalStatus::Ahead
            } else if latest <= planned_start - tolerance {
                GoalStatus::Behind
            } else if progress <= 0.05 {
                GoalStatus::NotStarted
            } else {
                GoalStatus::InProgress
            };
            (progress, achieved, remaining, status)
        }
        Direction::Lose => {
            let achieved = (planned_start - latest).max(0.0);
            let (progress, remaining) = if target_delta > 0.0 {
                (
                    (achieved / target_delta).clamp(0.0, 1.0),
                    (target_delta - achieved).max(0.0),
                )
            } else {
                (
                    if latest <= planned_end { 1.0 } else { 0.0 },
                    (latest - planned_end).max(0.0),
                )
            };
            let status = if (latest - planned_end).abs() <= tolerance {
                GoalStatus::OnTrack
            } else if latest < planned_end - tolerance {
                GoalStatus::Ahead
            } else if latest >= planned_start - tolerance {
                // Hovering at or above the planned start, tolerance band
                // included, reads as behind
                GoalStatus::Behind
            } else if progress <= 0.05 {
                GoalStatus::NotStarted
            } else {
                GoalStatus::InProgress
            };
            (progress, achieved, remaining, status)
        }
        Direction::Maintain => {
            let distance = (latest - planned_end).abs();
            let progress = (1.0 - (distance / tolerance).min(1.0)).max(0.0);
            let achieved = (tolerance - distance).max(0.0);
            let remaining = (distance - tolerance).max(0.0);
            let status = if distance <= tolerance {
                GoalStatus::OnTrack
            } else if latest < planned_end - tolerance {
                GoalStatus::Ahead
            } else {
                GoalStatus::Behind
            };
            (progress, achieved, remaining, status)
        }
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
