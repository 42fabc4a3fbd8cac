//! Overall study progress: a blend of today's checklist and exam proximity.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::DailyTask;

/// Exam component used when no subject is tracked yet.
pub const DEFAULT_EXAM_PROGRESS: f64 = 50.0;

/// Exam component lost per remaining day before the nearest exam.
pub const EXAM_PROGRESS_PER_DAY: f64 = 2.0;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Intermediate values behind the headline percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBreakdown {
    /// Share of completed tasks, 0..=100.
    pub task_progress: f64,
    /// Exam proximity component, 0..=100.
    pub exam_progress: f64,
    /// Whole days until the nearest exam, if any subject exists.
    pub days_until_exam: Option<i64>,
    /// Rounded average of both components, 0..=100.
    pub overall: u8,
}

/// Percentage of completed tasks; an empty list counts as 0.
#[must_use]
pub fn task_progress(tasks: &[DailyTask]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|task| task.is_completed()).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = completed as f64 / tasks.len() as f64;
    100.0 * ratio
}

/// Whole days from `now` until midnight UTC of `exam_date`, rounded up.
///
/// Exams in the past (or earlier today) count as zero days away.
#[must_use]
pub fn days_until(exam_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let exam_at = exam_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (exam_at - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }
}

/// Exam proximity component for the earliest of `exam_dates`.
///
/// Returns the component together with the day count it was derived from.
#[must_use]
pub fn exam_progress<I>(exam_dates: I, now: DateTime<Utc>) -> (f64, Option<i64>)
where
    I: IntoIterator<Item = NaiveDate>,
{
    let Some(nearest) = exam_dates.into_iter().min() else {
        return (DEFAULT_EXAM_PROGRESS, None);
    };
    let days = days_until(nearest, now);
    #[allow(clippy::cast_precision_loss)]
    let raw = 100.0 - days as f64 * EXAM_PROGRESS_PER_DAY;
    (raw.clamp(0.0, 100.0), Some(days))
}

/// Derive the dashboard progress from tasks and exam dates.
#[must_use]
pub fn estimate<I>(tasks: &[DailyTask], exam_dates: I, now: DateTime<Utc>) -> ProgressBreakdown
where
    I: IntoIterator<Item = NaiveDate>,
{
    let task_progress = task_progress(tasks);
    let (exam_progress, days_until_exam) = exam_progress(exam_dates, now);
    let blended = ((task_progress + exam_progress) / 2.0).round().clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let overall = blended as u8;

    ProgressBreakdown {
        task_progress,
        exam_progress,
        days_until_exam,
        overall,
    }
}
