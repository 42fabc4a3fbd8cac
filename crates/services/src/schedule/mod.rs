//! Where the dashboard's weekly plan and daily checklist come from.

mod http;
mod mock;

use async_trait::async_trait;
use planner_core::model::{DailyTask, ScheduleDay};

use crate::error::ScheduleError;

pub use http::{BackendConfig, DEFAULT_TIMEOUT, HttpScheduleProvider};
pub use mock::MockScheduleProvider;

/// Source of generated study plans.
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// The seven-day plan, Monday first.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` if the plan cannot be fetched.
    async fn weekly_schedule(&self) -> Result<Vec<ScheduleDay>, ScheduleError>;

    /// Today's checklist.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` if the checklist cannot be fetched.
    async fn daily_tasks(&self) -> Result<Vec<DailyTask>, ScheduleError>;
}
