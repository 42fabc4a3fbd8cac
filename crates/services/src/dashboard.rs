use chrono::{DateTime, NaiveDate, Utc};
use planner_core::model::{DailyTask, Identity, ScheduleDay, TaskId};
use planner_core::progress::{self, ProgressBreakdown};

use crate::auth::{DEMO_EMAIL, DEMO_PASSWORD};
use crate::error::ScheduleError;
use crate::schedule::ScheduleProvider;

/// Weekly plan plus today's checklist, as shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    schedule: Vec<ScheduleDay>,
    tasks: Vec<DailyTask>,
}

impl Dashboard {
    /// Fetch both lists from `provider`.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` if either request fails.
    pub async fn load(provider: &dyn ScheduleProvider) -> Result<Self, ScheduleError> {
        let schedule = provider.weekly_schedule().await?;
        let tasks = provider.daily_tasks().await?;
        tracing::debug!(days = schedule.len(), tasks = tasks.len(), "dashboard loaded");
        Ok(Self { schedule, tasks })
    }

    #[must_use]
    pub fn from_parts(schedule: Vec<ScheduleDay>, tasks: Vec<DailyTask>) -> Self {
        Self { schedule, tasks }
    }

    #[must_use]
    pub fn schedule(&self) -> &[ScheduleDay] {
        &self.schedule
    }

    #[must_use]
    pub fn tasks(&self) -> &[DailyTask] {
        &self.tasks
    }

    /// Flip one task's completion. Returns `false` for an unknown id.
    ///
    /// Changes are in memory only.
    pub fn toggle_task(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|task| task.id() == id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn progress<I>(&self, exam_dates: I, now: DateTime<Utc>) -> ProgressBreakdown
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        progress::estimate(&self.tasks, exam_dates, now)
    }

    /// Heading text for the signed-in user, or the welcome blurb otherwise.
    #[must_use]
    pub fn greeting(identity: Option<&Identity>) -> String {
        match identity {
            Some(identity) => format!("Welcome back, {}!", identity.display_name()),
            None => format!(
                "Welcome to PLANiA\n\
                 Your AI-powered study companion. Please sign in or create an account \
                 to access your personalized study planner and track your progress.\n\
                 Demo credentials:\n\
                 Email: {DEMO_EMAIL}\n\
                 Password: {DEMO_PASSWORD}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::MockScheduleProvider;
    use planner_core::time::fixed_now;

    #[tokio::test]
    async fn load_from_mock_provider() {
        let dashboard = Dashboard::load(&MockScheduleProvider).await.unwrap();
        assert_eq!(dashboard.schedule().len(), 7);
        assert_eq!(dashboard.tasks().len(), 5);
    }

    #[tokio::test]
    async fn toggling_changes_progress() {
        let mut dashboard = Dashboard::load(&MockScheduleProvider).await.unwrap();
        let now = fixed_now();
        let no_exams: [NaiveDate; 0] = [];
        assert_eq!(dashboard.progress(no_exams, now).overall, 45);

        assert!(dashboard.toggle_task(TaskId::new(1)));
        assert_eq!(dashboard.progress(no_exams, now).overall, 55);

        assert!(dashboard.toggle_task(TaskId::new(1)));
        assert!(!dashboard.toggle_task(TaskId::new(99)));
        assert_eq!(dashboard.progress(no_exams, now).overall, 45);
    }

    #[test]
    fn nearest_exam_drives_progress() {
        let dashboard = Dashboard::from_parts(
            Vec::new(),
            vec![
                DailyTask::new(TaskId::new(1), "a", true),
                DailyTask::new(TaskId::new(2), "b", false),
            ],
        );
        let exam = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        let breakdown = dashboard.progress([exam], fixed_now());
        assert_eq!(breakdown.days_until_exam, Some(10));
        assert_eq!(breakdown.overall, 65);
    }

    #[test]
    fn greeting_depends_on_session() {
        let ada = Identity::new("Ada Lovelace", "Ada", "ada@example.com").unwrap();
        assert_eq!(Dashboard::greeting(Some(&ada)), "Welcome back, Ada!");

        let welcome = Dashboard::greeting(None);
        assert!(welcome.starts_with("Welcome to PLANiA"));
        assert!(welcome.contains("Email: demo@plania.com"));
        assert!(welcome.contains("Password: demo123"));
    }
}
