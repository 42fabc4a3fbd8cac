use async_trait::async_trait;
use planner_core::model::{DailyTask, ScheduleDay, TaskId};

use super::ScheduleProvider;
use crate::error::ScheduleError;

const WEEKLY: [(&str, &str); 7] = [
    ("Monday", "Mathematics Ch. 1-3, Physics Lab Report"),
    ("Tuesday", "Chemistry Organic Compounds, English Essay"),
    ("Wednesday", "Mathematics Ch. 4-5, Computer Science Project"),
    ("Thursday", "Physics Mechanics, Chemistry Practical"),
    ("Friday", "English Literature Review, Mathematics Practice"),
    ("Saturday", "Computer Science Algorithms, Physics Revision"),
    ("Sunday", "General Revision, Mock Tests"),
];

const DAILY: [(u32, &str, bool); 5] = [
    (1, "Complete Mathematics Assignment", false),
    (2, "Study Physics Chapter 5", true),
    (3, "Review Chemistry Notes", false),
    (4, "Practice Programming Questions", false),
    (5, "Prepare for English Presentation", true),
];

/// Fixed sample plan used until a backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockScheduleProvider;

#[async_trait]
impl ScheduleProvider for MockScheduleProvider {
    async fn weekly_schedule(&self) -> Result<Vec<ScheduleDay>, ScheduleError> {
        Ok(WEEKLY
            .iter()
            .map(|(day, tasks)| ScheduleDay::new(*day, *tasks))
            .collect())
    }

    async fn daily_tasks(&self) -> Result<Vec<DailyTask>, ScheduleError> {
        Ok(DAILY
            .iter()
            .map(|(id, task, completed)| DailyTask::new(TaskId::new(*id), *task, *completed))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn week_starts_monday_and_has_seven_days() {
        let week = MockScheduleProvider.weekly_schedule().await.unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day(), "Monday");
        assert_eq!(week[6].tasks(), "General Revision, Mock Tests");
    }

    #[tokio::test]
    async fn two_of_five_tasks_start_completed() {
        let tasks = MockScheduleProvider.daily_tasks().await.unwrap();
        let done: Vec<u32> = tasks
            .iter()
            .filter(|t| t.is_completed())
            .map(|t| t.id().value())
            .collect();
        assert_eq!(tasks.len(), 5);
        assert_eq!(done, [2, 5]);
    }
}
