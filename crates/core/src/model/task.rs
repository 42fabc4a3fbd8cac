use serde::{Deserialize, Serialize};

use crate::model::ids::TaskId;

/// One entry of today's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    id: TaskId,
    task: String,
    #[serde(default)]
    completed: bool,
}

impl DailyTask {
    #[must_use]
    pub fn new(id: TaskId, task: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            task: task.into(),
            completed,
        }
    }

    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// One day of the generated weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    day: String,
    tasks: String,
}

impl ScheduleDay {
    #[must_use]
    pub fn new(day: impl Into<String>, tasks: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            tasks: tasks.into(),
        }
    }

    #[must_use]
    pub fn day(&self) -> &str {
        &self.day
    }

    #[must_use]
    pub fn tasks(&self) -> &str {
        &self.tasks
    }
}
