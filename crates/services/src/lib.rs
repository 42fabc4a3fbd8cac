#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod persistence;
pub mod planner;
pub mod schedule;
pub mod subject_registry;

#[cfg(test)]
mod test_support;

pub use planner_core::Clock;

pub use app_services::{AppServices, ServicesOptions};
pub use auth::{SessionStore, SignupRequest};
pub use dashboard::Dashboard;
pub use error::{AppServicesError, AuthError, PlannerError, ScheduleError};
pub use persistence::{Durability, Saved};
pub use planner::{
    MessageKind, PlannerAction, PlannerForm, PlannerMessage, PlannerOutcome, PlannerState,
    PlannerWorkflow, RESET_DELAY,
};
pub use schedule::{BackendConfig, HttpScheduleProvider, MockScheduleProvider, ScheduleProvider};
pub use subject_registry::SubjectRegistry;
