//! Shared error types for the services crate.

use thiserror::Error;

use planner_core::model::IdentityError;
use storage::sqlite::SqliteInitError;

use crate::planner::PlannerAction;

/// Errors emitted by `SessionStore`.
///
/// Credential mismatches are deliberately opaque: callers only learn that the
/// pair was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("password cannot be empty")]
    EmptyPassword,
    #[error("not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("could not hash password: {0}")]
    Hashing(String),
}

/// Errors emitted by `PlannerWorkflow`.
///
/// The display text is the message shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlannerError {
    #[error("Please choose ADD, UPDATE or REMOVE first")]
    NoActionSelected,
    #[error("Please enter a subject name")]
    EmptyName,
    #[error("Please select an exam date")]
    MissingExamDate,
    #[error("Subject already exists. Use UPDATE to modify it.")]
    DuplicateSubject,
    #[error("{}", not_found_text(.action))]
    SubjectNotFound { action: PlannerAction },
}

fn not_found_text(action: &PlannerAction) -> &'static str {
    match action {
        PlannerAction::Update => "Subject not found. Use ADD to create a new subject.",
        PlannerAction::Add | PlannerAction::Remove => "Subject not found.",
    }
}

/// Errors emitted by schedule providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScheduleError {
    #[error("schedule backend returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_depends_on_action() {
        let update = PlannerError::SubjectNotFound {
            action: PlannerAction::Update,
        };
        let remove = PlannerError::SubjectNotFound {
            action: PlannerAction::Remove,
        };
        assert_eq!(
            update.to_string(),
            "Subject not found. Use ADD to create a new subject."
        );
        assert_eq!(remove.to_string(), "Subject not found.");
    }
}
