use std::sync::Arc;

use planner_core::model::Identity;
use planner_core::progress::ProgressBreakdown;
use storage::{SnapshotKey, Storage};

use crate::Clock;
use crate::auth::{SessionStore, SignupRequest};
use crate::dashboard::Dashboard;
use crate::error::{AppServicesError, AuthError, ScheduleError};
use crate::persistence::{Durability, Saved};
use crate::schedule::{BackendConfig, HttpScheduleProvider, MockScheduleProvider, ScheduleProvider};
use crate::subject_registry::SubjectRegistry;

/// Knobs chosen by the binary at startup.
#[derive(Clone, Debug, Default)]
pub struct ServicesOptions {
    /// Keep a separate subject list per signed-in email.
    pub subjects_per_user: bool,
    /// Fetch schedules from this backend instead of the built-in sample.
    pub backend: Option<BackendConfig>,
}

/// Owns the stores for one run of the app and keeps them in step.
///
/// Signing in or out rescopes the subject registry when per-user lists are
/// enabled.
pub struct AppServices {
    clock: Clock,
    options: ServicesOptions,
    session: SessionStore,
    subjects: SubjectRegistry,
    schedule: Arc<dyn ScheduleProvider>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and restore the last session.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// schedule client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        options: ServicesOptions,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let schedule = schedule_provider(options.backend.clone())?;
        Ok(Self::with_storage(storage, clock, schedule, options).await)
    }

    /// Build services over an existing backend and restore the last session.
    pub async fn with_storage(
        storage: Storage,
        clock: Clock,
        schedule: Arc<dyn ScheduleProvider>,
        options: ServicesOptions,
    ) -> Self {
        let snapshots = storage.typed();
        let mut services = Self {
            clock,
            options,
            session: SessionStore::new(snapshots.clone()),
            subjects: SubjectRegistry::new(snapshots, SnapshotKey::subjects()),
            schedule,
        };
        services.hydrate().await;
        services
    }

    /// Reload the session and the subject list it scopes.
    pub async fn hydrate(&mut self) {
        self.session.hydrate().await;
        let key = self.subjects_key();
        if &key == self.subjects.key() {
            self.subjects.hydrate().await;
        } else {
            self.subjects.switch_scope(key).await;
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when no account matches.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Saved<Identity>, AuthError> {
        let saved = self.session.login(email, password).await?;
        self.rescope().await;
        Ok(saved)
    }

    /// # Errors
    ///
    /// Returns `AuthError` for invalid input or an email already in use.
    pub async fn signup(&mut self, request: SignupRequest) -> Result<Saved<Identity>, AuthError> {
        let saved = self.session.signup(request).await?;
        self.rescope().await;
        Ok(saved)
    }

    pub async fn logout(&mut self) -> Durability {
        let durability = self.session.logout().await;
        self.rescope().await;
        durability
    }

    /// Subject list of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` when nobody is signed in.
    pub fn subjects(&self) -> Result<&SubjectRegistry, AuthError> {
        self.session.require()?;
        Ok(&self.subjects)
    }

    /// Mutable subject list, for driving a `PlannerWorkflow`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` when nobody is signed in.
    pub fn subjects_mut(&mut self) -> Result<&mut SubjectRegistry, AuthError> {
        self.session.require()?;
        Ok(&mut self.subjects)
    }

    /// # Errors
    ///
    /// Returns `ScheduleError` if the schedule provider fails.
    pub async fn dashboard(&self) -> Result<Dashboard, ScheduleError> {
        Dashboard::load(self.schedule.as_ref()).await
    }

    /// Progress for `dashboard` against the current subjects' exam dates.
    #[must_use]
    pub fn progress(&self, dashboard: &Dashboard) -> ProgressBreakdown {
        dashboard.progress(self.subjects.exam_dates(), self.clock.now())
    }

    fn subjects_key(&self) -> SnapshotKey {
        match self.session.current() {
            Some(identity) if self.options.subjects_per_user => {
                SnapshotKey::subjects_for(identity.email())
            }
            _ => SnapshotKey::subjects(),
        }
    }

    async fn rescope(&mut self) {
        let key = self.subjects_key();
        self.subjects.switch_scope(key).await;
    }
}

fn schedule_provider(
    backend: Option<BackendConfig>,
) -> Result<Arc<dyn ScheduleProvider>, ScheduleError> {
    Ok(match backend {
        Some(config) => {
            tracing::info!(base_url = %config.base_url, "using HTTP schedule backend");
            Arc::new(HttpScheduleProvider::new(config)?)
        }
        None => Arc::new(MockScheduleProvider),
    })
}
