use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use planner_core::model::{Difficulty, MaterialRef, SubjectDraft, SubjectPatch};

use super::form::PlannerForm;
use super::reset::ResetTimer;
use crate::error::PlannerError;
use crate::persistence::Durability;
use crate::subject_registry::SubjectRegistry;

/// How long a success message stays up before the form resets.
pub const RESET_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerAction {
    Add,
    Update,
    Remove,
}

impl PlannerAction {
    fn past_tense(self) -> &'static str {
        match self {
            PlannerAction::Add => "added",
            PlannerAction::Update => "updated",
            PlannerAction::Remove => "removed",
        }
    }
}

/// Which form panel is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlannerState {
    #[default]
    Idle,
    Adding,
    Updating,
    /// Confirm-or-cancel prompt for removal.
    Removing,
}

impl PlannerState {
    fn action(self) -> Option<PlannerAction> {
        match self {
            PlannerState::Idle => None,
            PlannerState::Adding => Some(PlannerAction::Add),
            PlannerState::Updating => Some(PlannerAction::Update),
            PlannerState::Removing => Some(PlannerAction::Remove),
        }
    }
}

impl From<PlannerAction> for PlannerState {
    fn from(action: PlannerAction) -> Self {
        match action {
            PlannerAction::Add => PlannerState::Adding,
            PlannerAction::Update => PlannerState::Updating,
            PlannerAction::Remove => PlannerState::Removing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// The single message shown above the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl PlannerMessage {
    fn success(text: String) -> Self {
        Self {
            kind: MessageKind::Success,
            text,
        }
    }

    fn error(err: PlannerError) -> Self {
        Self {
            kind: MessageKind::Error,
            text: err.to_string(),
        }
    }
}

/// Result of a successful submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerOutcome {
    pub action: PlannerAction,
    pub subject_name: String,
    pub message: PlannerMessage,
    pub durability: Durability,
}

#[derive(Debug, Default)]
struct Panel {
    state: PlannerState,
    form: PlannerForm,
    message: Option<PlannerMessage>,
    // Bumped on every user transition so a late reset cannot clobber newer input.
    generation: u64,
}

impl Panel {
    fn reset(&mut self) {
        self.state = PlannerState::Idle;
        self.form = PlannerForm::default();
        self.message = None;
        self.generation += 1;
    }
}

/// Add/update/remove form driving a [`SubjectRegistry`].
///
/// After a successful submit the success message stays visible for
/// [`RESET_DELAY`], then the form clears and returns to `Idle`. Selecting
/// another action, resetting, or dropping the workflow cancels that reset.
/// Submitting requires a running tokio runtime.
pub struct PlannerWorkflow {
    panel: Arc<Mutex<Panel>>,
    reset_delay: Duration,
    reset_timer: ResetTimer,
}

impl Default for PlannerWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            panel: Arc::new(Mutex::new(Panel::default())),
            reset_delay: RESET_DELAY,
            reset_timer: ResetTimer::default(),
        }
    }

    #[must_use]
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    fn panel(&self) -> MutexGuard<'_, Panel> {
        lock(&self.panel)
    }

    #[must_use]
    pub fn state(&self) -> PlannerState {
        self.panel().state
    }

    #[must_use]
    pub fn message(&self) -> Option<PlannerMessage> {
        self.panel().message.clone()
    }

    #[must_use]
    pub fn form(&self) -> PlannerForm {
        self.panel().form.clone()
    }

    #[must_use]
    pub fn has_pending_reset(&self) -> bool {
        self.reset_timer.is_pending()
    }

    /// Switch to the panel for `action`, clearing any message.
    pub fn select(&mut self, action: PlannerAction) {
        self.reset_timer.cancel();
        let mut panel = self.panel();
        panel.state = action.into();
        panel.message = None;
        panel.generation += 1;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.panel().form.name = name.into();
    }

    pub fn set_exam_date(&mut self, exam_date: Option<NaiveDate>) {
        self.panel().form.exam_date = exam_date;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.panel().form.difficulty = difficulty;
    }

    /// Replace the current file selection.
    pub fn select_materials(&mut self, materials: Vec<MaterialRef>) {
        self.panel().form.materials = materials;
    }

    /// Clear the form and return to `Idle` immediately.
    pub fn reset(&mut self) {
        self.reset_timer.cancel();
        self.panel().reset();
    }

    /// Dismiss the active panel without submitting, e.g. the remove prompt.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Validate the form and apply the selected action to `registry`.
    ///
    /// On success the message is set and a delayed reset is scheduled. On
    /// failure the error message is set and the state is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the `PlannerError` that was shown to the user.
    pub async fn submit(
        &mut self,
        registry: &mut SubjectRegistry,
    ) -> Result<PlannerOutcome, PlannerError> {
        self.reset_timer.cancel();
        let (state, form) = {
            let panel = self.panel();
            (panel.state, panel.form.clone())
        };

        let result = match state.action() {
            None => Err(PlannerError::NoActionSelected),
            Some(PlannerAction::Add) => Self::add(registry, &form).await,
            Some(PlannerAction::Update) => Self::update(registry, &form).await,
            Some(PlannerAction::Remove) => Self::remove(registry, &form).await,
        };

        match result {
            Ok((action, durability)) => {
                let subject_name = form.trimmed_name().to_owned();
                let mut text = format!(
                    "Subject \"{subject_name}\" {} successfully!",
                    action.past_tense()
                );
                if let Some(warning) = durability.warning() {
                    text.push(' ');
                    text.push_str(&warning);
                }
                let message = PlannerMessage::success(text);
                let generation = {
                    let mut panel = self.panel();
                    panel.message = Some(message.clone());
                    panel.generation
                };
                self.schedule_reset(generation);

                Ok(PlannerOutcome {
                    action,
                    subject_name,
                    message,
                    durability,
                })
            }
            Err(err) => {
                tracing::debug!(error = %err, ?state, "planner submit rejected");
                self.panel().message = Some(PlannerMessage::error(err));
                Err(err)
            }
        }
    }

    fn schedule_reset(&mut self, generation: u64) {
        let panel = Arc::clone(&self.panel);
        self.reset_timer.schedule(self.reset_delay, move || {
            let mut panel = lock(&panel);
            if panel.generation == generation {
                panel.reset();
            }
        });
    }

    async fn add(
        registry: &mut SubjectRegistry,
        form: &PlannerForm,
    ) -> Result<(PlannerAction, Durability), PlannerError> {
        let name = form.trimmed_name();
        if name.is_empty() {
            return Err(PlannerError::EmptyName);
        }
        let exam_date = form.exam_date.ok_or(PlannerError::MissingExamDate)?;
        if registry.contains(name) {
            return Err(PlannerError::DuplicateSubject);
        }

        let saved = registry
            .add(SubjectDraft {
                name: name.to_owned(),
                exam_date,
                difficulty: form.difficulty,
                materials: form.materials.clone(),
            })
            .await;
        Ok((PlannerAction::Add, saved.durability))
    }

    async fn update(
        registry: &mut SubjectRegistry,
        form: &PlannerForm,
    ) -> Result<(PlannerAction, Durability), PlannerError> {
        let name = form.trimmed_name();
        if name.is_empty() {
            return Err(PlannerError::EmptyName);
        }
        let existing = registry.find(name).ok_or(PlannerError::SubjectNotFound {
            action: PlannerAction::Update,
        })?;

        let materials = form.has_materials().then(|| {
            existing
                .materials()
                .iter()
                .chain(&form.materials)
                .cloned()
                .collect()
        });
        let patch = SubjectPatch {
            exam_date: form.exam_date,
            materials,
        };

        let saved = registry.update(name, &patch).await;
        Ok((PlannerAction::Update, saved.durability))
    }

    async fn remove(
        registry: &mut SubjectRegistry,
        form: &PlannerForm,
    ) -> Result<(PlannerAction, Durability), PlannerError> {
        let name = form.trimmed_name();
        if name.is_empty() {
            return Err(PlannerError::EmptyName);
        }
        if !registry.contains(name) {
            return Err(PlannerError::SubjectNotFound {
                action: PlannerAction::Remove,
            });
        }

        let saved = registry.remove(name).await;
        Ok((PlannerAction::Remove, saved.durability))
    }
}

fn lock(panel: &Mutex<Panel>) -> MutexGuard<'_, Panel> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}
