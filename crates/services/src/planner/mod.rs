mod form;
mod reset;
mod workflow;

pub use crate::error::PlannerError;
pub use form::PlannerForm;
pub use workflow::{
    MessageKind, PlannerAction, PlannerMessage, PlannerOutcome, PlannerState, PlannerWorkflow,
    RESET_DELAY,
};
