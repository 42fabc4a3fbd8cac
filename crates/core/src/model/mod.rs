mod identity;
mod ids;
mod subject;
mod task;

pub use ids::{ParseIdError, SubjectId, TaskId};

pub use identity::{CredentialRecord, Identity, IdentityError};
pub use subject::{
    Difficulty, EXAM_DATE_FORMAT, MaterialRef, Subject, SubjectDraft, SubjectError,
    SubjectPatch, names_match, parse_exam_date,
};
pub use task::{DailyTask, ScheduleDay};
