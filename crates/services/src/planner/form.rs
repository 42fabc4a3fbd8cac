use chrono::NaiveDate;
use planner_core::model::{Difficulty, MaterialRef};

/// Values currently entered in the planner form.
///
/// `materials` holds the files picked in this round only; an empty list
/// means nothing was selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerForm {
    pub name: String,
    pub exam_date: Option<NaiveDate>,
    pub difficulty: Difficulty,
    pub materials: Vec<MaterialRef>,
}

impl PlannerForm {
    /// Subject name with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    #[must_use]
    pub fn has_materials(&self) -> bool {
        !self.materials.is_empty()
    }
}
