use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::SubjectId;

/// Calendar format used for exam dates everywhere (`2025-12-01`).
pub const EXAM_DATE_FORMAT: &str = "%Y-%m-%d";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("exam date must look like YYYY-MM-DD, got {0:?}")]
    InvalidExamDate(String),

    #[error("unknown difficulty {0:?} (expected easy, medium or hard)")]
    UnknownDifficulty(String),

    #[error("material name cannot be empty")]
    EmptyMaterialName,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(SubjectError::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Parse an exam date entered as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `SubjectError::InvalidExamDate` for anything else.
pub fn parse_exam_date(raw: &str) -> Result<NaiveDate, SubjectError> {
    NaiveDate::parse_from_str(raw.trim(), EXAM_DATE_FORMAT)
        .map_err(|_| SubjectError::InvalidExamDate(raw.to_owned()))
}

//
// ─── MATERIALS ─────────────────────────────────────────────────────────────────
//

/// Opaque reference to a study file attached to a subject.
///
/// Only metadata is kept; file contents never enter a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRef {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_type: Option<String>,
}

impl MaterialRef {
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyMaterialName` if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, SubjectError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(SubjectError::EmptyMaterialName);
        }
        Ok(Self {
            name,
            size_bytes: None,
            media_type: None,
        })
    }

    #[must_use]
    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// Case-insensitive comparison used for every subject-name lookup.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Everything needed to create a subject except its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDraft {
    pub name: String,
    pub exam_date: NaiveDate,
    pub difficulty: Difficulty,
    pub materials: Vec<MaterialRef>,
}

/// Shallow update: present fields replace the stored value wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectPatch {
    pub exam_date: Option<NaiveDate>,
    pub materials: Option<Vec<MaterialRef>>,
}

/// A tracked course with an upcoming exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    id: SubjectId,
    name: String,
    exam_date: NaiveDate,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    materials: Vec<MaterialRef>,
}

impl Subject {
    #[must_use]
    pub fn from_draft(id: SubjectId, draft: SubjectDraft) -> Self {
        Self {
            id,
            name: draft.name,
            exam_date: draft.exam_date,
            difficulty: draft.difficulty,
            materials: draft.materials,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn exam_date(&self) -> NaiveDate {
        self.exam_date
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn materials(&self) -> &[MaterialRef] {
        &self.materials
    }

    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    pub fn apply(&mut self, patch: &SubjectPatch) {
        if let Some(exam_date) = patch.exam_date {
            self.exam_date = exam_date;
        }
        if let Some(materials) = &patch.materials {
            self.materials.clone_from(materials);
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
