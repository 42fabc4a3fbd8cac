//! Durability reporting for fire-and-forget snapshot writes.
//!
//! State changes always apply in memory first. A failed write is reported
//! back as a warning instead of undoing the change.

use storage::StorageError;

/// Whether the latest in-memory change also reached storage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Durability {
    Persisted,
    Volatile { reason: String },
}

impl Durability {
    /// Classify a snapshot write, logging failures.
    pub fn from_write(result: Result<(), StorageError>, what: &str) -> Self {
        match result {
            Ok(()) => Self::Persisted,
            Err(err) => {
                tracing::warn!(error = %err, what, "snapshot write failed; change kept in memory only");
                Self::Volatile {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Combine two writes; the first failure wins.
    pub fn and(self, other: Durability) -> Self {
        match self {
            Self::Persisted => other,
            volatile @ Self::Volatile { .. } => volatile,
        }
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted)
    }

    /// User-facing warning text when the change was not saved.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Persisted => None,
            Self::Volatile { reason } => {
                Some(format!("Changes could not be saved and will be lost on exit ({reason})."))
            }
        }
    }
}

/// A value produced by a mutation together with its durability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved<T> {
    pub value: T,
    pub durability: Durability,
}

impl<T> Saved<T> {
    pub fn new(value: T, durability: Durability) -> Self {
        Self { value, durability }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_failure_wins() {
        let failed = Durability::from_write(Err(StorageError::Connection("disk full".into())), "x");
        let combined = Durability::Persisted.and(failed.clone());
        assert_eq!(combined, failed);
        let combined = failed.clone().and(Durability::Persisted);
        assert_eq!(combined, failed);
        assert!(Durability::Persisted.and(Durability::Persisted).is_persisted());
    }

    #[test]
    fn warning_mentions_reason() {
        let failed = Durability::from_write(Err(StorageError::Connection("disk full".into())), "x");
        let warning = failed.warning().unwrap();
        assert!(warning.contains("disk full"));
        assert!(Durability::Persisted.warning().is_none());
    }
}
