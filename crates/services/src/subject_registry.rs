use chrono::NaiveDate;
use planner_core::model::{Subject, SubjectDraft, SubjectId, SubjectPatch};
use storage::{SnapshotKey, Snapshots};

use crate::persistence::{Durability, Saved};

/// In-memory subject list mirrored to a snapshot after every mutation.
///
/// Names are matched case-insensitively. The registry does not reject
/// duplicate names itself; callers check with [`SubjectRegistry::contains`]
/// before adding.
pub struct SubjectRegistry {
    snapshots: Snapshots,
    key: SnapshotKey,
    subjects: Vec<Subject>,
}

impl SubjectRegistry {
    #[must_use]
    pub fn new(snapshots: Snapshots, key: SnapshotKey) -> Self {
        Self {
            snapshots,
            key,
            subjects: Vec::new(),
        }
    }

    /// Reload the list from the current snapshot key.
    ///
    /// Missing or unreadable snapshots yield an empty list.
    pub async fn hydrate(&mut self) {
        self.subjects = match self.snapshots.load::<Vec<Subject>>(&self.key).await {
            Ok(subjects) => subjects.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, key = %self.key, "ignoring unreadable subjects snapshot");
                Vec::new()
            }
        };
        tracing::debug!(key = %self.key, count = self.subjects.len(), "subjects hydrated");
    }

    /// Point the registry at another snapshot key and reload from it.
    pub async fn switch_scope(&mut self, key: SnapshotKey) {
        if key == self.key {
            return;
        }
        self.key = key;
        self.hydrate().await;
    }

    #[must_use]
    pub fn key(&self) -> &SnapshotKey {
        &self.key
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.matches_name(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn exam_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.subjects.iter().map(Subject::exam_date)
    }

    /// Append a new subject with a freshly generated id.
    pub async fn add(&mut self, draft: SubjectDraft) -> Saved<SubjectId> {
        let id = SubjectId::generate();
        self.subjects.push(Subject::from_draft(id.clone(), draft));
        tracing::info!(subject_id = %id, "subject added");
        Saved::new(id, self.persist().await)
    }

    /// Merge `patch` into every subject named `name`; returns how many matched.
    ///
    /// The snapshot is rewritten even when nothing matched.
    pub async fn update(&mut self, name: &str, patch: &SubjectPatch) -> Saved<usize> {
        let mut matched = 0;
        for subject in self.subjects.iter_mut().filter(|s| s.matches_name(name)) {
            subject.apply(patch);
            matched += 1;
        }
        tracing::info!(name, matched, "subject updated");
        Saved::new(matched, self.persist().await)
    }

    /// Drop every subject named `name`; returns how many were removed.
    ///
    /// The snapshot is rewritten even when nothing matched.
    pub async fn remove(&mut self, name: &str) -> Saved<usize> {
        let before = self.subjects.len();
        self.subjects.retain(|subject| !subject.matches_name(name));
        let removed = before - self.subjects.len();
        tracing::info!(name, removed, "subject removed");
        Saved::new(removed, self.persist().await)
    }

    async fn persist(&self) -> Durability {
        let stored = self.snapshots.save(&self.key, &self.subjects).await;
        Durability::from_write(stored, "subjects")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ReadOnlyRepository;
    use planner_core::model::{Difficulty, MaterialRef};
    use std::sync::Arc;
    use storage::repository::{InMemoryRepository, SnapshotRepository};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(name: &str) -> SubjectDraft {
        SubjectDraft {
            name: name.into(),
            exam_date: date(2025, 12, 1),
            difficulty: Difficulty::Medium,
            materials: Vec::new(),
        }
    }

    fn registry() -> (InMemoryRepository, SubjectRegistry) {
        let repo = InMemoryRepository::new();
        let registry = SubjectRegistry::new(
            Snapshots::new(Arc::new(repo.clone())),
            SnapshotKey::subjects(),
        );
        (repo, registry)
    }

    #[tokio::test]
    async fn add_update_remove_with_any_case() {
        let (repo, mut registry) = registry();

        let added = registry.add(draft("Math")).await;
        assert!(added.durability.is_persisted());
        assert_eq!(registry.subjects().len(), 1);
        assert_eq!(registry.subjects()[0].name(), "Math");

        let updated = registry
            .update(
                "math",
                &SubjectPatch {
                    exam_date: Some(date(2025, 12, 15)),
                    materials: None,
                },
            )
            .await;
        assert_eq!(updated.value, 1);
        let math = registry.find("MaTh").unwrap();
        assert_eq!(math.exam_date(), date(2025, 12, 15));
        assert!(math.materials().is_empty());
        assert_eq!(math.id(), &added.value);

        let removed = registry.remove("MATH").await;
        assert_eq!(removed.value, 1);
        assert!(registry.subjects().is_empty());

        let raw = repo.read(&SnapshotKey::subjects()).await.unwrap().unwrap();
        assert_eq!(raw, "[]");
    }

    #[tokio::test]
    async fn misses_still_rewrite_snapshot() {
        let (repo, mut registry) = registry();
        let updated = registry.update("Nope", &SubjectPatch::default()).await;
        assert_eq!(updated.value, 0);
        assert_eq!(
            repo.read(&SnapshotKey::subjects()).await.unwrap().as_deref(),
            Some("[]")
        );

        registry.add(draft("Physics")).await;
        let removed = registry.remove("Chemistry").await;
        assert_eq!(removed.value, 0);
        assert_eq!(registry.subjects().len(), 1);
    }

    #[tokio::test]
    async fn materials_are_replaced_wholesale() {
        let (_, mut registry) = registry();
        let mut with_file = draft("Biology");
        with_file.materials = vec![MaterialRef::new("cells.pdf").unwrap()];
        registry.add(with_file).await;

        registry
            .update(
                "biology",
                &SubjectPatch {
                    exam_date: None,
                    materials: Some(vec![MaterialRef::new("genes.pdf").unwrap()]),
                },
            )
            .await;
        let names: Vec<_> = registry
            .find("Biology")
            .unwrap()
            .materials()
            .iter()
            .map(MaterialRef::name)
            .collect();
        assert_eq!(names, ["genes.pdf"]);
    }

    #[tokio::test]
    async fn registry_allows_duplicates_and_removes_them_together() {
        let (_, mut registry) = registry();
        let first = registry.add(draft("History")).await.value;
        let second = registry.add(draft("history")).await.value;
        assert_ne!(first, second);
        assert_eq!(registry.subjects().len(), 2);

        assert_eq!(registry.remove("HISTORY").await.value, 2);
    }

    #[tokio::test]
    async fn hydrate_reads_snapshot_and_tolerates_garbage() {
        let (repo, mut registry) = registry();
        registry.add(draft("Math")).await;

        let mut reloaded = SubjectRegistry::new(
            Snapshots::new(Arc::new(repo.clone())),
            SnapshotKey::subjects(),
        );
        reloaded.hydrate().await;
        assert!(reloaded.contains("math"));

        repo.write(&SnapshotKey::subjects(), "[{\"id\":").await.unwrap();
        reloaded.hydrate().await;
        assert!(reloaded.subjects().is_empty());
    }

    #[tokio::test]
    async fn switch_scope_loads_other_list() {
        let (repo, mut registry) = registry();
        registry.add(draft("Shared")).await;

        registry
            .switch_scope(SnapshotKey::subjects_for("ada@example.com"))
            .await;
        assert!(registry.subjects().is_empty());
        registry.add(draft("Private")).await;

        registry.switch_scope(SnapshotKey::subjects()).await;
        assert!(registry.contains("shared"));
        assert!(!registry.contains("private"));
        assert!(
            repo.read(&SnapshotKey::subjects_for("ada@example.com"))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn failed_write_keeps_change_in_memory() {
        let mut registry =
            SubjectRegistry::new(Snapshots::new(Arc::new(ReadOnlyRepository)), SnapshotKey::subjects());
        let added = registry.add(draft("Math")).await;
        assert!(!added.durability.is_persisted());
        assert!(registry.contains("math"));
    }

    #[tokio::test]
    async fn exam_dates_follow_subjects() {
        let (_, mut registry) = registry();
        let mut later = draft("Art");
        later.exam_date = date(2026, 2, 1);
        registry.add(later).await;
        registry.add(draft("Math")).await;
        assert_eq!(registry.exam_dates().min(), Some(date(2025, 12, 1)));
    }
}
