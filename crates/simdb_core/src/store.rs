//! Entity store for CRUD operations.

use crate::config::{document_name, StoreConfig};
use crate::error::{CoreError, CoreResult};
use crate::identity::{Entity, Identity};
use chrono::{DateTime, Utc};
use simdb_storage::{ArchiveBackend, BackendKind, DocumentBackend, FileBackend};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// A mutator applied to an owned copy of a record by
/// [`EntityStore::update_field`].
pub type Mutator<'a, T> = &'a dyn Fn(&mut T);

/// An in-memory working set of records of one type, persisted as a single
/// envelope document.
///
/// The store owns its records exclusively. Readers receive clones; writers
/// hand in owned values. Every mutating call writes the whole document back
/// through the backend before returning.
///
/// # Identity
///
/// Identities are allocated by the store as `1 + max(existing)`, or `1` on an
/// empty store. Values set by the caller before [`insert`](Self::insert) are
/// ignored. Allocation only sees this instance's working set: two stores
/// over the same target can hand out the same identity and overwrite each
/// other's documents.
///
/// # Example
///
/// ```rust,ignore
/// use simdb_core::{EntityStore, StoreConfig};
///
/// let mut users: EntityStore<User> = EntityStore::open(&StoreConfig::default())?;
///
/// let alice = users.insert(User::new("Alice"))?;
/// assert_eq!(alice.id, 1);
///
/// users.update_field(alice.id, None, &[&|u: &mut User| u.name = "Alicia".into()])?;
/// let adults = users.get_all(Some(&|u: &User| u.age >= 18));
///
/// users.dispose()?;
/// ```
pub struct EntityStore<T: Entity> {
    /// Resolved identity field of `T`.
    identity: Identity<T>,
    /// Record type name, used in the document and in errors.
    type_name: String,
    /// Persistence target.
    backend: Box<dyn DocumentBackend>,
    /// Working set in insertion order.
    records: Vec<T>,
    /// Time of the last successful save.
    last_update: Option<DateTime<Utc>>,
    /// Number of successful saves on the document.
    total_change: u64,
}

impl<T: Entity> EntityStore<T> {
    /// Opens the store for `T` as described by `config`.
    ///
    /// In archive mode the document is the entry `<TypeName>.json` of the
    /// configured archive. In plain-file mode it is the configured file, or
    /// `<base_dir>/<TypeName>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if `T` has no identity field, and
    /// storage or codec errors if the existing document cannot be loaded.
    pub fn open(config: &StoreConfig) -> CoreResult<Self> {
        let identity = Identity::<T>::resolve()?;
        let type_name = T::type_name();

        let backend: Box<dyn DocumentBackend> = if config.use_archive {
            Box::new(ArchiveBackend::new(
                config.resolved_archive_path(),
                document_name(&type_name),
            ))
        } else {
            Box::new(FileBackend::new(config.resolved_file_path(&type_name)))
        };

        Self::with_parts(identity, type_name, backend)
    }

    /// Opens the store for `T` over an explicit backend.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn with_backend(backend: impl DocumentBackend + 'static) -> CoreResult<Self> {
        let identity = Identity::<T>::resolve()?;
        Self::with_parts(identity, T::type_name(), Box::new(backend))
    }

    fn with_parts(
        identity: Identity<T>,
        type_name: String,
        backend: Box<dyn DocumentBackend>,
    ) -> CoreResult<Self> {
        let mut store = Self {
            identity,
            type_name,
            backend,
            records: Vec::new(),
            last_update: None,
            total_change: 0,
        };
        store.load()?;
        Ok(store)
    }

    /// Reloads the working set from the backend.
    ///
    /// Records with a repeated identity are dropped, keeping the first one in
    /// document order. If the document does not exist the working set is
    /// cleared; plain-file stores then save immediately so the file exists.
    ///
    /// Returns a copy of the adopted working set.
    ///
    /// # Errors
    ///
    /// Returns storage or codec errors. The working set is left untouched
    /// when reading or decoding fails.
    pub fn load(&mut self) -> CoreResult<Vec<T>> {
        match self.backend.read()? {
            Some(bytes) => {
                let envelope = simdb_codec::decode::<T>(&bytes)?;
                let decoded = envelope.records.len();
                self.records = self.dedupe(envelope.records);
                self.last_update = envelope.last_update;
                self.total_change = envelope.total_change;

                debug!(
                    type_name = %self.type_name,
                    target = %self.backend.describe(),
                    records = self.records.len(),
                    total_change = self.total_change,
                    "loaded document"
                );
                if decoded != self.records.len() {
                    warn!(
                        type_name = %self.type_name,
                        dropped = decoded - self.records.len(),
                        "dropped records with duplicate identity"
                    );
                }
            }
            None => {
                self.records.clear();
                self.last_update = None;
                self.total_change = 0;

                debug!(
                    type_name = %self.type_name,
                    target = %self.backend.describe(),
                    "no document found, starting empty"
                );
                if self.backend.kind() == BackendKind::File {
                    self.save()?;
                }
            }
        }
        Ok(self.records.clone())
    }

    fn dedupe(&self, records: Vec<T>) -> Vec<T> {
        let mut seen = HashSet::with_capacity(records.len());
        records
            .into_iter()
            .filter(|record| seen.insert(self.identity.get(record)))
            .collect()
    }

    /// Inserts `record` under a freshly allocated identity and saves.
    ///
    /// Any identity already set on `record` is overwritten. Returns the
    /// record as stored. If the save fails the record is not kept.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the identity field of `T`
    /// cannot be written, [`CoreError::IdentityOverflow`] if the identity
    /// space is used up, and storage or codec errors from the save.
    pub fn insert(&mut self, mut record: T) -> CoreResult<T> {
        let id = self.allocate_id()?;
        self.identity.assign(&mut record, id)?;
        self.records.push(record.clone());
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(record)
    }

    /// Replaces the stored record with the same identity as `record`,
    /// keeping its position, and saves.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no such record exists, and storage
    /// or codec errors from the save. The store is unchanged on any error.
    pub fn update(&mut self, record: T) -> CoreResult<()> {
        let id = self.identity.get(&record);
        let position = self
            .position(id)
            .ok_or_else(|| CoreError::not_found(self.type_name.as_str(), id))?;
        let previous = std::mem::replace(&mut self.records[position], record);
        if let Err(e) = self.save() {
            self.records[position] = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Applies `mutators` in order to a copy of record `id` and stores the
    /// result through [`update`](Self::update).
    ///
    /// When `replacement` is given it is used as the starting value instead
    /// of the stored record; its own identity decides which record is
    /// replaced. If no record `id` exists this does nothing.
    ///
    /// # Errors
    ///
    /// Same as [`update`](Self::update).
    pub fn update_field(
        &mut self,
        id: i64,
        replacement: Option<T>,
        mutators: &[Mutator<'_, T>],
    ) -> CoreResult<()> {
        let Some(current) = self.get_by_id(id) else {
            return Ok(());
        };

        let mut working = replacement.unwrap_or(current);
        for mutate in mutators {
            mutate(&mut working);
        }
        self.update(working)
    }

    /// Removes record `id` and saves. Returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no such record exists, and storage
    /// or codec errors from the save. The store is unchanged on any error.
    pub fn delete(&mut self, id: i64) -> CoreResult<T> {
        let position = self
            .position(id)
            .ok_or_else(|| CoreError::not_found(self.type_name.as_str(), id))?;
        let removed = self.records.remove(position);
        if let Err(e) = self.save() {
            self.records.insert(position, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Returns copies of all records matching `predicate`, in insertion
    /// order. `None` matches everything.
    pub fn get_all(&self, predicate: Option<&dyn Fn(&T) -> bool>) -> Vec<T> {
        match predicate {
            Some(predicate) => self
                .records
                .iter()
                .filter(|record| predicate(record))
                .cloned()
                .collect(),
            None => self.records.clone(),
        }
    }

    /// Returns copies of all records, in insertion order.
    pub fn all(&self) -> Vec<T> {
        self.get_all(None)
    }

    /// Returns a copy of record `id`, or `None` if it does not exist.
    pub fn get_by_id(&self, id: i64) -> Option<T> {
        self.position(id).map(|position| self.records[position].clone())
    }

    /// Returns true if record `id` exists.
    pub fn contains(&self, id: i64) -> bool {
        self.position(id).is_some()
    }

    /// Returns the identity the next insert would receive.
    ///
    /// This is `1 + max(identity)` over the working set, or `1` when it is
    /// empty. Gaps left by deletions are not reused.
    ///
    /// Saturates at `i64::MAX`: once a record holds that identity the value
    /// returned is already taken, and [`insert`](Self::insert) fails with
    /// [`CoreError::IdentityOverflow`] instead.
    pub fn recalculate_next_id(&self) -> i64 {
        self.max_id().map_or(1, |max| max.saturating_add(1))
    }

    fn allocate_id(&self) -> CoreResult<i64> {
        match self.max_id() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| CoreError::IdentityOverflow {
                type_name: self.type_name.clone(),
            }),
        }
    }

    fn max_id(&self) -> Option<i64> {
        self.records.iter().map(|r| self.identity.get(r)).max()
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records
            .iter()
            .position(|record| self.identity.get(record) == id)
    }

    /// Writes the working set to the backend.
    ///
    /// Increments the change counter and stamps the current time. Both are
    /// only committed in memory once the write succeeds.
    ///
    /// # Errors
    ///
    /// Returns codec or storage errors. A failed write may leave the target
    /// partially written.
    pub fn save(&mut self) -> CoreResult<()> {
        let total_change = self.total_change + 1;
        let last_update = Utc::now();

        let bytes = simdb_codec::encode(
            &self.type_name,
            &self.records,
            Some(last_update),
            total_change,
        )?;
        self.backend.write(&bytes)?;

        self.total_change = total_change;
        self.last_update = Some(last_update);
        debug!(
            type_name = %self.type_name,
            target = %self.backend.describe(),
            records = self.records.len(),
            total_change,
            "saved document"
        );
        Ok(())
    }

    /// Saves one final time and closes the store.
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save).
    pub fn dispose(mut self) -> CoreResult<()> {
        self.save()
    }

    /// Returns the time of the last successful save, if any.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Returns the number of successful saves on the document.
    pub fn total_change(&self) -> u64 {
        self.total_change
    }

    /// Returns the number of records in the working set.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the resolved identity of `T`.
    pub fn identity(&self) -> &Identity<T> {
        &self.identity
    }

    /// Returns the persistence strategy.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Returns a description of the persistence target.
    pub fn target(&self) -> String {
        self.backend.describe()
    }
}

impl<T: Entity> fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("type_name", &self.type_name)
            .field("target", &self.backend.describe())
            .field("records", &self.records.len())
            .field("total_change", &self.total_change)
            .field("last_update", &self.last_update)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityField;
    use serde::{Deserialize, Serialize};
    use simdb_storage::{InMemoryBackend, StorageError, StorageResult};
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Task {
        id: i64,
        title: String,
        done: bool,
    }

    impl Task {
        fn new(title: &str) -> Self {
            Self {
                id: 0,
                title: title.to_string(),
                done: false,
            }
        }
    }

    impl Entity for Task {
        fn identity_fields() -> Vec<IdentityField<Self>> {
            vec![IdentityField::<Self>::new("id", |t| t.id).writable(|t, id| t.id = id)]
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Sealed {
        id: i64,
    }

    impl Entity for Sealed {
        fn identity_fields() -> Vec<IdentityField<Self>> {
            vec![IdentityField::<Self>::new("id", |s| s.id)]
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Blob {
        payload: String,
    }

    impl Entity for Blob {}

    fn create_test_store() -> (EntityStore<Task>, InMemoryBackend) {
        let backend = InMemoryBackend::new();
        let store = EntityStore::with_backend(backend.clone()).unwrap();
        (store, backend)
    }

    fn ids(store: &EntityStore<Task>) -> Vec<i64> {
        store.all().iter().map(|t| t.id).collect()
    }

    #[test]
    fn new_store_is_empty() {
        let (store, backend) = create_test_store();

        assert!(store.is_empty());
        assert_eq!(store.total_change(), 0);
        assert_eq!(store.last_update(), None);
        assert_eq!(store.recalculate_next_id(), 1);
        assert_eq!(store.backend_kind(), BackendKind::Memory);
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let (mut store, backend) = create_test_store();

        let a = store.insert(Task::new("a")).unwrap();
        let b = store.insert(Task::new("b")).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.total_change(), 2);
        assert!(store.last_update().is_some());
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn insert_ignores_caller_identity() {
        let (mut store, _) = create_test_store();

        let mut task = Task::new("preset");
        task.id = 99;
        let stored = store.insert(task).unwrap();

        assert_eq!(stored.id, 1);
        assert!(store.get_by_id(99).is_none());
    }

    #[test]
    fn update_replaces_in_place() {
        let (mut store, _) = create_test_store();
        for title in ["a", "b", "c"] {
            store.insert(Task::new(title)).unwrap();
        }

        let mut b = store.get_by_id(2).unwrap();
        b.title = "X".to_string();
        store.update(b).unwrap();

        assert_eq!(store.get_by_id(2).unwrap().title, "X");
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.total_change(), 4);
    }

    #[test]
    fn update_missing_is_not_found() {
        let (mut store, backend) = create_test_store();
        store.insert(Task::new("a")).unwrap();

        let mut ghost = Task::new("ghost");
        ghost.id = 42;
        let err = store.update(ghost).unwrap_err();

        assert!(matches!(err, CoreError::NotFound { id: 42, .. }));
        assert_eq!(store.total_change(), 1);
        assert_eq!(backend.write_count(), 1);
        assert_eq!(store.all(), vec![Task { id: 1, title: "a".into(), done: false }]);
    }

    #[test]
    fn delete_removes_and_saves() {
        let (mut store, _) = create_test_store();
        store.insert(Task::new("a")).unwrap();
        store.insert(Task::new("b")).unwrap();

        let removed = store.delete(2).unwrap();

        assert_eq!(removed.title, "b");
        assert_eq!(ids(&store), vec![1]);
        assert!(store.get_by_id(2).is_none());
        assert_eq!(store.total_change(), 3);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let (mut store, _) = create_test_store();
        store.insert(Task::new("a")).unwrap();

        let err = store.delete(5).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_change(), 1);
    }

    #[test]
    fn next_id_ignores_gaps() {
        let (mut store, _) = create_test_store();
        for title in ["a", "b", "c"] {
            store.insert(Task::new(title)).unwrap();
        }

        store.delete(2).unwrap();
        assert_eq!(store.recalculate_next_id(), 4);

        store.delete(3).unwrap();
        assert_eq!(store.recalculate_next_id(), 2);

        let d = store.insert(Task::new("d")).unwrap();
        assert_eq!(d.id, 2);
    }

    #[test]
    fn update_field_applies_mutators_in_order() {
        let (mut store, _) = create_test_store();
        store.insert(Task::new("a")).unwrap();

        store
            .update_field(
                1,
                None,
                &[
                    &|t: &mut Task| t.title.push_str("-1"),
                    &|t: &mut Task| t.title.push_str("-2"),
                    &|t: &mut Task| t.done = true,
                ],
            )
            .unwrap();

        let task = store.get_by_id(1).unwrap();
        assert_eq!(task.title, "a-1-2");
        assert!(task.done);
        assert_eq!(store.total_change(), 2);
    }

    #[test]
    fn update_field_starts_from_replacement() {
        let (mut store, _) = create_test_store();
        store.insert(Task::new("a")).unwrap();

        let replacement = Task {
            id: 1,
            title: "fresh".to_string(),
            done: false,
        };
        store
            .update_field(1, Some(replacement), &[&|t: &mut Task| t.done = true])
            .unwrap();

        let task = store.get_by_id(1).unwrap();
        assert_eq!(task.title, "fresh");
        assert!(task.done);
    }

    #[test]
    fn update_field_missing_is_noop() {
        let (mut store, backend) = create_test_store();
        store.insert(Task::new("a")).unwrap();

        store
            .update_field(7, None, &[&|t: &mut Task| t.done = true])
            .unwrap();

        assert_eq!(store.total_change(), 1);
        assert_eq!(backend.write_count(), 1);
        assert!(!store.get_by_id(1).unwrap().done);
    }

    #[test]
    fn get_all_filters_and_copies() {
        let (mut store, _) = create_test_store();
        for title in ["apple", "banana", "avocado"] {
            store.insert(Task::new(title)).unwrap();
        }

        let a_words = store.get_all(Some(&|t: &Task| t.title.starts_with('a')));
        assert_eq!(
            a_words.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let mut copies = store.all();
        copies[0].title = "mutated".to_string();
        copies.clear();
        assert_eq!(store.get_by_id(1).unwrap().title, "apple");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn reload_sees_saved_state() {
        let (mut store, backend) = create_test_store();
        store.insert(Task::new("a")).unwrap();
        store.insert(Task::new("b")).unwrap();
        let saved_at = store.last_update();

        let reopened: EntityStore<Task> = EntityStore::with_backend(backend).unwrap();
        assert_eq!(ids(&reopened), vec![1, 2]);
        assert_eq!(reopened.total_change(), 2);
        assert_eq!(reopened.last_update(), saved_at);
    }

    #[test]
    fn load_keeps_first_duplicate() {
        let document = br#"{
            "EntityTotalChange": 5,
            "EntityData": [
                {"id": 7, "title": "first", "done": false},
                {"id": 3, "title": "other", "done": false},
                {"id": 7, "title": "second", "done": true}
            ]
        }"#;
        let backend = InMemoryBackend::with_data(document.to_vec());

        let store: EntityStore<Task> = EntityStore::with_backend(backend).unwrap();

        assert_eq!(ids(&store), vec![7, 3]);
        assert_eq!(store.get_by_id(7).unwrap().title, "first");
        assert_eq!(store.total_change(), 5);
        assert_eq!(store.recalculate_next_id(), 8);
    }

    #[test]
    fn explicit_load_adopts_backend_state() {
        let (mut store, mut backend) = create_test_store();
        store.insert(Task::new("a")).unwrap();

        backend
            .write(br#"{"EntityTotalChange": 9, "EntityData": []}"#)
            .unwrap();
        let loaded = store.load().unwrap();

        assert!(loaded.is_empty());
        assert!(store.is_empty());
        assert_eq!(store.total_change(), 9);
    }

    #[test]
    fn malformed_document_fails_open() {
        let backend = InMemoryBackend::with_data(b"{ not json".to_vec());
        let err = EntityStore::<Task>::with_backend(backend).unwrap_err();
        assert!(matches!(err, CoreError::Codec(_)));
    }

    #[test]
    fn empty_document_opens_empty() {
        let backend = InMemoryBackend::with_data(Vec::new());
        let store = EntityStore::<Task>::with_backend(backend).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.total_change(), 0);
    }

    #[test]
    fn type_without_identity_cannot_open() {
        let backend = InMemoryBackend::new();
        let err = EntityStore::<Blob>::with_backend(backend.clone()).unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn read_only_identity_fails_at_insert() {
        let backend = InMemoryBackend::new();
        let mut store = EntityStore::<Sealed>::with_backend(backend.clone()).unwrap();

        let err = store.insert(Sealed { id: 0 }).unwrap_err();

        assert!(err.is_configuration());
        assert!(store.is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn dispose_saves() {
        let (mut store, backend) = create_test_store();
        store.insert(Task::new("a")).unwrap();

        store.dispose().unwrap();

        assert_eq!(backend.write_count(), 2);
        let reopened = EntityStore::<Task>::with_backend(backend).unwrap();
        assert_eq!(reopened.total_change(), 2);
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn identity_overflow() {
        let document = format!(
            r#"{{"EntityData": [{{"id": {}, "title": "max", "done": false}}]}}"#,
            i64::MAX
        );
        let backend = InMemoryBackend::with_data(document.into_bytes());
        let mut store = EntityStore::<Task>::with_backend(backend).unwrap();

        assert_eq!(store.recalculate_next_id(), i64::MAX);
        assert!(store.contains(store.recalculate_next_id()));
        let err = store.insert(Task::new("overflow")).unwrap_err();
        assert!(matches!(err, CoreError::IdentityOverflow { .. }));
        assert_eq!(store.len(), 1);
    }

    /// Memory backend whose writes can be switched to fail.
    #[derive(Clone, Default)]
    struct FailingBackend {
        inner: InMemoryBackend,
        failing: Arc<AtomicBool>,
    }

    impl FailingBackend {
        fn fail_writes(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl DocumentBackend for FailingBackend {
        fn read(&self) -> StorageResult<Option<Vec<u8>>> {
            self.inner.read()
        }

        fn write(&mut self, data: &[u8]) -> StorageResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Io(io::Error::other("disk full")));
            }
            self.inner.write(data)
        }

        fn kind(&self) -> BackendKind {
            BackendKind::Memory
        }

        fn describe(&self) -> String {
            "failing memory".to_string()
        }
    }

    fn create_failing_store() -> (EntityStore<Task>, FailingBackend) {
        let backend = FailingBackend::default();
        let mut store = EntityStore::with_backend(backend.clone()).unwrap();
        store.insert(Task::new("a")).unwrap();
        store.insert(Task::new("b")).unwrap();
        backend.fail_writes(true);
        (store, backend)
    }

    fn assert_matches_backend(store: &EntityStore<Task>, backend: &FailingBackend) {
        let reopened = EntityStore::<Task>::with_backend(backend.clone()).unwrap();
        assert_eq!(store.all(), reopened.all());
        assert_eq!(store.total_change(), reopened.total_change());
        assert_eq!(store.last_update(), reopened.last_update());
    }

    #[test]
    fn failed_insert_keeps_working_set() {
        let (mut store, backend) = create_failing_store();
        let before = store.all();
        let saved_at = store.last_update();

        let err = store.insert(Task::new("c")).unwrap_err();

        assert!(matches!(err, CoreError::Storage(StorageError::Io(_))));
        assert_eq!(store.len(), 2);
        assert_eq!(store.all(), before);
        assert_eq!(store.total_change(), 2);
        assert_eq!(store.last_update(), saved_at);
        assert_matches_backend(&store, &backend);

        backend.fail_writes(false);
        let retried = store.insert(Task::new("c")).unwrap();
        assert_eq!(retried.id, 3);
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_matches_backend(&store, &backend);
    }

    #[test]
    fn failed_update_keeps_previous_record() {
        let (mut store, backend) = create_failing_store();
        let before = store.all();

        let mut changed = store.get_by_id(1).unwrap();
        changed.title = "changed".to_string();
        assert!(store.update(changed).is_err());
        assert!(store
            .update_field(2, None, &[&|t: &mut Task| t.done = true])
            .is_err());

        assert_eq!(store.all(), before);
        assert_eq!(store.total_change(), 2);
        assert_matches_backend(&store, &backend);
    }

    #[test]
    fn failed_delete_restores_position() {
        let (mut store, backend) = create_failing_store();
        backend.fail_writes(false);
        store.insert(Task::new("c")).unwrap();
        backend.fail_writes(true);
        let before = store.all();

        assert!(store.delete(2).is_err());

        assert_eq!(store.all(), before);
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.total_change(), 3);
        assert_matches_backend(&store, &backend);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert,
            Delete(i64),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                2 => Just(Op::Insert),
                1 => (1i64..10).prop_map(Op::Delete),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn inserts_take_one_past_the_maximum(
                ops in prop::collection::vec(op_strategy(), 0..40)
            ) {
                let (mut store, backend) = create_test_store();
                let mut live: Vec<i64> = Vec::new();
                let mut saves = 0u64;

                for op in ops {
                    match op {
                        Op::Insert => {
                            let expected = live.iter().max().map_or(1, |max| max + 1);
                            prop_assert_eq!(store.recalculate_next_id(), expected);
                            let task = store.insert(Task::new("t")).unwrap();
                            prop_assert_eq!(task.id, expected);
                            live.push(expected);
                            saves += 1;
                        }
                        Op::Delete(id) => {
                            let result = store.delete(id);
                            match live.iter().position(|live_id| *live_id == id) {
                                Some(position) => {
                                    prop_assert!(result.is_ok());
                                    live.remove(position);
                                    saves += 1;
                                }
                                None => {
                                    prop_assert!(result.unwrap_err().is_not_found());
                                }
                            }
                        }
                    }

                    prop_assert_eq!(ids(&store), live.clone());
                    prop_assert_eq!(store.total_change(), saves);
                    prop_assert_eq!(backend.write_count(), saves);
                }
            }
        }
    }
}
