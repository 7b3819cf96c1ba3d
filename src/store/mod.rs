//! Typed persistence for users and quests over the document-store port.
//!
//! Documents are serialized as YAML and written through the
//! `DocumentStore` boundary, so the same code works against the live
//! filesystem store and the in-memory store used by tests. The user
//! store carries the per-user optimistic retry loop that serializes
//! memory updates (two concurrent completions must not lose one
//! increment to a last-write-wins race).

use tracing::warn;

use crate::error::EngineError;
use crate::ports::{DocumentStore, Expected, StoreError};
use crate::quest::Quest;
use crate::user::User;

/// Collection name for user documents.
const USERS: &str = "users";

/// Collection name for quest documents.
const QUESTS: &str = "quests";

/// Conditional-write attempts before giving up on a memory update.
const UPDATE_ATTEMPTS: u32 = 3;

/// Typed store for user documents.
pub struct UserStore<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> UserStore<'a> {
    /// Creates a user store over the given backend.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Loads a user, or `None` if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the document is corrupt.
    pub fn load(&self, id: &str) -> Result<Option<User>, EngineError> {
        let Some(raw) = self.store.load(USERS, id)? else {
            return Ok(None);
        };
        let user = serde_yaml::from_str(&raw.body)
            .map_err(|e| EngineError::Corrupt(format!("user {id}: {e}")))?;
        Ok(Some(user))
    }

    /// Creates a new user document; the ID must be unused.
    ///
    /// # Errors
    ///
    /// Returns an error if the user already exists or the backend fails.
    pub fn create(&self, user: &User) -> Result<(), EngineError> {
        let body = serde_yaml::to_string(user)
            .map_err(|e| EngineError::Corrupt(format!("user {}: {e}", user.id)))?;
        self.store.save(USERS, &user.id, &body, Expected::New)?;
        Ok(())
    }

    /// Applies `mutate` to the user under an optimistic-concurrency loop.
    ///
    /// Each attempt re-reads the document, reapplies the mutation to the
    /// fresh copy, and performs a conditional write at the read revision.
    /// A revision conflict means another writer got in between; the delta
    /// is then reapplied to their result rather than overwriting it.
    /// Returns the user as written.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UserNotFound`] if the ID is unknown, and
    /// [`EngineError::ConcurrentMemoryUpdate`] once retries are exhausted.
    pub fn update<F>(&self, id: &str, mut mutate: F) -> Result<User, EngineError>
    where
        F: FnMut(&mut User),
    {
        for attempt in 1..=UPDATE_ATTEMPTS {
            let Some(raw) = self.store.load(USERS, id)? else {
                return Err(EngineError::UserNotFound(id.to_string()));
            };
            let mut user: User = serde_yaml::from_str(&raw.body)
                .map_err(|e| EngineError::Corrupt(format!("user {id}: {e}")))?;
            mutate(&mut user);

            let body = serde_yaml::to_string(&user)
                .map_err(|e| EngineError::Corrupt(format!("user {id}: {e}")))?;
            match self.store.save(USERS, id, &body, Expected::Revision(raw.revision)) {
                Ok(_) => return Ok(user),
                Err(StoreError::Conflict { .. }) => {
                    warn!(user_id = id, attempt, "memory update conflicted, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }
        Err(EngineError::ConcurrentMemoryUpdate { attempts: UPDATE_ATTEMPTS })
    }
}

/// Typed store for quest documents.
pub struct QuestStore<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> QuestStore<'a> {
    /// Creates a quest store over the given backend.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Loads a quest along with its revision, or `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the document is corrupt.
    pub fn load(&self, id: &str) -> Result<Option<(Quest, u64)>, EngineError> {
        let Some(raw) = self.store.load(QUESTS, id)? else {
            return Ok(None);
        };
        let quest = serde_yaml::from_str(&raw.body)
            .map_err(|e| EngineError::Corrupt(format!("quest {id}: {e}")))?;
        Ok(Some((quest, raw.revision)))
    }

    /// Creates a new quest document; the ID must be unused.
    ///
    /// # Errors
    ///
    /// Returns an error if the quest already exists or the backend fails.
    pub fn create(&self, quest: &Quest) -> Result<(), EngineError> {
        let body = serde_yaml::to_string(quest)
            .map_err(|e| EngineError::Corrupt(format!("quest {}: {e}", quest.id)))?;
        self.store.save(QUESTS, &quest.id, &body, Expected::New)?;
        Ok(())
    }

    /// Writes back a quest previously loaded at `revision`.
    ///
    /// # Errors
    ///
    /// Returns an error on revision conflict or backend failure.
    pub fn save(&self, quest: &Quest, revision: u64) -> Result<u64, EngineError> {
        let body = serde_yaml::to_string(quest)
            .map_err(|e| EngineError::Corrupt(format!("quest {}: {e}", quest.id)))?;
        Ok(self
            .store
            .save(QUESTS, &quest.id, &body, Expected::Revision(revision))?)
    }

    /// Loads every quest belonging to one user, most recently created
    /// first (the order main-quest selection breaks ties by).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or a document is corrupt.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<(Quest, u64)>, EngineError> {
        let mut quests = Vec::new();
        for id in self.store.list(QUESTS)? {
            if let Some((quest, revision)) = self.load(&id)? {
                if quest.user_id == user_id {
                    quests.push((quest, revision));
                }
            }
        }
        quests.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at));
        Ok(quests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryDocStore;
    use crate::ports::RawDocument;
    use crate::user::OnboardingSettings;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn sample_user(id: &str) -> User {
        User::new(
            id.into(),
            "Robin".into(),
            OnboardingSettings::default(),
            Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn create_and_load_round_trips() {
        let backend = MemoryDocStore::new();
        let users = UserStore::new(&backend);
        users.create(&sample_user("u-1")).unwrap();

        let loaded = users.load("u-1").unwrap().expect("user exists");
        assert_eq!(loaded.id, "u-1");
        assert_eq!(loaded.name, "Robin");
    }

    #[test]
    fn load_missing_user_is_none() {
        let backend = MemoryDocStore::new();
        let users = UserStore::new(&backend);
        assert!(users.load("nope").unwrap().is_none());
    }

    #[test]
    fn duplicate_create_conflicts() {
        let backend = MemoryDocStore::new();
        let users = UserStore::new(&backend);
        users.create(&sample_user("u-1")).unwrap();
        let err = users.create(&sample_user("u-1")).unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::Conflict { .. })));
    }

    #[test]
    fn update_applies_mutation() {
        let backend = MemoryDocStore::new();
        let users = UserStore::new(&backend);
        users.create(&sample_user("u-1")).unwrap();

        let updated = users.update("u-1", |user| user.stats.xp += 50).unwrap();
        assert_eq!(updated.stats.xp, 50);
        assert_eq!(users.load("u-1").unwrap().unwrap().stats.xp, 50);
    }

    #[test]
    fn update_missing_user_reports_not_found() {
        let backend = MemoryDocStore::new();
        let users = UserStore::new(&backend);
        let err = users.update("ghost", |_| {}).unwrap_err();
        assert!(matches!(err, EngineError::UserNotFound(_)));
    }

    /// Backend that invalidates the caller's read once, simulating a
    /// concurrent writer landing between load and save.
    struct ConflictingOnce {
        inner: MemoryDocStore,
        conflicts_left: AtomicU32,
    }

    impl DocumentStore for ConflictingOnce {
        fn load(&self, collection: &str, id: &str) -> Result<Option<RawDocument>, StoreError> {
            self.inner.load(collection, id)
        }

        fn save(
            &self,
            collection: &str,
            id: &str,
            body: &str,
            expected: Expected,
        ) -> Result<u64, StoreError> {
            let interfere = self
                .conflicts_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if interfere {
                // A competing writer lands between the caller's read and
                // write: rewrite the current body, bumping the revision so
                // the caller's conditional write fails.
                if let Some(raw) = self.inner.load(collection, id)? {
                    self.inner.save(
                        collection,
                        id,
                        &raw.body,
                        Expected::Revision(raw.revision),
                    )?;
                }
            }
            self.inner.save(collection, id, body, expected)
        }

        fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
            self.inner.list(collection)
        }
    }

    #[test]
    fn update_retries_through_a_conflict() {
        let backend = ConflictingOnce {
            inner: MemoryDocStore::new(),
            conflicts_left: AtomicU32::new(1),
        };
        UserStore::new(&backend.inner).create(&sample_user("u-1")).unwrap();

        let users = UserStore::new(&backend);
        let updated = users.update("u-1", |user| user.stats.xp += 50).unwrap();
        assert_eq!(updated.stats.xp, 50);
    }

    #[test]
    fn update_exhausts_retries_under_constant_conflict() {
        let backend = ConflictingOnce {
            inner: MemoryDocStore::new(),
            conflicts_left: AtomicU32::new(u32::MAX),
        };
        UserStore::new(&backend.inner).create(&sample_user("u-1")).unwrap();

        let users = UserStore::new(&backend);
        let err = users.update("u-1", |user| user.stats.xp += 50).unwrap_err();
        assert!(matches!(err, EngineError::ConcurrentMemoryUpdate { .. }));
    }
}
