//! Keyed storage interface for records that live outside the relational schema.
//!
//! Handlers receive an `Arc<dyn Storage<T>>` instead of reaching for a global
//! map, so a database-backed implementation can replace `InMemoryStorage`
//! without touching the routes.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Another record already holds a value that must be unique
    #[error("conflicts with record {0}")]
    Conflict(Uuid),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Get, list, upsert and delete records keyed by id.
#[async_trait]
pub trait Storage<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, id: Uuid) -> Result<Option<T>>;

    async fn list(&self) -> Result<Vec<T>>;

    /// Insert or replace the record stored under `id`; returns the previous value.
    async fn upsert(&self, id: Uuid, value: T) -> Result<Option<T>>;

    /// Like `upsert`, but fails with `StorageError::Conflict` when any record
    /// stored under a different id matches `conflicts`. The check and the
    /// write happen atomically.
    async fn upsert_unless(
        &self,
        id: Uuid,
        value: T,
        conflicts: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Option<T>>;

    /// Remove the record under `id`; returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Process-local storage backed by a `HashMap`.
#[derive(Debug)]
pub struct InMemoryStorage<T> {
    records: RwLock<HashMap<Uuid, T>>,
}

impl<T> InMemoryStorage<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for InMemoryStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Storage<T> for InMemoryStorage<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn upsert(&self, id: Uuid, value: T) -> Result<Option<T>> {
        Ok(self.records.write().await.insert(id, value))
    }

    async fn upsert_unless(
        &self,
        id: Uuid,
        value: T,
        conflicts: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Option<T>> {
        let mut records = self.records.write().await;
        if let Some((&other, _)) = records
            .iter()
            .find(|(key, existing)| **key != id && conflicts(existing))
        {
            return Err(StorageError::Conflict(other));
        }
        Ok(records.insert(id, value))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_upsert_then_get() {
        let store = InMemoryStorage::new();
        let id = Uuid::new_v4();

        assert_eq!(store.upsert(id, "first".to_string()).await.unwrap(), None);
        assert_eq!(store.get(id).await.unwrap(), Some("first".to_string()));

        let previous = store.upsert(id, "second".to_string()).await.unwrap();
        assert_eq!(previous, Some("first".to_string()));
        assert_eq!(store.get(id).await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store: InMemoryStorage<u32> = InMemoryStorage::new();
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = InMemoryStorage::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.upsert(a, 1u32).await.unwrap();
        store.upsert(b, 2u32).await.unwrap();

        let mut values = store.list().await.unwrap();
        values.sort();
        assert_eq!(values, vec![1, 2]);

        assert!(store.delete(a).await.unwrap());
        assert_eq!(store.list().await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_upsert_unless_rejects_conflicting_record() {
        let store = InMemoryStorage::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.upsert(a, "9876543210".to_string()).await.unwrap();

        let result = store
            .upsert_unless(b, "9876543210".to_string(), &|v: &String| v == "9876543210")
            .await;
        assert!(matches!(result, Err(StorageError::Conflict(id)) if id == a));
        assert_eq!(store.get(b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_unless_ignores_own_record() {
        let store = InMemoryStorage::new();
        let a = Uuid::new_v4();
        store.upsert(a, 7u32).await.unwrap();

        let previous = store.upsert_unless(a, 7u32, &|v: &u32| *v == 7).await.unwrap();
        assert_eq!(previous, Some(7));
    }

    #[tokio::test]
    async fn test_concurrent_upsert_unless_admits_one() {
        let store: Arc<dyn Storage<String>> = Arc::new(InMemoryStorage::new());

        let attempts = (0..16).map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .upsert_unless(Uuid::new_v4(), "same".to_string(), &|v: &String| v == "same")
                    .await
            })
        });

        let mut stored = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            if attempt.await.unwrap().is_ok() {
                stored += 1;
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let store: Arc<dyn Storage<String>> = Arc::new(InMemoryStorage::new());
        let id = Uuid::new_v4();
        store.upsert(id, "kart".to_string()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap().as_deref(), Some("kart"));
    }
}
