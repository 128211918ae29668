//! Backend trait and typed facade.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use schoolhouse_config::{DatabaseConfig, StoreBackend};

use crate::{Collection, Filter, MemoryStore, PgStore, StoreResult};

/// A backend holding JSON documents grouped by [`Collection`].
///
/// Implementations must make every single-document write atomic and must
/// reject writes that violate [`Collection::unique_fields`] with
/// [`crate::StoreError::Duplicate`].
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Backend name, for logging.
    fn backend_name(&self) -> &'static str;

    async fn get(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>>;

    /// Documents matching `filter`, oldest first.
    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>>;

    /// Fails with `Duplicate` if `id` already exists.
    async fn insert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()>;

    /// Returns `false` when there is no document with `id`.
    async fn replace(&self, collection: Collection, id: Uuid, document: Value)
    -> StoreResult<bool>;

    /// Inserts or replaces the document with `id`.
    async fn upsert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()>;

    /// Returns `false` when there is no document with `id`.
    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<bool>;
}

/// A typed document stored in a fixed collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;
}

/// Cheaply cloneable handle over a [`DocumentStore`], with typed accessors.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn DocumentStore>,
}

impl Store {
    pub fn new<S: DocumentStore>(backend: S) -> Self {
        Self {
            inner: Arc::new(backend),
        }
    }

    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Opens the backend selected by `config`, running migrations for Postgres.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let store = match &config.backend {
            StoreBackend::Memory => Self::memory(),
            StoreBackend::Postgres(url) => {
                Self::new(PgStore::connect(url, config.max_connections).await?)
            }
        };

        tracing::info!(backend = store.backend_name(), "Document store ready");
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    pub async fn get<T: Document>(&self, id: Uuid) -> StoreResult<Option<T>> {
        match self.inner.get(T::COLLECTION, id).await? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }

    pub async fn find<T: Document>(&self, filter: &Filter) -> StoreResult<Vec<T>> {
        self.inner
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|body| serde_json::from_value(body).map_err(Into::into))
            .collect()
    }

    pub async fn find_one<T: Document>(&self, filter: &Filter) -> StoreResult<Option<T>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    pub async fn insert<T: Document>(&self, document: &T) -> StoreResult<()> {
        let body = serde_json::to_value(document)?;
        self.inner.insert(T::COLLECTION, document.id(), body).await
    }

    pub async fn replace<T: Document>(&self, document: &T) -> StoreResult<bool> {
        let body = serde_json::to_value(document)?;
        self.inner.replace(T::COLLECTION, document.id(), body).await
    }

    pub async fn upsert<T: Document>(&self, document: &T) -> StoreResult<()> {
        let body = serde_json::to_value(document)?;
        self.inner.upsert(T::COLLECTION, document.id(), body).await
    }

    pub async fn delete<T: Document>(&self, id: Uuid) -> StoreResult<bool> {
        self.inner.delete(T::COLLECTION, id).await
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        tags: Vec<String>,
        body: String,
    }

    impl Document for Note {
        const COLLECTION: Collection = Collection::Events;

        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn note(body: &str, tags: &[&str]) -> Note {
        Note {
            id: Uuid::new_v4(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let store = Store::memory();
        let first = note("first", &["a"]);
        let second = note("second", &["a", "b"]);

        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        assert_eq!(store.get::<Note>(first.id).await.unwrap(), Some(first.clone()));

        let tagged: Vec<Note> = store.find(&Filter::new().contains("tags", "b")).await.unwrap();
        assert_eq!(tagged, vec![second.clone()]);

        let all: Vec<Note> = store.find(&Filter::new()).await.unwrap();
        assert_eq!(all, vec![first.clone(), second.clone()]);
    }

    #[tokio::test]
    async fn test_replace_and_delete() {
        let store = Store::memory();
        let mut item = note("draft", &[]);

        assert!(!store.replace(&item).await.unwrap());
        store.insert(&item).await.unwrap();

        item.body = "final".to_string();
        assert!(store.replace(&item).await.unwrap());
        assert_eq!(store.get::<Note>(item.id).await.unwrap().unwrap().body, "final");

        assert!(store.delete::<Note>(item.id).await.unwrap());
        assert!(!store.delete::<Note>(item.id).await.unwrap());
        assert!(store.get::<Note>(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let store = Store::connect(&DatabaseConfig::memory()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert_eq!(format!("{:?}", store), r#"Store { backend: "memory" }"#);
    }
}
