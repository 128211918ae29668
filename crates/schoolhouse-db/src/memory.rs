//! In-process backend.
//!
//! Documents live in a `tokio::sync::RwLock`-guarded map. Each write takes the
//! write lock for the whole collection map, so single-document writes are
//! atomic and unique-field checks cannot interleave with other writes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Collection, DocumentStore, Filter, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    body: Value,
}

#[derive(Debug, Default)]
struct Collections {
    documents: HashMap<Collection, HashMap<Uuid, StoredDocument>>,
    next_seq: u64,
}

impl Collections {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn check_unique(&self, collection: Collection, id: Uuid, body: &Value) -> StoreResult<()> {
        let Some(documents) = self.documents.get(&collection) else {
            return Ok(());
        };

        for &field in collection.unique_fields() {
            let Some(value) = body.get(field).and_then(Value::as_str) else {
                continue;
            };

            let taken = documents.iter().any(|(other_id, other)| {
                *other_id != id
                    && other
                        .body
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|existing| existing.eq_ignore_ascii_case(value))
            });

            if taken {
                return Err(StoreError::Duplicate { collection, field });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .map(|stored| stored.body.clone()))
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>> {
        let inner = self.inner.read().await;
        let Some(documents) = inner.documents.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<&StoredDocument> = documents
            .values()
            .filter(|stored| filter.matches(&stored.body))
            .collect();
        matches.sort_by_key(|stored| stored.seq);

        Ok(matches.into_iter().map(|stored| stored.body.clone()).collect())
    }

    async fn insert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()> {
        let mut inner = self.inner.write().await;

        let exists = inner
            .documents
            .get(&collection)
            .is_some_and(|documents| documents.contains_key(&id));
        if exists {
            return Err(StoreError::Duplicate {
                collection,
                field: "id",
            });
        }
        inner.check_unique(collection, id, &document)?;

        let seq = inner.next_seq();
        inner.documents.entry(collection).or_default().insert(
            id,
            StoredDocument {
                seq,
                body: document,
            },
        );
        Ok(())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        document: Value,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        inner.check_unique(collection, id, &document)?;

        match inner
            .documents
            .get_mut(&collection)
            .and_then(|documents| documents.get_mut(&id))
        {
            Some(stored) => {
                stored.body = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert(&self, collection: Collection, id: Uuid, document: Value) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.check_unique(collection, id, &document)?;

        let seq = inner.next_seq();
        inner
            .documents
            .entry(collection)
            .or_default()
            .entry(id)
            .and_modify(|stored| stored.body = document.clone())
            .or_insert(StoredDocument {
                seq,
                body: document,
            });
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .documents
            .get_mut(&collection)
            .is_some_and(|documents| documents.remove(&id).is_some()))
    }
}
