//! Almacén de documentos en memoria
//!
//! Implementación de `DocumentStore` sobre un mapa protegido por `RwLock`.
//! Se usa en los tests y con `STORE_BACKEND=memory` en desarrollo.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Document, DocumentStore, FieldFilter, Record, StoreError};

type Collections = HashMap<String, BTreeMap<String, Record>>;

#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de documentos en una colección
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, record: Record) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        debug!("💾 Documento creado en memoria: {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Record) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (key, value) in fields {
            record.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .map_or(false, |docs| docs.remove(id).is_some()))
    }

    fn stream<'a>(
        &'a self,
        collection: &'a str,
        filters: Vec<FieldFilter>,
        limit: Option<usize>,
    ) -> BoxStream<'a, Result<Document, StoreError>> {
        let snapshot = async move {
            let collections = self.collections.read().await;
            let matching: Vec<Result<Document, StoreError>> = collections
                .get(collection)
                .into_iter()
                .flat_map(|docs| docs.iter())
                .filter(|(_, data)| filters.iter().all(|f| f.matches(data)))
                .take(limit.unwrap_or(usize::MAX))
                .map(|(id, data)| {
                    Ok(Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                })
                .collect();
            stream::iter(matching)
        };

        stream::once(snapshot).flatten().boxed()
    }
}
