//! Almacén de pruebas para las carreras de `update`

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::database::{Document, DocumentStore, FieldFilter, InMemoryDocumentStore, Record, StoreError};

/// Momento en que otro cliente borra el documento
#[derive(Debug, Clone, Copy)]
pub(crate) enum Vanish {
    /// Antes de la escritura: `update` del almacén devuelve `NotFound`
    BeforeWrite,
    /// Después de la escritura: la relectura no encuentra nada
    AfterWrite,
}

/// Delega en `InMemoryDocumentStore`, pero borra el documento durante `update`
pub(crate) struct VanishingStore {
    pub inner: InMemoryDocumentStore,
    pub vanish: Vanish,
}

impl VanishingStore {
    pub fn new(vanish: Vanish) -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            vanish,
        }
    }
}

#[async_trait]
impl DocumentStore for VanishingStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn put(&self, collection: &str, record: Record) -> Result<String, StoreError> {
        self.inner.put(collection, record).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Record) -> Result<(), StoreError> {
        match self.vanish {
            Vanish::BeforeWrite => {
                self.inner.delete(collection, id).await?;
                self.inner.update(collection, id, fields).await
            }
            Vanish::AfterWrite => {
                self.inner.update(collection, id, fields).await?;
                self.inner.delete(collection, id).await?;
                Ok(())
            }
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(collection, id).await
    }

    fn stream<'a>(
        &'a self,
        collection: &'a str,
        filters: Vec<FieldFilter>,
        limit: Option<usize>,
    ) -> BoxStream<'a, Result<Document, StoreError>> {
        self.inner.stream(collection, filters, limit)
    }
}
