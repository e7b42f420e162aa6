//! Módulo de base de datos
//!
//! Abstracción sobre un almacén de documentos: colecciones con nombre,
//! documentos direccionados por id opaco y lecturas filtradas por igualdad.
//! Los servicios dependen solo del trait `DocumentStore`, nunca de un backend concreto.

pub mod connection;
pub mod memory_store;
pub mod postgres_store;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{Map, Value};
use thiserror::Error;

pub use connection::build_store;
pub use memory_store::InMemoryDocumentStore;
pub use postgres_store::PgDocumentStore;

/// Registro tal como vive en el almacén (nombres de campo del almacén)
pub type Record = Map<String, Value>;

/// Documento leído del almacén: id asignado + datos
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Record,
}

/// Restricción de igualdad `field == value` para lecturas filtradas
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// ¿Cumple el registro esta restricción?
    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

/// Errores del almacén de documentos
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupted document: {0}")]
    Corrupted(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Capacidades requeridas del almacén de documentos, independiente del proveedor
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Leer un documento por id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError>;

    /// Crear un documento con un id nuevo asignado por el almacén
    async fn put(&self, collection: &str, record: Record) -> Result<String, StoreError>;

    /// Sobrescribir solo los campos presentes en `fields`; `NotFound` si el id no existe
    async fn update(&self, collection: &str, id: &str, fields: Record) -> Result<(), StoreError>;

    /// Borrado definitivo; `false` si el id no existía
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Leer todos los documentos que cumplen todos los filtros (AND), sin orden garantizado
    fn stream<'a>(
        &'a self,
        collection: &'a str,
        filters: Vec<FieldFilter>,
        limit: Option<usize>,
    ) -> BoxStream<'a, Result<Document, StoreError>>;

    /// Verificar que el almacén responde
    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_filter_matches() {
        let record: Record = json!({ "status": "sold", "manager": "Ivan" })
            .as_object()
            .cloned()
            .unwrap();

        assert!(FieldFilter::eq("status", "sold").matches(&record));
        assert!(!FieldFilter::eq("status", "available").matches(&record));
        assert!(!FieldFilter::eq("location", "Seoul").matches(&record));
    }
}
