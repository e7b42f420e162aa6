//! Almacén de documentos sobre PostgreSQL
//!
//! Cada documento es una fila de la tabla `documents` con su contenido en JSONB.
//! Los filtros de igualdad se traducen a contención (`data @> {...}`) y las
//! actualizaciones parciales a un merge (`data || patch`).

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Document, DocumentStore, FieldFilter, Record, StoreError};

const CREATE_DOCUMENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        data JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, id)
    )
"#;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear la tabla de documentos si no existe
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_DOCUMENTS_TABLE)
            .execute(&self.pool)
            .await?;
        info!("✅ Tabla 'documents' lista");
        Ok(())
    }
}

/// Objeto JSON con todos los filtros, para la consulta de contención
fn containment(filters: Vec<FieldFilter>) -> Value {
    Value::Object(
        filters
            .into_iter()
            .map(|f| (f.field, f.value))
            .collect(),
    )
}

fn into_record(value: Value, id: &str) -> Result<Record, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Corrupted(format!(
            "document '{}' is not a JSON object: {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(Json(data),)| into_record(data, id)).transpose()
    }

    async fn put(&self, collection: &str, record: Record) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(Value::Object(record)))
            .execute(&self.pool)
            .await?;
        debug!("💾 Documento creado: {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Record) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn stream<'a>(
        &'a self,
        collection: &'a str,
        filters: Vec<FieldFilter>,
        limit: Option<usize>,
    ) -> BoxStream<'a, Result<Document, StoreError>> {
        // LIMIT NULL equivale a sin límite en PostgreSQL
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));

        sqlx::query_as::<_, (String, Json<Value>)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND data @> $2 LIMIT $3",
        )
        .bind(collection)
        .bind(Json(containment(filters)))
        .bind(limit)
        .fetch(&self.pool)
        .map(|row| {
            let (id, Json(data)) = row?;
            let data = into_record(data, &id)?;
            Ok(Document { id, data })
        })
        .boxed()
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
