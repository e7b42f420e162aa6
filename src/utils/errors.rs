//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::database::StoreError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// Código HTTP asociado a cada tipo de error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidPayload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(StoreError::Corrupted(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code: Some("VALIDATION_ERROR".to_string()),
                }
            }

            AppError::InvalidPayload(msg) => {
                warn!("⚠️ Invalid payload: {}", msg);
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: msg,
                    details: None,
                    code: Some("INVALID_PAYLOAD".to_string()),
                }
            }

            AppError::NotFound(msg) => {
                warn!("🔍 Resource not found: {}", msg);
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code: Some("NOT_FOUND".to_string()),
                }
            }

            AppError::BadRequest(msg) => {
                warn!("⚠️ Bad request: {}", msg);
                ErrorResponse {
                    error: "Bad Request".to_string(),
                    message: msg,
                    details: None,
                    code: Some("BAD_REQUEST".to_string()),
                }
            }

            AppError::Store(StoreError::NotFound { collection, id }) => {
                warn!("🔍 Document vanished: {}/{}", collection, id);
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: format!("Document '{}' not found", id),
                    details: None,
                    code: Some("NOT_FOUND".to_string()),
                }
            }

            AppError::Store(e) => {
                error!("❌ Store error: {}", e);
                ErrorResponse {
                    error: "Store Error".to_string(),
                    message: "An error occurred while accessing the document store".to_string(),
                    details: Some(json!({ "store_error": e.to_string() })),
                    code: Some("STORE_ERROR".to_string()),
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Cuerpo JSON que no se puede leer: bien formado pero con campos que faltan
/// o de otro tipo → 422; cualquier otro rechazo → 400
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::InvalidPayload(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
