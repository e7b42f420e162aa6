//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y lectura de parámetros de query.

pub mod errors;
pub mod query;
pub mod validation;

pub use errors::{AppError, AppResult};
