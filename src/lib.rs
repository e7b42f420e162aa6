//! Backend de inventario de vehículos y personal
//!
//! API HTTP sobre un almacén de documentos (en memoria o PostgreSQL/JSONB).

pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
