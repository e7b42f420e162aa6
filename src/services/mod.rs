//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación.
//! Cada servicio recibe el almacén de documentos ya construido y no guarda
//! ningún otro estado mutable.

pub mod staff_service;
pub mod vehicle_service;

pub use staff_service::StaffService;
pub use vehicle_service::VehicleService;

#[cfg(test)]
pub(crate) mod test_support;
