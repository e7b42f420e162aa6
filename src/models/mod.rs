//! Modelos del sistema
//!
//! Entidades del inventario (vehículos y personal), sus requests de
//! creación/actualización y la conversión a registros del almacén.

pub mod record;
pub mod staff;
pub mod vehicle;

pub use staff::{StaffCreate, StaffFilters, StaffMember, StaffStatus, StaffUpdate};
pub use vehicle::{Vehicle, VehicleCreate, VehicleFilters, VehicleStatus, VehicleUpdate};
