//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Se guarda en la colección `cars`; tres campos usan camelCase en el almacén.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::record::{self, FieldMapping};
use crate::database::Record;
use crate::utils::query::empty_as_none;
use crate::utils::validation::validate_non_negative_decimal;

/// Colección del almacén de documentos
pub const COLLECTION_NAME: &str = "cars";

/// Atributos de la entidad cuyo nombre difiere en el almacén
pub const FIELD_MAPPING: FieldMapping = &[
    ("purchase_price", "purchasePrice"),
    ("selling_price", "sellingPrice"),
    ("arrival_date", "arrivalDate"),
];

/// Estado del vehículo en el inventario
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Available,
    Reserved,
    Sold,
    InTransit,
    InService,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Reserved => "reserved",
            VehicleStatus::Sold => "sold",
            VehicleStatus::InTransit => "in_transit",
            VehicleStatus::InService => "in_service",
        }
    }
}

/// Vehicle principal tal como lo devuelve la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub color: String,
    pub mileage: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub purchase_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
    pub status: VehicleStatus,
    pub manager: Option<String>,
    pub location: Option<String>,
    pub images: Vec<String>,
    pub arrival_date: DateTime<Utc>,
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleCreate {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1900, max = 2030))]
    pub year: i32,

    #[validate(length(equal = 17))]
    pub vin: String,

    #[validate(length(min = 1, max = 50))]
    pub color: String,

    #[validate(range(min = 0))]
    pub mileage: i32,

    #[validate(custom = "validate_non_negative_decimal")]
    #[serde(with = "rust_decimal::serde::float")]
    pub purchase_price: Decimal,

    #[validate(custom = "validate_non_negative_decimal")]
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,

    #[serde(default)]
    pub status: VehicleStatus,

    #[serde(default)]
    pub manager: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub arrival_date: Option<DateTime<Utc>>,
}

/// Request para actualizar un vehículo existente.
/// Los campos `None` (ausentes o `null`) no se tocan; cualquier otro valor se escribe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VehicleUpdate {
    #[validate(length(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2030))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[validate(length(equal = 17))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,

    #[validate(length(min = 1, max = 50))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[validate(range(min = 0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i32>,

    #[validate(custom = "validate_non_negative_decimal")]
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_price: Option<Decimal>,

    #[validate(custom = "validate_non_negative_decimal")]
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub selling_price: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<DateTime<Utc>>,
}

/// Filtros para listados de vehículos.
/// `status` se compara tal cual: un estado desconocido no coincide con nada.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilters {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub manager: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<usize>,
}

impl VehicleFilters {
    pub fn by_status(status: VehicleStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }
}

impl Vehicle {
    /// Construir un vehículo nuevo (sin id) validando todos los campos
    pub fn new(input: VehicleCreate) -> Result<Self, validator::ValidationErrors> {
        input.validate()?;

        Ok(Self {
            id: String::new(),
            brand: input.brand,
            model: input.model,
            year: input.year,
            vin: input.vin,
            color: input.color,
            mileage: input.mileage,
            purchase_price: input.purchase_price,
            selling_price: input.selling_price,
            status: input.status,
            manager: input.manager,
            location: input.location,
            images: input.images,
            arrival_date: input.arrival_date.unwrap_or_else(Utc::now),
        })
    }

    /// Registro con la convención de nombres del almacén
    pub fn to_record(&self) -> Record {
        let value = json!({
            "brand": self.brand,
            "model": self.model,
            "year": self.year,
            "vin": self.vin,
            "color": self.color,
            "mileage": self.mileage,
            "purchasePrice": record::decimal_value(self.purchase_price),
            "sellingPrice": record::decimal_value(self.selling_price),
            "status": self.status.as_str(),
            "manager": self.manager,
            "location": self.location,
            "images": self.images,
            "arrivalDate": record::datetime_value(self.arrival_date),
        });

        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    /// Reconstruir desde el almacén; los campos ausentes toman su valor por defecto
    pub fn from_record(data: &Record, id: &str) -> Self {
        Self {
            id: id.to_string(),
            brand: record::string_field(data, "brand"),
            model: record::string_field(data, "model"),
            year: i32::try_from(record::i64_field(data, "year")).unwrap_or_default(),
            vin: record::string_field(data, "vin"),
            color: record::string_field(data, "color"),
            mileage: i32::try_from(record::i64_field(data, "mileage")).unwrap_or_default(),
            purchase_price: record::decimal_field(data, "purchasePrice"),
            selling_price: record::decimal_field(data, "sellingPrice"),
            status: record::enum_field(data, "status"),
            manager: record::optional_string_field(data, "manager"),
            location: record::optional_string_field(data, "location"),
            images: record::string_list_field(data, "images"),
            arrival_date: record::datetime_field(data, "arrivalDate", Utc::now()),
        }
    }
}

impl VehicleUpdate {
    /// Campos presentes con los nombres de atributo de la entidad;
    /// los importes se escriben igual que en `Vehicle::to_record`
    pub fn into_fields(self) -> Record {
        let prices = [
            ("purchase_price", self.purchase_price),
            ("selling_price", self.selling_price),
        ];
        let mut fields = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Record::new(),
        };
        for (key, amount) in prices {
            if let Some(amount) = amount {
                fields.insert(key.to_string(), record::decimal_value(amount));
            }
        }
        fields
    }
}
