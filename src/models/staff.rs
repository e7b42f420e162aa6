//! Modelo de StaffMember
//!
//! Miembros del personal, guardados en la colección `staff`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::record::{self, FieldMapping};
use crate::database::Record;
use crate::utils::query::empty_as_none;
use crate::utils::validation::{validate_non_negative_decimal, PHONE_REGEX};

/// Colección del almacén de documentos
pub const COLLECTION_NAME: &str = "staff";

/// Atributos de la entidad cuyo nombre difiere en el almacén
pub const FIELD_MAPPING: FieldMapping = &[
    ("total_orders", "totalOrders"),
    ("total_spent", "totalSpent"),
    ("registered_date", "registeredDate"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
    New,
}

impl StaffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffStatus::Active => "active",
            StaffStatus::Inactive => "inactive",
            StaffStatus::New => "new",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub inn: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub status: StaffStatus,
    pub registered_date: DateTime<Utc>,
    pub total_orders: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

/// Request para registrar un miembro del personal
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 10, max = 12))]
    pub inn: String,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[serde(default)]
    pub status: StaffStatus,

    #[serde(default)]
    pub registered_date: Option<DateTime<Utc>>,
}

/// Request para actualizar un miembro del personal; `None` = no tocar
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StaffUpdate {
    #[validate(length(min = 1, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(length(min = 10, max = 12))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,

    #[validate(regex = "PHONE_REGEX")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StaffStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<i32>,

    #[validate(custom = "validate_non_negative_decimal")]
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_spent: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffFilters {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<usize>,
}

impl StaffFilters {
    pub fn by_status(status: StaffStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }
}

impl StaffMember {
    /// Construir un miembro nuevo (sin id); contadores a cero
    pub fn new(input: StaffCreate) -> Result<Self, validator::ValidationErrors> {
        input.validate()?;

        Ok(Self {
            id: String::new(),
            name: input.name,
            inn: input.inn,
            phone: input.phone,
            email: input.email,
            city: input.city,
            status: input.status,
            registered_date: input.registered_date.unwrap_or_else(Utc::now),
            total_orders: 0,
            total_spent: Decimal::ZERO,
        })
    }

    pub fn to_record(&self) -> Record {
        let value = json!({
            "name": self.name,
            "inn": self.inn,
            "phone": self.phone,
            "email": self.email,
            "city": self.city,
            "status": self.status.as_str(),
            "registeredDate": record::datetime_value(self.registered_date),
            "totalOrders": self.total_orders,
            "totalSpent": record::decimal_value(self.total_spent),
        });

        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    pub fn from_record(data: &Record, id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: record::string_field(data, "name"),
            inn: record::string_field(data, "inn"),
            phone: record::string_field(data, "phone"),
            email: record::string_field(data, "email"),
            city: record::string_field(data, "city"),
            status: record::enum_field(data, "status"),
            registered_date: record::datetime_field(data, "registeredDate", Utc::now()),
            total_orders: i32::try_from(record::i64_field(data, "totalOrders"))
                .unwrap_or_default(),
            total_spent: record::decimal_field(data, "totalSpent"),
        }
    }

    /// Coincidencia de búsqueda: nombre, email y ciudad sin distinguir mayúsculas;
    /// el teléfono se compara tal cual. `query_lower` ya viene en minúsculas.
    pub fn matches_query(&self, query: &str, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.phone.contains(query)
            || self.email.to_lowercase().contains(query_lower)
            || self.city.to_lowercase().contains(query_lower)
    }
}

impl StaffUpdate {
    /// Campos presentes con los nombres de atributo de la entidad
    pub fn into_fields(self) -> Record {
        let total_spent = self.total_spent;
        let mut fields = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Record::new(),
        };
        if let Some(amount) = total_spent {
            fields.insert("total_spent".to_string(), record::decimal_value(amount));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ivanova() -> StaffCreate {
        StaffCreate {
            name: "Anna Ivanova".to_string(),
            inn: "770123456789".to_string(),
            phone: "+7 (999) 123-45-67".to_string(),
            email: "anna@autokorea.ru".to_string(),
            city: "Vladivostok".to_string(),
            status: StaffStatus::default(),
            registered_date: None,
        }
    }

    #[test]
    fn test_new_applies_defaults() {
        let member = StaffMember::new(ivanova()).unwrap();

        assert_eq!(member.status, StaffStatus::Active);
        assert_eq!(member.total_orders, 0);
        assert_eq!(member.total_spent, Decimal::ZERO);
        assert!(member.id.is_empty());
    }

    #[test]
    fn test_new_reports_every_invalid_field() {
        let input = StaffCreate {
            name: String::new(),
            inn: "12345".to_string(),
            phone: "call me maybe".to_string(),
            email: "not-an-email".to_string(),
            city: "c".repeat(101),
            ..ivanova()
        };

        let errors = StaffMember::new(input).unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "inn", "phone", "email", "city"] {
            assert!(fields.contains_key(field), "missing error on '{}'", field);
        }
    }

    #[test]
    fn test_inn_length_bounds() {
        for (inn, ok) in [("123456789", false), ("1234567890", true), ("123456789012", true), ("1234567890123", false)] {
            let result = StaffMember::new(StaffCreate { inn: inn.to_string(), ..ivanova() });
            assert_eq!(result.is_ok(), ok, "inn '{}'", inn);
        }
    }

    #[test]
    fn test_record_round_trip() {
        let member = StaffMember {
            id: "staff-1".to_string(),
            status: StaffStatus::New,
            registered_date: Utc.with_ymd_and_hms(2023, 11, 2, 14, 15, 0).unwrap(),
            total_orders: 12,
            total_spent: Decimal::new(4_500_075, 2),
            ..StaffMember::new(ivanova()).unwrap()
        };

        let restored = StaffMember::from_record(&member.to_record(), &member.id);
        assert_eq!(restored, member);
    }

    #[test]
    fn test_record_round_trip_high_precision_total() {
        let member = StaffMember {
            id: "staff-2".to_string(),
            total_spent: "1234567890123456.78".parse().unwrap(),
            ..StaffMember::new(ivanova()).unwrap()
        };

        let restored = StaffMember::from_record(&member.to_record(), &member.id);
        assert_eq!(restored.total_spent, member.total_spent);
        assert_eq!(restored, member);
    }

    #[test]
    fn test_record_uses_store_field_names() {
        let record = StaffMember::new(ivanova()).unwrap().to_record();

        for key in ["registeredDate", "totalOrders", "totalSpent"] {
            assert!(record.contains_key(key), "missing '{}'", key);
        }
        assert!(!record.contains_key("total_orders"));
        assert_eq!(record["status"], "active");
    }

    #[test]
    fn test_matches_query() {
        let member = StaffMember::new(StaffCreate {
            name: "John Smith".to_string(),
            email: "info@JOHNS.com".to_string(),
            ..ivanova()
        })
        .unwrap();

        assert!(member.matches_query("john", "john"));
        assert!(member.matches_query("VLADI", "vladi"));
        assert!(member.matches_query("123-45", "123-45"));
        assert!(!member.matches_query("busan", "busan"));
    }

    #[test]
    fn test_update_fields_keep_zero_counters() {
        let update = StaffUpdate {
            total_orders: Some(0),
            total_spent: Some(Decimal::ZERO),
            ..StaffUpdate::default()
        };

        let fields = update.into_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["total_orders"], json!(0));
        assert_eq!(fields["total_spent"], json!("0"));
    }

    #[test]
    fn test_update_validates_present_fields() {
        let update = StaffUpdate {
            email: Some("broken".to_string()),
            total_orders: Some(-3),
            ..StaffUpdate::default()
        };

        let errors = update.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("total_orders"));
    }
}
