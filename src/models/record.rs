//! Conversión entre registros del almacén y tipos de Rust
//!
//! Lectura tolerante de campos (un campo ausente o de otro tipo toma el valor
//! por defecto) y traducción de nombres de campo entidad ↔ almacén.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::database::Record;

/// Pares (nombre en la entidad, nombre en el almacén) que difieren
pub type FieldMapping = &'static [(&'static str, &'static str)];

/// Nombre en el almacén para un atributo de la entidad
pub fn store_field_name<'a>(mapping: FieldMapping, field: &'a str) -> &'a str {
    mapping
        .iter()
        .find(|(entity, _)| *entity == field)
        .map_or(field, |(_, store)| *store)
}

/// Renombrar las claves de un registro parcial a la convención del almacén
pub fn to_store_fields(mapping: FieldMapping, fields: Record) -> Record {
    fields
        .into_iter()
        .map(|(key, value)| (store_field_name(mapping, &key).to_string(), value))
        .collect()
}

pub fn string_field(record: &Record, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn optional_string_field(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn i64_field(record: &Record, key: &str) -> i64 {
    record.get(key).and_then(Value::as_i64).unwrap_or_default()
}

pub fn decimal_field(record: &Record, key: &str) -> Decimal {
    match record.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .unwrap_or_default(),
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

pub fn string_list_field(record: &Record, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Campo enumerado; cualquier valor desconocido toma el valor por defecto
pub fn enum_field<T: DeserializeOwned + Default>(record: &Record, key: &str) -> T {
    record
        .get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Marca de tiempo RFC 3339; ausente o ilegible → `fallback`
pub fn datetime_field(record: &Record, key: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or(fallback, |dt| dt.with_timezone(&Utc))
}

/// Importes como texto decimal exacto; un `f64` perdería dígitos significativos
pub fn decimal_value(value: Decimal) -> Value {
    Value::String(value.to_string())
}

pub fn datetime_value(value: DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const MAPPING: FieldMapping = &[("purchase_price", "purchasePrice")];

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_store_field_name() {
        assert_eq!(store_field_name(MAPPING, "purchase_price"), "purchasePrice");
        assert_eq!(store_field_name(MAPPING, "brand"), "brand");
    }

    #[test]
    fn test_to_store_fields_renames_only_mapped_keys() {
        let fields = to_store_fields(
            MAPPING,
            record(json!({ "purchase_price": 10.5, "mileage": 0 })),
        );
        assert_eq!(fields["purchasePrice"], json!(10.5));
        assert_eq!(fields["mileage"], json!(0));
        assert!(!fields.contains_key("purchase_price"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let empty = Record::new();
        assert_eq!(string_field(&empty, "brand"), "");
        assert_eq!(optional_string_field(&empty, "manager"), None);
        assert_eq!(i64_field(&empty, "year"), 0);
        assert_eq!(decimal_field(&empty, "totalSpent"), Decimal::ZERO);
        assert!(string_list_field(&empty, "images").is_empty());
    }

    #[test]
    fn test_decimal_field_accepts_numbers_and_strings() {
        let data = record(json!({ "a": 23000, "b": 1500.25, "c": "99.90" }));
        assert_eq!(decimal_field(&data, "a"), Decimal::new(23000, 0));
        assert_eq!(decimal_field(&data, "b"), Decimal::new(150025, 2));
        assert_eq!(decimal_field(&data, "c"), Decimal::new(9990, 2));
    }

    #[test]
    fn test_decimal_value_keeps_every_digit() {
        let amount: Decimal = "1234567890123456.78".parse().unwrap();
        let data = record(json!({ "price": decimal_value(amount) }));

        assert_eq!(data["price"], json!("1234567890123456.78"));
        assert_eq!(decimal_field(&data, "price"), amount);
    }

    #[test]
    fn test_datetime_round_trip_keeps_subseconds() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        let data = record(json!({ "at": datetime_value(ts) }));
        assert_eq!(datetime_field(&data, "at", Utc::now()), ts);
    }

    #[test]
    fn test_datetime_field_fallback() {
        let fallback = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let data = record(json!({ "at": "yesterday" }));
        assert_eq!(datetime_field(&data, "at", fallback), fallback);
    }
}
