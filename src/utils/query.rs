//! Helpers para parámetros de query string
//!
//! Un parámetro presente pero vacío (`?status=`) equivale a no filtrar.

use std::fmt::Display;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

/// `?key=` y `?key` se leen como `None`; cualquier otro valor se parsea con `FromStr`
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
