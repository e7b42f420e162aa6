//! Utilidades de validación
//!
//! Este módulo contiene validadores compartidos por los modelos
//! que `validator` no cubre con sus atributos estándar.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Teléfono: '+' opcional seguido de dígitos, espacios, guiones o paréntesis
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[\d\s\-()]+$").unwrap();
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Variante para importes decimales, con la firma que espera `#[validate(custom)]`
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(5).is_ok());
        assert!(validate_non_negative(-1).is_err());
    }

    #[test]
    fn test_validate_non_negative_decimal() {
        assert!(validate_non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_decimal(&Decimal::new(2300050, 2)).is_ok());

        let error = validate_non_negative_decimal(&Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(error.code, "non_negative");
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+7 (999) 123-45-67"));
        assert!(PHONE_REGEX.is_match("89991234567"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("++7999"));
        assert!(!PHONE_REGEX.is_match(""));
    }
}
