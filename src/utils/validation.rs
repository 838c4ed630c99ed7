//! Utilidades de validación
//!
//! Este módulo contiene las funciones `custom` que usan los DTOs con
//! `validator`, con las mismas reglas que aplicaban los formularios.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Tamaño máximo de la foto ya decodificada
pub const MAX_PHOTO_BYTES: usize = 1_000_000;

lazy_static! {
    static ref PHOTO_DATA_URL: Regex =
        Regex::new(r"^data:image/(png|jpeg|jpg|webp|gif);base64,([A-Za-z0-9+/=]+)$")
            .expect("photo data URL regex is valid");
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// El importe de un repostaje tiene que ser mayor que cero
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive_amount");
        error.add_param("actual".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// El coste de un mantenimiento no puede ser negativo
pub fn validate_non_negative_cost(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative_cost");
        error.add_param("actual".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// La foto se guarda como data URL de imagen en base64
pub fn validate_photo_data_url(value: &str) -> Result<(), ValidationError> {
    let captures = PHOTO_DATA_URL
        .captures(value)
        .ok_or_else(|| ValidationError::new("photo_data_url"))?;

    let payload = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| ValidationError::new("photo_base64"))?;

    if bytes.len() > MAX_PHOTO_BYTES {
        let mut error = ValidationError::new("photo_too_large");
        error.add_param("max".into(), &MAX_PHOTO_BYTES);
        error.add_param("actual".into(), &bytes.len());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Oil Change").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_amount_and_cost_rules() {
        assert!(validate_positive_amount(&Decimal::new(1, 2)).is_ok());
        assert!(validate_positive_amount(&Decimal::ZERO).is_err());
        assert!(validate_non_negative_cost(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_cost(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_photo_data_url() {
        let photo = format!("data:image/jpeg;base64,{}", STANDARD.encode([0xFFu8, 0xD8, 0xFF]));
        assert!(validate_photo_data_url(&photo).is_ok());
        assert!(validate_photo_data_url("https://example.com/car.jpg").is_err());
        assert!(validate_photo_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_photo_size_limit() {
        let big = vec![0u8; MAX_PHOTO_BYTES + 1];
        let photo = format!("data:image/png;base64,{}", STANDARD.encode(big));
        let error = validate_photo_data_url(&photo).unwrap_err();
        assert_eq!(error.code, "photo_too_large");
    }
}
