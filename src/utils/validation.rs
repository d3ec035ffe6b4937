//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que no cubren los atributos de `validator`.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::errors::AppError;

lazy_static! {
    /// Placas: letras, dígitos y guiones, entre 5 y 10 caracteres
    pub static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Za-z0-9-]{5,10}$").unwrap();

    /// Teléfonos con prefijo internacional opcional
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()-]{7,20}$").unwrap();
}

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Validar que el rango de fechas sea coherente
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::BadRequest(
            "La fecha de fin no puede ser anterior a la fecha de inicio".to_string(),
        ));
    }
    Ok(())
}

/// Validar una firma capturada en canvas (`data:image/png;base64,...`)
pub fn validate_signature(value: &str) -> Result<(), AppError> {
    let payload = value
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| AppError::BadRequest("La firma debe ser una imagen PNG".to_string()))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::BadRequest("La firma no es base64 válido".to_string()))?;

    if !bytes.starts_with(PNG_MAGIC) {
        return Err(AppError::BadRequest("La firma no es una imagen PNG".to_string()));
    }

    Ok(())
}

/// Normalizar placa: sin espacios y en mayúsculas
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_data_url() -> String {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(b"IHDR");
        format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(bytes))
    }

    #[test]
    fn test_plate_regex() {
        assert!(PLATE_REGEX.is_match("ABC-123"));
        assert!(PLATE_REGEX.is_match("P123ABC"));
        assert!(!PLATE_REGEX.is_match("AB 12"));
        assert!(!PLATE_REGEX.is_match("A1"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+52 55 1234 5678"));
        assert!(PHONE_REGEX.is_match("(555) 123-4567"));
        assert!(!PHONE_REGEX.is_match("phone"));
    }

    #[test]
    fn test_date_range() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
        assert!(validate_date_range(start, end).is_ok());
        assert!(validate_date_range(start, start).is_ok());
        assert!(validate_date_range(end, start).is_err());
    }

    #[test]
    fn test_signature_validation() {
        assert!(validate_signature(&png_data_url()).is_ok());
        assert!(validate_signature("data:image/jpeg;base64,AAAA").is_err());
        assert!(validate_signature("data:image/png;base64,***").is_err());

        let not_png = format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(b"GIF89a"));
        assert!(validate_signature(&not_png).is_err());
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  abc-123 "), "ABC-123");
    }
}
