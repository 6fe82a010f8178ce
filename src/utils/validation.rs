//! Centralized input validation.

/// Longest accepted layer identifier
pub const MAX_DATA_TYPE_LENGTH: usize = 128;

/// Longest accepted query string on the HTTP API (DOS protection)
pub const MAX_QUERY_LENGTH: usize = 2048;

/// Validate that a string can be a layer identifier.
///
/// # Examples
///
/// ```
/// use climate_facets::utils::validation::is_valid_data_type;
///
/// assert!(is_valid_data_type("tmax_2081_2100_10m_ssp370_ensemble_mean"));
/// assert!(!is_valid_data_type("../etc/passwd"));
/// assert!(!is_valid_data_type(""));
/// ```
#[must_use]
pub fn is_valid_data_type(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_DATA_TYPE_LENGTH
        && !s.contains("..")
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Check a query string against [`MAX_QUERY_LENGTH`].
///
/// Returns an error message if the query is too long, None if it is acceptable.
#[must_use]
pub fn check_query_length(query: &str) -> Option<String> {
    if query.len() > MAX_QUERY_LENGTH {
        Some(format!(
            "Query string too long: {} bytes exceeds maximum of {MAX_QUERY_LENGTH}",
            query.len()
        ))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty layer identifier")]
    EmptyDataType,
    #[error("Layer identifier too long: exceeds {MAX_DATA_TYPE_LENGTH} characters")]
    DataTypeTooLong,
    #[error("Invalid layer identifier '{0}'")]
    InvalidDataType(String),
    #[error("Latitude {0} outside -90..=90")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} outside -180..=180")]
    LongitudeOutOfRange(f64),
}

/// Validate a layer identifier before it is placed in a URL path
///
/// # Errors
///
/// Returns `ValidationError::EmptyDataType` if the identifier is empty,
/// `ValidationError::DataTypeTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidDataType` if it contains other characters.
pub fn validate_data_type(data_type: &str) -> Result<&str, ValidationError> {
    if data_type.trim().is_empty() {
        return Err(ValidationError::EmptyDataType);
    }
    if data_type.len() > MAX_DATA_TYPE_LENGTH {
        return Err(ValidationError::DataTypeTooLong);
    }
    if !is_valid_data_type(data_type) {
        return Err(ValidationError::InvalidDataType(data_type.to_string()));
    }
    Ok(data_type)
}

/// Validate a WGS84 coordinate
///
/// # Errors
///
/// Returns an error naming the first component that is not finite or out of range.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::LatitudeOutOfRange(lat));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::LongitudeOutOfRange(lon));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_data_type() {
        assert_eq!(validate_data_type("tmax_1970_2000_10m"), Ok("tmax_1970_2000_10m"));
        assert_eq!(validate_data_type("  "), Err(ValidationError::EmptyDataType));
        assert_eq!(
            validate_data_type(&"a".repeat(MAX_DATA_TYPE_LENGTH + 1)),
            Err(ValidationError::DataTypeTooLong)
        );
        assert!(matches!(
            validate_data_type("tmax?x=1"),
            Err(ValidationError::InvalidDataType(_))
        ));
        assert!(matches!(
            validate_data_type("a/b"),
            Err(ValidationError::InvalidDataType(_))
        ));
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(52.37, 4.89).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert_eq!(
            validate_coordinates(91.0, 0.0),
            Err(ValidationError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            validate_coordinates(0.0, -180.5),
            Err(ValidationError::LongitudeOutOfRange(-180.5))
        );
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_check_query_length() {
        assert!(check_query_length("variable=T_MAX").is_none());
        assert!(check_query_length(&"x".repeat(MAX_QUERY_LENGTH + 1)).is_some());
    }
}
