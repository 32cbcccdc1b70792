use crate::error::ValidationError;

/// Splits a `Key: Value` header line.
///
/// # Errors
///
/// Returns an error when the line has no `:` or the name is blank.
pub fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, _)) if key.trim().is_empty() => Err(ValidationError::HeaderNameEmpty {
            value: s.to_owned(),
        }),
        Some((key, value)) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}
