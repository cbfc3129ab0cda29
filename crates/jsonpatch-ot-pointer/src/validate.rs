//! Validation functions for JSON Pointer strings.

use crate::JsonPointerError;

/// Maximum allowed pointer string length.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Validate a JSON Pointer string.
///
/// # Errors
///
/// - [`JsonPointerError::PointerInvalid`] if the pointer is non-empty but does not start with `/`
/// - [`JsonPointerError::PointerTooLong`] if it exceeds [`MAX_POINTER_LENGTH`] bytes
///
/// ```
/// use jsonpatch_ot_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("foo").unwrap_err();
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), JsonPointerError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(JsonPointerError::PointerInvalid);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(JsonPointerError::PointerTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_absolute_pointer() {
        assert!(validate_json_pointer("").is_ok());
        assert!(validate_json_pointer("/").is_ok());
        assert!(validate_json_pointer("/foo/bar").is_ok());
    }

    #[test]
    fn test_validate_relative_pointer() {
        assert_eq!(
            validate_json_pointer("foo/bar"),
            Err(JsonPointerError::PointerInvalid)
        );
    }

    #[test]
    fn test_validate_long_pointer() {
        let long_pointer = "/".to_string() + &"a".repeat(MAX_POINTER_LENGTH);
        assert_eq!(
            validate_json_pointer(&long_pointer),
            Err(JsonPointerError::PointerTooLong)
        );
    }
}
