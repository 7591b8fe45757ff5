//! Lexical validity rules for names.
//!
//! A valid name is at least [`MIN_NAME_LEN`] bytes, does not start or end
//! with a hyphen, and contains only digits, lowercase ASCII letters and
//! hyphens. Every byte is checked; in particular a NUL byte is rejected
//! rather than terminating validation early.

use thiserror::Error;

/// Minimum name length in bytes.
pub const MIN_NAME_LEN: usize = 5;

/// Errors from name validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Min length is {MIN_NAME_LEN}")]
    TooShort,

    #[error("Should not start or end with hyphen")]
    EdgeHyphen,

    #[error("Should contain only digits, lowercase letters and hyphens")]
    InvalidCharacter,
}

/// Validate a name against the lexical rules.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let bytes = name.as_bytes();

    if bytes.len() < MIN_NAME_LEN {
        return Err(NameError::TooShort);
    }
    if bytes[0] == b'-' || bytes[bytes.len() - 1] == b'-' {
        return Err(NameError::EdgeHyphen);
    }
    for &b in bytes {
        if !matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-') {
            return Err(NameError::InvalidCharacter);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_name() {
        assert!(validate_name("abcde").is_ok());
        assert!(validate_name("hello-world").is_ok());
        assert!(validate_name("a1b2c3").is_ok());
    }

    #[test]
    fn test_empty_and_short() {
        assert_eq!(validate_name(""), Err(NameError::TooShort));
        assert_eq!(validate_name("abcd"), Err(NameError::TooShort));
    }

    #[test]
    fn test_edge_hyphens() {
        assert_eq!(validate_name("-hello"), Err(NameError::EdgeHyphen));
        assert_eq!(validate_name("hello-"), Err(NameError::EdgeHyphen));
    }

    #[test]
    fn test_bad_characters() {
        assert_eq!(validate_name("Hello"), Err(NameError::InvalidCharacter));
        assert_eq!(validate_name("hello!"), Err(NameError::InvalidCharacter));
        assert_eq!(validate_name("hel lo"), Err(NameError::InvalidCharacter));
    }

    #[test]
    fn test_nul_byte_rejected() {
        // Bytes after an embedded NUL are not silently accepted.
        assert_eq!(validate_name("hello\0b"), Err(NameError::InvalidCharacter));
        assert_eq!(validate_name("hello\0"), Err(NameError::InvalidCharacter));
    }
}
