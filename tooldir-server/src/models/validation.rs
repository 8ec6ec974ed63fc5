//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty (or whitespace only) when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value doesn't match the required format (URL, UUID, ...)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value is not one of the accepted variants
    InvalidVariant { field: &'static str, value: String },

    /// Body or query string could not be decoded at all
    Malformed { input: &'static str, detail: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::Malformed { input, detail } => write!(f, "malformed {}: {}", input, detail),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `s` and require it to be non-empty and at most `max` bytes.
pub(crate) fn required_text(
    field: &'static str,
    s: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.len() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional value; blank input becomes `None`.
pub(crate) fn optional_text(
    field: &'static str,
    s: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.len() > max => Err(ValidationError::TooLong { field, max }),
        Some(v) => Ok(Some(v.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 256,
        };
        assert_eq!(err.to_string(), "name exceeds maximum length of 256 characters");

        let err = ValidationError::InvalidVariant {
            field: "priority",
            value: "urgent".into(),
        };
        assert_eq!(err.to_string(), "invalid priority value: 'urgent'");
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("name", "  hi  ", 10).unwrap(), "hi");
        assert_eq!(
            required_text("name", "   ", 10).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
        assert!(matches!(
            required_text("name", "abcdef", 3).unwrap_err(),
            ValidationError::TooLong { max: 3, .. }
        ));
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(optional_text("category", Some("  "), 10).unwrap(), None);
        assert_eq!(optional_text("category", None, 10).unwrap(), None);
        assert_eq!(
            optional_text("category", Some(" ai "), 10).unwrap(),
            Some("ai".to_owned())
        );
    }
}
