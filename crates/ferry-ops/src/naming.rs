//! File-name validation for rename and create operations.

use ferry_core::OpsError;

/// Validate a file name for cross-platform use.
pub fn validate_name(name: &str) -> Result<(), OpsError> {
    if name.is_empty() {
        return Err(OpsError::invalid_name(name, "name cannot be empty"));
    }

    if name.len() > 255 {
        return Err(OpsError::invalid_name(
            name,
            "name is too long (max 255 characters)",
        ));
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(OpsError::invalid_name(
                name,
                format!("name cannot contain '{}'", c.escape_default()),
            ));
        }
    }

    // Problematic on Windows even when the local filesystem accepts them.
    if name.starts_with(' ') || name.ends_with(' ') {
        return Err(OpsError::invalid_name(
            name,
            "name cannot start or end with spaces",
        ));
    }

    if name.ends_with('.') {
        return Err(OpsError::invalid_name(name, "name cannot end with a dot"));
    }

    if name == "." || name == ".." {
        return Err(OpsError::invalid_name(name, "'.' and '..' are reserved"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_valid() {
        assert!(validate_name("test.txt").is_ok());
        assert!(validate_name(".hidden").is_ok());
        assert!(validate_name("file with spaces").is_ok());
    }

    #[test]
    fn test_validate_name_invalid() {
        assert!(validate_name("").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name(".").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name(" file").is_err());
        assert!(validate_name("file ").is_err());
        assert!(validate_name("file.").is_err());
    }
}
