//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::collections::HashSet;
use thiserror::Error;

/// Smallest accepted `listen.max_line_len`; one conventional line must fit.
const MIN_LINE_LEN: usize = 512;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("region.name is required")]
    MissingRegionName,
    #[error("listen.max_line_len must be at least 512, got {0}")]
    LineLimitTooSmall(usize),
    #[error("listen.read_chunk must be non-zero")]
    ZeroReadChunk,
    #[error("webdav.path must start with '/', got '{0}'")]
    RelativeDavPath(String),
    #[error("webdav.users contains '{0}' more than once")]
    DuplicateDavUser(String),
    #[error("webdav.resources path must start with '/', got '{0}'")]
    RelativeResourcePath(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.region.name.trim().is_empty() {
        errors.push(ValidationError::MissingRegionName);
    }

    if config.listen.max_line_len < MIN_LINE_LEN {
        errors.push(ValidationError::LineLimitTooSmall(config.listen.max_line_len));
    }
    if config.listen.read_chunk == 0 {
        errors.push(ValidationError::ZeroReadChunk);
    }

    if let Some(dav) = &config.webdav {
        if !dav.path.starts_with('/') {
            errors.push(ValidationError::RelativeDavPath(dav.path.clone()));
        }
        let mut seen = HashSet::new();
        for user in &dav.users {
            if !seen.insert(user.name.as_str()) {
                errors.push(ValidationError::DuplicateDavUser(user.name.clone()));
            }
        }
        for resource in &dav.resources {
            if !resource.path.starts_with('/') {
                errors.push(ValidationError::RelativeResourcePath(resource.path.clone()));
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_unchecked(text: &str) -> Config {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_valid_minimal() {
        let config = parse_unchecked(
            "[region]\nname = \"R\"\n[listen]\naddress = \"127.0.0.1:1\"\n",
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = parse_unchecked(
            r#"
[region]
name = "  "

[listen]
address = "127.0.0.1:1"
read_chunk = 0

[webdav]
address = "127.0.0.1:2"
path = "dav"

[[webdav.users]]
name = "a"
password = "1"

[[webdav.users]]
name = "a"
password = "2"
"#,
        );
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateDavUser(n) if n == "a")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroReadChunk)));
    }
}
