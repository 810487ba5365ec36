//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Keep custom tags from shadowing tags the finalizer writes itself
//! - Validate value ranges (path tag length, metadata path depth)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FinalizerConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{CustomTagConfig, FinalizerConfig};
use crate::trace::extract::MAX_PATH_DEPTH;
use crate::trace::tags;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tracing.max_path_tag_length must be at least 1")]
    ZeroPathTagLength,

    #[error("custom tag #{0} has an empty tag name")]
    EmptyTagName(usize),

    #[error("custom tag '{0}' is defined more than once")]
    DuplicateTag(String),

    #[error("custom tag '{0}' would overwrite a built-in tag")]
    ReservedTag(String),

    #[error("custom tag '{0}' has an empty source name")]
    EmptySourceName(String),

    #[error("custom tag '{tag}' has a metadata path of {len} segments (expected 1..={max})")]
    BadMetadataPath { tag: String, len: usize, max: usize },

    #[error("body_capture.{0} must not be empty")]
    EmptyBodyCaptureField(&'static str),
}

/// Check a parsed config, collecting every violation.
pub fn validate_config(config: &FinalizerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.tracing.max_path_tag_length == 0 {
        errors.push(ValidationError::ZeroPathTagLength);
    }

    let mut seen = HashSet::new();
    for (i, custom) in config.tracing.custom_tags.iter().enumerate() {
        let tag = custom.tag();
        if tag.is_empty() {
            errors.push(ValidationError::EmptyTagName(i));
            continue;
        }
        if !seen.insert(tag) {
            errors.push(ValidationError::DuplicateTag(tag.to_string()));
        }
        if tags::is_reserved(tag) {
            errors.push(ValidationError::ReservedTag(tag.to_string()));
        }
        match custom {
            CustomTagConfig::Literal { .. } => {}
            CustomTagConfig::Environment { name, .. } | CustomTagConfig::RequestHeader { name, .. } => {
                if name.is_empty() {
                    errors.push(ValidationError::EmptySourceName(tag.to_string()));
                }
            }
            CustomTagConfig::Metadata { namespace, path, .. } => {
                if namespace.is_empty() {
                    errors.push(ValidationError::EmptySourceName(tag.to_string()));
                }
                if path.is_empty() || path.len() > MAX_PATH_DEPTH {
                    errors.push(ValidationError::BadMetadataPath {
                        tag: tag.to_string(),
                        len: path.len(),
                        max: MAX_PATH_DEPTH,
                    });
                }
            }
        }
    }

    let body = &config.body_capture;
    for (field, value) in [
        ("request_namespace", &body.request_namespace),
        ("response_namespace", &body.response_namespace),
        ("key", &body.key),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::EmptyBodyCaptureField(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(tag: &str) -> CustomTagConfig {
        CustomTagConfig::Literal {
            tag: tag.into(),
            value: "v".into(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&FinalizerConfig::default()), Ok(()));
    }

    #[test]
    fn test_custom_tag_rules() {
        let mut config = FinalizerConfig::default();
        config.tracing.custom_tags = vec![
            literal("tenant"),
            literal("tenant"),
            literal(""),
            literal("http.url"),
            CustomTagConfig::RequestHeader {
                tag: "ua".into(),
                name: String::new(),
                default_value: None,
            },
            CustomTagConfig::Metadata {
                tag: "md".into(),
                namespace: "ns".into(),
                path: Vec::new(),
                default_value: None,
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateTag("tenant".into()),
                ValidationError::EmptyTagName(2),
                ValidationError::ReservedTag("http.url".into()),
                ValidationError::EmptySourceName("ua".into()),
                ValidationError::BadMetadataPath {
                    tag: "md".into(),
                    len: 0,
                    max: MAX_PATH_DEPTH
                },
            ]
        );
    }

    #[test]
    fn test_body_capture_fields() {
        let mut config = FinalizerConfig::default();
        config.body_capture.key.clear();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::EmptyBodyCaptureField("key")])
        );
    }
}
