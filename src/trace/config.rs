//! Runtime settings consumed by the finalizer.

use crate::config::schema::{BodyCaptureConfig, FinalizerConfig};
use crate::trace::custom_tag::{self, CustomTag};
use crate::trace::tracer::OperationName;

/// Read-only finalizer settings, built once from a validated config.
#[derive(Debug)]
pub struct Config {
    pub operation_name: OperationName,
    pub verbose: bool,
    pub max_path_tag_length: usize,
    pub custom_tags: Vec<Box<dyn CustomTag>>,
    pub body_capture: BodyCaptureConfig,
}

impl Config {
    pub fn from_schema(config: &FinalizerConfig) -> Self {
        Self {
            operation_name: config.tracing.operation_name,
            verbose: config.tracing.verbose,
            max_path_tag_length: config.tracing.max_path_tag_length,
            custom_tags: config
                .tracing
                .custom_tags
                .iter()
                .map(custom_tag::from_config)
                .collect(),
            body_capture: config.body_capture.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_schema(&FinalizerConfig::default())
    }
}
