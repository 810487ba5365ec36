//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FinalizerConfig (validated, immutable)
//!     → trace::Config::from_schema (custom tags compiled)
//!     → shared via Arc with every finalizing worker
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BodyCaptureConfig, CustomTagConfig, FinalizerConfig, LocalConfig, ObservabilityConfig,
    TracingConfig,
};
