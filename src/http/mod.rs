//! HTTP header handling.
//!
//! # Data Flow
//! ```text
//! axum::http request parts / header maps
//!     → headers.rs (ordered multimap, pseudo-headers, well-known lookups)
//!     → trace::finalize (tag derivation reads headers, never mutates them)
//! ```

pub mod headers;

pub use headers::{Headers, names};
