//! The span interface the finalizer writes into.

use std::time::SystemTime;

/// An open span owned by a tracing driver.
///
/// Tags are last-write-wins per name. `finish_span` consumes the span, so no
/// write can follow it.
pub trait Span: Send {
    fn set_tag(&mut self, name: &str, value: &str);

    /// Append a timestamped event.
    fn log(&mut self, timestamp: SystemTime, event: &str);

    fn finish_span(self: Box<Self>);
}
