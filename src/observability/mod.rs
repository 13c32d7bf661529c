//! Observability for store operations
//!
//! Structured one-line JSON event logging. Observability is read-only:
//! a logging failure must never fail the operation being logged, and
//! nothing here retries or buffers.

mod logger;

pub use logger::{Logger, Severity};
