//! Utilities shared across database connectors.

mod retry;

pub use retry::{RetryConfig, retry_with_backoff};
