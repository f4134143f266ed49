//! Database library providing the MongoDB connector and a shared
//! backoff-retry utility.
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::from_env()?;
//! // None = backoff schedule derived from the config's own timeouts
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let collection = client.database(config.database()).collection::<User>("users");
//! ```

pub mod common;
pub mod mongodb;

pub use common::{RetryConfig, retry_with_backoff};
