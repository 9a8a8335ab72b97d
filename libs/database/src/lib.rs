//! Database connectivity for the store services
//!
//! Wraps the MongoDB driver with configuration, startup retry, and health
//! probes so application binaries only deal with a ready `mongodb::Client`.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector, config, and health checks
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017").with_database("store");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
