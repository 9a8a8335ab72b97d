//! MongoDB connector, configuration, health probes, error classification and
//! the stored id encoding

mod config;
mod connector;
mod errors;
mod health;
mod ids;

pub use config::MongoConfig;
pub use connector::{client_options, connect_from_config, connect_from_config_with_retry};
pub use errors::{StoreErrorKind, classify};
pub use health::{HealthStatus, check_health_detailed};
pub use ids::{stored_uuid, uuid_as_binary, uuid_bson, uuid_vec_as_binary};

pub use mongodb::{Client, Collection, Database};
