pub mod cli;
pub mod client;
pub mod collection;
pub mod config;
pub mod errors;
pub mod explain;
pub mod info;
pub mod logger;
pub mod usage;

use crate::collection::MongoCollection;
use crate::config::AppConfig;
use crate::errors::UsageError;

/// Initializes the logging system for `config`; see [`logger::init_from_config`].
pub fn init(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    logger::init_from_config(config)
}

/// Opens the configured collection (default `test.test` on localhost).
pub async fn open(config: &AppConfig) -> Result<MongoCollection, UsageError> {
    let settings = config.connection()?;
    client::open_collection(&settings).await
}
