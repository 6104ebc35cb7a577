use crate::collection::MongoCollection;
use crate::config::{ConnectionSettings, redact_uri};
use crate::errors::UsageError;
use mongodb::Client;
use mongodb::options::ClientOptions;

/// Parses the connection string and builds a client. No I/O happens until the
/// first operation.
pub async fn connect(settings: &ConnectionSettings) -> Result<Client, UsageError> {
    let mut options = ClientOptions::parse(settings.uri.as_str()).await?;
    if let Some(name) = &settings.app_name {
        options.app_name = Some(name.clone());
    }
    if let Some(t) = settings.server_selection_timeout {
        options.server_selection_timeout = Some(t);
    }
    log::info!("connecting to {}", redact_uri(&settings.uri));
    Ok(Client::with_options(options)?)
}

/// client -> database -> collection.
pub async fn open_collection(settings: &ConnectionSettings) -> Result<MongoCollection, UsageError> {
    let client = connect(settings).await?;
    log::debug!("using {}.{}", settings.database, settings.collection);
    Ok(MongoCollection::new(client, &settings.database, &settings.collection))
}
