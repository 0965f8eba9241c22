use std::sync::Arc;

use anyhow::Result;
use bson::doc;
use mongodb::Client;
use tracing::{error, info};

use crate::config::Config;
use crate::gateway::store::{MongoRecordStore, RecordStore};

/// Builds the SRV connection string, percent-encoding both credentials.
pub fn connection_uri(username: &str, password: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        urlencoding::encode(username),
        urlencoding::encode(password),
        host
    )
}

/// Connects and pings the deployment once.
pub async fn create_client(uri: &str) -> Result<Client> {
    info!("Connecting to MongoDB...");

    let client = Client::with_uri_str(uri).await?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await?;

    info!("MongoDB connection established");
    Ok(client)
}

/// Opens the record store used for the lifetime of the process.
///
/// Returns `None` (after logging why) when credentials are missing or the
/// initial ping fails. There is no reconnect.
pub async fn init_record_store(config: &Config) -> Option<Arc<dyn RecordStore>> {
    let Some((username, password)) = config.mongodb_credentials() else {
        error!("MongoDB username or password not found; set MONGODB_USERNAME and MONGODB_PASSWORD");
        return None;
    };

    let uri = connection_uri(username, password, &config.mongodb_cluster_host);
    match create_client(&uri).await {
        Ok(client) => Some(Arc::new(MongoRecordStore::new(
            &client,
            &config.mongodb_database,
            &config.mongodb_collection,
        ))),
        Err(e) => {
            error!("MongoDB connection failed: {e:#}");
            None
        }
    }
}
