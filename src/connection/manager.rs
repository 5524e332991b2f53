//! Core ConnectionManager struct and basic connection methods.

use mongodb::Client;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use tokio::runtime::Runtime;

use crate::connection::types::ConnectionSettings;
use crate::error::{Error, Result};
use crate::helpers::{redact_uri_password, validate_mongodb_uri};

const APP_NAME: &str = "mangodiag";

/// Runs MongoDB driver calls to completion on an owned Tokio runtime
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
}

impl ConnectionManager {
    /// Create a new connection manager with its own multi-threaded runtime
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        Ok(Self { runtime })
    }

    /// Get a handle to the Tokio runtime for spawning background tasks
    pub fn runtime_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Connect and ping the deployment (runs in Tokio runtime).
    ///
    /// The timeout bounds both the driver's connect/server selection and the
    /// whole connect-and-ping sequence.
    pub fn connect(&self, settings: &ConnectionSettings) -> Result<Client> {
        validate_mongodb_uri(&settings.uri)?;

        let uri = settings.uri.clone();
        let timeout = settings.connect_timeout;
        log::info!("Connecting to {}", redact_uri_password(&uri));

        self.runtime.block_on(async {
            let fut = async {
                let mut options = ClientOptions::parse(&uri).await?;
                options.connect_timeout = Some(timeout);
                options.server_selection_timeout = Some(timeout);
                options.app_name.get_or_insert_with(|| APP_NAME.to_string());

                let client = Client::with_options(options)?;
                client.database("admin").run_command(doc! { "ping": 1 }).await?;
                Ok::<Client, mongodb::error::Error>(client)
            };

            match tokio::time::timeout(timeout, fut).await {
                Ok(result) => result.map_err(Error::from),
                Err(_) => Err(Error::Timeout(format!(
                    "no response from {} within {}s",
                    redact_uri_password(&uri),
                    timeout.as_secs()
                ))),
            }
        })
    }

    /// Report the server version from `buildInfo` (runs in Tokio runtime)
    pub fn server_version(&self, client: &Client) -> Result<Option<String>> {
        let client = client.clone();
        self.runtime.block_on(async {
            let info = client.database("admin").run_command(doc! { "buildInfo": 1 }).await?;
            Ok(info.get_str("version").ok().map(str::to_string))
        })
    }

    /// List collection names in a database, sorted (runs in Tokio runtime)
    pub fn list_collection_names(&self, client: &Client, database: &str) -> Result<Vec<String>> {
        let client = client.clone();
        let database = database.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let mut names = db.list_collection_names().await?;
            names.sort_unstable();
            Ok(names)
        })
    }

    /// Shut the client down, waiting for its cursors and sessions to be released.
    pub fn shutdown(&self, client: Client) {
        self.runtime.block_on(async move { client.shutdown().await });
    }
}
