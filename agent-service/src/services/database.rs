//! MongoDB connection handle.
//!
//! Nothing is persisted yet; the service only tracks whether the store is
//! reachable so `/health` can report it without doing I/O.

use mongodb::{
    bson::doc,
    options::ClientOptions,
    Client as MongoClient, Database,
};
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Database used when the URI does not name one.
pub const DEFAULT_DATABASE: &str = "bmad_agents";

/// Upper bound on server selection so a ping never outlives a monitor tick.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
pub struct AgentDb {
    connected: Arc<AtomicBool>,
    db: Arc<OnceLock<Database>>,
}

impl AgentDb {
    /// A handle with no backing connection. Reports disconnected until
    /// `set_connected` says otherwise.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Start connecting without blocking the caller, then keep the cached
    /// connection flag current by pinging every `monitor_interval`.
    pub fn connect_in_background(uri: &str, monitor_interval: Duration) -> Self {
        let store = Self::default();
        let task_store = store.clone();
        let uri = uri.to_string();

        tokio::spawn(async move {
            if let Err(e) = task_store.open(&uri).await {
                tracing::warn!(error = %e, "MongoDB unavailable, continuing without store");
                return;
            }
            task_store.monitor(monitor_interval).await;
        });

        store
    }

    async fn open(&self, uri: &str) -> Result<(), AppError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let database = options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = MongoClient::with_options(options)?;
        let _ = self.db.set(client.database(&database));
        tracing::info!(database = %database, "MongoDB client initialised");
        Ok(())
    }

    async fn monitor(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let reachable = match self.ping().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!(error = %e, "MongoDB ping failed");
                    false
                }
            };
            self.set_connected(reachable);
        }
    }

    /// Round-trip a `ping` command to the server.
    pub async fn ping(&self) -> Result<(), AppError> {
        let db = self
            .db
            .get()
            .ok_or_else(|| AppError::DatabaseError(anyhow::anyhow!("store not initialised")))?;
        db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Cached connection state. Never blocks.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn set_connected(&self, connected: bool) {
        let previous = self.connected.swap(connected, Ordering::AcqRel);
        match (previous, connected) {
            (false, true) => tracing::info!("MongoDB connected"),
            (true, false) => tracing::warn!("MongoDB connection lost"),
            _ => {}
        }
    }
}
