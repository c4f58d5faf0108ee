//! Application context for the Dayplan CLI.
//!
//! Bundles CLI arguments with config-driven session resolution so
//! handlers don't thread mode detection through every call.

use std::path::PathBuf;

use dayplan_core::{Session, SyncStore};

use crate::cli::Cli;
use crate::config::{default_snapshot_path, load_config};

pub struct AppContext<'a> {
    cli: &'a Cli,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Resolve the session from flags, environment, and config.
    ///
    /// A remote URL plus token selects remote mode; anything else falls
    /// back to the local snapshot. Modes never switch mid-run.
    pub fn resolve_session(&self) -> anyhow::Result<Session> {
        let config = load_config(self.cli.config.as_deref())?;
        let remote_url = self.cli.remote_url.clone().or(config.remote.url);
        let token = self.cli.token.clone().or(config.remote.token);

        match (remote_url, token) {
            (Some(base_url), Some(token)) => {
                tracing::debug!(url = %base_url, "remote mode");
                Ok(Session::Authenticated { base_url, token })
            }
            (Some(_), None) => Err(anyhow::anyhow!(
                "Remote URL configured without a token. Set --token or DAYPLAN_TOKEN."
            )),
            _ => {
                let snapshot_path = match self.cli.data.clone().or(config.storage.path) {
                    Some(path) => PathBuf::from(path),
                    None => default_snapshot_path()?,
                };
                tracing::debug!(path = %snapshot_path.display(), "local mode");
                Ok(Session::Anonymous { snapshot_path })
            }
        }
    }

    /// Open the synchronization store for this session.
    pub async fn open_store(&self) -> anyhow::Result<SyncStore> {
        let session = self.resolve_session()?;
        let backend = session.backend()?;
        let store = SyncStore::open(backend).await?;
        Ok(store)
    }
}
