//! Session state supplied by the identity provider.
//!
//! The store only cares about the authenticated/anonymous distinction;
//! that single input selects the persistence strategy once, at
//! construction time. Modes are not switched mid-session and no data
//! migrates between them.

use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::{Backend, LocalBackend, RemoteBackend};
use crate::error::Result;

/// Authentication state for the current principal.
#[derive(Debug, Clone)]
pub enum Session {
    /// Signed in; the remote authority is the source of truth.
    Authenticated { base_url: String, token: String },

    /// No session; todos live in the local snapshot at `snapshot_path`.
    Anonymous { snapshot_path: PathBuf },
}

impl Session {
    /// Select the persistence strategy for this session.
    ///
    /// # Errors
    ///
    /// Remote sessions fail on an invalid base URL; anonymous sessions
    /// fail if an existing snapshot cannot be read.
    pub fn backend(&self) -> Result<Arc<dyn Backend>> {
        match self {
            Session::Authenticated { base_url, token } => {
                Ok(Arc::new(RemoteBackend::new(base_url, token)?))
            }
            Session::Anonymous { snapshot_path } => {
                Ok(Arc::new(LocalBackend::open(snapshot_path.clone())?))
            }
        }
    }
}
