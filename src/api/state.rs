//! Application state for the Leave Converter API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::auth::CredentialStore;
use crate::config::ImportConfig;
use crate::roster::Roster;

/// Shared application state.
///
/// Holds the employee roster, the credential store and the workbook import
/// layout used for uploads.
#[derive(Clone)]
pub struct AppState {
    roster: Roster,
    credentials: CredentialStore,
    import: Arc<ImportConfig>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(roster: Roster, credentials: CredentialStore, import: ImportConfig) -> Self {
        Self {
            roster,
            credentials,
            import: Arc::new(import),
        }
    }

    /// Returns the employee roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Returns the credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Returns the workbook import layout.
    pub fn import_config(&self) -> &ImportConfig {
        &self.import
    }
}
