use std::sync::Arc;

use chapterhouse_db::store::DirectoryStore;

use crate::config::ServerConfig;
use crate::services::credentials::CredentialRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Accounts, invitations, pitches, and reviews.
    pub store: Arc<dyn DirectoryStore>,
    /// Auth provider credential lookups for invitation issuance.
    pub credentials: Arc<dyn CredentialRegistry>,
    pub config: Arc<ServerConfig>,
}
