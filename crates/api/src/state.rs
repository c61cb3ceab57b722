use std::sync::Arc;

use forum_auth_db::store::CredentialStore;

use crate::config::ServerConfig;
use crate::engine::AuthEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The auth engine orchestrating registration, login, and rotation.
    pub engine: Arc<AuthEngine>,
    /// The credential store, exposed for the health probe.
    pub store: Arc<dyn CredentialStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
