//! Runtime configuration handed to [`AppState::new`](crate::state::AppState::new)
//!
//! Built once by the binary from flags and environment; nothing here reads
//! the environment itself.

use crate::http::ServerConfig;

/// Everything the server needs besides its storage
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub sites: SiteQueueConfig,
}

/// Bearer token settings
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Site queue behaviour
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteQueueConfig {
    /// Reject status changes outside the allowed transition table.
    pub enforce_transitions: bool,
}
