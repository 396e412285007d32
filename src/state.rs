use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::PostStore;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub keys: Arc<JwtKeys>,
    pub max_request_size_bytes: usize,
    pub enable_cors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn PostStore>, keys: JwtKeys) -> Self {
        Self {
            store,
            keys: Arc::new(keys),
            max_request_size_bytes: 2 * 1024 * 1024,
            enable_cors: false,
        }
    }

    pub fn from_config(config: &AppConfig, store: Arc<dyn PostStore>) -> Self {
        let keys = JwtKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours);
        Self {
            store,
            keys: Arc::new(keys),
            max_request_size_bytes: config.api.max_request_size_bytes,
            enable_cors: config.security.enable_cors,
        }
    }
}
