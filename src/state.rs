use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{jwt::JwtKeys, repo::UserStore};
use crate::config::AppConfig;
use crate::items::repo::ItemStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<UserStore>,
    pub items: Arc<ItemStore>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Fresh, empty stores around the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let keys = JwtKeys::from_config(&config.jwt);
        Self {
            config: Arc::new(config),
            keys,
            users: Arc::new(UserStore::new()),
            items: Arc::new(ItemStore::new()),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl FromRef<AppState> for Arc<UserStore> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.users)
    }
}
