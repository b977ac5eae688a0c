use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::services::{AccountService, FeedService};
use crate::store::{CommunityStore, ImageStore};

#[derive(Clone)]
pub struct AppState {
    pub feed: FeedService,
    pub accounts: AccountService,
    pub config: Config,
}

impl AppState {
    /// Wires both services onto the same community store.
    pub fn new(
        store: Arc<dyn CommunityStore>,
        images: Arc<dyn ImageStore>,
        config: Config,
    ) -> Self {
        Self {
            feed: FeedService::new(store.clone(), images),
            accounts: AccountService::new(store, config.jwt_secret.clone(), config.jwt_expiration),
            config,
        }
    }
}

impl FromRef<AppState> for FeedService {
    fn from_ref(state: &AppState) -> Self {
        state.feed.clone()
    }
}

impl FromRef<AppState> for AccountService {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
