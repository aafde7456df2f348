use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{
    auth::CredentialVerifier,
    config::AppConfig,
    services::{
        site::SiteSettingsStore, storage::KeyValueStore, tips::TipService, trips::TripStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripStore,
    pub site: SiteSettingsStore,
    pub tips: TipService,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        kv: Arc<dyn KeyValueStore>,
        credentials: Arc<dyn CredentialVerifier>,
        tips: TipService,
    ) -> Self {
        let digest = Sha512::digest(config.cookie_secret.as_bytes());
        let cookie_key = Key::from(&digest[..]);
        Self {
            config,
            trips: TripStore::new(kv.clone()),
            site: SiteSettingsStore::new(kv),
            tips,
            credentials,
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
