use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::AppError,
    models::settings::{default_fleet, Car, SiteSettings, DEFAULT_HERO_IMAGE},
    services::storage::KeyValueStore,
};

pub const HERO_IMAGE_KEY: &str = "heroImage";
pub const FLEET_CARS_KEY: &str = "fleetCars";

#[derive(Clone)]
pub struct SiteSettingsStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SiteSettingsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> Result<SiteSettings, AppError> {
        let hero_image = self
            .kv
            .get(HERO_IMAGE_KEY)
            .await?
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_HERO_IMAGE.to_string());

        let fleet = match self.kv.get(FLEET_CARS_KEY).await? {
            None => default_fleet(),
            Some(raw) => match serde_json::from_str::<Vec<Car>>(&raw) {
                Ok(cars) if !cars.is_empty() => cars,
                Ok(_) => default_fleet(),
                Err(err) => {
                    warn!("stored fleet is unreadable, using defaults: {err}");
                    default_fleet()
                }
            },
        };

        Ok(SiteSettings { hero_image, fleet })
    }

    pub async fn save(&self, settings: &SiteSettings) -> Result<(), AppError> {
        let fleet =
            serde_json::to_string(&settings.fleet).map_err(|err| AppError::Other(err.into()))?;
        self.kv.set(HERO_IMAGE_KEY, &settings.hero_image).await?;
        self.kv.set(FLEET_CARS_KEY, &fleet).await?;
        info!(cars = settings.fleet.len(), "site settings saved");
        Ok(())
    }
}
