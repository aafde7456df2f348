use std::sync::Arc;

use chrono::Local;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::trip::{NewTripRecord, TripRecord, TripStatus},
    services::storage::KeyValueStore,
};

pub const TRIP_HISTORY_KEY: &str = "tripHistory";
/// Where an unreadable history is moved before a write replaces it.
pub const UNREADABLE_HISTORY_KEY: &str = "tripHistoryUnreadable";

/// Booking history persisted as one flat JSON list under [`TRIP_HISTORY_KEY`].
///
/// Every mutation rewrites the whole list. Mutations through clones of the
/// same store are serialized; separate processes sharing the files race and
/// the last one wins.
///
/// Entries are kept as raw JSON so that records this build cannot read are
/// written back untouched.
#[derive(Clone)]
pub struct TripStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

enum History {
    Entries(Vec<Value>),
    Unreadable(String),
}

impl TripStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create(&self, new: NewTripRecord) -> Result<TripRecord, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = match self.load().await? {
            History::Entries(entries) => entries,
            History::Unreadable(raw) => {
                self.kv.set(UNREADABLE_HISTORY_KEY, &raw).await?;
                warn!(
                    backup = UNREADABLE_HISTORY_KEY,
                    "unreadable trip history moved aside before recording a new trip"
                );
                Vec::new()
            }
        };

        let taken: Vec<String> = decode_all(&entries).into_iter().map(|t| t.id).collect();
        let mut id = Uuid::new_v4().to_string();
        while taken.contains(&id) {
            id = Uuid::new_v4().to_string();
        }
        let record = TripRecord {
            id,
            user_id: new.user_id,
            date: Local::now().format("%d/%m/%Y, %H:%M:%S").to_string(),
            client_name: new.client_name,
            pickup: new.pickup,
            destination: new.destination,
            status: TripStatus::Pending,
        };
        entries.push(serde_json::to_value(&record).map_err(|err| AppError::Other(err.into()))?);
        self.save(&entries).await?;
        info!(trip_id = %record.id, guest = record.user_id.is_none(), "trip recorded");
        Ok(record)
    }

    /// All readable records in insertion order.
    pub async fn list_all(&self) -> Result<Vec<TripRecord>, AppError> {
        match self.load().await? {
            History::Entries(entries) => Ok(decode_all(&entries)),
            History::Unreadable(_) => Ok(Vec::new()),
        }
    }

    pub async fn count_confirmed_for(&self, user_id: &str) -> Result<usize, AppError> {
        Ok(self
            .list_all()
            .await?
            .iter()
            .filter(|trip| trip.is_confirmed_for(user_id))
            .count())
    }

    /// Returns `false` and leaves storage untouched when `id` is unknown.
    pub async fn update_status(&self, id: &str, status: TripStatus) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        let History::Entries(mut entries) = self.load().await? else {
            debug!(trip_id = %id, "status update ignored, history is unreadable");
            return Ok(false);
        };

        let found = entries.iter_mut().find_map(|entry| {
            let trip = serde_json::from_value::<TripRecord>(entry.clone()).ok()?;
            (trip.id == id).then_some((entry, trip.status))
        });
        let Some((entry, previous)) = found else {
            debug!(trip_id = %id, "status update for unknown trip ignored");
            return Ok(false);
        };
        if let Some(fields) = entry.as_object_mut() {
            fields.insert("status".into(), Value::from(status.as_str()));
        }

        self.save(&entries).await?;
        info!(trip_id = %id, from = %previous, to = %status, "trip status updated");
        Ok(true)
    }

    pub async fn clear_all(&self) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.kv.remove(TRIP_HISTORY_KEY).await?;
        info!("trip history cleared");
        Ok(())
    }

    async fn load(&self) -> Result<History, AppError> {
        let Some(raw) = self.kv.get(TRIP_HISTORY_KEY).await? else {
            return Ok(History::Entries(Vec::new()));
        };
        if raw.trim().is_empty() {
            return Ok(History::Entries(Vec::new()));
        }
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => Ok(History::Entries(entries)),
            Err(err) => {
                warn!("stored trip history is unreadable, treating it as empty: {err}");
                Ok(History::Unreadable(raw))
            }
        }
    }

    async fn save(&self, entries: &[Value]) -> Result<(), AppError> {
        let data = serde_json::to_string(entries).map_err(|err| AppError::Other(err.into()))?;
        self.kv.set(TRIP_HISTORY_KEY, &data).await
    }
}

fn decode_all(entries: &[Value]) -> Vec<TripRecord> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<TripRecord>(entry.clone())
                .map_err(|err| warn!(index, "skipping unreadable trip record: {err}"))
                .ok()
        })
        .collect()
}
