use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "pending",
            TripStatus::Confirmed => "confirmed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Pending => "Pendente",
            TripStatus::Confirmed => "Realizada",
            TripStatus::Cancelled => "Cancelada",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown trip status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for TripStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TripStatus::Pending),
            "confirmed" => Ok(TripStatus::Confirmed),
            "cancelled" => Ok(TripStatus::Cancelled),
            _ => Err(UnknownStatus(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub client_name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub pickup: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub destination: String,
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: TripStatus,
}

impl TripRecord {
    pub fn is_confirmed_for(&self, user_id: &str) -> bool {
        self.status == TripStatus::Confirmed && self.user_id.as_deref() == Some(user_id)
    }
}

/// Input for a new booking record; id, date and status are assigned by the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTripRecord {
    pub client_name: String,
    pub pickup: String,
    pub destination: String,
    pub user_id: Option<String>,
}

// Older saved lists have no status at all, or values we no longer know.
fn status_or_pending<'de, D>(deserializer: D) -> Result<TripStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|value| value.parse::<TripStatus>().ok())
        .unwrap_or_default())
}

// Hand-edited lists may carry `null` or numbers where text is expected.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    })
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) if !id.trim().is_empty() => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!("unusable trip id {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_without_status_load_as_pending() {
        let raw = r#"[
            {"id":"1","date":"01/02/2024, 10:00:00","clientName":"Ana","pickup":"Rua A","destination":"Rua B"},
            {"id":"2","clientName":"Bia","pickup":"x","destination":"y","status":null},
            {"id":"3","clientName":"Caio","pickup":"x","destination":"y","status":""},
            {"id":"4","clientName":"Duda","pickup":"x","destination":"y","status":"archived"},
            {"id":"5","userId":"u1","clientName":"Edu","pickup":"x","destination":"y","status":"confirmed"}
        ]"#;
        let records: Vec<TripRecord> = serde_json::from_str(raw).expect("parse");
        let statuses: Vec<_> = records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                TripStatus::Pending,
                TripStatus::Pending,
                TripStatus::Pending,
                TripStatus::Pending,
                TripStatus::Confirmed,
            ]
        );
        assert_eq!(records[0].user_id, None);
        assert_eq!(records[4].user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn serializes_with_camel_case_and_omits_guest_user() {
        let record = TripRecord {
            id: "42".into(),
            user_id: None,
            date: "today".into(),
            client_name: "Ana".into(),
            pickup: "Aeroporto".into(),
            destination: "Centro".into(),
            status: TripStatus::Cancelled,
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["clientName"], "Ana");
        assert_eq!(json["status"], "cancelled");
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn null_fields_and_numeric_ids_are_tolerated() {
        let raw = r#"{"id":1700000000000,"clientName":null,"pickup":"Rua A","destination":null,"status":"confirmed"}"#;
        let record: TripRecord = serde_json::from_str(raw).expect("parse");
        assert_eq!(record.id, "1700000000000");
        assert_eq!(record.client_name, "");
        assert_eq!(record.destination, "");
        assert_eq!(record.status, TripStatus::Confirmed);
    }

    #[test]
    fn records_without_an_id_are_rejected() {
        for raw in [
            r#"{"clientName":"Ana"}"#,
            r#"{"id":null,"clientName":"Ana"}"#,
            r#"{"id":"  ","clientName":"Ana"}"#,
        ] {
            assert!(serde_json::from_str::<TripRecord>(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn unknown_status_names_the_value() {
        let err = "done".parse::<TripStatus>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown trip status `done`");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Confirmed".parse::<TripStatus>(), Ok(TripStatus::Confirmed));
        assert!("done".parse::<TripStatus>().is_err());
    }

    #[test]
    fn confirmed_count_requires_matching_user() {
        let mut record = TripRecord {
            id: "1".into(),
            user_id: None,
            date: String::new(),
            client_name: "Ana".into(),
            pickup: "a".into(),
            destination: "b".into(),
            status: TripStatus::Confirmed,
        };
        assert!(!record.is_confirmed_for("u1"));
        record.user_id = Some("u1".into());
        assert!(record.is_confirmed_for("u1"));
        record.status = TripStatus::Pending;
        assert!(!record.is_confirmed_for("u1"));
    }
}
