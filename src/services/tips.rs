use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::AppError;

pub const FALLBACK_TIP: &str = "Dica do dia: Chegue 5 minutos antes para garantir tranquilidade!";
pub const EMPTY_RESPONSE_TIP: &str = "Viaje com segurança e conforto sempre.";
pub const ERROR_TIP: &str =
    "Dica: Mantenha seu cinto de segurança afivelado durante toda a viagem.";

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
const TIP_PROMPT: &str = "Escreva uma dica curta, útil e motivadora de 1 frase para um passageiro que vai fazer uma viagem de carro executivo em Jaraguá do Sul. Fale sobre conforto, segurança ou a beleza da cidade.";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// Short travel tip shown next to the booking form.
///
/// Pages only ever read the cached value; generation runs in the background.
#[derive(Clone)]
pub struct TipService {
    api_key: Option<Arc<str>>,
    client: reqwest::Client,
    current: Arc<RwLock<String>>,
}

impl TipService {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(Arc::from),
            client: reqwest::Client::new(),
            current: Arc::new(RwLock::new(FALLBACK_TIP.to_string())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn current(&self) -> String {
        self.current.read().await.clone()
    }

    /// Spawns a background refresh. Without an API key this does nothing.
    pub fn refresh(&self) {
        if !self.is_enabled() {
            debug!("no text-generation key configured, keeping fallback tip");
            return;
        }
        let service = self.clone();
        tokio::spawn(async move {
            let tip = match service.generate().await {
                Ok(Some(tip)) => tip,
                Ok(None) => EMPTY_RESPONSE_TIP.to_string(),
                Err(err) => {
                    warn!("travel tip generation failed: {err}");
                    ERROR_TIP.to_string()
                }
            };
            info!("travel tip refreshed");
            *service.current.write().await = tip;
        });
    }

    async fn generate(&self) -> Result<Option<String>, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: TIP_PROMPT }],
            }],
        };
        let response = self
            .client
            .post(GENERATE_URL)
            .header("x-goog-api-key", api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body: GenerateResponse = response.json().await?;
        Ok(body.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_key_the_fallback_is_served() {
        let tips = TipService::new(None);
        tips.refresh();
        assert!(!tips.is_enabled());
        assert_eq!(tips.current().await, FALLBACK_TIP);
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":" Aproveite "},{"text":"a vista. "}]}}]}"#,
        )
        .expect("parse");
        assert_eq!(body.text().as_deref(), Some("Aproveite a vista."));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).expect("parse");
        assert_eq!(empty.text(), None);
    }
}
