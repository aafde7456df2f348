use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::AppError;

pub const DEFAULT_WHATSAPP_NUMBER: &str = "5547974008115";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub data_root: PathBuf,
    pub cookie_secret: String,
    pub admin_user: String,
    /// `None` disables admin login entirely.
    pub admin_password: Option<String>,
    pub whatsapp_number: String,
    /// Key for the travel-tip text generation. Resolved once here and handed
    /// to `TipService`; nothing else reads the environment for it.
    pub api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let data_root = env::var("DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let cookie_secret = env::var("COOKIE_SECRET")
            .unwrap_or_else(|_| "change-me-motorista-profissional-cookie-secret".to_string());

        let admin_user = env::var("ADMIN_USER")
            .ok()
            .and_then(non_blank)
            .unwrap_or_else(|| "ADM".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").ok().and_then(non_blank);

        let whatsapp_number = env::var("WHATSAPP_NUMBER")
            .ok()
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_WHATSAPP_NUMBER.to_string());
        if !whatsapp_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Config(
                "WHATSAPP_NUMBER must contain digits only".into(),
            ));
        }

        let api_key = env::var("API_KEY").ok().and_then(non_blank);

        Ok(Self {
            listen_addr,
            data_root,
            cookie_secret,
            admin_user,
            admin_password,
            whatsapp_number,
            api_key,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
