use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use tracing::warn;

use crate::{
    error::AppError,
    models::{session::Session, user::User},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "motorista_session";

/// Decides whether a username/password pair grants admin access.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, user: &str, pass: &str) -> bool;
}

/// Compares against one configured admin account.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    user: String,
    password: Option<String>,
}

impl StaticCredentials {
    pub fn new(user: impl Into<String>, password: Option<String>) -> Self {
        let password = password.filter(|p| !p.trim().is_empty());
        if password.is_none() {
            warn!("no admin password configured, admin login is disabled");
        }
        Self {
            user: user.into(),
            password,
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, user: &str, pass: &str) -> bool {
        let Some(password) = self.password.as_deref() else {
            return false;
        };
        user.trim() == self.user.trim() && pass.trim() == password.trim()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let session = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str::<Session>(cookie.value()).ok());
        Ok(Self(session))
    }
}

impl CurrentSession {
    pub fn customer(&self) -> Option<&User> {
        self.0.as_ref().and_then(Session::customer)
    }

    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(Session::is_admin)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        match &self.0 {
            None => Err(AppError::Unauthorized),
            Some(session) if session.is_admin() => Ok(()),
            Some(_) => Err(AppError::Forbidden),
        }
    }
}

/// Reconstructs the customer for a login; the trip count is read once, here.
pub async fn customer_login(state: &AppState, email: &str) -> Result<User, AppError> {
    let mut user = User::club_member(email, 0);
    user.trip_count = state.trips.count_confirmed_for(&user.id).await? as u64;
    Ok(user)
}

pub fn apply_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
) -> Result<PrivateCookieJar, AppError> {
    let value = serde_json::to_string(session).map_err(|err| AppError::Other(err.into()))?;
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    Ok(jar.add(cookie))
}

pub fn clear_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_credentials_trim_input() {
        let creds = StaticCredentials::new("ADM", Some("s3cret#".into()));
        assert!(creds.verify(" ADM ", "s3cret# "));
        assert!(!creds.verify("ADM", "wrong"));
        assert!(!creds.verify("adm", "s3cret#"));
    }

    #[test]
    fn missing_password_disables_admin_login() {
        let creds = StaticCredentials::new("ADM", None);
        assert!(!creds.verify("ADM", ""));
        let blank = StaticCredentials::new("ADM", Some("  ".into()));
        assert!(!blank.verify("ADM", "  "));
    }
}
