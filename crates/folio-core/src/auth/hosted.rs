use super::{IdentityProvider, Session, User};
use crate::config::IdentitySettings;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

/// Token grant response from the auth service.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

/// Error body; the service has used each of these fields over time.
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// On-disk form of a session, kept in the key-value store.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    user: User,
}

impl From<&Session> for PersistedSession {
    fn from(s: &Session) -> Self {
        Self {
            access_token: s.access_token.expose_secret().to_string(),
            refresh_token: s.refresh_token.as_ref().map(|t| t.expose_secret().to_string()),
            expires_at: s.expires_at,
            user: s.user.clone(),
        }
    }
}

impl From<PersistedSession> for Session {
    fn from(p: PersistedSession) -> Self {
        Self {
            access_token: SecretString::from(p.access_token),
            refresh_token: p.refresh_token.map(SecretString::from),
            expires_at: p.expires_at,
            user: p.user,
        }
    }
}

fn session_from_token(token: TokenResponse, now: DateTime<Utc>) -> Session {
    let expires_at = token
        .expires_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .or_else(|| token.expires_in.map(|secs| now + Duration::seconds(secs)));
    Session {
        access_token: SecretString::from(token.access_token),
        refresh_token: token.refresh_token.map(SecretString::from),
        expires_at,
        user: token.user,
    }
}

fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let parsed: ApiError = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| format!("auth service responded with {}", status))
}

/// Password sign-in against a hosted GoTrue-compatible auth service.
///
/// The session survives restarts in the given key-value store, the same way
/// a browser client keeps it in local storage.
pub struct HostedIdentityProvider<S: KeyValueStore> {
    client: Client,
    base_url: String,
    anon_key: SecretString,
    storage: S,
}

impl<S: KeyValueStore> HostedIdentityProvider<S> {
    pub const SESSION_KEY: &'static str = "folio.auth.session";

    /// Sessions closer than this to expiry are refreshed on restore.
    const EXPIRY_MARGIN_SECS: i64 = 10;

    pub fn new(settings: &IdentitySettings, storage: S) -> Result<Self> {
        if !settings.is_configured() {
            return Err(Error::Custom(
                "Identity provider is not configured (set identity.url and identity.anon_key)".to_string(),
            ));
        }
        url::Url::parse(&settings.url)?;
        Ok(Self {
            client: Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: SecretString::from(settings.anon_key.clone()),
            storage,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn request_token(&self, grant_type: &str, body: serde_json::Value) -> Result<Session> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", self.anon_key.expose_secret())
            .json(&body)
            .send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(Error::Auth(api_error_message(status, &text)));
        }
        let token: TokenResponse = serde_json::from_str(&text)?;
        Ok(session_from_token(token, Utc::now()))
    }

    fn store_session(&mut self, session: &Session) -> Result<()> {
        let data = serde_json::to_string(&PersistedSession::from(session))?;
        self.storage.set(Self::SESSION_KEY, &data)
    }

    fn stored_session(&self) -> Result<Option<Session>> {
        let Some(raw) = self.storage.get(Self::SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<PersistedSession>(&raw) {
            Ok(persisted) => Ok(Some(persisted.into())),
            Err(e) => {
                warn!(error = %e, "Stored session is unreadable, ignoring it.");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, session), fields(user = %session.user.id))]
    fn refresh(&mut self, session: &Session) -> Result<Option<Session>> {
        let Some(refresh_token) = &session.refresh_token else {
            debug!("Session expired and has no refresh token.");
            return Ok(None);
        };
        let body = json!({ "refresh_token": refresh_token.expose_secret() });
        match self.request_token("refresh_token", body) {
            Ok(fresh) => {
                self.store_session(&fresh)?;
                info!("Session refreshed.");
                Ok(Some(fresh))
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed.");
                Ok(None)
            }
        }
    }
}

impl<S: KeyValueStore> IdentityProvider for HostedIdentityProvider<S> {
    #[instrument(skip(self))]
    fn get_session(&mut self) -> Result<Option<Session>> {
        let Some(session) = self.stored_session()? else {
            return Ok(None);
        };
        let threshold = Utc::now() + Duration::seconds(Self::EXPIRY_MARGIN_SECS);
        if !session.is_expired_at(threshold) {
            return Ok(Some(session));
        }
        let refreshed = self.refresh(&session)?;
        if refreshed.is_none() {
            self.storage.remove(Self::SESSION_KEY)?;
        }
        Ok(refreshed)
    }

    #[instrument(skip(self, password))]
    fn sign_in_with_password(&mut self, email: &str, password: &SecretString) -> Result<Session> {
        let body = json!({ "email": email, "password": password.expose_secret() });
        let session = self.request_token("password", body)?;
        self.store_session(&session)?;
        Ok(session)
    }

    #[instrument(skip(self, session), fields(user = %session.user.id))]
    fn sign_out(&mut self, session: &Session) -> Result<()> {
        // Cleared even when the remote call fails.
        self.storage.remove(Self::SESSION_KEY)?;
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(session.access_token.expose_secret())
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(Error::Auth(api_error_message(status, &text)));
        }
        Ok(())
    }
}
