//! Admin authentication, delegated to a hosted identity provider.
//!
//! The provider is consumed through [`IdentityProvider`]; the rest of the
//! crate only looks at the resulting [`Session`] through an [`AuthGate`].

pub mod gate;
pub mod hosted;

pub use gate::{AuthEvent, AuthGate, SessionState, SubscriptionId};
pub use hosted::HostedIdentityProvider;

use crate::error::Result;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session as issued by the provider.
#[derive(Debug)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

pub trait IdentityProvider {
    /// Restores the current session, if any.
    fn get_session(&mut self) -> Result<Option<Session>>;

    fn sign_in_with_password(&mut self, email: &str, password: &SecretString) -> Result<Session>;

    fn sign_out(&mut self, session: &Session) -> Result<()>;
}
