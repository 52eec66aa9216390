use super::{IdentityProvider, Session, User};
use crate::request::RequestState;
use secrecy::SecretString;
use tracing::{error, info, instrument, warn};

/// Whether the initial session lookup has completed.
#[derive(Debug)]
pub enum SessionState {
    Resolving,
    Resolved(Option<Session>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(AuthEvent, Option<&User>)>;

/// Session state for the admin area, built once at start-up and passed to
/// whatever needs to know who is signed in.
pub struct AuthGate<P: IdentityProvider> {
    provider: P,
    state: SessionState,
    login_state: RequestState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl<P: IdentityProvider> AuthGate<P> {
    /// Creates a gate that is still resolving; call [`AuthGate::resolve`] to
    /// load the existing session.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: SessionState::Resolving,
            login_state: RequestState::Idle,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    #[instrument(skip(self))]
    pub fn resolve(&mut self) {
        let session = match self.provider.get_session() {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Could not restore session.");
                None
            }
        };
        info!(authenticated = session.is_some(), "Session resolved.");
        self.state = SessionState::Resolved(session);
        self.notify(AuthEvent::InitialSession);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Resolving)
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Resolved(Some(session)) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn login_state(&self) -> &RequestState {
        &self.login_state
    }

    /// Signs in with email and password. Failures are logged and reported as
    /// `false`; [`AuthGate::login_state`] keeps the outcome.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &SecretString) -> bool {
        if let Err(e) = self.login_state.begin("login") {
            warn!(error = %e, "Ignoring duplicate login.");
            return false;
        }
        let outcome = self.provider.sign_in_with_password(email, password);
        self.login_state.finish(&outcome);
        match outcome {
            Ok(session) => {
                info!(user = %session.user.id, "Signed in.");
                self.state = SessionState::Resolved(Some(session));
                self.notify(AuthEvent::SignedIn);
                true
            }
            Err(e) => {
                error!(error = %e, "Sign-in failed.");
                false
            }
        }
    }

    /// Ends the session. The local session is dropped even if the provider
    /// call fails.
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        let previous = std::mem::replace(&mut self.state, SessionState::Resolved(None));
        if let SessionState::Resolved(Some(session)) = previous {
            if let Err(e) = self.provider.sign_out(&session) {
                error!(error = %e, "Sign-out failed at the provider.");
            }
            info!("Signed out.");
        }
        self.notify(AuthEvent::SignedOut);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(AuthEvent, Option<&User>) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn notify(&mut self, event: AuthEvent) {
        let user = match &self.state {
            SessionState::Resolved(Some(session)) => Some(&session.user),
            _ => None,
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(event, user);
        }
    }
}
