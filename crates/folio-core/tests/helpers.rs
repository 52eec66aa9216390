#![allow(dead_code)]

use folio_core::auth::{IdentityProvider, Session, User};
use folio_core::{Error, ImageSource, NewProject, ProjectStore, Result, Settings};
use folio_core::{FileKeyValueStore, MemoryKeyValueStore};
use secrecy::{ExposeSecret, SecretString};
use std::fs;

/// Helper function to initialize the tracing subscriber for tests.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Helper function to set up settings pointing at a temporary data directory.
pub fn setup_test_env() -> (tempfile::TempDir, Settings) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    let settings = Settings {
        data_dir,
        ..Default::default()
    };

    (temp_dir, settings)
}

pub fn file_store(settings: &Settings) -> ProjectStore<FileKeyValueStore> {
    folio_core::open_store(settings)
}

pub fn memory_store() -> ProjectStore<MemoryKeyValueStore> {
    ProjectStore::new(MemoryKeyValueStore::new())
}

pub fn sample_project(title: &str) -> NewProject {
    NewProject {
        title: title.to_string(),
        description: format!("{} description", title),
        technologies: vec!["Rust".to_string(), "Serde".to_string()],
        github_url: format!("https://github.com/example/{}", title.to_lowercase().replace(' ', "-")),
        figma_url: None,
        deploy_url: Some("https://example.com/demo".to_string()),
        image: ImageSource::Url("https://images.example.com/cover.png".to_string()),
    }
}

pub fn session_for(email: &str) -> Session {
    Session {
        access_token: SecretString::from(format!("token-{}", email)),
        refresh_token: None,
        expires_at: None,
        user: User { id: format!("id-{}", email), email: Some(email.to_string()) },
    }
}

/// In-memory stand-in for the hosted identity provider.
#[derive(Debug, Default)]
pub struct FakeIdentityProvider {
    pub email: String,
    pub password: String,
    pub signed_in: Option<String>,
    pub fail_lookup: bool,
    pub fail_sign_out: bool,
    pub sign_out_calls: usize,
}

impl FakeIdentityProvider {
    pub fn with_account(email: &str, password: &str) -> Self {
        Self { email: email.to_string(), password: password.to_string(), ..Default::default() }
    }

    pub fn already_signed_in(mut self) -> Self {
        self.signed_in = Some(self.email.clone());
        self
    }
}

impl IdentityProvider for FakeIdentityProvider {
    fn get_session(&mut self) -> Result<Option<Session>> {
        if self.fail_lookup {
            return Err(Error::Auth("lookup failed".to_string()));
        }
        Ok(self.signed_in.as_deref().map(session_for))
    }

    fn sign_in_with_password(&mut self, email: &str, password: &SecretString) -> Result<Session> {
        if email == self.email && password.expose_secret() == self.password {
            self.signed_in = Some(email.to_string());
            Ok(session_for(email))
        } else {
            Err(Error::Auth("Invalid login credentials".to_string()))
        }
    }

    fn sign_out(&mut self, _session: &Session) -> Result<()> {
        self.sign_out_calls += 1;
        self.signed_in = None;
        if self.fail_sign_out {
            return Err(Error::Auth("network down".to_string()));
        }
        Ok(())
    }
}
