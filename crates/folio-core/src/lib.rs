pub mod auth;
pub mod config;
pub mod error;
pub mod form;
pub mod image;
pub mod models;
pub mod request;
pub mod routes;
pub mod seed;
pub mod showcase;
pub mod storage;
pub mod store;
pub mod workflow;

// Publicly re-export the main types for a clean external API.
pub use auth::{AuthEvent, AuthGate, HostedIdentityProvider, IdentityProvider, Session, User};
pub use config::Settings;
pub use error::{Error, Result};
pub use form::{Field, ImageMode, ProjectForm, Submission, ValidationErrors};
pub use models::{ImageSource, NewProject, ProjectPatch, ProjectRecord};
pub use request::RequestState;
pub use routes::{guard, GuardDecision, Route};
pub use showcase::ProjectCard;
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use store::ProjectStore;
pub use workflow::{AdminWorkflow, Confirm, SubmitOutcome, View};

/// Opens the project store described by `settings`, backed by its storage file.
pub fn open_store(settings: &Settings) -> ProjectStore<FileKeyValueStore> {
    ProjectStore::with_key(open_storage(settings), settings.storage_key.clone())
}

/// Opens the key-value storage file described by `settings`.
pub fn open_storage(settings: &Settings) -> FileKeyValueStore {
    FileKeyValueStore::new(settings.storage_path(), settings.storage_quota_bytes)
}
