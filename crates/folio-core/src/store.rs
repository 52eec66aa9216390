use crate::error::Result;
use crate::models::{NewProject, ProjectPatch, ProjectRecord, QuarantinedRecord};
use crate::seed::seed_projects;
use crate::storage::KeyValueStore;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Owns the project collection persisted under a single storage key.
///
/// The collection is loaded on first access and cached. Every mutation
/// rewrites the whole collection; the cache only changes after the write
/// succeeds.
#[derive(Debug)]
pub struct ProjectStore<S: KeyValueStore> {
    storage: S,
    key: String,
    projects: Option<Vec<ProjectRecord>>,
    quarantined: Vec<QuarantinedRecord>,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub const DEFAULT_KEY: &'static str = "portfolio_projects";

    pub fn new(storage: S) -> Self {
        Self::with_key(storage, Self::DEFAULT_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self { storage, key: key.into(), projects: None, quarantined: Vec::new() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Slot holding raw entries that failed to load.
    pub fn quarantine_key(&self) -> String {
        format!("{}.quarantine", self.key)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Entries dropped during the last load.
    pub fn quarantined(&self) -> &[QuarantinedRecord] {
        &self.quarantined
    }

    pub fn list(&mut self) -> Result<&[ProjectRecord]> {
        if self.projects.is_none() {
            let loaded = self.load()?;
            self.projects = Some(loaded);
        }
        Ok(self.projects.as_deref().unwrap_or_default())
    }

    pub fn get(&mut self, id: &str) -> Result<Option<&ProjectRecord>> {
        Ok(self.list()?.iter().find(|p| p.id == id))
    }

    #[instrument(skip(self, project), fields(title = %project.title))]
    pub fn create(&mut self, project: NewProject) -> Result<ProjectRecord> {
        let mut records = self.list()?.to_vec();
        let record = ProjectRecord {
            id: Self::next_id(&records),
            title: project.title,
            description: project.description,
            technologies: project.technologies,
            github_url: project.github_url,
            figma_url: project.figma_url,
            deploy_url: project.deploy_url,
            image: project.image,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        self.save(records)?;
        info!(id = %record.id, "Project created.");
        Ok(record)
    }

    #[instrument(skip(self, patch))]
    pub fn update(&mut self, id: &str, patch: ProjectPatch) -> Result<Option<ProjectRecord>> {
        let mut records = self.list()?.to_vec();
        let Some(record) = records.iter_mut().find(|p| p.id == id) else {
            debug!("No project with this id, nothing to update.");
            return Ok(None);
        };
        patch.apply(record);
        let updated = record.clone();
        self.save(records)?;
        info!("Project updated.");
        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut records = self.list()?.to_vec();
        let before = records.len();
        records.retain(|p| p.id != id);
        if records.len() == before {
            debug!("No project with this id, nothing to delete.");
            return Ok(false);
        }
        self.save(records)?;
        info!("Project deleted.");
        Ok(true)
    }

    #[instrument(skip(self), fields(key = %self.key))]
    pub fn reset_to_seed(&mut self) -> Result<()> {
        self.save(seed_projects())?;
        info!("Projects reset to seed data.");
        Ok(())
    }

    /// Millisecond timestamp, bumped past any id already in use.
    fn next_id(records: &[ProjectRecord]) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while records.iter().any(|p| p.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn save(&mut self, records: Vec<ProjectRecord>) -> Result<()> {
        self.write(&records)?;
        self.projects = Some(records);
        Ok(())
    }

    fn write(&mut self, records: &[ProjectRecord]) -> Result<()> {
        let json_data = serde_json::to_string(records)?;
        debug!(key = %self.key, count = records.len(), bytes = json_data.len(), "Writing projects.");
        self.storage.set(&self.key, &json_data)
    }

    fn seed(&mut self) -> Result<Vec<ProjectRecord>> {
        let records = seed_projects();
        self.write(&records)?;
        Ok(records)
    }

    #[instrument(skip(self), fields(key = %self.key))]
    fn load(&mut self) -> Result<Vec<ProjectRecord>> {
        let Some(raw) = self.storage.get(&self.key)? else {
            info!("No stored projects found, loading seed data.");
            return self.seed();
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) if !items.is_empty() => items,
            Ok(_) => {
                warn!("Stored projects are empty or not a list, loading seed data.");
                return self.seed();
            }
            Err(e) => {
                warn!(error = %e, "Stored projects are not valid JSON, loading seed data.");
                return self.seed();
            }
        };

        let mut records: Vec<ProjectRecord> = Vec::with_capacity(entries.len());
        let mut quarantined = Vec::new();
        for (index, raw) in entries.into_iter().enumerate() {
            let checked = serde_json::from_value::<ProjectRecord>(raw.clone())
                .map_err(|e| e.to_string())
                .and_then(|record| {
                    record.check_invariants()?;
                    if records.iter().any(|p| p.id == record.id) {
                        return Err(format!("duplicate id '{}'", record.id));
                    }
                    Ok(record)
                });
            match checked {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(index, %reason, "Dropping malformed stored project.");
                    quarantined.push(QuarantinedRecord { index, reason, raw });
                }
            }
        }

        if !quarantined.is_empty() {
            self.append_quarantine(&quarantined)?;
            self.quarantined = quarantined;
            if records.is_empty() {
                warn!("No stored project survived validation, loading seed data.");
                return self.seed();
            }
            self.write(&records)?;
        }

        info!(count = records.len(), "Projects loaded.");
        Ok(records)
    }

    fn append_quarantine(&mut self, entries: &[QuarantinedRecord]) -> Result<()> {
        let key = self.quarantine_key();
        let mut stored: Vec<Value> = self
            .storage
            .get(&key)?
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        stored.extend(entries.iter().map(|q| q.raw.clone()));
        warn!(%key, count = entries.len(), "Moved malformed projects to quarantine.");
        self.storage.set(&key, &serde_json::to_string(&stored)?)
    }
}
