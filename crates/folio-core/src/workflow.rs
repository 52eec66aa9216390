use crate::auth::{AuthGate, IdentityProvider};
use crate::error::{Error, Result};
use crate::form::{ProjectForm, Submission, ValidationErrors};
use crate::models::ProjectRecord;
use crate::request::RequestState;
use crate::routes::Route;
use crate::storage::KeyValueStore;
use crate::store::ProjectStore;
use tracing::{debug, info, instrument};

/// Asks the admin to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Listing,
    /// `target` is the id of the project being edited, `None` when creating.
    Editing { target: Option<String>, form: ProjectForm },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(ProjectRecord),
    Updated(ProjectRecord),
    Invalid(ValidationErrors),
}

/// Admin dashboard controller: switches between the project list and the
/// editing form and routes their actions to the store.
#[derive(Debug)]
pub struct AdminWorkflow<S: KeyValueStore> {
    store: ProjectStore<S>,
    view: View,
    submit_state: RequestState,
}

impl<S: KeyValueStore> AdminWorkflow<S> {
    pub fn new(store: ProjectStore<S>) -> Self {
        Self { store, view: View::Listing, submit_state: RequestState::Idle }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.view, View::Editing { .. })
    }

    pub fn form_mut(&mut self) -> Option<&mut ProjectForm> {
        match &mut self.view {
            View::Editing { form, .. } => Some(form),
            View::Listing => None,
        }
    }

    pub fn submit_state(&self) -> &RequestState {
        &self.submit_state
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProjectStore<S> {
        &mut self.store
    }

    pub fn projects(&mut self) -> Result<&[ProjectRecord]> {
        self.store.list()
    }

    fn require_listing(&self, action: &str) -> Result<()> {
        if self.is_editing() {
            return Err(Error::InvalidState(format!("'{}' is only available from the project list", action)));
        }
        Ok(())
    }

    /// Opens an empty form.
    pub fn new_project(&mut self) -> Result<()> {
        self.require_listing("new project")?;
        self.view = View::Editing { target: None, form: ProjectForm::new() };
        debug!("Editing new project.");
        Ok(())
    }

    /// Opens the form for an existing project. Returns `false` and stays on
    /// the list when the id is unknown.
    pub fn edit(&mut self, id: &str) -> Result<bool> {
        self.require_listing("edit")?;
        let Some(record) = self.store.get(id)? else {
            debug!(%id, "No project to edit.");
            return Ok(false);
        };
        let form = ProjectForm::from_record(record);
        self.view = View::Editing { target: Some(id.to_string()), form };
        debug!(%id, "Editing project.");
        Ok(true)
    }

    pub fn cancel(&mut self) {
        self.view = View::Listing;
    }

    /// Submits the open form. Invalid drafts keep the form open with its
    /// errors; valid ones are created or updated and return to the list.
    /// [`AdminWorkflow::submit_state`] keeps the outcome of the last attempt.
    #[instrument(skip(self))]
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let View::Editing { target, form } = &mut self.view else {
            return Err(Error::InvalidState("nothing is being edited".to_string()));
        };
        self.submit_state.begin("submit")?;
        let outcome = Self::apply(&mut self.store, target.as_deref(), form);
        self.submit_state.finish(&outcome);

        if let Ok(SubmitOutcome::Created(_) | SubmitOutcome::Updated(_)) = &outcome {
            self.view = View::Listing;
        }
        outcome
    }

    fn apply(store: &mut ProjectStore<S>, target: Option<&str>, form: &mut ProjectForm) -> Result<SubmitOutcome> {
        let project = match form.submit()? {
            Submission::Ready(project) => project,
            Submission::Invalid(errors) => {
                debug!(errors = %errors, "Form rejected.");
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        match target {
            None => Ok(SubmitOutcome::Created(store.create(project)?)),
            Some(id) => store
                .update(id, project.into())?
                .map(SubmitOutcome::Updated)
                .ok_or_else(|| Error::InvalidState(format!("project '{}' no longer exists", id))),
        }
    }

    /// Deletes a project after confirmation. Returns whether it was deleted.
    #[instrument(skip(self, confirm))]
    pub fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> Result<bool> {
        self.require_listing("delete")?;
        let Some(record) = self.store.get(id)? else {
            return Ok(false);
        };
        let prompt = format!("Are you sure you want to delete '{}'?", record.title);
        if !confirm.confirm(&prompt) {
            info!("Deletion declined.");
            return Ok(false);
        }
        self.store.delete(id)
    }

    /// Signs out and returns where to navigate next, which is always the
    /// public home page.
    pub fn logout<P: IdentityProvider>(&mut self, gate: &mut AuthGate<P>) -> Route {
        gate.logout();
        self.view = View::Listing;
        Route::Home
    }
}
