use folio_core::{AdminWorkflow, AuthGate, Error, Field, RequestState, Route, SubmitOutcome, View};

mod helpers;
use helpers::{memory_store, setup_tracing, FakeIdentityProvider};

fn workflow() -> AdminWorkflow<folio_core::MemoryKeyValueStore> {
    AdminWorkflow::new(memory_store())
}

#[test]
fn it_creates_a_project_through_the_form() {
    setup_tracing();
    let mut flow = workflow();
    flow.new_project().unwrap();
    assert!(flow.is_editing());

    let form = flow.form_mut().unwrap();
    form.title = "Folio".to_string();
    form.description = "Portfolio manager".to_string();
    form.add_technology("Rust");
    form.github_url = "https://github.com/example/folio".to_string();
    form.set_image_url("https://images.example.com/folio.png");

    let record = match flow.submit().unwrap() {
        SubmitOutcome::Created(record) => record,
        other => panic!("Expected a created project, got {other:?}"),
    };
    assert_eq!(flow.view(), &View::Listing);
    assert_eq!(flow.submit_state(), &RequestState::Done);
    assert!(flow.projects().unwrap().iter().any(|p| p.id == record.id));
    assert_eq!(flow.projects().unwrap().len(), 5);
}

#[test]
fn it_keeps_the_form_open_on_invalid_submit() {
    let mut flow = workflow();
    flow.new_project().unwrap();

    let outcome = flow.submit().unwrap();

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("Expected validation errors");
    };
    assert!(errors.contains(Field::Title));
    assert!(flow.is_editing());
    assert_eq!(flow.projects().unwrap().len(), 4);
}

#[test]
fn it_updates_the_edited_project_and_preserves_identity() {
    let mut flow = workflow();
    let original = flow.projects().unwrap()[0].clone();
    assert!(flow.edit(&original.id).unwrap());

    flow.form_mut().unwrap().title = "Renamed".to_string();
    let SubmitOutcome::Updated(updated) = flow.submit().unwrap() else {
        panic!("Expected an update");
    };

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.technologies, original.technologies);
    assert_eq!(flow.view(), &View::Listing);
}

#[test]
fn it_stays_on_the_list_when_editing_an_unknown_project() {
    let mut flow = workflow();
    assert!(!flow.edit("missing").unwrap());
    assert_eq!(flow.view(), &View::Listing);
}

#[test]
fn cancel_returns_to_the_list_without_saving() {
    let mut flow = workflow();
    flow.edit("1").unwrap();
    flow.form_mut().unwrap().title = "Discarded".to_string();
    flow.cancel();

    assert_eq!(flow.view(), &View::Listing);
    assert_ne!(flow.projects().unwrap()[0].title, "Discarded");
}

#[test]
fn delete_requires_confirmation() {
    setup_tracing();
    let mut flow = workflow();

    let mut prompts = Vec::new();
    let deleted = flow
        .delete("3", &mut |prompt: &str| {
            prompts.push(prompt.to_string());
            false
        })
        .unwrap();
    assert!(!deleted);
    assert_eq!(flow.projects().unwrap().len(), 4);
    assert_eq!(prompts, vec!["Are you sure you want to delete 'Calculadora React'?"]);

    assert!(flow.delete("3", &mut |_: &str| true).unwrap());
    assert!(flow.projects().unwrap().iter().all(|p| p.id != "3"));
}

#[test]
fn list_actions_are_rejected_while_editing() {
    let mut flow = workflow();
    flow.new_project().unwrap();

    assert!(matches!(flow.delete("1", &mut |_: &str| true), Err(Error::InvalidState(_))));
    assert!(matches!(flow.edit("1"), Err(Error::InvalidState(_))));
    assert!(matches!(flow.new_project(), Err(Error::InvalidState(_))));
    assert_eq!(flow.projects().unwrap().len(), 4);
}

#[test]
fn submit_outside_the_form_is_an_error() {
    let mut flow = workflow();
    assert!(matches!(flow.submit(), Err(Error::InvalidState(_))));
}

#[test]
fn logout_always_navigates_home() {
    let mut flow = workflow();
    let mut gate = AuthGate::new(FakeIdentityProvider::with_account("admin@example.com", "pw").already_signed_in());
    gate.resolve();
    assert!(gate.is_authenticated());

    flow.new_project().unwrap();
    let next = flow.logout(&mut gate);

    assert_eq!(next, Route::Home);
    assert!(!gate.is_authenticated());
    assert_eq!(flow.view(), &View::Listing);
}
