use std::fs;
use std::path::Path;
use anyhow::{Context, Result, bail};
use clap::{ArgAction, ColorChoice, Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Password, Select};
use folio_core::config::{IdentitySettings, Profile};
use folio_core::form::{FileImage, ImageInput};
use folio_core::showcase::ProjectCard;
use folio_core::{
    AdminWorkflow, AuthGate, FileKeyValueStore, GuardDecision, HostedIdentityProvider, ImageMode,
    ProjectForm, ProjectRecord, ProjectStore, Route, Settings, SubmitOutcome, ValidationErrors,
    guard,
};
use secrecy::SecretString;
use tracing::{debug, level_filters::LevelFilter};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type Gate = AuthGate<HostedIdentityProvider<FileKeyValueStore>>;
type Workflow = AdminWorkflow<FileKeyValueStore>;

/// Manage and browse a personal portfolio of projects.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Set the verbosity level. Use -v for info, -vv for debug, -vvv for trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Control when to use color output.
    #[arg(long, value_name = "WHEN", global = true, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct ProjectArgs {
    /// Project title.
    #[arg(long)]
    title: Option<String>,
    /// Project description.
    #[arg(long)]
    description: Option<String>,
    /// A technology used by the project. Repeat for several; replaces the current list.
    #[arg(long = "tech", value_name = "NAME")]
    technologies: Vec<String>,
    /// GitHub repository URL.
    #[arg(long)]
    github: Option<String>,
    /// Figma file URL. Pass an empty string to remove it.
    #[arg(long)]
    figma: Option<String>,
    /// Live deployment URL. Pass an empty string to remove it.
    #[arg(long)]
    deploy: Option<String>,
    /// Cover image URL.
    #[arg(long, conflicts_with = "image_file")]
    image_url: Option<String>,
    /// Local cover image to embed in the record.
    #[arg(long)]
    image_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initializes the configuration file interactively.
    Init,
    /// Updates the configuration interactively.
    Config,
    /// Show the configuration paths being used.
    Paths,
    /// Render a page of the site by its path (e.g. "/", "/projetos", "/admin").
    #[command(visible_alias = "o")]
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
    /// List the portfolio projects as shown on the public site.
    #[command(visible_alias = "p")]
    Projects,
    /// Sign in to the admin area.
    Login {
        /// Email address; prompted for when omitted.
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out of the admin area.
    Logout,
    /// Show the signed-in admin, if any.
    Whoami,
    /// Open the interactive admin dashboard.
    #[command(visible_alias = "a")]
    Admin,
    /// Create a project without prompts.
    Add(ProjectArgs),
    /// Change fields of an existing project without prompts.
    Edit {
        id: String,
        #[command(flatten)]
        fields: ProjectArgs,
    },
    /// Delete a project.
    #[command(visible_alias = "rm")]
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Replace every project with the example set.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init => {
            let _guard = init_tracing(cli.verbose, cli.color, None);
            return handle_init();
        }
        Commands::Config => {
            let _guard = init_tracing(cli.verbose, cli.color, None);
            return handle_config();
        }
        _ => {}
    }

    let settings =
        Settings::new().context("Failed to load settings. Try running 'folio init'")?;
    let _guard = init_tracing(cli.verbose, cli.color, Some(&settings.log_dir()));

    match cli.command {
        Commands::Paths => handle_paths(&settings)?,
        Commands::Open { path } => handle_open(&settings, &path)?,
        Commands::Projects => handle_projects(&settings)?,
        Commands::Login { email } => handle_login(&settings, email)?,
        Commands::Logout => handle_logout(&settings)?,
        Commands::Whoami => handle_whoami(&settings)?,
        Commands::Admin => handle_open(&settings, Route::Admin.path())?,
        Commands::Add(fields) => handle_add(&settings, fields)?,
        Commands::Edit { id, fields } => handle_edit(&settings, &id, fields)?,
        Commands::Delete { id, yes } => handle_delete(&settings, &id, yes)?,
        Commands::Reset { yes } => handle_reset(&settings, yes)?,
        Commands::Init | Commands::Config => unreachable!(),
    }

    Ok(())
}

fn handle_init() -> Result<()> {
    println!("{}", style("Welcome to folio setup!").bold());
    let config_path = Settings::config_path()?;
    if config_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt("A configuration file already exists. Do you want to overwrite it?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Initialization cancelled.");
            return Ok(());
        }
    }
    let defaults = Settings::new().context("Failed to resolve default settings.")?;
    let new_settings = interactive_config_update(&defaults)?;
    save_settings(&new_settings)?;
    println!(
        "\n{}",
        style("Configuration saved successfully!").green().bold()
    );
    Ok(())
}

fn handle_config() -> Result<()> {
    println!("{}", style("Updating folio configuration...").bold());
    let existing_settings = Settings::new().context("Failed to load existing settings.")?;
    let new_settings = interactive_config_update(&existing_settings)?;
    save_settings(&new_settings)?;
    println!(
        "\n{}",
        style("Configuration updated successfully!").green().bold()
    );
    Ok(())
}

/// Logs go to stderr at the requested verbosity and, once the data directory
/// is known, to a daily rolling file at debug level.
fn init_tracing(verbosity: u8, color: ColorChoice, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let console_filter =
        EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let appender = log_dir.and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("folio")
            .filename_suffix("log")
            .build(dir)
            .ok()
    });
    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(color != ColorChoice::Never) // Enable/disable color
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();
    guard
}

fn open_gate(settings: &Settings) -> Result<Gate> {
    let provider = HostedIdentityProvider::new(&settings.identity, folio_core::open_storage(settings))
        .context("Failed to set up the identity provider. Try running 'folio config'")?;
    let mut gate = AuthGate::new(provider);
    gate.subscribe(|event, user| {
        debug!(?event, user = ?user.and_then(|u| u.email.as_deref()), "Auth state changed.");
    });
    gate.resolve();
    Ok(gate)
}

/// Resolves the session and fails unless an admin is signed in.
fn require_admin(settings: &Settings) -> Result<Gate> {
    let gate = open_gate(settings)?;
    match guard(&gate, Route::Admin) {
        GuardDecision::Render => Ok(gate),
        GuardDecision::Redirect(to) => {
            bail!("Not signed in (redirected to {}). Run 'folio login' first.", to)
        }
        GuardDecision::Pending => bail!("The session could not be resolved."),
    }
}

fn handle_paths(settings: &Settings) -> Result<()> {
    println!("{}", style("Configuration paths:").bold());
    println!(
        "- Data directory: {}",
        style(settings.data_dir.display()).yellow()
    );
    println!(
        "- Storage file:   {}",
        style(settings.storage_path().display()).yellow()
    );
    println!(
        "- Log directory:  {}",
        style(settings.log_dir().display()).yellow()
    );
    println!(
        "- Config file:    {}",
        style(Settings::config_path()?.display()).yellow()
    );
    Ok(())
}

fn handle_open(settings: &Settings, path: &str) -> Result<()> {
    let route = Route::parse(path).with_context(|| format!("No page at '{}'", path))?;
    match route {
        Route::Home => render_home(&settings.profile),
        Route::About => render_about(&settings.profile),
        Route::Contact => render_contact(&settings.profile),
        Route::Projects => handle_projects(settings)?,
        Route::AdminLogin => handle_login(settings, None)?,
        Route::Admin => {
            let mut gate = open_gate(settings)?;
            if let GuardDecision::Redirect(to) = guard(&gate, route) {
                println!("{}", style(format!("Sign in required, redirecting to {}", to)).yellow());
                if !login_interactive(&mut gate, None)? {
                    bail!("Could not sign in.");
                }
            }
            run_dashboard(settings, &mut gate)?;
        }
    }
    Ok(())
}

fn render_home(profile: &Profile) {
    println!("{}", style(&profile.name).bold().cyan());
    println!("{}", style(&profile.headline).bold());
    if !profile.bio.is_empty() {
        println!("\n{}", profile.bio);
    }
    print_profile_links(profile);
    println!("\nSee my projects: {}", style(Route::Projects.path()).underlined());
}

fn render_about(profile: &Profile) {
    println!("{}", style(format!("About {}", profile.name)).bold());
    println!("{}", profile.headline);
    if !profile.bio.is_empty() {
        println!("\n{}", profile.bio);
    }
}

fn render_contact(profile: &Profile) {
    println!("{}", style("Contact").bold());
    if profile.email.is_none() && profile.github.is_none() && profile.linkedin.is_none() {
        println!("No contact details configured.");
        return;
    }
    print_profile_links(profile);
}

fn print_profile_links(profile: &Profile) {
    let links = [
        ("Email", &profile.email),
        ("GitHub", &profile.github),
        ("LinkedIn", &profile.linkedin),
    ];
    for (label, value) in links {
        if let Some(value) = value {
            println!("- {:<9}{}", format!("{}:", label), style(value).yellow());
        }
    }
}

fn handle_projects(settings: &Settings) -> Result<()> {
    let mut store = folio_core::open_store(settings);
    let projects = store.list().context("Failed to load projects")?;
    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }
    println!("{}", style("Projects:").bold());
    for record in projects {
        print_card(&ProjectCard::from(record));
    }
    Ok(())
}

fn print_card(card: &ProjectCard<'_>) {
    println!("\n{}", style(card.title).cyan().bold());
    println!("  {}", card.description);
    let mut techs: Vec<String> = card.technologies.to_vec();
    techs.extend(card.overflow_badge());
    println!("  [{}]", techs.join("] ["));
    for link in &card.links {
        println!("  {}: {}", link.label, style(link.url).underlined());
    }
    let image = if card.image.is_embedded() {
        "embedded image".to_string()
    } else {
        card.image.value().to_string()
    };
    println!("  Image: {}", style(image).dim());
}

fn login_interactive(gate: &mut Gate, email: Option<String>) -> Result<bool> {
    let theme = dialoguer::theme::ColorfulTheme::default();
    let email = match email {
        Some(email) => email,
        None => Input::with_theme(&theme).with_prompt("Email").interact_text()?,
    };
    for _ in 0..3 {
        let password: String = Password::with_theme(&theme).with_prompt("Password").interact()?;
        if gate.login(&email, &SecretString::from(password)) {
            return Ok(true);
        }
        println!("{}", style("Invalid email or password.").red());
    }
    Ok(false)
}

fn handle_login(settings: &Settings, email: Option<String>) -> Result<()> {
    let mut gate = open_gate(settings)?;
    if let Some(user) = gate.user() {
        println!("Already signed in as {}.", style(user_label(user)).cyan());
        return Ok(());
    }
    if !login_interactive(&mut gate, email)? {
        bail!("Sign-in failed.");
    }
    if let Some(user) = gate.user() {
        println!("Signed in as {}.", style(user_label(user)).cyan());
    }
    Ok(())
}

fn handle_logout(settings: &Settings) -> Result<()> {
    let mut gate = open_gate(settings)?;
    if !gate.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    gate.logout();
    println!("Signed out.");
    Ok(())
}

fn handle_whoami(settings: &Settings) -> Result<()> {
    let gate = open_gate(settings)?;
    match gate.user() {
        Some(user) => println!("Signed in as {}.", style(user_label(user)).cyan()),
        None => println!("Not signed in."),
    }
    Ok(())
}

fn user_label(user: &folio_core::User) -> &str {
    user.email.as_deref().unwrap_or(&user.id)
}

fn print_admin_list(records: &[ProjectRecord]) {
    if records.is_empty() {
        println!("No projects found.");
        return;
    }
    for record in records {
        println!(
            "- {:<15} {:<45} (Created on: {}) [{}]",
            style(&record.id).dim(),
            style(&record.title).cyan(),
            record.created_at.date_naive(),
            record.technologies.join(", ")
        );
    }
}

fn print_errors(errors: &ValidationErrors) {
    println!("{}", style("Please fix the following:").red().bold());
    for (field, message) in errors.iter() {
        println!("- {}: {}", style(field).yellow(), message);
    }
}

fn run_dashboard(settings: &Settings, gate: &mut Gate) -> Result<()> {
    let theme = dialoguer::theme::ColorfulTheme::default();
    let mut workflow = AdminWorkflow::new(folio_core::open_store(settings));
    if let Some(user) = gate.user() {
        println!("{} {}", style("Admin panel").bold(), style(format!("(welcome, {})", user_label(user))).dim());
    }

    const ACTIONS: [&str; 7] = ["New project", "Edit project", "Delete project", "Reset to examples", "View site", "Sign out", "Quit"];
    loop {
        println!("\n{}", style("Projects").bold());
        let records = workflow.projects().context("Failed to load projects")?.to_vec();
        print_admin_list(&records);

        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&ACTIONS)
            .default(0)
            .interact()?;
        match choice {
            0 => {
                workflow.new_project()?;
                edit_until_done(&mut workflow)?;
            }
            1 | 2 if records.is_empty() => println!("There are no projects yet."),
            1 => {
                let id = pick_project(&records, "Project to edit")?;
                if workflow.edit(&id)? {
                    edit_until_done(&mut workflow)?;
                }
            }
            2 => {
                let id = pick_project(&records, "Project to delete")?;
                let deleted = workflow.delete(&id, &mut |prompt: &str| {
                    Confirm::new().with_prompt(prompt).default(false).interact().unwrap_or(false)
                })?;
                if deleted {
                    println!("{}", style("Project deleted.").green());
                }
            }
            3 => {
                if Confirm::new()
                    .with_prompt("Replace all projects with the example set?")
                    .default(false)
                    .interact()?
                {
                    workflow.store_mut().reset_to_seed()?;
                    println!("{}", style("Projects reset.").green());
                }
            }
            4 => handle_projects(settings)?,
            5 => {
                let next = workflow.logout(gate);
                println!("Signed out.\n");
                handle_open(settings, next.path())?;
                return Ok(());
            }
            _ => return Ok(()),
        }
    }
}

fn pick_project(records: &[ProjectRecord], prompt: &str) -> Result<String> {
    let labels: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    let index = Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(records[index].id.clone())
}

/// Prompts for every field until the form is saved or the admin gives up.
fn edit_until_done(workflow: &mut Workflow) -> Result<()> {
    loop {
        let Some(form) = workflow.form_mut() else {
            return Ok(());
        };
        prompt_form(form)?;
        match workflow.submit()? {
            SubmitOutcome::Created(record) => {
                println!("{}", style(format!("Project '{}' created.", record.title)).green());
                return Ok(());
            }
            SubmitOutcome::Updated(record) => {
                println!("{}", style(format!("Project '{}' saved.", record.title)).green());
                return Ok(());
            }
            SubmitOutcome::Invalid(errors) => {
                print_errors(&errors);
                let retry = Confirm::new().with_prompt("Edit again?").default(true).interact()?;
                if !retry {
                    workflow.cancel();
                    return Ok(());
                }
            }
        }
    }
}

fn prompt_form(form: &mut ProjectForm) -> Result<()> {
    let theme = dialoguer::theme::ColorfulTheme::default();
    form.title = Input::with_theme(&theme)
        .with_prompt("Title")
        .with_initial_text(form.title.clone())
        .allow_empty(true)
        .interact_text()?;
    form.description = Input::with_theme(&theme)
        .with_prompt("Description")
        .with_initial_text(form.description.clone())
        .allow_empty(true)
        .interact_text()?;
    let technologies: String = Input::with_theme(&theme)
        .with_prompt("Technologies (comma separated)")
        .with_initial_text(form.technologies().join(", "))
        .allow_empty(true)
        .interact_text()?;
    replace_technologies(form, technologies.split(','));
    form.github_url = Input::with_theme(&theme)
        .with_prompt("GitHub URL")
        .with_initial_text(form.github_url.clone())
        .allow_empty(true)
        .interact_text()?;
    form.figma_url = Input::with_theme(&theme)
        .with_prompt("Figma URL (optional)")
        .with_initial_text(form.figma_url.clone())
        .allow_empty(true)
        .interact_text()?;
    form.deploy_url = Input::with_theme(&theme)
        .with_prompt("Deploy URL (optional)")
        .with_initial_text(form.deploy_url.clone())
        .allow_empty(true)
        .interact_text()?;

    let current_mode = form.image_mode();
    let mode = Select::with_theme(&theme)
        .with_prompt("Project image")
        .items(&["Image URL", "Attach file"])
        .default(if current_mode == ImageMode::Url { 0 } else { 1 })
        .interact()?;
    if mode == 0 {
        let current = match form.image() {
            ImageInput::Url(url) => url.clone(),
            ImageInput::File(_) => String::new(),
        };
        let url: String = Input::with_theme(&theme)
            .with_prompt("Image URL")
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?;
        form.set_image_url(url);
    } else {
        form.set_image_mode(ImageMode::File);
        prompt_image_file(form)?;
    }
    Ok(())
}

fn prompt_image_file(form: &mut ProjectForm) -> Result<()> {
    let theme = dialoguer::theme::ColorfulTheme::default();
    let keep_hint = matches!(form.image(), ImageInput::File(Some(FileImage::Embedded(_))));
    loop {
        let prompt = if keep_hint { "Image file (empty keeps the current image)" } else { "Image file" };
        let path: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        if path.trim().is_empty() {
            return Ok(());
        }
        if form.select_file(path.trim()) {
            if form.preview().is_none() {
                println!("{}", style("Preview unavailable for this file.").dim());
            }
            return Ok(());
        }
        if let Some(message) = form.errors().get(folio_core::Field::ImageFile) {
            println!("{}", style(message).red());
        }
    }
}

fn replace_technologies<'a>(form: &mut ProjectForm, items: impl IntoIterator<Item = &'a str>) {
    for tech in form.technologies().to_vec() {
        form.remove_technology(&tech);
    }
    for tech in items {
        form.add_technology(tech);
    }
}

/// Applies command-line fields to a form. Empty `--figma`/`--deploy` clear the link.
fn apply_args(form: &mut ProjectForm, args: ProjectArgs) -> Result<()> {
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if !args.technologies.is_empty() {
        replace_technologies(form, args.technologies.iter().map(String::as_str));
    }
    if let Some(github) = args.github {
        form.github_url = github;
    }
    if let Some(figma) = args.figma {
        form.figma_url = figma;
    }
    if let Some(deploy) = args.deploy {
        form.deploy_url = deploy;
    }
    if let Some(url) = args.image_url {
        form.set_image_url(url);
    }
    if let Some(path) = args.image_file {
        if !form.select_file(&path) {
            let message = form.errors().get(folio_core::Field::ImageFile).unwrap_or("Invalid image file");
            bail!("{}: {}", path.display(), message);
        }
    }
    Ok(())
}

/// Runs the open form through the workflow and reports the outcome.
fn submit_scripted(workflow: &mut Workflow) -> Result<ProjectRecord> {
    match workflow.submit()? {
        SubmitOutcome::Created(record) | SubmitOutcome::Updated(record) => Ok(record),
        SubmitOutcome::Invalid(errors) => {
            print_errors(&errors);
            bail!("The project was not saved: {}", errors);
        }
    }
}

fn handle_add(settings: &Settings, args: ProjectArgs) -> Result<()> {
    require_admin(settings)?;
    let mut workflow = AdminWorkflow::new(folio_core::open_store(settings));
    workflow.new_project()?;
    if let Some(form) = workflow.form_mut() {
        apply_args(form, args)?;
    }
    let record = submit_scripted(&mut workflow).context("Failed to create the project")?;
    println!("Project '{}' created with id {}.", style(&record.title).cyan(), style(&record.id).dim());
    Ok(())
}

fn handle_edit(settings: &Settings, id: &str, args: ProjectArgs) -> Result<()> {
    require_admin(settings)?;
    let mut workflow = AdminWorkflow::new(folio_core::open_store(settings));
    if !workflow.edit(id)? {
        bail!("Project '{}' not found.", id);
    }
    if let Some(form) = workflow.form_mut() {
        apply_args(form, args)?;
    }
    let record = submit_scripted(&mut workflow)
        .with_context(|| format!("Failed to update project '{}'", id))?;
    println!("Project '{}' saved.", style(&record.title).cyan());
    Ok(())
}

fn handle_delete(settings: &Settings, id: &str, yes: bool) -> Result<()> {
    require_admin(settings)?;
    let mut workflow = AdminWorkflow::new(folio_core::open_store(settings));
    let deleted = workflow
        .delete(id, &mut |prompt: &str| {
            yes || Confirm::new().with_prompt(prompt).default(false).interact().unwrap_or(false)
        })
        .with_context(|| format!("Failed to delete project '{}'", id))?;
    if deleted {
        println!("Project '{}' deleted.", id);
    } else {
        println!("Project '{}' was not deleted.", id);
    }
    Ok(())
}

fn handle_reset(settings: &Settings, yes: bool) -> Result<()> {
    require_admin(settings)?;
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Replace all projects with the example set?")
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Reset cancelled.");
        return Ok(());
    }
    let mut store: ProjectStore<FileKeyValueStore> = folio_core::open_store(settings);
    store.reset_to_seed().context("Failed to reset projects")?;
    println!("Projects reset to the example set.");
    Ok(())
}

fn interactive_config_update(existing: &Settings) -> Result<Settings> {
    let theme = dialoguer::theme::ColorfulTheme::default();

    let data_dir: String = Input::with_theme(&theme)
        .with_prompt("Where should folio keep its data?")
        .default(existing.data_dir.to_string_lossy().to_string())
        .interact_text()?;

    let url: String = Input::with_theme(&theme)
        .with_prompt("Identity provider URL")
        .default(existing.identity.url.clone())
        .allow_empty(true)
        .interact_text()?;

    let anon_key: String = Input::with_theme(&theme)
        .with_prompt("Identity provider public key")
        .default(existing.identity.anon_key.clone())
        .allow_empty(true)
        .interact_text()?;

    let name: String = Input::with_theme(&theme)
        .with_prompt("Your name")
        .default(existing.profile.name.clone())
        .interact_text()?;

    let headline: String = Input::with_theme(&theme)
        .with_prompt("Headline")
        .default(existing.profile.headline.clone())
        .interact_text()?;

    Ok(Settings {
        data_dir: data_dir.into(),
        identity: IdentitySettings { url, anon_key },
        profile: Profile { name, headline, ..existing.profile.clone() },
        ..existing.clone()
    })
}

/// Helper to serialize and save settings to the config file.
fn save_settings(settings: &Settings) -> Result<()> {
    let path = Settings::config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Could not create config directory")?;
    }
    let toml_string =
        toml::to_string_pretty(settings).context("Could not serialize settings to TOML")?;
    fs::write(&path, toml_string)
        .with_context(|| format!("Could not write config to '{}'", path.display()))?;
    Ok(())
}
