mod config;
mod error;
mod form;

use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use policy::{Guard, Outcome, Status};
use runtime::{Credentials, EventStore, Session, wait_resolved};
use storage::{Event, EventId, EventPatch, EventType, NewEvent, SqliteStore};
use tokio::sync::watch;
use tracing::{debug, info};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "campus.toml";

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus events catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the user
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the logged-in user
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List events, optionally filtered
    Events {
        /// Match title, type, location or description (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one event
    Show { id: String },
    /// Create an event
    Create(CreateArgs),
    /// Edit an event
    Edit(EditArgs),
    /// Delete an event
    Delete { id: String },
    /// List event categories
    Types,
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long = "type", value_parser = form::parse_event_type)]
    kind: String,
    #[arg(long, value_parser = form::parse_date)]
    date: String,
    #[arg(long, value_parser = form::parse_time, default_value = "12:00")]
    time: String,
    #[arg(long)]
    location: String,
    /// Defaults to the logged-in user's name, or their email if the name is too short
    #[arg(long)]
    organizer: Option<String>,
    #[arg(long, default_value = "")]
    image_url: String,
}

#[derive(Args)]
struct EditArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "type", value_parser = form::parse_event_type)]
    kind: Option<String>,
    #[arg(long, value_parser = form::parse_date)]
    date: Option<String>,
    #[arg(long, value_parser = form::parse_time)]
    time: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    organizer: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
}

impl EditArgs {
    fn patch(&self) -> EventPatch {
        EventPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            organizer: self.organizer.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

impl Commands {
    /// The view this command stands for.
    fn route(&self) -> String {
        match self {
            Commands::Login { .. } => "/login".to_string(),
            Commands::Logout | Commands::Whoami | Commands::Types => "/".to_string(),
            Commands::Events { .. } | Commands::Show { .. } | Commands::Delete { .. } => {
                "/events".to_string()
            }
            Commands::Create(_) => "/create-event".to_string(),
            Commands::Edit(args) => format!("/edit-event/{}", args.id),
        }
    }
}

/// Everything a view works against.
struct App {
    session: Session<Rc<SqliteStore>>,
    status: watch::Receiver<Status>,
    events: EventStore<Rc<SqliteStore>>,
    guard: Guard,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Events { search: None });

    let mut app = open_app(&config)?;
    authorize(&mut app, &command.route()).await?;

    match command {
        Commands::Login { email, password } => cmd_login(&mut app, email, password),
        Commands::Logout => cmd_logout(&mut app),
        Commands::Whoami => cmd_whoami(&app),
        Commands::Events { search } => cmd_events(&app, search.as_deref()),
        Commands::Show { id } => cmd_show(&app, &id),
        Commands::Create(args) => cmd_create(&mut app, args),
        Commands::Edit(args) => cmd_edit(&mut app, &args),
        Commands::Delete { id } => cmd_delete(&mut app, &id),
        Commands::Types => cmd_types(),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if std::path::Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}

fn open_app(config: &Config) -> Result<App> {
    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    debug!(path = %db_path.display(), "opening catalog");
    let backend = Rc::new(SqliteStore::open(&db_path)?);

    let mut session = Session::new(Rc::clone(&backend));
    let status = session.subscribe();
    let mut events = EventStore::new(backend);

    session.settle();
    events.initialize()?;

    Ok(App {
        session,
        status,
        events,
        guard: Guard::new(config.access.clone()),
    })
}

/// Run the guard for `path` until it settles on a decision.
async fn authorize(app: &mut App, path: &str) -> Result<()> {
    loop {
        let outcome = app
            .guard
            .render(path, app.session.status(), app.session.is_authenticated());

        match outcome {
            Outcome::Waiting => wait_resolved(&mut app.status).await?,
            Outcome::Render => return Ok(()),
            Outcome::Redirect { to, notice } => {
                eprintln!("{notice}");
                info!(from = path, to = %to, "login required");
                return Err(Error::LoginRequired { to });
            }
            Outcome::Blocked => {
                return Err(Error::Blocked {
                    path: path.to_string(),
                });
            }
        }
    }
}

fn cmd_login(app: &mut App, email: String, password: String) -> Result<()> {
    let principal = app.session.login(&Credentials::new(email, password))?;
    println!("Logged in as {}", principal.name);
    Ok(())
}

fn cmd_logout(app: &mut App) -> Result<()> {
    let was_logged_in = app.session.is_authenticated();
    app.session.logout()?;
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

fn cmd_whoami(app: &App) -> Result<()> {
    match app.session.principal() {
        Some(p) => match &p.email {
            Some(email) => println!("{} <{email}> ({})", p.name, p.id),
            None => println!("{} ({})", p.name, p.id),
        },
        None => println!("Not logged in."),
    }
    Ok(())
}

fn cmd_events(app: &App, search: Option<&str>) -> Result<()> {
    let query = search.unwrap_or_default();
    let events = app.events.search_events(query);

    if events.is_empty() {
        if query.is_empty() {
            println!("No events yet. Create your first event with 'campus create'.");
        } else {
            println!("No events match '{query}'. Try a different search term.");
        }
        return Ok(());
    }

    println!(
        "{:<32}  {:<10}  {:<5}  {:<12}  {:<20}  TITLE",
        "ID", "DATE", "TIME", "TYPE", "LOCATION"
    );
    println!("{}", "-".repeat(100));

    for event in events {
        println!(
            "{:<32}  {:<10}  {:<5}  {:<12}  {:<20}  {}",
            event.id,
            event.date,
            event.time,
            event.kind,
            truncate(&event.location, 20),
            event.title
        );
    }

    Ok(())
}

fn cmd_show(app: &App, id: &str) -> Result<()> {
    let event = find(app, id)?;
    print_event(event);
    Ok(())
}

fn cmd_create(app: &mut App, args: CreateArgs) -> Result<()> {
    let Some(principal) = app.session.principal() else {
        return Err(Error::LoginRequired {
            to: app.guard.policy().login_path.clone(),
        });
    };

    let draft = NewEvent {
        title: args.title,
        description: args.description,
        kind: args.kind,
        date: args.date,
        time: args.time,
        location: args.location,
        organizer: args
            .organizer
            .unwrap_or_else(|| form::default_organizer(principal)),
        image_url: args.image_url,
    };
    form::validate_draft(&draft)?;

    let creator = principal.id.clone();
    let event = app.events.add_event(draft, &creator)?;
    println!("Event created successfully! ({})", event.id);
    Ok(())
}

fn cmd_edit(app: &mut App, args: &EditArgs) -> Result<()> {
    let id = find(app, &args.id)?.id.clone();
    let patch = args.patch();
    form::validate_patch(&patch)?;

    app.events.update_event(&id, patch)?;
    println!("Event updated successfully!");
    Ok(())
}

fn cmd_delete(app: &mut App, id: &str) -> Result<()> {
    let id = find(app, id)?.id.clone();
    app.events.delete_event(&id)?;
    println!("Event deleted successfully!");
    Ok(())
}

fn cmd_types() -> Result<()> {
    for kind in EventType::ALL {
        println!("{kind}");
    }
    Ok(())
}

fn find<'a>(app: &'a App, id: &str) -> Result<&'a Event> {
    app.events
        .get_event_by_id(&EventId::from(id))
        .ok_or_else(|| Error::EventNotFound { id: id.to_string() })
}

fn print_event(event: &Event) {
    println!("{}", event.title);
    println!("{}", "=".repeat(event.title.chars().count().max(3)));
    println!("ID:         {}", event.id);
    println!("Type:       {}", event.kind);
    println!(
        "When:       {} at {}",
        form::display_date(&event.date),
        event.time
    );
    println!("Where:      {}", event.location);
    println!("Organizer:  {}", event.organizer);
    if !event.image_url.is_empty() {
        println!("Image:      {}", event.image_url);
    }
    println!("Created by: {}", event.created_by);
    println!();
    println!("{}", event.description);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}
