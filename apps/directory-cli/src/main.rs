//! Terminal front end for the restaurant directory.
//!
//! Lists, shows, adds, edits, deletes, searches, and shares restaurants kept
//! in a single JSON collection. Storage is SQLite (default) or in-memory.
//!
//! Run:
//! ```bash
//! cargo run -p directory-cli -- add --name "Cafe" --address "1 Main St" \
//!     --phone 555-0100 --lat 59.91 --lon 10.75
//! cargo run -p directory-cli -- list
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod cli;
mod config;

use std::process;
use std::sync::Arc;

use async_trait::async_trait;
use domain::adapters::memory_store::InMemoryStore;
use domain::form::RestaurantForm;
use domain::id::{next_sequence_after, SequentialIdGenerator, UuidIdGenerator};
use domain::repository::RestaurantRepository;
use domain::service::DirectoryService;
use domain::{CoreError, IdGenerator, KeyValueStore, Restaurant, RestaurantId};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Command;

// Storage selected at startup; sqlite is feature-gated.
enum AnyStore {
    Memory(InMemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite_adapter::SqliteStore),
}

#[async_trait]
impl KeyValueStore for AnyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        match self {
            AnyStore::Memory(s) => s.get(key).await,
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        match self {
            AnyStore::Memory(s) => s.set(key, value).await,
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.set(key, value).await,
        }
    }
}

enum AnyIds {
    Uuid(UuidIdGenerator),
    Sequential(SequentialIdGenerator),
}

impl IdGenerator for AnyIds {
    fn next_id(&self) -> RestaurantId {
        match self {
            AnyIds::Uuid(g) => g.next_id(),
            AnyIds::Sequential(g) => g.next_id(),
        }
    }
}

type Service = DirectoryService<Arc<AnyStore>, AnyIds>;

#[tokio::main]
async fn main() {
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    init_tracing(&cfg);
    cfg.warn_if_ephemeral();

    let cmd = match cli::parse(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("error: {}\n\n{}", msg, cli::USAGE);
            process::exit(2);
        }
    };
    if cmd == Command::Help {
        println!("{}\n\n{}", domain::about(), cli::USAGE);
        return;
    }

    let svc = match build_service(&cfg).await {
        Ok(s) => s,
        Err(e) => {
            error!(err = %e, "failed to open storage");
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if let Err(msg) = run(&svc, cmd).await {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout carries command output.
    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

fn build_store(cfg: &config::Config) -> Result<AnyStore, CoreError> {
    match cfg.storage_provider {
        #[cfg(feature = "sqlite")]
        config::StorageProvider::Sqlite => {
            let store = sqlite_adapter::SqliteStore::open_creating_dirs(&cfg.db_path)?;
            info!(path = %cfg.db_path.display(), "using sqlite storage");
            Ok(AnyStore::Sqlite(store))
        }
        #[cfg(not(feature = "sqlite"))]
        config::StorageProvider::Sqlite => {
            warn!("built without the `sqlite` feature; falling back to memory storage");
            Ok(AnyStore::Memory(InMemoryStore::new()))
        }
        config::StorageProvider::Memory => Ok(AnyStore::Memory(InMemoryStore::new())),
    }
}

async fn build_service(cfg: &config::Config) -> Result<Service, CoreError> {
    let store = Arc::new(build_store(cfg)?);
    let ids = match cfg.id_strategy {
        config::IdStrategy::Uuid => AnyIds::Uuid(UuidIdGenerator),
        config::IdStrategy::Sequential => {
            let first = RestaurantRepository::new(Arc::clone(&store))
                .list()
                .await
                .map_or(0, |all| next_sequence_after(all.iter().map(|r| &r.id)));
            AnyIds::Sequential(SequentialIdGenerator::starting_at(first, 1))
        }
    };
    let svc = DirectoryService::new(store, ids);
    svc.ensure_initialized().await?;
    Ok(svc)
}

async fn run(svc: &Service, cmd: Command) -> Result<(), String> {
    match cmd {
        Command::List { json } => {
            let all = svc.list().await;
            if json {
                println!("{}", to_json(&all)?);
            } else if all.is_empty() {
                println!("No restaurants yet.");
            } else {
                for r in &all {
                    print_summary(r);
                }
            }
            Ok(())
        }
        Command::Show { id, json } => {
            let r = svc.get(&id).await.map_err(describe)?;
            if json {
                println!("{}", to_json(&r)?);
            } else {
                print_details(&r);
            }
            Ok(())
        }
        Command::Add(fields) => {
            let Some(location) = fields.location()? else {
                return Err("Unable to find coordinates: pass --lat and --lon".into());
            };
            let mut form = RestaurantForm::new();
            fields.apply(&mut form);
            let created = svc.submit(form, location, None).await.map_err(describe)?;
            println!("Restaurant added successfully! id: {}", created.id);
            Ok(())
        }
        Command::Edit { id, fields } => {
            let existing = svc.get(&id).await.map_err(describe)?;
            let location = fields.location()?.unwrap_or(existing.location);
            let mut form = RestaurantForm::from_restaurant(&existing);
            fields.apply(&mut form);
            let updated = svc
                .submit(form, location, Some(&id))
                .await
                .map_err(describe)?;
            println!("Restaurant updated successfully! id: {}", updated.id);
            Ok(())
        }
        Command::Delete { id } => {
            let removed = svc.delete(&id).await.map_err(describe)?;
            println!("Deleted {} ({}).", removed.name, removed.id);
            Ok(())
        }
        Command::Search { query } => {
            let found = svc.search(&query).await;
            if found.is_empty() {
                println!("No restaurants match '{}'.", query.trim());
            }
            for r in &found {
                print_summary(r);
            }
            Ok(())
        }
        Command::Share { id, from } => {
            let links = svc.share_links(&id, from).await.map_err(describe)?;
            println!("map:        {}", links.map);
            match links.directions {
                Some(d) => println!("directions: {}", d),
                None => println!("directions: (pass --from <lat>,<lon>)"),
            }
            println!("gmail:      {}", links.gmail);
            println!("email:      {}", links.mailto);
            println!("twitter:    {}", links.twitter);
            println!("facebook:   {}", links.facebook);
            Ok(())
        }
        Command::Help => Ok(()),
    }
}

fn describe(e: CoreError) -> String {
    match e {
        CoreError::NotFound(id) => {
            warn!(id = %id, "restaurant not found");
            format!("Restaurant not found: {}", id)
        }
        CoreError::Validation(fields) => {
            format!("Please fix the errors before submitting: {}", fields)
        }
        other => {
            error!(err = %other, "command failed");
            format!("Operation failed: {}", other)
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to render json: {}", e))
}

fn print_summary(r: &Restaurant) {
    println!("{}  {}  ({:.1})  {}", r.id, r.name, r.rating, r.address);
}

fn print_details(r: &Restaurant) {
    println!("{}", r.name);
    println!("  id:          {}", r.id);
    println!("  address:     {}", r.address);
    println!("  phones:      {}", r.phones.join(", "));
    println!("  rating:      {:.1}", r.rating);
    if !r.tags.is_empty() {
        println!("  tags:        {}", r.tags.join(", "));
    }
    if !r.description.is_empty() {
        println!("  description: {}", r.description);
    }
    println!("  location:    {}", r.location);
}
