//! Domain registry command-line tool.
//!
//! ```sh
//! # List domains (wildcards included)
//! domain-registry list --wildcards
//!
//! # Map a hostname to content item 42
//! domain-registry save shop.example.com --content 42 --culture en-US
//!
//! # Remove it again
//! domain-registry delete shop.example.com
//!
//! # Validate config without touching the database
//! domain-registry --check
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use domain_registry::application::events::{DeleteEventArgs, SaveEventArgs};
use domain_registry::support::{init_tracing, AppError, InfraError};
use domain_registry::{
    create_event_bus, default_config_path, init_database, run_migrations, AppConfig, Domain,
    DomainEventHandler, DomainNotifier, DomainService, OperationOutcome, SeaOrmUnitOfWorkProvider,
};

/// Manage hostname-to-content domain mappings.
#[derive(Parser, Debug)]
#[command(name = "domain-registry", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "DOMAIN_REGISTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the database URL.
    #[arg(long)]
    database: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exit with status 0 if the domain exists, 1 otherwise
    Exists { name: String },
    /// Show a domain by name
    Get { name: String },
    /// Show a domain by id
    GetId { id: i32 },
    /// List all domains
    List {
        #[arg(long)]
        wildcards: bool,
    },
    /// List domains assigned to a content item
    Assigned {
        content_id: i32,
        #[arg(long)]
        wildcards: bool,
    },
    /// Create or update a domain
    Save {
        name: String,
        /// Owning content item (omit for a wildcard domain)
        #[arg(long)]
        content: Option<i32>,
        /// Culture tag, e.g. en-US
        #[arg(long)]
        culture: Option<String>,
        /// Rename the domain with this id instead of matching by name
        #[arg(long)]
        id: Option<i32>,
    },
    /// Delete a domain by name
    Delete { name: String },
}

/// Logs every committed change
struct AuditLog;

impl DomainEventHandler for AuditLog {
    fn name(&self) -> &str {
        "audit-log"
    }

    fn saved(&self, args: &SaveEventArgs<'_>) {
        info!(id = args.domain.id, name = %args.domain.name, "audit: domain saved");
    }

    fn deleted(&self, args: &DeleteEventArgs<'_>) {
        info!(id = args.domain.id, name = %args.domain.name, "audit: domain deleted");
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match try_main(cli).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn try_main(cli: Cli) -> Result<i32, AppError> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => return Err(e.into()),
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    config.apply_overrides(cli.database.clone(), cli.log_level.clone())?;
    init_tracing(&config);

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   Database     : {}", config.database.url);
        println!("   Log level    : {}", config.logging.level);
        println!("   Bus capacity : {}", config.events.bus_capacity);
        return Ok(0);
    }

    let Some(command) = cli.command else {
        eprintln!("No command given; see --help");
        return Ok(2);
    };

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&config.database_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(InfraError::from(e).into());
        }
    };
    if !cli.no_migrate {
        run_migrations(&db).await.map_err(InfraError::from)?;
    }

    let mut notifier =
        DomainNotifier::new().with_event_bus(create_event_bus(config.events.bus_capacity));
    notifier.subscribe(Arc::new(AuditLog));
    let service = DomainService::new(Arc::new(SeaOrmUnitOfWorkProvider::new(db.clone())), notifier);

    let code = run(&service, command).await;

    if let Err(e) = db.close().await {
        error!("Error closing database connection: {}", e);
    }
    code
}

async fn run(service: &DomainService, command: Command) -> Result<i32, AppError> {
    match command {
        Command::Exists { name } => {
            let exists = service.exists(&name).await?;
            println!("{}", exists);
            Ok(if exists { 0 } else { 1 })
        }
        Command::Get { name } => Ok(print_optional(service.get_by_name(&name).await?)),
        Command::GetId { id } => Ok(print_optional(service.get_by_id(id).await?)),
        Command::List { wildcards } => {
            print_table(&service.get_all(wildcards).await?);
            Ok(0)
        }
        Command::Assigned {
            content_id,
            wildcards,
        } => {
            print_table(&service.get_assigned_domains(content_id, wildcards).await?);
            Ok(0)
        }
        Command::Save {
            name,
            content,
            culture,
            id,
        } => {
            let existing = match id {
                Some(id) => match service.get_by_id(id).await? {
                    Some(d) => Some(d),
                    None => {
                        eprintln!("No domain with id {}", id);
                        return Ok(1);
                    }
                },
                None => service.get_by_name(&name).await?,
            };
            let mut domain = existing.unwrap_or_else(|| Domain::new(name.clone()));
            domain.name = name;
            domain.root_content_id = content;
            domain.language_iso_code = culture;

            let outcome = service.save(&mut domain).await?;
            print_outcome(&outcome);
            print_table(std::slice::from_ref(&domain));
            Ok(exit_code(&outcome))
        }
        Command::Delete { name } => {
            let Some(domain) = service.get_by_name(&name).await? else {
                eprintln!("No domain named {}", name);
                return Ok(1);
            };
            let outcome = service.delete(&domain).await?;
            print_outcome(&outcome);
            Ok(exit_code(&outcome))
        }
    }
}

fn exit_code(outcome: &OperationOutcome) -> i32 {
    if outcome.is_success() {
        0
    } else {
        3
    }
}

fn print_outcome(outcome: &OperationOutcome) {
    println!("{}", outcome.status);
    for msg in &outcome.messages {
        println!("  [{:?}] {}: {}", msg.kind, msg.category, msg.text);
    }
}

fn print_optional(domain: Option<Domain>) -> i32 {
    match domain {
        Some(d) => {
            print_table(std::slice::from_ref(&d));
            0
        }
        None => {
            eprintln!("Not found");
            1
        }
    }
}

fn print_table(domains: &[Domain]) {
    println!("{:>6}  {:<40}  {:>8}  {:<8}  {}", "ID", "NAME", "CONTENT", "CULTURE", "UPDATED");
    for d in domains {
        println!(
            "{:>6}  {:<40}  {:>8}  {:<8}  {}",
            d.id,
            d.name,
            d.root_content_id.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
            d.language_iso_code.as_deref().unwrap_or("-"),
            d.updated_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }
}
