//! WARDEN CLI
//!
//! Inspect field and ownership policies against a registry document.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod load;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use load::Records;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use warden_access::Accessor;
use warden_core::{Action, Actor, CoreError, Criteria, Entity, InMemoryRegistry};

const DEFAULT_LOG_FILTER: &str = "warden=info";

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "WARDEN - field and row level access control", long_about = None)]
struct Cli {
    /// Log filter, overrides RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// Path to registry document
    #[arg(short, long)]
    registry: PathBuf,
    /// Entity name
    #[arg(short, long)]
    entity: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved field configuration
    Fields {
        #[command(flatten)]
        target: Target,
        /// Path to actor JSON
        #[arg(short, long)]
        actor: PathBuf,
        /// Action (add, edit, list, view, remove)
        #[arg(long)]
        action: Action,
    },
    /// Strip a record or record array down to readable fields
    Process {
        #[command(flatten)]
        target: Target,
        /// Path to actor JSON
        #[arg(short, long)]
        actor: PathBuf,
        /// Action
        #[arg(long)]
        action: Action,
        /// Path to record JSON
        #[arg(long)]
        record: PathBuf,
    },
    /// Add the ownership clause to criteria
    Scope {
        #[command(flatten)]
        target: Target,
        /// Path to actor JSON
        #[arg(short, long)]
        actor: PathBuf,
        /// Path to criteria JSON
        #[arg(long)]
        criteria: Option<PathBuf>,
    },
    /// Stamp the ownership field on a new record
    Stamp {
        #[command(flatten)]
        target: Target,
        /// Path to actor JSON
        #[arg(short, long)]
        actor: PathBuf,
        /// Path to record JSON
        #[arg(long)]
        record: PathBuf,
    },
    /// Explain each field's decision
    Explain {
        #[command(flatten)]
        target: Target,
        /// Path to actor JSON
        #[arg(short, long)]
        actor: PathBuf,
        /// Action
        #[arg(long)]
        action: Action,
    },
    /// Check a registry document for configuration issues
    Validate {
        /// Path to registry document
        #[arg(short, long)]
        registry: PathBuf,
    },
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn entity<'r>(registry: &'r InMemoryRegistry, name: &str) -> Result<&'r Entity> {
    registry
        .get(name)
        .ok_or_else(|| CoreError::UnknownEntity { name: name.to_string() }.into())
}

/// Loaded inputs for one command
struct Request {
    registry: InMemoryRegistry,
    entity: String,
    actor: Actor,
}

impl Request {
    fn load(target: &Target, actor: &Path) -> Result<Self> {
        Ok(Self {
            registry: load::registry(&target.registry)?,
            entity: target.entity.clone(),
            actor: load::actor(actor)?,
        })
    }

    fn accessor(&self, action: Action) -> Result<Accessor<'_>> {
        let entity = entity(&self.registry, &self.entity)?;
        Ok(Accessor::new(entity, action, &self.actor, &self.registry))
    }
}

fn execute(command: Commands) -> Result<Value> {
    let output = match command {
        Commands::Fields { target, actor, action } => {
            let request = Request::load(&target, &actor)?;
            serde_json::to_value(request.accessor(action)?.fields_config())?
        }
        Commands::Process {
            target,
            actor,
            action,
            record,
        } => {
            let request = Request::load(&target, &actor)?;
            let accessor = request.accessor(action)?;
            match load::records(&record)? {
                Records::One(row) => Value::Object(accessor.process(&row)),
                Records::Many(rows) => serde_json::to_value(accessor.process_many(&rows))?,
            }
        }
        Commands::Scope {
            target,
            actor,
            criteria,
        } => {
            let request = Request::load(&target, &actor)?;
            let criteria = match criteria {
                Some(path) => load::object(&path)?,
                None => Criteria::new(),
            };
            // action does not affect ownership
            let scoped = request.accessor(Action::List)?.sanitize_user_relation_access(criteria)?;
            Value::Object(scoped)
        }
        Commands::Stamp {
            target,
            actor,
            record,
        } => {
            let request = Request::load(&target, &actor)?;
            let row = load::object(&record)?;
            Value::Object(request.accessor(Action::Add)?.set_user_relation_access(row)?)
        }
        Commands::Explain { target, actor, action } => {
            let request = Request::load(&target, &actor)?;
            serde_json::to_value(request.accessor(action)?.explain())?
        }
        Commands::Validate { registry } => {
            let registry = load::registry(&registry)?;
            // each issue is reported by `validate` through tracing
            let issues = registry.validate();
            if !issues.is_empty() {
                return Err(eyre!("{} configuration issue(s) found", issues.len()));
            }
            Value::String(format!("{} entities, no issues", registry.len()))
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let output = execute(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
