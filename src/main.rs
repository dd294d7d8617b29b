use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use deploy_wizard::api::{ApplicationProvider, CatalogProvider, HttpServerClient};
use deploy_wizard::app::{App, WizardExit};
use deploy_wizard::config::Config;
use deploy_wizard::logging;
use deploy_wizard::model::{ApplicationSpec, CatalogItem};
use deploy_wizard::wizard::steps::export_spec;
use deploy_wizard::wizard::{WizardController, WizardSession};

#[derive(Parser)]
#[command(name = "deploy-wizard")]
#[command(about = "Compose an application spec step by step and deploy it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive wizard (default)
    Wizard {
        /// Also write the submitted spec to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show catalog contents
    Catalog {
        #[command(subcommand)]
        what: CatalogCommand,
    },

    /// Submit a spec file (JSON or YAML) without the wizard
    Submit {
        /// Spec file to submit
        file: PathBuf,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List entity types
    Entities,
    /// List application templates
    Applications,
    /// List deployable locations
    Locations,
    /// Show the required configuration of a type
    Config {
        /// Catalog type identifier
        type_id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default config as TOML
    Init {
        /// Destination (default: user config path)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(cli.command, None | Some(Commands::Wizard { .. }));

    // Initialize logging (file-based for TUI, stderr for CLI)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        None => {
            run_wizard(&config, None, logging_handle.log_file_path).await?;
        }
        Some(Commands::Wizard { output }) => {
            run_wizard(&config, output, logging_handle.log_file_path).await?;
        }
        Some(Commands::Catalog { what }) => {
            cmd_catalog(&config, what).await?;
        }
        Some(Commands::Submit { file }) => {
            cmd_submit(&config, &file).await?;
        }
        Some(Commands::Config { action }) => {
            cmd_config(&config, action)?;
        }
    }

    Ok(())
}

fn client(config: &Config) -> Result<HttpServerClient> {
    HttpServerClient::from_config(&config.server)
        .with_context(|| format!("Cannot use server {}", config.server.base_url))
}

async fn run_wizard(
    config: &Config,
    output: Option<PathBuf>,
    log_file_path: Option<PathBuf>,
) -> Result<()> {
    let client = Arc::new(client(config)?);
    tracing::info!(server = %client.base_url(), "Starting wizard");

    let session = WizardSession::new(Duration::from_millis(config.ui.notice_ttl_ms));
    let controller = WizardController::new(client.clone(), client, session);
    let mut app = App::new(controller, config);
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    match result? {
        WizardExit::Submitted { spec, response } => {
            println!("Application submitted");
            println!("{}", serde_json::to_string_pretty(&response)?);
            if let Some(path) = output {
                export_spec(&spec, &path)?;
                println!("Spec written to {}", path.display());
            }
        }
        WizardExit::Cancelled => {
            println!("Wizard cancelled; nothing was submitted");
        }
    }
    Ok(())
}

async fn cmd_catalog(config: &Config, what: CatalogCommand) -> Result<()> {
    let client = client(config)?;

    match what {
        CatalogCommand::Entities => {
            print_items("Entity types", &client.list_entities().await?);
        }
        CatalogCommand::Applications => {
            print_items("Application templates", &client.list_applications().await?);
        }
        CatalogCommand::Locations => {
            let locations = client.list_locations().await?;
            println!("Locations ({})", locations.len());
            println!("{}", "─".repeat(60));
            for location in &locations {
                println!("{}  {}", location.uri(), location.pretty_name());
            }
        }
        CatalogCommand::Config { type_id } => {
            let schema = client.entity_config(&type_id).await?;
            let entries = schema.displayed_entries();
            if entries.is_empty() {
                println!("{} has no required configuration", type_id);
                return Ok(());
            }
            println!("Required configuration for {}", type_id);
            println!("{}", "─".repeat(60));
            for entry in entries {
                let label = entry.label.as_deref().unwrap_or(&entry.name);
                let default = entry.default_text();
                if default.is_empty() {
                    println!("{} ({})", label, entry.name);
                } else {
                    println!("{} ({}) [default: {}]", label, entry.name, default);
                }
            }
        }
    }

    Ok(())
}

fn print_items(label: &str, items: &[CatalogItem]) {
    println!("{} ({})", label, items.len());
    println!("{}", "─".repeat(60));
    for item in items {
        match &item.description {
            Some(description) => {
                println!("{}  {} - {}", item.id, item.display_name(), description);
            }
            None => println!("{}  {}", item.id, item.display_name()),
        }
    }
}

/// Parse a spec file as YAML or JSON, by extension
fn load_spec(path: &Path) -> Result<ApplicationSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read spec file {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let spec = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML spec {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON spec {}", path.display()))?
    };
    Ok(spec)
}

async fn cmd_submit(config: &Config, file: &Path) -> Result<()> {
    let spec = load_spec(file)?;
    if let Err(e) = spec.check_deployable() {
        bail!("Refusing to submit {}: {}", file.display(), e);
    }

    let client = client(config)?;
    let body = spec.to_canonical_json();
    tracing::info!(file = %file.display(), "Submitting spec");
    let response = client.create_application(&body).await?;

    println!("Application submitted");
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_config(config: &Config, action: ConfigCommand) -> Result<()> {
    match action {
        ConfigCommand::Init { path } => {
            let path = match path.or_else(Config::user_config_path) {
                Some(path) => path,
                None => bail!("No config directory found; pass --path"),
            };
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            config.save_to(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
