use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medstock_backup::cli::{handle_backup_command, handle_inventory_command};
use medstock_backup::config::{paths::MedstockPaths, settings::Settings};
use medstock_backup::display::format_size;
use medstock_backup::storage::Storage;

#[derive(Parser)]
#[command(
    name = "medstock",
    version,
    about = "Backup and restore for the medical inventory tracker",
    long_about = "Medstock snapshots the inventory, audit log, users and settings into \
                  JSON, CSV or SQL files, tracks backup health, and restores inventory \
                  from JSON backups in full, merge or preview mode."
)]
struct Cli {
    /// Name recorded in the audit log for this invocation
    #[arg(long, global = true, env = "MEDSTOCK_ACTOR")]
    actor: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Backup management commands
    #[command(subcommand)]
    Backup(medstock_backup::cli::BackupCommands),

    /// Inventory management commands
    #[command(subcommand, alias = "inv")]
    Inventory(medstock_backup::cli::InventoryCommands),

    /// Show the most recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config {
        /// Write the effective settings to config.json
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medstock=info,medstock_backup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let paths = MedstockPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let actor = cli
        .actor
        .clone()
        .unwrap_or_else(|| settings.default_actor.clone());

    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, &settings, &actor, cmd)?;
        }
        Some(Commands::Inventory(cmd)) => {
            handle_inventory_command(&storage, &actor, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit.read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries found.");
            } else {
                for entry in &entries {
                    println!("{}", entry.format_human_readable());
                }
                println!();
                println!("Showing {} of the most recent entries", entries.len());
            }
        }
        Some(Commands::Config { save }) => {
            if save {
                settings.save(&paths)?;
                println!("Settings written to {}", paths.settings_file().display());
                println!();
            }
            println!("Medstock Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Storage limit:    {}", format_size(settings.storage_limit_bytes));
            println!(
                "  Warning at:       {:.0}%",
                settings.storage_warning_ratio * 100.0
            );
            println!("  Stale after:      {}h", settings.stale_after_hours);
            match settings.schedule {
                Some(schedule) => println!("  Schedule:         every {}h", schedule.interval_hours),
                None => println!("  Schedule:         none"),
            }
            println!("  Default actor:    {}", settings.default_actor);
        }
        None => {
            println!("Medstock - backup and restore for medical inventory");
            println!();
            println!("Run 'medstock --help' for usage information.");
        }
    }

    Ok(())
}
