//! Backup CLI commands
//!
//! Implements CLI commands for backup creation, inspection, restore and
//! deletion.

use chrono::{NaiveDate, TimeZone, Utc};
use clap::Subcommand;

use crate::backup::{BackupCreator, BackupProgress, HealthMonitor, RestoreEngine, Verifier};
use crate::clock::{Clock, SystemClock};
use crate::config::settings::Settings;
use crate::display::{
    format_backup_details, format_backup_list, format_health, format_restore_result, format_size,
};
use crate::error::{MedstockError, MedstockResult};
use crate::models::{Backup, BackupCreateOptions, BackupId, DateRange, FileType, RestoreMode};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a backup in one or more formats
    Create {
        /// Base name for the backup files
        #[arg(default_value = "backup")]
        name: String,

        /// Formats to write (json, csv, sql)
        #[arg(short, long, value_delimiter = ',', default_value = "json")]
        format: Vec<String>,

        /// Include the audit log
        #[arg(long)]
        include_audit_logs: bool,

        /// Include user records
        #[arg(long)]
        include_users: bool,

        /// Include system settings
        #[arg(long)]
        include_settings: bool,

        /// Include every optional record group
        #[arg(short, long)]
        all: bool,

        /// Only items created on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only items created on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Notes stored with the backup
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all backups
    List,

    /// Show information about a specific backup
    Info {
        /// Backup ID, file name or 'latest'
        backup: String,
    },

    /// Restore inventory from a JSON backup
    Restore {
        /// Backup ID, file name or 'latest'
        backup: String,

        /// Restore mode (full, merge, preview)
        #[arg(short, long, default_value = "preview")]
        mode: String,

        /// Skip confirmation for full and merge restores
        #[arg(short, long)]
        force: bool,
    },

    /// Check that a backup file is readable and well-formed
    Verify {
        /// Backup ID, file name or 'latest'
        backup: String,
    },

    /// Show backup health
    Health,

    /// Delete a backup file and its metadata
    Delete {
        /// Backup ID or file name
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    actor: &str,
    cmd: BackupCommands,
) -> MedstockResult<()> {
    let clock = SystemClock;
    let creator = BackupCreator::new(
        storage,
        storage,
        storage,
        &clock,
        storage.paths().backup_dir(),
    );

    match cmd {
        BackupCommands::Create {
            name,
            format,
            include_audit_logs,
            include_users,
            include_settings,
            all,
            from,
            to,
            notes,
        } => {
            let formats = parse_formats(&format)?;
            let date_range = match (from, to) {
                (None, None) => None,
                (from, to) => Some(DateRange::new(
                    from.as_deref().map(parse_day_start).transpose()?,
                    to.as_deref().map(parse_day_end).transpose()?,
                )),
            };

            let options = BackupCreateOptions {
                name,
                include_audit_logs: include_audit_logs || all,
                include_users: include_users || all,
                include_settings: include_settings || all,
                date_range,
                notes,
            };

            let ids = creator.create_backup_with_progress(actor, &options, &formats, &mut |p: &BackupProgress| {
                println!("  [{:>3}%] {}", p.percent, p.step);
            })?;

            println!();
            for id in ids {
                let backup = creator.get_backup(id)?;
                println!(
                    "Backup created: {} ({}, {} record(s), {})",
                    backup.file_name,
                    backup.id,
                    backup.record_count,
                    format_size(backup.file_size)
                );
            }
        }

        BackupCommands::List => {
            let backups = creator.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: medstock backup create");
                return Ok(());
            }
            println!("{}", format_backup_list(&backups, clock.now()));
        }

        BackupCommands::Info { backup } => {
            let backup = resolve_backup(&creator, &backup)?;
            print!("{}", format_backup_details(&backup));
        }

        BackupCommands::Restore {
            backup,
            mode,
            force,
        } => {
            let mode = RestoreMode::parse(&mode).ok_or_else(|| {
                MedstockError::Validation(format!(
                    "Invalid restore mode: '{}'. Valid modes: full, merge, preview",
                    mode
                ))
            })?;
            let target = resolve_backup(&creator, &backup)?;

            if mode.is_destructive() && !force {
                println!("Backup: {} ({})", target.file_name, target.id);
                println!(
                    "Created: {}",
                    target.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                println!();
                match mode {
                    RestoreMode::Full => println!("WARNING: This will replace ALL current inventory!"),
                    _ => println!("WARNING: This will overwrite inventory items that exist in the backup!"),
                }
                println!("To proceed, run again with --force flag:");
                println!("  medstock backup restore {} --mode {} --force", backup, mode);
                return Ok(());
            }

            if mode.is_destructive() && target.file_type.is_restorable() && target.is_completed() {
                println!("Creating backup of current inventory before restore...");
                let safety = creator.create_backup(
                    actor,
                    &BackupCreateOptions::named("pre-restore"),
                    &[FileType::Json],
                )?;
                if let Some(id) = safety.first() {
                    println!("Pre-restore backup saved: {}", creator.get_backup(*id)?.file_name);
                }
                println!();
            }

            let engine = RestoreEngine::new(storage, storage, storage, &clock);
            let result = engine.restore(target.id, actor, mode)?;
            print!("{}", format_restore_result(&result));

            if !result.success {
                return Err(MedstockError::Storage(format!(
                    "Restore from {} did not complete",
                    target.file_name
                )));
            }
        }

        BackupCommands::Verify { backup } => {
            let target = resolve_backup(&creator, &backup)?;
            if Verifier::new(storage).verify(target.id) {
                println!("Backup {} is valid.", target.file_name);
            } else {
                return Err(MedstockError::Validation(format!(
                    "Backup {} failed verification",
                    target.file_name
                )));
            }
        }

        BackupCommands::Health => {
            let health = HealthMonitor::new(storage, &clock, settings).get_health()?;
            print!("{}", format_health(&health));
        }

        BackupCommands::Delete { backup, force } => {
            let target = resolve_backup(&creator, &backup)?;

            if !force {
                println!(
                    "This will permanently delete {} ({}).",
                    target.file_name,
                    format_size(target.file_size)
                );
                println!("To proceed, run again with --force flag:");
                println!("  medstock backup delete {} --force", backup);
                return Ok(());
            }

            creator.delete_backup(actor, target.id)?;
            println!("Deleted backup: {}", target.file_name);
        }
    }

    Ok(())
}

fn parse_formats(values: &[String]) -> MedstockResult<Vec<FileType>> {
    values
        .iter()
        .map(|v| {
            FileType::parse(v).ok_or_else(|| {
                MedstockError::Validation(format!(
                    "Invalid format: '{}'. Valid formats: json, csv, sql",
                    v
                ))
            })
        })
        .collect()
}

fn parse_date(s: &str) -> MedstockResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| MedstockError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", s)))
}

fn parse_day_start(s: &str) -> MedstockResult<chrono::DateTime<Utc>> {
    let date = parse_date(s)?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| MedstockError::Validation(format!("Invalid date: '{}'", s)))
}

fn parse_day_end(s: &str) -> MedstockResult<chrono::DateTime<Utc>> {
    let date = parse_date(s)?;
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| MedstockError::Validation(format!("Invalid date: '{}'", s)))
}

/// Resolve a backup by full id, short id, file name or "latest"
fn resolve_backup(creator: &BackupCreator<'_>, query: &str) -> MedstockResult<Backup> {
    if query.eq_ignore_ascii_case("latest") {
        return creator
            .latest_completed()?
            .ok_or_else(|| MedstockError::backup_not_found("latest"));
    }

    if let Ok(id) = query.parse::<BackupId>() {
        return creator.get_backup(id);
    }

    let needle = query.trim_start_matches("bak-").to_lowercase();
    let mut matches: Vec<Backup> = creator
        .list_backups()?
        .into_iter()
        .filter(|b| b.file_name == query || b.id.as_uuid().to_string().starts_with(&needle))
        .collect();

    match matches.len() {
        0 => Err(MedstockError::backup_not_found(query)),
        1 => Ok(matches.remove(0)),
        n => Err(MedstockError::Validation(format!(
            "'{}' matches {} backups; use a longer ID",
            query, n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MedstockPaths;
    use tempfile::TempDir;

    #[test]
    fn test_parse_formats() {
        let formats = parse_formats(&["json".into(), "SQL".into()]).unwrap();
        assert_eq!(formats, vec![FileType::Json, FileType::Sql]);
        assert!(parse_formats(&["xml".into()]).unwrap_err().is_validation());
    }

    #[test]
    fn test_date_bounds() {
        let start = parse_day_start("2025-02-01").unwrap();
        let end = parse_day_end("2025-02-01").unwrap();
        assert_eq!(start.to_rfc3339(), "2025-02-01T00:00:00+00:00");
        assert!(end > start);
        assert!(parse_day_start("02/01/2025").is_err());
    }

    #[test]
    fn test_day_end_includes_last_instant() {
        let end = parse_day_end("2025-02-01").unwrap();
        let last = Utc.with_ymd_and_hms(2025, 2, 1, 23, 59, 59).unwrap()
            + chrono::Duration::nanoseconds(999_999_999);
        assert!(DateRange::new(None, Some(end)).contains(last));
        assert_eq!(end + chrono::Duration::nanoseconds(1), parse_day_start("2025-02-02").unwrap());
    }

    #[test]
    fn test_resolve_backup() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(MedstockPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let clock = SystemClock;
        let creator = BackupCreator::new(&storage, &storage, &storage, &clock, storage.paths().backup_dir());
        let id = creator
            .create_backup("admin", &BackupCreateOptions::named("r"), &[FileType::Json])
            .unwrap()[0];
        let backup = creator.get_backup(id).unwrap();

        assert_eq!(resolve_backup(&creator, &id.to_string()).unwrap().id, id);
        assert_eq!(resolve_backup(&creator, &id.as_uuid().to_string()).unwrap().id, id);
        assert_eq!(resolve_backup(&creator, &backup.file_name).unwrap().id, id);
        assert_eq!(resolve_backup(&creator, "latest").unwrap().id, id);
        assert!(resolve_backup(&creator, "nope.json").unwrap_err().is_not_found());
    }
}
