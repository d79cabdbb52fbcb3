//! Backup display formatting
//!
//! Formats backup metadata, health reports and restore results for terminal
//! output.

use chrono::{DateTime, Duration, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::RestoreResult;
use crate::models::{AlertLevel, Backup, BackupHealth, BackupStatus};

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "File")]
    file_name: String,
    #[tabled(rename = "Type")]
    file_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Records")]
    records: u64,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Age")]
    age: String,
}

/// Format backups as a table, in the order given
pub fn format_backup_list(backups: &[Backup], now: DateTime<Utc>) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let rows = backups.iter().map(|b| BackupRow {
        id: b.id.to_string(),
        file_name: b.file_name.clone(),
        file_type: b.file_type.to_string(),
        status: b.status.to_string(),
        records: b.record_count,
        size: format_size(b.file_size),
        age: format_age(now.signed_duration_since(b.created_at)),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\nTotal: {} backup(s)", table, backups.len())
}

/// Format a single backup's metadata
pub fn format_backup_details(backup: &Backup) -> String {
    let mut output = String::new();
    output.push_str("Backup Details\n");
    output.push_str("==============\n");
    output.push_str(&format!("ID:       {}\n", backup.id.as_uuid()));
    output.push_str(&format!("File:     {}\n", backup.file_name));
    output.push_str(&format!("Path:     {}\n", backup.storage_path.display()));
    output.push_str(&format!("Format:   {}\n", backup.file_type));
    output.push_str(&format!("Status:   {}\n", backup.status));
    output.push_str(&format!("Size:     {}\n", format_size(backup.file_size)));
    output.push_str(&format!("Records:  {}\n", backup.record_count));
    output.push_str(&format!("By:       {}\n", backup.created_by));
    output.push_str(&format!(
        "Created:  {}\n",
        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(notes) = &backup.notes {
        output.push_str(&format!("Notes:    {}\n", notes));
    }
    if backup.status != BackupStatus::Completed {
        output.push_str("\nThis backup cannot be restored.\n");
    } else if !backup.file_type.is_restorable() {
        output.push_str(&format!("\n{} backups are export-only.\n", backup.file_type));
    }
    output
}

/// Format a health report
pub fn format_health(health: &BackupHealth) -> String {
    let mut output = String::new();
    output.push_str("Backup Health\n");
    output.push_str("=============\n");

    let last = health
        .last_successful_backup
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    output.push_str(&format!("Last successful:  {}\n", last));

    if let Some(next) = health.next_scheduled_backup {
        output.push_str(&format!(
            "Next scheduled:   {}\n",
            next.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output.push_str(&format!("Streak:           {} day(s)\n", health.backup_streak));
    output.push_str(&format!(
        "Failures (30d):   {}\n",
        health.failed_backups_last_30_days
    ));
    output.push_str(&format!(
        "Storage:          {} of {} ({:.1}%)\n",
        format_size(health.total_storage_used),
        format_size(health.storage_limit),
        health.storage_ratio() * 100.0
    ));

    if health.alerts.is_empty() {
        output.push_str("\nNo alerts.\n");
    } else {
        output.push_str("\nAlerts:\n");
        for alert in &health.alerts {
            let marker = match alert.level {
                AlertLevel::Warning => "WARN ",
                AlertLevel::Error => "ERROR",
            };
            output.push_str(&format!("  [{}] {}\n", marker, alert.message));
        }
    }
    output
}

/// Format the outcome of a restore
pub fn format_restore_result(result: &RestoreResult) -> String {
    let mut output = String::new();
    output.push_str(&result.summary());
    output.push('\n');
    output.push_str(&format!("Mode: {}  Duration: {} ms\n", result.mode, result.duration_ms));

    if !result.errors.is_empty() {
        output.push_str("\nErrors:\n");
        for error in &result.errors {
            output.push_str(&format!("  - {}\n", error));
        }
    }
    output
}

/// Format a duration in human-readable form
pub fn format_age(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
