//! Backup health computation
//!
//! A pure function of the Backup metadata history. IN_PROGRESS rows are
//! ignored; they have no durable outcome yet.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::config::Settings;
use crate::error::MedstockResult;
use crate::models::{Backup, BackupHealth, BackupStatus, HealthAlert};
use crate::storage::BackupStore;

const FAILURE_WINDOW_DAYS: i64 = 30;

pub struct HealthMonitor<'a> {
    store: &'a dyn BackupStore,
    clock: &'a dyn Clock,
    settings: &'a Settings,
}

impl<'a> HealthMonitor<'a> {
    pub fn new(store: &'a dyn BackupStore, clock: &'a dyn Clock, settings: &'a Settings) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    pub fn get_health(&self) -> MedstockResult<BackupHealth> {
        let now = self.clock.now();
        let rows = self.store.list_backups()?;

        let completed: Vec<&Backup> = rows.iter().filter(|b| b.is_completed()).collect();
        let last_successful_backup = completed.iter().map(|b| b.created_at).max();

        let failure_cutoff = now - Duration::days(FAILURE_WINDOW_DAYS);
        let failed_backups_last_30_days = rows
            .iter()
            .filter(|b| b.status == BackupStatus::Failed && b.created_at >= failure_cutoff)
            .count() as u32;

        let total_storage_used = completed.iter().map(|b| b.file_size).sum();

        let next_scheduled_backup = self.settings.schedule.map(|schedule| {
            last_successful_backup
                .map(|last| last + Duration::hours(i64::from(schedule.interval_hours)))
                .unwrap_or(now)
        });

        let days: BTreeSet<NaiveDate> = completed.iter().map(|b| local_day(b.created_at)).collect();
        let backup_streak = streak(&days, local_day(now));

        let mut health = BackupHealth {
            last_successful_backup,
            next_scheduled_backup,
            backup_streak,
            failed_backups_last_30_days,
            total_storage_used,
            storage_limit: self.settings.storage_limit_bytes,
            alerts: Vec::new(),
        };
        health.alerts = self.alerts(&health, now);

        debug!(
            streak = health.backup_streak,
            failures = health.failed_backups_last_30_days,
            alerts = health.alerts.len(),
            "computed backup health"
        );
        Ok(health)
    }

    fn alerts(&self, health: &BackupHealth, now: DateTime<Utc>) -> Vec<HealthAlert> {
        let mut alerts = Vec::new();

        match health.last_successful_backup {
            None => alerts.push(HealthAlert::error("No successful backup has been recorded")),
            Some(last) => {
                let age = now - last;
                if age > Duration::hours(i64::from(self.settings.stale_after_hours)) {
                    alerts.push(HealthAlert::warning(format!(
                        "Last successful backup was {} hours ago",
                        age.num_hours()
                    )));
                }
            }
        }

        let ratio = health.storage_ratio();
        if ratio > self.settings.storage_warning_ratio {
            alerts.push(HealthAlert::warning(format!(
                "Backup storage is {:.0}% of the limit",
                ratio * 100.0
            )));
        }
        if health.total_storage_used > health.storage_limit {
            alerts.push(HealthAlert::error(format!(
                "Backup storage exceeds the limit ({:.0}% used)",
                ratio * 100.0
            )));
        }

        alerts
    }
}

fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Consecutive days with a completed backup, ending today or, if today has
/// none yet, yesterday
fn streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if days.contains(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut count = 0;
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        count += 1;
        cursor = day.pred_opt();
    }
    count
}
