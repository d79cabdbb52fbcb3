use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn medstock(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("medstock").unwrap();
    cmd.env("MEDSTOCK_DATA_DIR", dir.path())
        .env_remove("MEDSTOCK_BACKUP_DIR")
        .env_remove("MEDSTOCK_ACTOR")
        .env("RUST_LOG", "off");
    cmd
}

fn add_items(dir: &TempDir, names: &[&str]) {
    for name in names {
        medstock(dir)
            .args(["inventory", "add", name, "10"])
            .assert()
            .success();
    }
}

fn inventory_count(dir: &TempDir) -> usize {
    let contents = std::fs::read_to_string(dir.path().join("data/inventory.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    value["items"].as_array().unwrap().len()
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();
    medstock(&dir)
        .args(["config", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup directory:"))
        .stdout(predicate::str::contains("Default actor:    system"));
    assert!(dir.path().join("config.json").exists());
}

#[test]
fn inventory_add_and_list() {
    let dir = TempDir::new().unwrap();
    medstock(&dir)
        .args(["inventory", "add", "Amoxicillin 500mg", "40", "--category", "medication"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Amoxicillin 500mg"));

    medstock(&dir)
        .args(["inventory", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medication"))
        .stdout(predicate::str::contains("Total: 1 item(s)"));
}

#[test]
fn backup_create_and_list() {
    let dir = TempDir::new().unwrap();
    add_items(&dir, &["Gauze", "Saline"]);

    medstock(&dir)
        .args(["backup", "create", "nightly", "--format", "json,csv,sql"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[100%] Backup complete"))
        .stdout(predicate::str::contains("Backup created: nightly-").count(3));

    medstock(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPLETED"))
        .stdout(predicate::str::contains("Total: 3 backup(s)"));

    let files = std::fs::read_dir(dir.path().join("backups")).unwrap().count();
    assert_eq!(files, 3);
}

#[test]
fn invalid_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    medstock(&dir)
        .args(["backup", "create", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn restore_full_requires_force() {
    let dir = TempDir::new().unwrap();
    add_items(&dir, &["Gauze", "Saline", "Gloves"]);
    medstock(&dir).args(["backup", "create"]).assert().success();
    add_items(&dir, &["Masks"]);

    medstock(&dir)
        .args(["backup", "restore", "latest", "--mode", "full"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(inventory_count(&dir), 4);

    medstock(&dir)
        .args(["backup", "restore", "latest", "--mode", "full", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pre-restore backup saved"))
        .stdout(predicate::str::contains("3 added"));
}

#[test]
fn restore_preview_changes_nothing() {
    let dir = TempDir::new().unwrap();
    add_items(&dir, &["Gauze", "Saline"]);
    medstock(&dir).args(["backup", "create"]).assert().success();
    add_items(&dir, &["Masks"]);

    medstock(&dir)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would restore 2 item(s)"));
    assert_eq!(inventory_count(&dir), 3);
}

#[test]
fn restore_from_csv_is_unsupported() {
    let dir = TempDir::new().unwrap();
    add_items(&dir, &["Gauze"]);
    medstock(&dir)
        .args(["backup", "create", "--format", "csv"])
        .assert()
        .success();

    medstock(&dir)
        .args(["backup", "restore", "latest", "--mode", "merge", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format for restore: CSV"));
    assert_eq!(inventory_count(&dir), 1);
}

#[test]
fn verify_and_delete() {
    let dir = TempDir::new().unwrap();
    add_items(&dir, &["Gauze"]);
    medstock(&dir).args(["backup", "create"]).assert().success();

    medstock(&dir)
        .args(["backup", "verify", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));

    medstock(&dir)
        .args(["backup", "delete", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted backup"));

    medstock(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups found."));
}

#[test]
fn health_without_backups_reports_error() {
    let dir = TempDir::new().unwrap();
    medstock(&dir)
        .args(["backup", "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak:           0 day(s)"))
        .stdout(predicate::str::contains("[ERROR]"));
}

#[test]
fn health_after_backup_is_clean() {
    let dir = TempDir::new().unwrap();
    add_items(&dir, &["Gauze"]);
    medstock(&dir).args(["backup", "create"]).assert().success();

    medstock(&dir)
        .args(["backup", "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak:           1 day(s)"))
        .stdout(predicate::str::contains("No alerts."));
}

#[test]
fn audit_shows_recent_entries() {
    let dir = TempDir::new().unwrap();
    medstock(&dir)
        .args(["audit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries found."));

    add_items(&dir, &["Gauze", "Saline"]);
    medstock(&dir).args(["backup", "create"]).assert().success();

    medstock(&dir)
        .args(["audit", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BACKUP_EXPORT"))
        .stdout(predicate::str::contains("CREATE").not())
        .stdout(predicate::str::contains("Showing 1 of the most recent entries"));
}
