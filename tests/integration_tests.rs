//! Integration tests for the fonds CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a fonds command isolated from the user's config and env
fn fonds(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fonds").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("FONDS_ROWS_UNTIL_UPDATE")
        .env_remove("FONDS_ERROR_LOG")
        .env_remove("FONDS_ACCESSION_MASK")
        .env_remove("FONDS_SOURCE_NAME")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fonds(tmp.path()).arg("init").assert().success();
    tmp
}

fn write_csv(tmp: &TempDir, name: &str, contents: &str) -> String {
    fs::write(tmp.path().join(name), contents).unwrap();
    name.to_string()
}

fn list_json(tmp: &TempDir, kind: &str) -> Vec<serde_json::Value> {
    let output = fonds(tmp.path())
        .args(["list", kind, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

const DONORS: &str = "TITLE,ACCESSION NUMBER,DONOR\n\
Minutes,2011-001,\"Smith, John\"\n\
Photographs,2011-002,\n\
Maps,2011-003,Parks Board\n";

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    fonds(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("purge"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    fonds(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fonds"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    fonds(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fonds"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_project() {
    let tmp = TempDir::new().unwrap();
    fonds(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized fonds project"));

    assert!(tmp.path().join(".fonds/config.yaml").is_file());
    assert!(tmp.path().join(".fonds/archive.db").is_file());
}

#[test]
fn test_init_twice_warns() {
    let tmp = setup_test_project();
    fonds(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();
    fonds(tmp.path())
        .args(["list", "accessions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a fonds project"));
}

#[test]
fn test_terms_lists_seeded_vocabulary() {
    let tmp = setup_test_project();
    fonds(tmp.path())
        .args(["terms", "relation-type"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Donor"))
        .stdout(predicate::str::contains("Gift").not());
}

// ============================================================================
// Accession Import Tests
// ============================================================================

#[test]
fn test_accession_import_links_donors() {
    let tmp = setup_test_project();
    let file = write_csv(&tmp, "donors.csv", DONORS);

    fonds(tmp.path())
        .args(["import", "accession", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows processed"));

    let accessions = list_json(&tmp, "accessions");
    assert_eq!(accessions.len(), 3);
    assert_eq!(accessions[0]["identifier"], "2011-001");

    let relations = list_json(&tmp, "relations");
    assert_eq!(relations.len(), 2);

    let actors = list_json(&tmp, "actors");
    assert_eq!(actors.len(), 2);
}

#[test]
fn test_accession_reimport_updates_in_place() {
    let tmp = setup_test_project();
    let file = write_csv(&tmp, "donors.csv", DONORS);

    fonds(tmp.path()).args(["import", "accession", &file]).assert().success();
    fonds(tmp.path()).args(["import", "accession", &file]).assert().success();

    assert_eq!(list_json(&tmp, "accessions").len(), 3);
    assert_eq!(list_json(&tmp, "relations").len(), 2);
}

#[test]
fn test_accession_skip_rows() {
    let tmp = setup_test_project();
    let file = write_csv(&tmp, "donors.csv", DONORS);

    fonds(tmp.path())
        .args(["import", "accession", &file, "--skip-rows", "2"])
        .assert()
        .success();

    let accessions = list_json(&tmp, "accessions");
    assert_eq!(accessions.len(), 1);
    assert_eq!(accessions[0]["identifier"], "2011-003");
}

#[test]
fn test_accession_row_errors_are_logged_not_fatal() {
    let tmp = setup_test_project();
    let file = write_csv(
        &tmp,
        "bad.csv",
        "ACCESSION NUMBER,TYPE\n2011-001,Loan\n2011-002,Public records\n",
    );

    fonds(tmp.path())
        .args(["import", "accession", &file, "--error-log", "errors.log"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown transfer type 'Loan'"));

    assert_eq!(list_json(&tmp, "accessions").len(), 2);
    let logged = fs::read_to_string(tmp.path().join("errors.log")).unwrap();
    assert_eq!(logged.lines().count(), 1);
    assert!(logged.contains("row 1, column TYPE"));
}

#[test]
fn test_row_error_is_reported_once() {
    let tmp = setup_test_project();
    let file = write_csv(&tmp, "bad.csv", "ACCESSION NUMBER,TYPE\n2011-001,Loan\n");

    let output = fonds(tmp.path())
        .args(["import", "accession", &file])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("unknown transfer type 'Loan'").count(), 1, "{}", stderr);
}

#[test]
fn test_progress_line_every_n_rows() {
    let tmp = setup_test_project();
    let file = write_csv(
        &tmp,
        "four.csv",
        "ACCESSION NUMBER,TITLE\n2011-001,A\n2011-002,B\n2011-003,C\n2011-004,D\n",
    );

    fonds(tmp.path())
        .args(["import", "accession", &file, "--rows-until-update", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Processed 2 rows"))
        .stderr(predicate::str::contains("Processed 4 rows"))
        .stderr(predicate::str::contains("Processed 3 rows").not());
}

#[test]
fn test_progress_line_disabled_with_zero() {
    let tmp = setup_test_project();
    let file = write_csv(
        &tmp,
        "four.csv",
        "ACCESSION NUMBER,TITLE\n2011-001,A\n2011-002,B\n2011-003,C\n2011-004,D\n",
    );

    fonds(tmp.path())
        .args(["import", "accession", &file, "--rows-until-update", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Processed").not());
}

#[test]
fn test_import_reports_archive_totals() {
    let tmp = setup_test_project();
    let file = write_csv(&tmp, "donors.csv", DONORS);

    fonds(tmp.path())
        .args(["import", "accession", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Archive now holds 3 accession(s), 2 actor(s), 2 relation(s)",
        ));
}

#[test]
fn test_accession_missing_file_fails() {
    let tmp = setup_test_project();
    fonds(tmp.path())
        .args(["import", "accession", "missing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_accession_mask_from_project_config() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".fonds/config.yaml"),
        "accession_mask: \"#ACC-#iii\"\n",
    )
    .unwrap();
    let file = write_csv(&tmp, "untitled.csv", "ACCESSION NUMBER,TITLE\n,Loose papers\n");

    fonds(tmp.path()).args(["import", "accession", &file]).assert().success();

    let accessions = list_json(&tmp, "accessions");
    assert_eq!(accessions[0]["identifier"], "ACC-001");
}

// ============================================================================
// Authority Import Tests
// ============================================================================

#[test]
fn test_authority_import_with_aliases() {
    let tmp = setup_test_project();
    let aliases = write_csv(
        &tmp,
        "aliases.csv",
        "RecordID,parentAuthority,OtherName,email\n1,\"Smith, John\",J. Smith,\n",
    );
    let actors = write_csv(&tmp, "actors.csv", "name,EntityType\n\"Smith, John\",person\n");

    fonds(tmp.path())
        .args(["import", "authority", &actors, "--alias-file", &aliases])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading aliases"));

    let listed = list_json(&tmp, "actors");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["authorized_form_of_name"], "Smith, John");

    fonds(tmp.path())
        .args(["list", "actors", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("J. Smith"));
}

#[test]
fn test_authority_relations_skip_unknown_actors() {
    let tmp = setup_test_project();
    let actors = write_csv(&tmp, "actors.csv", "name\nSmith\nJones\n");
    let relations = write_csv(
        &tmp,
        "relations.csv",
        "RecordID,Source_Name,Target_Name,Relationship_Category\n\
         1,Smith,Jones,associative\n\
         2,Smith,Nobody,associative\n",
    );

    fonds(tmp.path())
        .args(["import", "authority", &actors, "--relation-file", &relations])
        .assert()
        .success()
        .stderr(predicate::str::contains("Actor \"Nobody\" does not exist"));

    assert_eq!(list_json(&tmp, "relations").len(), 1);
}

// ============================================================================
// Template and Purge Tests
// ============================================================================

#[test]
fn test_template_prints_header() {
    let tmp = TempDir::new().unwrap();
    fonds(tmp.path())
        .args(["import", "template", "relation"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("RecordID,Source_Name,Target_Name"));
}

#[test]
fn test_template_round_trips_through_import() {
    let tmp = setup_test_project();
    let output = fonds(tmp.path())
        .args(["import", "template", "accession"])
        .output()
        .unwrap();
    fs::write(tmp.path().join("template.csv"), &output.stdout).unwrap();

    fonds(tmp.path())
        .args(["import", "accession", "template.csv"])
        .assert()
        .success();

    let accessions = list_json(&tmp, "accessions");
    assert_eq!(accessions.len(), 1);
    assert_eq!(accessions[0]["identifier"], "2011-004");
}

#[test]
fn test_purge_removes_source_records() {
    let tmp = setup_test_project();
    let file = write_csv(&tmp, "donors.csv", DONORS);
    fonds(tmp.path()).args(["import", "accession", &file]).assert().success();

    fonds(tmp.path())
        .args(["purge", "--source-name", "donors.csv", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 3 record(s)"));

    assert!(list_json(&tmp, "accessions").is_empty());
    assert!(list_json(&tmp, "relations").is_empty());
}

#[test]
fn test_purge_verbose_names_each_record() {
    let tmp = setup_test_project();
    let file = write_csv(&tmp, "donors.csv", DONORS);
    fonds(tmp.path()).args(["import", "accession", &file]).assert().success();

    fonds(tmp.path())
        .args(["-v", "purge", "--source-name", "donors.csv", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("accession 2011-001"))
        .stdout(predicate::str::contains("accession 2011-003"));
}

#[test]
fn test_purge_unknown_source() {
    let tmp = setup_test_project();
    fonds(tmp.path())
        .args(["purge", "--source-name", "never.csv", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records were imported"));
}
