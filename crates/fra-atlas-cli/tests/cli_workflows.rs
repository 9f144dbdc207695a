// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use serde_json::Value;

fn fra_atlas(db: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fra-atlas"));
    cmd.env_remove("FRA_DB_PATH").arg("--db").arg(db);
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json stdout")
}

#[test]
fn version_output_contains_crate_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = fra_atlas(&dir.path().join("unused.sqlite"))
        .arg("version")
        .output()
        .expect("run version");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn migrate_seed_and_list_claims() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("atlas.sqlite");

    let migrated = stdout_json(
        &fra_atlas(&db)
            .args(["--json", "db", "migrate"])
            .output()
            .expect("migrate"),
    );
    assert_eq!(migrated["schema_version"], 1);
    let again = stdout_json(
        &fra_atlas(&db)
            .args(["--json", "db", "migrate"])
            .output()
            .expect("migrate again"),
    );
    assert_eq!(again, migrated);

    stdout_json(
        &fra_atlas(&db)
            .args(["--json", "db", "seed"])
            .output()
            .expect("seed"),
    );

    let listed = stdout_json(
        &fra_atlas(&db)
            .args(["--json", "claims", "list", "--state", "odisha", "--limit", "1"])
            .output()
            .expect("list"),
    );
    assert_eq!(listed["pagination"]["total"], 2);
    assert_eq!(listed["pagination"]["pages"], 2);
    assert_eq!(listed["data"][0]["state"], "Odisha");

    let reset = stdout_json(
        &fra_atlas(&db)
            .args(["--json", "db", "seed", "--reset"])
            .output()
            .expect("reset"),
    );
    assert_eq!(reset["reset"], true);
    assert_eq!(reset["inserted"]["claims"], 8);
}

#[test]
fn failures_exit_non_zero_with_a_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("atlas.sqlite");

    let output = fra_atlas(&db)
        .args(["claims", "list"])
        .output()
        .expect("list unmigrated");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("db migrate"), "{stderr}");

    fra_atlas(&db).args(["db", "migrate"]).assert().success();
    fra_atlas(&db)
        .args(["claims", "list", "--status", "approved"])
        .assert()
        .failure();

    let output = fra_atlas(&db).arg("--no-such-flag").output().expect("usage");
    assert_eq!(output.status.code(), Some(2));
}
