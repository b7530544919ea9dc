use assert_cmd::Command;

fn cli(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("biblioteca-cli").unwrap();
    cmd.current_dir(dir.path())
        .env("BIBLIOTECA_CONFIG_DIR", dir.path())
        .env_remove("BIBLIOTECA_ENV")
        .env_remove("PORT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn migrate_creates_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalogo.sqlite");

    let output = cli(&dir)
        .env(
            "BIBLIOTECA__DATABASE__URL",
            format!("sqlite://{}", db_path.display()),
        )
        .arg("migrate")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1 schema migration(s) applied"));
    assert!(db_path.exists());
}

#[test]
fn migrate_fails_when_database_cannot_be_opened() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("missing").join("catalogo.sqlite");

    cli(&dir)
        .env(
            "BIBLIOTECA__DATABASE__URL",
            format!("sqlite://{}", db_path.display()),
        )
        .arg("migrate")
        .assert()
        .failure();
}

#[test]
fn config_honours_port_variable() {
    let dir = tempfile::tempdir().unwrap();

    let output = cli(&dir).env("PORT", "4321").arg("config").output().unwrap();

    assert!(output.status.success());
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["server"]["port"], 4321);
    assert_eq!(settings["environment"], "local");
}
