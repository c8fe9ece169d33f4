use assert_cmd::Command;

fn bookstore(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("bookstore").unwrap();
    cmd.env("BOOKSTORE_ENV", "test")
        .env("BOOKSTORE_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "error");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();

    let stdout = stdout_of(bookstore(dir.path()).arg("--help"));

    for subcommand in ["serve", "migrate", "routes"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in:\n{stdout}");
    }
}

#[test]
fn routes_prints_book_paths() {
    let dir = tempfile::tempdir().unwrap();

    let stdout = stdout_of(bookstore(dir.path()).arg("routes"));

    assert!(stdout.contains("/books/{isbn}"));
    assert!(stdout.contains("DELETE"));
    assert!(stdout.contains("/healthz"));
}

#[test]
fn migrate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());

    let first = stdout_of(
        bookstore(dir.path())
            .env("BOOKSTORE_DATABASE__URL", &url)
            .arg("migrate"),
    );
    assert!(first.contains("applied 1 migration(s)"));

    let second = stdout_of(
        bookstore(dir.path())
            .env("BOOKSTORE_DATABASE__URL", &url)
            .arg("migrate"),
    );
    assert!(second.contains("applied 0 migration(s)"));
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = bookstore(dir.path())
        .env("BOOKSTORE_ENV", "qa")
        .arg("migrate")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    assert!(String::from_utf8_lossy(&output).contains("unsupported environment 'qa'"));
}

#[test]
fn migrate_logs_its_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());

    let stdout = stdout_of(
        bookstore(dir.path())
            .env("BOOKSTORE_DATABASE__URL", &url)
            .env("RUST_LOG", "info")
            .arg("migrate"),
    );

    assert!(stdout.contains("migrations complete"), "no log line in:\n{stdout}");
    assert!(stdout.contains("applied 1 migration(s)"));
}
