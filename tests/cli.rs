//! Command line behaviour of the packager binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const PACK_TOML: &str = r#"
package_id = "test"
source_directory = "mymodule"

[manifest]
name = "Test Module"

[installdefs]
id = "test"
"#;

fn module_tree(root: &Path) {
    let src = root.join("mymodule/custom/application/Ext");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(root.join("mymodule/foo.php"), "<?php\n").unwrap();
    std::fs::write(src.join("bar.php"), "<?php\n").unwrap();
    std::fs::write(root.join("pack.toml"), PACK_TOML).unwrap();
}

fn packager() -> Command {
    let mut cmd = Command::cargo_bin("sugar_mlp_packager").unwrap();
    cmd.env_remove("SUGAR_MLP_PACKAGE_ID");
    cmd
}

#[test]
fn builds_release_from_default_definition() {
    let dir = tempfile::tempdir().unwrap();
    module_tree(dir.path());

    packager()
        .arg("-C")
        .arg(dir.path())
        .arg("1.0")
        .assert()
        .success()
        .stdout(predicate::str::contains(" [*] mymodule/foo.php"))
        .stdout(predicate::str::contains("Done creating sugarcrm-test-1.0.zip"))
        .stdout(predicate::str::contains("Source directory:").not())
        .stdout(predicate::str::contains("SHA-256:"))
        .stdout(predicate::str::contains("[*] mymodule/custom/application/Ext/bar.php"))
        .stderr(predicate::str::contains("excluded from the zip"));

    assert!(dir.path().join("releases/sugarcrm-test-1.0.zip").is_file());
}

#[test]
fn verbose_prints_resolved_settings() {
    let dir = tempfile::tempdir().unwrap();
    module_tree(dir.path());

    packager()
        .arg("-C")
        .arg(dir.path())
        .args(["--verbose", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Source directory:  mymodule"))
        .stdout(predicate::str::contains("Compression:       Deflated"))
        .stdout(predicate::str::contains(" [*] mymodule/foo.php"));
}

#[test]
fn version_flag_prints_crate_version() {
    packager()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn second_build_of_same_version_fails() {
    let dir = tempfile::tempdir().unwrap();
    module_tree(dir.path());

    packager().arg("-C").arg(dir.path()).arg("1.0").assert().success();
    packager()
        .arg("-C")
        .arg(dir.path())
        .arg("1.0")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn missing_version_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    module_tree(dir.path());

    packager()
        .arg("-C")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no version given"));

    assert!(!dir.path().join("releases").exists());
}

#[test]
fn command_line_overrides_definition() {
    let dir = tempfile::tempdir().unwrap();
    module_tree(dir.path());

    packager()
        .arg("-C")
        .arg(dir.path())
        .args(["--package-id", "other", "--store", "-q", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(dir.path().join("releases/sugarcrm-other-1.0.zip").is_file());
}

#[test]
fn missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();

    packager()
        .arg("-C")
        .arg(dir.path())
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("1.0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn verbose_and_quiet_are_rejected() {
    packager()
        .args(["-v", "-q", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--verbose and --quiet"));
}
