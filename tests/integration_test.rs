use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A stand-in interpreter: answers `-m pip list`, the site-packages probe,
/// and records install/uninstall calls in `calls.log`.
#[cfg(unix)]
fn fake_python(dir: &Path, site: &Path, rows: &[&str]) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let mut table = String::from("Package    Version\n---------- -------\n");
    for row in rows {
        table.push_str(&format!("{:<10} 1.0.0\n", row));
    }
    fs::write(dir.join("list.txt"), table).unwrap();

    let script = format!(
        r#"#!/bin/sh
dir="{dir}"
if [ "$1" = "-c" ]; then
    echo "{site}"
    exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
    shift 2
    echo "$*" >> "$dir/calls.log"
    case "$1" in
        list) cat "$dir/list.txt" ;;
        install) [ "$2" = "does-not-exist" ] && exit 1 ;;
    esac
    exit 0
fi
exit 2
"#,
        dir = dir.display(),
        site = site.display()
    );

    let path = dir.join("python");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
fn setup(rows: &[&str]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let site = dir.path().join("site-packages");
    fs::create_dir(&site).unwrap();
    let python = fake_python(dir.path(), &site, rows);
    (dir, python, site)
}

fn pkgex() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("pkgex"));
    cmd.env_remove("PKGEX_PYTHON")
        .env_remove("PKGEX_SITE_PACKAGES");
    cmd
}

#[cfg(unix)]
#[test]
fn test_list_prints_names_in_order() {
    let (_dir, python, _site) = setup(&["zope", "attrs", "requests"]);

    pkgex()
        .arg("--python")
        .arg(&python)
        .arg("list")
        .assert()
        .success()
        .stdout("zope\nattrs\nrequests\n");
}

#[cfg(unix)]
#[test]
fn test_list_empty() {
    let (_dir, python, _site) = setup(&[]);

    pkgex()
        .env("PKGEX_PYTHON", &python)
        .arg("list")
        .assert()
        .success()
        .stdout("No packages installed.\n");
}

#[cfg(unix)]
#[test]
fn test_list_json() {
    let (_dir, python, _site) = setup(&["six"]);

    let output = pkgex()
        .arg("--python")
        .arg(&python)
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!([{ "name": "six" }]));
}

#[test]
fn test_list_missing_interpreter_fails() {
    pkgex()
        .args(["--python", "/nonexistent/pkgex/python", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to run"));
}

#[cfg(unix)]
#[test]
fn test_install_and_uninstall_invoke_pip() {
    let (dir, python, _site) = setup(&[]);

    pkgex()
        .arg("--python")
        .arg(&python)
        .args(["install", "requests"])
        .assert()
        .success();
    pkgex()
        .arg("--python")
        .arg(&python)
        .args(["uninstall", "requests"])
        .assert()
        .success();

    let calls = fs::read_to_string(dir.path().join("calls.log")).unwrap();
    assert_eq!(calls, "install requests\nuninstall -y requests\n");
}

#[cfg(unix)]
#[test]
fn test_install_failure_exit_code() {
    let (_dir, python, _site) = setup(&[]);

    pkgex()
        .arg("--python")
        .arg(&python)
        .args(["install", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to install does-not-exist."));
}

#[cfg(unix)]
#[test]
fn test_delete_empty_folder() {
    let (_dir, python, site) = setup(&[]);
    let pkg = site.join("leftover");
    fs::create_dir(&pkg).unwrap();

    pkgex()
        .arg("--python")
        .arg(&python)
        .args(["delete", "leftover"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    assert!(!pkg.exists());
}

#[cfg(unix)]
#[test]
fn test_delete_non_empty_folder_is_kept() {
    let (_dir, python, site) = setup(&[]);
    let pkg = site.join("requests");
    fs::create_dir(&pkg).unwrap();
    fs::write(pkg.join("__init__.py"), "").unwrap();

    pkgex()
        .arg("--python")
        .arg(&python)
        .args(["delete", "requests"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not empty"));

    assert!(pkg.join("__init__.py").exists());
}

#[test]
fn test_delete_missing_folder_is_noop() {
    let dir = tempdir().unwrap();

    pkgex()
        .arg("--site-packages")
        .arg(dir.path())
        .args(["delete", "ghost"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_open_missing_folder_is_noop() {
    let dir = tempdir().unwrap();

    pkgex()
        .arg("--site-packages")
        .arg(dir.path())
        .args(["open", "ghost"])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_path_uses_probed_site_packages() {
    let (_dir, python, site) = setup(&[]);
    fs::create_dir(site.join("typing_extensions")).unwrap();

    pkgex()
        .arg("--python")
        .arg(&python)
        .args(["path", "typing-extensions"])
        .assert()
        .success()
        .stdout(format!("{}\n", site.join("typing_extensions").display()));
}

#[cfg(unix)]
#[test]
fn test_shell_lists_and_quits() {
    let (_dir, python, _site) = setup(&["attrs", "six"]);

    pkgex()
        .arg("--python")
        .arg(&python)
        .write_stdin("help\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loading package list..."))
        .stdout(predicate::str::contains("install [name]"));
}

#[test]
fn test_version_flag() {
    pkgex()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pkgex "));
}
