use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn write_executable(path: &PathBuf, content: &str) -> std::io::Result<()> {
    fs::write(path, content)?;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

const FAKE_GIT: &str = r#"#!/usr/bin/env bash
set -euo pipefail
printf '%s\n' "$*" >> "$FAKE_GIT_LOG"

# First argument after the --no-pager -C <dir> prefix is the subcommand.
cmd=""
skip=0
for arg in "$@"; do
  if [[ $skip -eq 1 ]]; then skip=0; continue; fi
  case "$arg" in
    --no-pager) ;;
    -C) skip=1;;
    *) cmd="$arg"; break;;
  esac
done

case "$cmd" in
  config)
    exit 0
    ;;
  log)
    cat <<'PATCH'
commit 8f3c1a2b4d5e6f708192a3b4c5d6e7f801234567
Author: Dev <dev@example.com>
Date:   Mon Jan 5 10:00:00 2026 +0000

    add a.txt

diff --git a/a.txt b/a.txt
new file mode 100644
index 0000000..ce01362
--- /dev/null
+++ b/a.txt
@@ -0,0 +1 @@
+hello
PATCH
    exit 0
    ;;
  diff)
    cat <<'PATCH'
diff --git a/w.txt b/w.txt
index 1111111..2222222 100644
--- a/w.txt
+++ b/w.txt
@@ -1 +1 @@
-old
+new
PATCH
    exit 0
    ;;
esac
exit 0
"#;

struct Fixture {
    _tmp: TempDir,
    repo: PathBuf,
    fakebin: PathBuf,
    invocations: PathBuf,
}

fn fixture() -> Fixture {
    let tmp = TempDir::new().expect("tempdir");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&repo).expect("repo dir");
    let fakebin = tmp.path().join("fakebin");
    fs::create_dir_all(&fakebin).expect("fakebin dir");
    write_executable(&fakebin.join("git"), FAKE_GIT).expect("fake git");
    let invocations = tmp.path().join("invocations.log");
    Fixture {
        _tmp: tmp,
        repo,
        fakebin,
        invocations,
    }
}

fn patchscan(fx: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("patchscan").expect("binary");
    let path = format!(
        "{}:{}",
        fx.fakebin.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    cmd.env("PATH", path);
    cmd.env("FAKE_GIT_LOG", &fx.invocations);
    cmd
}

fn invocation_lines(fx: &Fixture) -> Vec<String> {
    fs::read_to_string(&fx.invocations)
        .expect("invocation log")
        .lines()
        .map(str::to_string)
        .collect()
}

fn abs_repo(fx: &Fixture) -> String {
    Path::new(&fx.repo).to_string_lossy().into_owned()
}

#[test]
fn log_bootstraps_then_extracts_full_history() {
    let fx = fixture();
    patchscan(&fx)
        .arg(&fx.repo)
        .arg("--output")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"new_path\": \"a.txt\""))
        .stdout(predicate::str::contains("\"kind\": \"added\""))
        .stdout(predicate::str::contains(
            "8f3c1a2b4d5e6f708192a3b4c5d6e7f801234567",
        ));

    let lines = invocation_lines(&fx);
    assert_eq!(lines.len(), 3);
    let repo = abs_repo(&fx);
    let prefix = format!("--no-pager -C {repo} ");
    for line in &lines {
        assert!(line.starts_with(&prefix), "missing prefix: {line}");
    }
    assert_eq!(
        lines[0],
        format!("{prefix}config --add --global safe.directory {repo}")
    );
    assert_eq!(lines[1], format!("{prefix}config diff.renameLimit 65535"));
    assert_eq!(
        lines[2],
        format!("{prefix}log --patch --unified=0 --full-history --all")
    );
}

#[test]
fn log_opts_tokens_replace_the_default_scope() {
    let fx = fixture();
    patchscan(&fx)
        .arg(&fx.repo)
        .arg("--log-opts")
        .arg("--since=2020-01-01 -- src/")
        .assert()
        .success();

    let lines = invocation_lines(&fx);
    let last = lines.last().expect("log invocation");
    assert!(last.ends_with("log --patch --unified=0 --since=2020-01-01 -- src/"));
    assert!(!last.contains("--full-history"));
}

#[test]
fn blank_log_opts_behave_like_no_override() {
    let fx = fixture();
    patchscan(&fx)
        .arg(&fx.repo)
        .arg("--log-opts")
        .arg("   ")
        .assert()
        .success();

    let lines = invocation_lines(&fx);
    let last = lines.last().expect("log invocation");
    assert!(last.ends_with("log --patch --unified=0 --full-history --all"));
}

#[test]
fn diff_compares_working_tree_against_index() {
    let fx = fixture();
    patchscan(&fx)
        .arg(&fx.repo)
        .arg("--diff")
        .arg("--output")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"new_path\": \"w.txt\""))
        .stdout(predicate::str::contains("\"commit\": null"));

    let lines = invocation_lines(&fx);
    let last = lines.last().expect("diff invocation");
    assert!(last.ends_with("diff --unified=0 ."));
    assert!(!last.contains("--staged"));
}

#[test]
fn staged_diff_restricts_to_the_index() {
    let fx = fixture();
    patchscan(&fx)
        .arg(&fx.repo)
        .arg("--diff")
        .arg("--staged")
        .assert()
        .success();

    let lines = invocation_lines(&fx);
    let last = lines.last().expect("diff invocation");
    assert!(last.ends_with("diff --unified=0 --staged ."));
}

#[test]
fn tab_output_renders_a_table() {
    let fx = fixture();
    patchscan(&fx)
        .arg(&fx.repo)
        .assert()
        .success()
        .stdout(predicate::str::contains("File Changes"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("added"))
        .stdout(predicate::str::contains("1 file change"));
}

#[test]
fn relative_source_path_is_made_absolute_for_git() {
    let fx = fixture();
    patchscan(&fx)
        .current_dir(fx.repo.parent().expect("parent"))
        .arg("repo")
        .assert()
        .success();

    // The child resolves "repo" against its physical cwd, so compare
    // against the canonical path rather than the tempdir's literal one.
    let lines = invocation_lines(&fx);
    let repo = fs::canonicalize(&fx.repo).expect("canonicalize");
    assert!(
        lines[0].contains(&format!("safe.directory {}", repo.display())),
        "expected absolute path in: {}",
        lines[0]
    );
}
