//! End-to-end tests: pipe a script into the `einfo` binary with an offline
//! cache and check the frame dump on stdout and the stack dump on stderr.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use einfo::config::{SCREEN_COLS, SCREEN_ROWS};
use einfo::fetch::CacheFetcher;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Run {
    stdout: String,
    stderr: String,
    success: bool,
}

fn run_einfo(cache: &Path, extra: &[&str], script: &str) -> Run {
    let mut child = Command::new(env!("CARGO_BIN_EXE_einfo"))
        .arg("-f")
        .arg("-C")
        .arg(cache)
        .args(extra)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn einfo");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(script.as_bytes())
        .expect("write script");
    let out = child.wait_with_output().expect("wait einfo");
    Run {
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        success: out.status.success(),
    }
}

/// Text grid rows from the dump, padded cells included.
fn text_rows(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .skip_while(|l| *l != "TEXT:")
        .skip(1)
        .take(SCREEN_ROWS)
        .collect()
}

fn attr_rows(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .skip_while(|l| *l != "ATTR:")
        .skip(1)
        .take(SCREEN_ROWS)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn empty_script_dumps_blank_frame() {
    let dir = tempfile::tempdir().unwrap();
    let r = run_einfo(dir.path(), &[], "");
    assert!(r.success);
    assert_eq!(r.stdout.lines().next(), Some("Sleep time: 86400000000"));
    let rows = text_rows(&r.stdout);
    assert_eq!(rows.len(), SCREEN_ROWS);
    assert!(rows.iter().all(|row| *row == " ".repeat(SCREEN_COLS)));
    assert!(attr_rows(&r.stdout).iter().all(|row| *row == "0".repeat(SCREEN_COLS)));
    assert_eq!(r.stderr, "");
}

#[test]
fn print_and_leftover_stack() {
    let dir = tempfile::tempdir().unwrap();
    let script = "\"Hello\"\t1\t2\t0\tprint\n\"a\"\n\"b\"\n";
    let r = run_einfo(dir.path(), &[], script);
    assert!(r.success);
    assert!(text_rows(&r.stdout)[0].starts_with("  Hello "));
    assert!(attr_rows(&r.stdout)[0].starts_with("0011111000"));
    // top of stack first
    assert_eq!(r.stderr, "b\na\n");
}

#[test]
fn quiet_skips_stack_dump() {
    let dir = tempfile::tempdir().unwrap();
    let r = run_einfo(dir.path(), &["-q"], "1\t2\t3");
    assert!(r.success);
    assert_eq!(r.stderr, "");
}

#[test]
fn wakeup_changes_sleep_time() {
    let dir = tempfile::tempdir().unwrap();
    // whatever the wall clock says, the result is a whole number of minutes
    // shorter than a day
    let r = run_einfo(dir.path(), &["-q"], "6\t0\twakeup");
    let line = r.stdout.lines().next().unwrap();
    let us: u64 = line.trim_start_matches("Sleep time: ").parse().unwrap();
    assert_eq!(us % 60_000_000, 0);
    assert!(us < 86_400_000_000);
}

#[test]
fn weather_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let url = "http://weather.example/today.json";
    CacheFetcher::new(dir.path())
        .store(url, r#"{"city":"Tokyo","temp":[21.46,18.2],"rain":"30"}"#)
        .unwrap();

    let script = [
        "\"w\"\t{",
        format!("\"{url}\"\twget\t}}").as_str(),
        "w\t\"city\"\tlookup\t\"\"\tlookup\t0\t0\t0\tprint",
        "w\t\"temp\"\tlookup\t0\tlookup\t0\t5\t1\tformat\t1\t0\t1\tprint",
        "w\t\"rain\"\tlookup\t\"\"\tlookup\t50\tge\t?\t\"umbrella\"\t2\t0\t2\tprint\t;",
    ]
    .join("\n");
    let r = run_einfo(dir.path(), &["-q"], &script);
    assert!(r.success);
    let rows = text_rows(&r.stdout);
    assert!(rows[0].starts_with("Tokyo "));
    assert!(rows[1].starts_with(" 21.5 "));
    assert_eq!(rows[2], " ".repeat(SCREEN_COLS));
    assert!(attr_rows(&r.stdout)[1].starts_with("11111"));
}

#[test]
fn cache_miss_pushes_empty() {
    let dir = tempfile::tempdir().unwrap();
    let r = run_einfo(dir.path(), &[], "\"http://missing/\"\twget\tlength");
    assert!(r.success);
    assert_eq!(r.stderr, "0\n");
}

#[test]
fn bad_flag_fails_with_usage() {
    let dir = tempfile::tempdir().unwrap();
    let r = run_einfo(dir.path(), &["-z"], "");
    assert!(!r.success);
    assert!(r.stderr.contains("Usage: einfo"));
}

#[test]
fn config_file_sets_battery() {
    let dir = tempfile::tempdir().unwrap();
    let conf = dir.path().join("einfo.conf");
    std::fs::write(&conf, "# test\nbattery = 3.25\n").unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_einfo"))
        .arg(format!("-f{}", conf.display()))
        .arg("-C")
        .arg(dir.path())
        .env("RUST_LOG", "off")
        .stdin(Stdio::null())
        .output()
        .unwrap();
    // no script on stdin: empty run
    assert!(out.status.success());

    let script_path = dir.path().join("s.txt");
    std::fs::write(&script_path, "battery").unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_einfo"))
        .arg(format!("-f{}", conf.display()))
        .arg("-C")
        .arg(dir.path())
        .arg(&script_path)
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&out.stderr), "3.25\n");
}
