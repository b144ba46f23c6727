use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "timesim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn fired_lines(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .filter(|line| line.starts_with("fired "))
        .collect()
}

#[test]
fn timeline_prints_fired_timers_in_order_and_writes_json() {
    let dir = unique_temp_dir("timeline-json");
    let timeline = write_file(
        &dir,
        "timeline.json",
        r#"
{
    "config": { "steady_start": 0, "wall_start": 0 },
    "timers": [
        { "label": "late", "after_us": 5000 },
        { "label": "early", "after_us": 1000 }
    ],
    "advance": [ { "tick_us": 3000, "total_us": 10000 } ]
}
        "#,
    );
    let out_json = dir.join("fired.json");

    let output = Command::new(env!("CARGO_BIN_EXE_timeline"))
        .args([
            "--timeline",
            timeline.to_str().unwrap(),
            "--json-out",
            out_json.to_str().unwrap(),
        ])
        .output()
        .expect("run timeline");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = fired_lines(&stdout);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("label=early"));
    assert!(lines[0].contains("steady_ns=3000000"));
    assert!(lines[1].contains("label=late"));
    assert!(lines[1].contains("steady_ns=6000000"));
    assert!(stdout.contains("done steady_elapsed_ns=10000000"));

    let json: Value =
        serde_json::from_str(&fs::read_to_string(&out_json).expect("read json")).expect("json");
    let arr = json.as_array().expect("array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["label"], "early");
    assert_eq!(arr[1]["wall_ns"], 6_000_000);
}

#[test]
fn timeline_exits_nonzero_when_a_timer_fails() {
    let dir = unique_temp_dir("timeline-fail");
    let timeline = write_file(
        &dir,
        "timeline.json",
        r#"
{
    "timers": [ { "label": "boom", "after_us": 2000, "fail": true } ],
    "advance": [ { "tick_us": 1000, "ticks": 5 } ]
}
        "#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_timeline"))
        .args(["--timeline", timeline.to_str().unwrap()])
        .output()
        .expect("run timeline");
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(fired_lines(&stdout).len(), 1);
    assert!(stdout.contains("failed steady_elapsed_ns=2000000"));
}

#[test]
fn timeline_rejects_invalid_input() {
    let dir = unique_temp_dir("timeline-invalid");
    let timeline = write_file(
        &dir,
        "timeline.json",
        r#"{ "advance": [ { "tick_us": 0, "total_us": 10 } ] }"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_timeline"))
        .args(["--timeline", timeline.to_str().unwrap()])
        .output()
        .expect("run timeline");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("tick_us must be positive"));
}
