//! End-to-end runs of the headless session binary.

use reticulum_core::GazeEventKind;
use reticulum_testkit::read_jsonl;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "reticulum-{name}-{}.{ext}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn repo_file(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn reticulum() -> Command {
    Command::new(env!("CARGO_BIN_EXE_reticulum"))
}

#[test]
fn demo_session_writes_event_log() {
    let events = temp_path("demo-events", "jsonl");
    let output = reticulum()
        .arg("--script")
        .arg(repo_file("demos/gaze_session.json"))
        .arg("--config")
        .arg(repo_file("config/session.toml"))
        .arg("--events")
        .arg(&events)
        .output()
        .expect("binary runs");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("door"));
    assert!(stdout.contains("lamp"));
    assert!(!stdout.contains("stopped early"));

    let records = read_jsonl(&events).unwrap();
    assert!(!records.is_empty());
    for pair in records.windows(2) {
        assert!(pair[0].time <= pair[1].time);
    }

    let kinds: Vec<_> = records.iter().map(|r| r.kind).collect();
    assert_eq!(kinds[0], GazeEventKind::Over);
    assert_eq!(kinds[1], GazeEventKind::Long);
    assert_eq!(
        kinds.iter().filter(|k| **k == GazeEventKind::Click).count(),
        1
    );
    let overs = kinds.iter().filter(|k| **k == GazeEventKind::Over).count();
    let outs = kinds.iter().filter(|k| **k == GazeEventKind::Out).count();
    assert_eq!(overs, outs);
}

#[test]
fn max_frames_stops_early() {
    let output = reticulum()
        .arg("--script")
        .arg(repo_file("demos/gaze_session.json"))
        .arg("--max-frames")
        .arg("3")
        .output()
        .expect("binary runs");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("3 frames"));
    assert!(stdout.contains("stopped early"));
}

#[test]
fn write_config_emits_loadable_toml() {
    let path = temp_path("written-config", "toml");
    let status = reticulum()
        .arg("--fps")
        .arg("30")
        .arg("--write-config")
        .arg(&path)
        .status()
        .expect("binary runs");
    assert!(status.success());

    let contents = std::fs::read_to_string(&path).unwrap();
    let table: toml::Table = toml::from_str(&contents).unwrap();
    assert_eq!(table["fps"].as_integer(), Some(30));
    assert!(table.contains_key("engine"));
}

#[test]
fn missing_script_is_an_error() {
    let output = reticulum().output().expect("binary runs");
    assert!(!output.status.success());
}

#[test]
fn invalid_script_is_rejected() {
    let script = temp_path("bad-script", "json");
    std::fs::write(&script, r#"{ "steps": [ { "duration": 1.0, "hide": ["ghost"] } ] }"#).unwrap();
    let output = reticulum()
        .arg("--script")
        .arg(&script)
        .output()
        .expect("binary runs");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));
}
