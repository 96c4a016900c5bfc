use assert_cmd::Command;
use pacmon_core::{Message, MessageType, Word, encode};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pacmon"))
}

fn capture_bytes() -> Vec<u8> {
    let mut bytes = encode(&Message::empty(MessageType::Data, 1234));
    let words = vec![
        Word::Data {
            io_channel: 3,
            timestamp: 4321,
            packet: [0x03, 0, 0, 0, 0, 0, 0, 0x40],
        },
        Word::Data {
            io_channel: 4,
            timestamp: 4322,
            packet: [0x00, 0, 0, 0, 0, 0, 0, 0x00],
        },
        Word::Ping,
    ];
    bytes.extend(encode(&Message::new(MessageType::Data, 1266, words).unwrap()));
    bytes
}

fn sample_capture(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("run.bin");
    std::fs::write(&path, capture_bytes()).expect("write capture");
    path
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("dump").and(contains("stats")).and(contains("monitor")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.bin");

    cmd()
        .arg("stats")
        .arg(missing)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn dump_prints_hex_per_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    let assert = cmd().arg("dump").arg(input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "44 00 00 04 d2 00 00 00");
    assert!(lines[1].starts_with("44 00 00 04 f2 00 00 03 44 03"));
}

#[test]
fn dump_pretty_decodes_words() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    cmd()
        .arg("dump")
        .arg(input)
        .arg("--pretty")
        .assert()
        .success()
        .stdout(
            contains("DATA | 1234 | 0")
                .and(contains("DATA | 3 | 4321 | 0x0300000000000040 (READ)"))
                .and(contains("PING")),
        );
}

#[test]
fn stats_stdout_outputs_json_report() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    let assert = cmd()
        .arg("stats")
        .arg(input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["summary"]["messages_total"], 2);
    assert_eq!(value["stats"]["counts_per_type"]["read"], 1);
    assert_eq!(value["stats"]["config"]["3"]["ds_read"], 1);
    assert_eq!(value["stats"]["data"]["4"]["valid_parity"], 1);
}

#[test]
fn stats_reads_stdin() {
    let assert = cmd()
        .arg("stats")
        .arg("-")
        .arg("--stdout")
        .write_stdin(capture_bytes())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["input"]["path"], "-");
    assert_eq!(value["stats"]["words_total"], 3);
}

#[test]
fn stats_writes_report_file() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("stats")
        .arg(input)
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK:"));
    let json = std::fs::read_to_string(&report).expect("report written");
    let _: Value = serde_json::from_str(&json).expect("valid json");
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("stats")
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("stats")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("stats")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn report_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    cmd()
        .arg("stats")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("report path must differ from input"));
}

#[test]
fn truncated_stream_keeps_complete_messages() {
    let mut bytes = capture_bytes();
    bytes.truncate(bytes.len() - 4);

    let assert = cmd()
        .arg("stats")
        .arg("-")
        .arg("--stdout")
        .write_stdin(bytes)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["summary"]["messages_total"], 1);
    assert_eq!(value["summary"]["skipped_buffers"], 1);
    assert_eq!(value["stats"]["words_total"], 0);
}

#[test]
fn dump_pretty_marks_truncated_tail() {
    let mut bytes = capture_bytes();
    bytes.truncate(bytes.len() - 4);

    cmd()
        .arg("dump")
        .arg("-")
        .arg("--pretty")
        .write_stdin(bytes)
        .assert()
        .success()
        .stdout(contains("DATA | 1234 | 0").and(contains("undecodable message at offset 8")));
}

#[test]
fn monitor_prints_final_tables() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    cmd()
        .arg("monitor")
        .arg(input)
        .arg("--view")
        .arg("all")
        .assert()
        .success()
        .stdout(
            contains("final:")
                .and(contains("Packet counts:"))
                .and(contains("Data packets per I/O channel"))
                .and(contains("Config packets per I/O channel")),
        );
}

#[test]
fn monitor_reports_every_message_with_zero_interval() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    let assert = cmd()
        .arg("monitor")
        .arg(input)
        .arg("--interval-ms")
        .arg("0")
        .arg("--windowed")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    assert_eq!(stdout.matches("last updated:").count(), 2);
}
