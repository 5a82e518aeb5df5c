#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_with_stdin(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_banglelink"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("banglelink should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin)
        .expect("stdin should accept input");
    child.wait_with_output().expect("banglelink should finish")
}

fn run(args: &[&str]) -> Output {
    run_with_stdin(args, b"")
}

#[test]
fn encode_find_device_as_json() {
    let output = run(&[
        "--format",
        "json",
        "encode",
        "--event",
        r#"{"event":"find_device","start":true}"#,
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be JSON");
    assert_eq!(value["event"], "find_device");
    assert_eq!(value["wire"], r#"\x10GB({"t":"find","n":true})\n"#);
    assert_eq!(value["size"], 27);
}

#[test]
fn encode_raw_writes_exact_bytes() {
    let output = run(&[
        "--format",
        "raw",
        "encode",
        "--event",
        r#"{"event":"notify_delete","id":5}"#,
    ]);

    assert!(output.status.success());
    assert_eq!(output.stdout, b"\x10GB({\"t\":\"notify-\",\"id\":5})\n");
}

#[test]
fn encode_reads_event_from_stdin_and_lists_frames() {
    let output = run_with_stdin(
        &["--format", "json", "encode", "--frames"],
        br#"{"event":"set_vibration","intensity":1}"#,
    );

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let frames = value["frames"].as_array().expect("frames should be listed");
    assert_eq!(frames.len(), 2);
}

#[test]
fn encode_invalid_event_returns_60() {
    let output = run(&["encode", "--event", r#"{"event":"teleport"}"#]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid event JSON"));
}

#[test]
fn encode_alarm_out_of_range_returns_60() {
    let output = run(&[
        "encode",
        "--event",
        r#"{"event":"set_alarms","alarms":[{"hour":24,"minute":0}]}"#,
    ]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_split_stream_in_order() {
    let output = run_with_stdin(
        &["--format", "json", "decode", "--chunk-size", "7"],
        b"{\"t\":\"findPhone\",\"n\":true}\n{\"t\":\"info\",\"msg\":\"hi\"}\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be JSON"))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "find_phone_request");
    assert_eq!(events[0]["start"], true);
    assert_eq!(events[1]["event"], "notice");
    assert_eq!(events[1]["severity"], "info");
    assert_eq!(events[1]["message"], "hi");
}

#[test]
fn decode_bad_line_returns_60_but_keeps_going() {
    let output = run_with_stdin(
        &["--format", "pretty", "decode"],
        b"{\"t\":\"status\"\n{\"t\":\"music\",\"n\":\"PLAY\"}\n",
    );

    assert_eq!(output.status.code(), Some(60));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "music play");
}

#[test]
fn decode_crlf_console() {
    let output = run_with_stdin(
        &["--format", "pretty", "decode", "--line-ending", "crlf"],
        b"{\"t\":\"warn\",\"msg\":\"careful\"}\r\n>\r\n",
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "warn: careful");
}

#[test]
fn time_line_raw() {
    let output = run(&[
        "--format",
        "raw",
        "time",
        "--unix-seconds",
        "1700000000",
        "--utc-offset-minutes",
        "330",
    ]);

    assert!(output.status.success());
    assert_eq!(
        output.stdout,
        b"\x10setTime(1700000000);E.setTimeZone(5.5);\n"
    );
}

#[test]
fn time_rejects_out_of_range_offset() {
    let output = run(&["time", "--utc-offset-minutes", "2000"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_name() {
    let output = run(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("banglelink "));
}

#[test]
fn version_extended_json() {
    let output = run(&["--format", "json", "version", "--extended"]);
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["name"], "banglelink");
    assert_eq!(value["max_frame_size"], 20);
}
