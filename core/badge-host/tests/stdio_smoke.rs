use serde_json::{json, Value};
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn host_command(home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_status-badge-host"));
    command
        .env("HOME", home)
        .env_remove("STATUS_BADGE_CONFIG")
        .env_remove("RUST_LOG");
    command
}

fn frame(value: &Value) -> Vec<u8> {
    let payload = serde_json::to_vec(value).expect("Failed to serialize frame");
    let mut bytes = (payload.len() as u32).to_ne_bytes().to_vec();
    bytes.extend(payload);
    bytes
}

fn decode_frames(mut bytes: &[u8]) -> Vec<Value> {
    let mut values = Vec::new();
    while !bytes.is_empty() {
        let mut len_bytes = [0u8; 4];
        bytes
            .read_exact(&mut len_bytes)
            .expect("Failed to read frame length");
        let len = u32::from_ne_bytes(len_bytes) as usize;
        let (payload, rest) = bytes.split_at(len);
        values.push(serde_json::from_slice(payload).expect("Failed to parse frame JSON"));
        bytes = rest;
    }
    values
}

fn run_host(home: &Path, args: &[&str], signals: &[Value]) -> Output {
    let mut child = host_command(home)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn status-badge-host");

    {
        let mut stdin = child.stdin.take().expect("stdin");
        for signal in signals {
            stdin.write_all(&frame(signal)).expect("Failed to write frame");
        }
    }

    child.wait_with_output().expect("Failed to wait for host")
}

fn not_found_response() -> Value {
    json!({
        "signal": "responseReceived",
        "tabId": 7,
        "url": "https://example.com/missing",
        "statusCode": 404,
        "statusLine": "HTTP/1.1 404 Not Found",
        "type": "main_frame",
        "responseHeaders": [
            { "name": "Content-Type", "value": "text/html" },
            { "name": "X-Trace", "value": "first" },
            { "name": "X-Trace", "value": "second" }
        ]
    })
}

#[test]
fn serve_tracks_tab_and_answers_query() {
    let home = TempDir::new().expect("temp home");
    let output = run_host(
        home.path(),
        &["chrome-extension://abcdefghijklmnop/"],
        &[
            json!({ "signal": "installed" }),
            not_found_response(),
            json!({ "signal": "message", "requestId": 3, "message": { "action": "getHeaderData" } }),
            json!({ "signal": "activeTabResolved", "queryId": 0, "tabId": 7 }),
        ],
    );

    assert!(output.status.success());
    let commands = decode_frames(&output.stdout);
    assert_eq!(commands.len(), 5);
    assert_eq!(
        commands[0],
        json!({ "command": "setBadgeText", "tabId": 7, "text": "404" })
    );
    assert_eq!(
        commands[1],
        json!({ "command": "setBadgeBackgroundColor", "tabId": 7, "color": "#c30b0b" })
    );
    assert_eq!(
        commands[2],
        json!({ "command": "setBadgeTextColor", "tabId": 7, "color": "#FFFFFF" })
    );
    assert_eq!(commands[3], json!({ "command": "queryActiveTab", "queryId": 0 }));

    let reply = &commands[4];
    assert_eq!(reply["requestId"], 3);
    assert_eq!(reply["reply"]["success"], true);
    assert_eq!(reply["reply"]["data"]["statusCode"], 404);
    assert_eq!(reply["reply"]["data"]["statusText"], "Not Found");
    assert_eq!(reply["reply"]["data"]["responseHeaders"]["X-Trace"], "second");
}

#[test]
fn serve_reports_missing_active_tab() {
    let home = TempDir::new().expect("temp home");
    let output = run_host(
        home.path(),
        &["serve"],
        &[
            json!({ "signal": "message", "requestId": 1, "message": { "action": "getHeaderData" } }),
            json!({ "signal": "activeTabResolved", "queryId": 0 }),
        ],
    );

    assert!(output.status.success());
    let commands = decode_frames(&output.stdout);
    assert_eq!(
        commands.last(),
        Some(&json!({
            "command": "reply",
            "requestId": 1,
            "reply": { "success": false, "error": "No active tab" }
        }))
    );
}

#[test]
fn serve_uses_configured_palette() {
    let home = TempDir::new().expect("temp home");
    let config_dir = home.path().join(".status-badge");
    fs_err::create_dir_all(&config_dir).expect("config dir");
    fs_err::write(
        config_dir.join("config.toml"),
        "[badge]\nerror_color = \"#123456\"\n",
    )
    .expect("write config");

    let output = run_host(home.path(), &[], &[not_found_response()]);
    assert!(output.status.success());
    let commands = decode_frames(&output.stdout);
    assert_eq!(commands[1]["color"], "#123456");
}

#[test]
fn replay_prints_json_lines() {
    let home = TempDir::new().expect("temp home");
    let trace = home.path().join("trace.jsonl");
    fs_err::write(
        &trace,
        format!(
            "{}\n{}\n",
            not_found_response(),
            json!({ "signal": "tabRemoved", "tabId": 7 })
        ),
    )
    .expect("write trace");

    let output = host_command(home.path())
        .arg("replay")
        .arg(&trace)
        .output()
        .expect("Failed to run replay");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["command"], "setBadgeText");
}

#[test]
fn check_config_rejects_invalid_color() {
    let home = TempDir::new().expect("temp home");
    let path = home.path().join("bad.toml");
    fs_err::write(&path, "[badge]\nsuccess_color = \"green\"\n").expect("write config");

    let output = host_command(home.path())
        .arg("check-config")
        .arg("--config")
        .arg(&path)
        .output()
        .expect("Failed to run check-config");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("success_color"));
}
