//! Offline replay of recorded signals.
//!
//! Feeds a JSON-lines file of [`HostSignal`]s through a fresh engine and
//! writes every resulting command as one JSON line. Useful for reproducing a
//! badge bug from a captured event trace.

use status_badge_core::BadgeEngine;
use status_badge_protocol::HostSignal;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Failed to read trace: {0}")]
    Read(#[source] std::io::Error),

    #[error("Invalid signal on line {line}: {source}")]
    InvalidSignal {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write commands: {0}")]
    Write(#[source] std::io::Error),
}

pub fn replay_file<W: Write>(
    engine: &mut BadgeEngine,
    path: &Path,
    output: &mut W,
) -> Result<usize, ReplayError> {
    let content = fs_err::read_to_string(path).map_err(ReplayError::Read)?;
    replay_lines(engine, &content, output)
}

/// Returns the number of commands written. Blank lines and `#` comments are
/// skipped.
pub fn replay_lines<W: Write>(
    engine: &mut BadgeEngine,
    content: &str,
    output: &mut W,
) -> Result<usize, ReplayError> {
    let mut written = 0;
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let signal: HostSignal =
            serde_json::from_str(trimmed).map_err(|source| ReplayError::InvalidSignal {
                line: index + 1,
                source,
            })?;

        for command in engine.handle(signal) {
            serde_json::to_writer(&mut *output, &command)
                .map_err(|err| ReplayError::Write(err.into()))?;
            output.write_all(b"\n").map_err(ReplayError::Write)?;
            written += 1;
        }
    }
    output.flush().map_err(ReplayError::Write)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const TRACE: &str = r#"
# tab 7 hits a 404, then the user switches to a fresh tab
{"signal":"responseReceived","tabId":7,"url":"https://example.com/x","statusCode":404,"statusLine":"HTTP/1.1 404 Not Found","type":"main_frame"}
{"signal":"responseReceived","tabId":7,"url":"https://example.com/x.png","statusCode":200,"statusLine":"HTTP/1.1 200 OK","type":"image"}
{"signal":"tabActivated","tabId":9}
"#;

    #[test]
    fn replays_trace_into_commands() {
        let mut engine = BadgeEngine::default();
        let mut output = Vec::new();
        let written = replay_lines(&mut engine, TRACE, &mut output).expect("replay");

        assert_eq!(written, 4);
        let lines: Vec<Value> = String::from_utf8(output)
            .expect("utf8")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json"))
            .collect();
        assert_eq!(lines[0]["text"], "404");
        assert_eq!(lines[3]["tabId"], 9);
        assert_eq!(lines[3]["text"], "");
    }

    #[test]
    fn reports_line_of_bad_signal() {
        let mut engine = BadgeEngine::default();
        let mut output = Vec::new();
        let trace = "{\"signal\":\"installed\"}\n\n{\"signal\":\"warp\"}\n";
        match replay_lines(&mut engine, trace, &mut output) {
            Err(ReplayError::InvalidSignal { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected invalid signal, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let mut engine = BadgeEngine::default();
        let mut output = Vec::new();
        let result = replay_file(&mut engine, &temp_dir.path().join("nope.jsonl"), &mut output);
        assert!(matches!(result, Err(ReplayError::Read(_))));
    }
}
