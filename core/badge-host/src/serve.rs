//! The native messaging loop.
//!
//! One inbound frame is one [`HostSignal`]. Its commands are written back in
//! the order the engine produced them before the next frame is read, which
//! keeps handlers strictly serialized.

use serde_json::Value;
use status_badge_core::BadgeEngine;
use status_badge_protocol::{parse_signal, HostCommand, MAX_MESSAGE_BYTES};
use std::io::{Read, Write};
use tracing::{debug, warn};

use crate::framing::{read_frame, write_frame, FrameError};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServeStats {
    pub signals: usize,
    pub commands: usize,
    pub rejected: usize,
}

/// Runs until the browser closes stdin. Only channel I/O errors end the loop
/// early; bad frames are logged and skipped.
pub fn run<R: Read, W: Write>(
    engine: &mut BadgeEngine,
    mut input: R,
    mut output: W,
) -> Result<ServeStats, FrameError> {
    let mut stats = ServeStats::default();

    loop {
        let payload = match read_frame(&mut input, MAX_MESSAGE_BYTES) {
            Ok(Some(payload)) => payload,
            Ok(None) => break,
            Err(FrameError::TooLarge { len, limit }) => {
                warn!(len, limit, "Dropping oversized inbound frame");
                stats.rejected += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        let signal = match serde_json::from_slice::<Value>(&payload)
            .and_then(parse_signal)
        {
            Ok(signal) => signal,
            Err(err) => {
                warn!(error = %err, "Ignoring undecodable signal");
                stats.rejected += 1;
                continue;
            }
        };

        stats.signals += 1;
        for command in engine.handle(signal) {
            send(&mut output, &command)?;
            stats.commands += 1;
        }
    }

    debug!(
        signals = stats.signals,
        commands = stats.commands,
        rejected = stats.rejected,
        "Message channel closed"
    );
    Ok(stats)
}

fn send<W: Write>(output: &mut W, command: &HostCommand) -> Result<(), FrameError> {
    match write_frame(output, command, MAX_MESSAGE_BYTES) {
        Err(FrameError::TooLarge { len, limit }) => {
            warn!(len, limit, command = ?command.badge_call(), "Dropping oversized outbound frame");
            Ok(())
        }
        other => other,
    }
}
