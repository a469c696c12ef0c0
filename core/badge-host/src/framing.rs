//! Native messaging framing.
//!
//! Each message is a 4-byte length in native byte order followed by that many
//! bytes of UTF-8 JSON. Stdout carries nothing else, so logging must never
//! write there.

use serde::Serialize;
use std::io::{self, Read, Write};

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error on message channel: {0}")]
    Io(#[from] io::Error),

    #[error("frame of {len} bytes exceeds limit of {limit} bytes")]
    TooLarge { len: usize, limit: usize },

    #[error("frame was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads one frame. Returns `Ok(None)` when the browser closes the channel.
///
/// An oversized frame is consumed and discarded so the stream stays in sync,
/// then reported as [`FrameError::TooLarge`].
pub fn read_frame<R: Read>(reader: &mut R, limit: usize) -> Result<Option<Vec<u8>>, FrameError> {
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }

    let len = u32::from_ne_bytes(len_bytes) as usize;
    if len > limit {
        io::copy(&mut reader.take(len as u64), &mut io::sink())?;
        return Err(FrameError::TooLarge { len, limit });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(Some(payload))
}

pub fn write_frame<W: Write, T: Serialize>(
    writer: &mut W,
    value: &T,
    limit: usize,
) -> Result<(), FrameError> {
    let payload = serde_json::to_vec(value)?;
    if payload.len() > limit {
        return Err(FrameError::TooLarge {
            len: payload.len(),
            limit,
        });
    }

    let len = u32::try_from(payload.len()).map_err(|_| FrameError::TooLarge {
        len: payload.len(),
        limit,
    })?;
    writer.write_all(&len.to_ne_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}
