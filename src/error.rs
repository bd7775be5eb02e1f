// Error types for the frame transfer client.
//
// The library surfaces every failure as a `FrameError` variant so callers
// (and tests) can tell the failure classes apart: local resource problems,
// envelope construction, transport, and protocol-level response problems.
// Nothing here is retried; the CLI layer wraps these in `anyhow` for display.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, FrameError>;

#[derive(Debug, Error)]
pub enum FrameError {
    // --- local resource errors: all abort before any network call ---
    /// The input file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input file is empty; an empty frame is never a valid upload.
    #[error("{} is empty", path.display())]
    EmptyFile { path: PathBuf },

    /// The payload does not fit the staging buffer. This is a hard failure,
    /// never a truncation.
    #[error("payload is {size} bytes but the image buffer holds at most {capacity}")]
    FrameTooLarge { size: u64, capacity: usize },

    /// The download destination could not be opened for writing.
    #[error("cannot write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Camera identifiers are limited to a short fixed width on the wire;
    /// anything longer fails the operation instead of being cut off.
    #[error("camera id '{id}' is longer than {max} characters")]
    CameraTooLong { id: String, max: usize },

    // --- encoding / envelope errors ---
    /// Building the outbound JSON body failed. Kept distinct from response
    /// parse failures so tests can assert on the correct side.
    #[error("failed to build upload body: {0}")]
    EnvelopeBuild(#[source] serde_json::Error),

    /// An epoch-millisecond value has no local calendar representation.
    #[error("timestamp {0} has no local calendar representation")]
    InvalidTimestamp(i64),

    /// An explicit date/time tuple does not name a (unique) local instant.
    #[error("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} is not a valid local time")]
    InvalidDateTime {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },

    // --- transport errors ---
    /// Connection failure, timeout, or a mid-stream read/write error.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered, but not with status 200. The raw status and
    /// response body are retained for diagnostics.
    #[error("server returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    // --- protocol errors (query response shape) ---
    /// The response body is not the JSON shape the API contract promises.
    #[error("response is not valid frame-query JSON: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The response parsed but carries no `frames` field at all.
    #[error("response has no 'frames' field")]
    MissingFrames,

    /// The `frames` array is present but empty: nothing matched the filter.
    #[error("no frames matched the query")]
    NoMatch,

    /// The first frame record has no usable storage location.
    #[error("frame record has no storage location")]
    MissingLocation,
}
