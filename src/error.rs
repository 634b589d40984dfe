//! Error kinds produced by this crate.
//!
//! One hand-rolled enum with a manual [`fmt::Display`] impl, no
//! `thiserror`/`anyhow` — the error surface is small and fixed enough that
//! a derive macro would add a dependency without saving much code.

use std::{fmt, io, path};

/// Errors that this crate can produce.
#[derive(Debug)]
pub enum Error {
    /// Something strange happened.
    Unknown(String),

    /// You provided something bad.
    InvalidArgument(String),

    /// File IO error.
    FileIO(path::PathBuf, io::Error),

    /// Network IO error, possibly after retries.
    NetIO(reqwest::Error),

    /// HTTP request timed out after exhausting retries. Retried by the
    /// caller; see `endpoint::MAX_RETRIES`.
    TransientNetwork(String),

    /// The server responded with something other than 200, or a malformed
    /// / truncated JSON envelope, or zero entries on a range believed
    /// non-empty.
    ProtocolError(String),

    /// The server responded with something other than 200.
    InvalidResponseStatus(reqwest::StatusCode),

    /// Server responded with something bad (e.g. malformed JSON).
    MalformedResponseBody(String),

    /// Base64 decoding, Merkle leaf parsing, or trailing-bytes failure.
    DecodeError(String),

    /// The persisted cursor file exists but could not be parsed.
    FatalConfig(String),

    /// Shutdown was requested while this operation was in flight. Not a
    /// failure; callers treat it as a clean early exit.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unknown(desc) => write!(f, "{}", desc),
            Error::InvalidArgument(desc) => write!(f, "invalid argument: {}", desc),
            Error::FileIO(path, e) => write!(f, "{}: {}", path.to_string_lossy(), e),
            Error::NetIO(e) => write!(f, "network IO error: {}", e),
            Error::TransientNetwork(desc) => write!(f, "transient network error: {}", desc),
            Error::ProtocolError(desc) => write!(f, "protocol error: {}", desc),
            Error::InvalidResponseStatus(status) => {
                write!(f, "server responded with {} {}", status.as_u16(), status.as_str())
            }
            Error::MalformedResponseBody(desc) => {
                write!(f, "unable to parse server response: {}", desc)
            }
            Error::DecodeError(desc) => write!(f, "unable to decode leaf: {}", desc),
            Error::FatalConfig(desc) => write!(f, "fatal configuration error: {}", desc),
            Error::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::TransientNetwork(e.to_string())
        } else {
            Error::NetIO(e)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedResponseBody(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
