//! A Certificate Transparency log crawler.
//!
//! Discovers the current set of public CT logs, incrementally downloads
//! newly-appended Merkle-tree leaves from each, extracts the certificate
//! hostnames (Subject CN and SANs) they carry, sanitizes and deduplicates
//! them, and persists the resulting hostname stream to a timestamped file.
//!
//! This crate does not verify Merkle inclusion proofs, does not
//! cryptographically verify signed tree heads, and does not reconstruct or
//! expose full certificates. It provides no query interface beyond an
//! append-only text file of hostnames.
//!
//! API calls are all async over `tokio`. The binary target
//! (`ctlog-crawler`) wires every module below into the CLI surface;
//! library consumers can drive [`scheduler::run`] directly.

pub mod config;
pub mod cursor;
pub mod directory;
pub mod endpoint;
pub mod error;
pub mod internal;
pub mod jsons;
pub mod leaf;
pub mod sanitize;
pub mod scheduler;
pub mod writer;

mod stream;

pub use error::{Error, Result};
