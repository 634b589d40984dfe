//! C7 — Deduplicating writer.
//!
//! Owns one output file and a bounded LRU of recently-written hostnames.
//! Reads names from a channel until it closes, dropping anything already
//! seen in this file.

use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;

use log::info;
use lru::LruCache;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::sanitize::Hostname;

pub const LRU_CAPACITY: usize = 8192;

/// Drain `rx` until it closes, writing each not-recently-seen name as a
/// line to `file`. The LRU is discarded when this returns.
pub async fn run<W: Write>(mut rx: mpsc::Receiver<Hostname>, file: W) -> Result<usize> {
    let mut writer = BufWriter::new(file);
    let mut seen: LruCache<Hostname, ()> =
        LruCache::new(NonZeroUsize::new(LRU_CAPACITY).expect("LRU_CAPACITY must be nonzero"));
    let mut written = 0usize;

    while let Some(name) = rx.recv().await {
        if seen.contains(&name) {
            continue;
        }
        writeln!(writer, "{}", name).map_err(|e| Error::Unknown(format!("write failed: {}", e)))?;
        seen.put(name, ());
        written += 1;
    }

    writer.flush().map_err(|e| Error::Unknown(format!("flush failed: {}", e)))?;
    info!("writer drained, wrote {} unique hostnames", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dedups_within_one_stream() {
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            let mut out = Vec::new();
            run(rx, &mut out).await.unwrap();
            out
        });

        for name in ["x", "y", "x", "z", "x"] {
            tx.send(name.to_string()).await.unwrap();
        }
        drop(tx);

        let buf = handle.await.unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x\ny\nz\n");
    }
}
