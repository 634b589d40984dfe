//! C5 — Cursor store.
//!
//! A single-owner serial task holding the authoritative `url -> last-seen
//! tree size` map. Callers never touch the map directly; they send `get`
//! and `update` messages over channels. On every update the whole table is
//! serialized to `config.json`, which keeps the on-disk file the single
//! source of truth after every change without any lock contention.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, Result};
use crate::jsons::{PersistedCursor, PersistedCursorTable};

/// Durable progress for one endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointCursor {
    pub tree_size: u64,
}

enum Message {
    Get { url: String, reply: oneshot::Sender<EndpointCursor> },
    Update { url: String, cursor: EndpointCursor, reply: oneshot::Sender<Result<()>> },
}

/// A cheaply-clonable handle to the cursor store task.
#[derive(Clone)]
pub struct CursorStoreHandle {
    tx: mpsc::Sender<Message>,
}

impl CursorStoreHandle {
    /// Fetch the stored cursor for `url`, or the zero cursor if none is
    /// known.
    pub async fn get(&self, url: &str) -> EndpointCursor {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .tx
            .send(Message::Get { url: url.to_string(), reply: reply_tx })
            .await
            .is_err()
        {
            return EndpointCursor::default();
        }
        reply_rx.await.unwrap_or_default()
    }

    /// Persist a new cursor for `url`. Resolves only after the write to
    /// `config.json` completes, so cursor updates for one URL are
    /// serialized by construction.
    pub async fn update(&self, url: &str, tree_size: u64) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Message::Update {
                url: url.to_string(),
                cursor: EndpointCursor { tree_size },
                reply: reply_tx,
            })
            .await
            .map_err(|_| Error::Unknown("cursor store task is gone".to_string()))?;
        reply_rx
            .await
            .map_err(|_| Error::Unknown("cursor store task dropped the reply".to_string()))?
    }
}

/// Load the persisted table (if any) and spawn the owning task. On a
/// missing file the table starts empty; on a present-but-unparseable file
/// this returns `FatalConfig`, which aborts process start — a corrupt
/// cursor file is not something we can safely guess our way past.
pub fn spawn(path: PathBuf) -> Result<CursorStoreHandle> {
    let table = load(&path)?;
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(run(path, table, rx));
    Ok(CursorStoreHandle { tx })
}

fn load(path: &Path) -> Result<HashMap<String, EndpointCursor>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(Error::FileIO(path.to_path_buf(), e)),
    };

    let parsed: PersistedCursorTable = serde_json::from_slice(&bytes)
        .map_err(|e| Error::FatalConfig(format!("{} is corrupt: {}", path.display(), e)))?;

    Ok(parsed
        .endpoints
        .into_iter()
        .map(|(url, persisted)| (url, EndpointCursor { tree_size: persisted.tree_size }))
        .collect())
}

fn persist(path: &Path, table: &HashMap<String, EndpointCursor>) -> Result<()> {
    let persisted = PersistedCursorTable {
        endpoints: table
            .iter()
            .map(|(url, cursor)| {
                (
                    url.clone(),
                    PersistedCursor { url: url.clone(), tree_size: cursor.tree_size },
                )
            })
            .collect(),
    };
    let bytes = serde_json::to_vec_pretty(&persisted)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path).map_err(|e| Error::FileIO(path.to_path_buf(), e))?;
    file.write_all(&bytes).map_err(|e| Error::FileIO(path.to_path_buf(), e))?;
    Ok(())
}

async fn run(path: PathBuf, mut table: HashMap<String, EndpointCursor>, mut rx: mpsc::Receiver<Message>) {
    info!("cursor store ready with {} known endpoints", table.len());
    while let Some(msg) = rx.recv().await {
        match msg {
            Message::Get { url, reply } => {
                let cursor = table.get(&url).copied().unwrap_or_default();
                let _ = reply.send(cursor);
            }
            Message::Update { url, cursor, reply } => {
                table.insert(url.clone(), cursor);
                let result = persist(&path, &table);
                if let Err(e) = &result {
                    debug!("failed to persist cursor table: {}", e);
                }
                let _ = reply.send(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_TEST_DIR: AtomicU64 = AtomicU64::new(0);

    fn fresh_test_dir(name: &str) -> PathBuf {
        let n = NEXT_TEST_DIR.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("ctlog-crawler-test-{}-{}-{}", std::process::id(), name, n))
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = fresh_test_dir("round-trip");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let handle = spawn(path.clone()).unwrap();
        assert_eq!(handle.get("https://log.test/").await.tree_size, 0);

        handle.update("https://log.test/", 3).await.unwrap();
        assert_eq!(handle.get("https://log.test/").await.tree_size, 3);

        // A freshly spawned store re-reads what was persisted.
        let handle2 = spawn(path.clone()).unwrap();
        assert_eq!(handle2.get("https://log.test/").await.tree_size, 3);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn rejects_corrupt_file() {
        let dir = fresh_test_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, b"not json").unwrap();

        let err = spawn(path).unwrap_err();
        assert!(matches!(err, Error::FatalConfig(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
