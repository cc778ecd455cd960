use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StateError};
use crate::submission::{format_submission_number, MAX_SUBMISSION_COUNTER};

/// Transaction ID used when no state has been persisted yet.
pub const INITIAL_TRANSACTION_ID: u64 = 1;

/// Persisted counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Counters {
    /// Transaction ID the next request will carry.
    pub transaction_id: u64,
    /// Last submission counter value handed out.
    #[serde(default, alias = "submission-id")]
    pub submission_counter: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            transaction_id: INITIAL_TRANSACTION_ID,
            submission_counter: 0,
        }
    }
}

/// Session-owned protocol counters backed by a JSON file.
///
/// The transaction ID is read with [`current_transaction_id`] while a request
/// is built and only advanced by [`commit`]. Submission numbers handed out by
/// [`allocate_submission_id`] are held in memory until the same commit.
///
/// [`current_transaction_id`]: State::current_transaction_id
/// [`commit`]: State::commit
/// [`allocate_submission_id`]: State::allocate_submission_id
#[derive(Debug)]
pub struct State {
    path: PathBuf,
    committed: Counters,
    submission_counter: u64,
}

impl State {
    /// Load state from `path`, starting from defaults if the file does not exist.
    ///
    /// The file is not created until the first [`commit`](State::commit).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let committed = match read_counters(&path)? {
            Some(counters) => counters,
            None => {
                debug!(path = %path.display(), "no state file, starting from defaults");
                Counters::default()
            }
        };
        Ok(Self {
            submission_counter: committed.submission_counter,
            path,
            committed,
        })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transaction ID for the request being built. Never mutates.
    pub fn current_transaction_id(&self) -> u64 {
        self.committed.transaction_id
    }

    /// Counters as last persisted.
    pub fn committed(&self) -> Counters {
        self.committed
    }

    /// Submission counter including allocations not yet committed.
    pub fn submission_counter(&self) -> u64 {
        self.submission_counter
    }

    /// True if a submission number was allocated since the last commit.
    pub fn has_pending_allocation(&self) -> bool {
        self.submission_counter != self.committed.submission_counter
    }

    /// Hand out the next submission number.
    ///
    /// Numbers are strictly increasing for the lifetime of this value. They
    /// become durable with the next [`commit`](State::commit). Past
    /// [`MAX_SUBMISSION_COUNTER`] allocation fails with
    /// [`StateError::Exhausted`].
    pub fn allocate_submission_id(&mut self) -> Result<String> {
        let next = self
            .submission_counter
            .checked_add(1)
            .filter(|next| *next <= MAX_SUBMISSION_COUNTER)
            .ok_or(StateError::Exhausted("submission"))?;
        self.submission_counter = next;
        let number = format_submission_number(next);
        debug!(submission = %number, "allocated submission number");
        Ok(number)
    }

    /// Advance the transaction ID and persist both counters.
    ///
    /// Returns the transaction ID the next request will carry. On failure the
    /// in-memory counters are left untouched and the previous file, if any,
    /// is still intact.
    pub fn commit(&mut self) -> Result<u64> {
        let next = Counters {
            transaction_id: self
                .committed
                .transaction_id
                .checked_add(1)
                .ok_or(StateError::Exhausted("transaction"))?,
            submission_counter: self.submission_counter,
        };

        write_counters(&self.path, &next)?;
        self.committed = next;

        info!(
            path = %self.path.display(),
            transaction_id = next.transaction_id,
            submission_counter = next.submission_counter,
            "state committed"
        );
        Ok(next.transaction_id)
    }
}

fn read_counters(path: &Path) -> Result<Option<Counters>> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StateError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let counters: Counters =
        serde_json::from_slice(&content).map_err(|err| StateError::Corrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    if counters.transaction_id < INITIAL_TRANSACTION_ID {
        return Err(StateError::Corrupt {
            path: path.to_path_buf(),
            reason: "transaction-id must be at least 1".to_string(),
        });
    }
    Ok(Some(counters))
}

fn write_counters(path: &Path, counters: &Counters) -> Result<()> {
    let persist_err = |source: std::io::Error| StateError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let bytes = serde_json::to_vec_pretty(counters).map_err(|err| persist_err(err.into()))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".chfiling-state-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(persist_err)?;
    temp.write_all(&bytes).map_err(persist_err)?;
    temp.as_file().sync_all().map_err(persist_err)?;
    temp.persist(path).map_err(|err| persist_err(err.error))?;

    sync_dir(dir);
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    // Makes the rename durable; failure only weakens the guarantee on power loss.
    if let Ok(handle) = std::fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
