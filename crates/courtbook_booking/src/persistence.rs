// --- File: crates/courtbook_booking/src/persistence.rs ---
use courtbook_common::{Booking, Context, CourtbookError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Durable part of the reconciliation store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub confirmed_local: Vec<Booking>,
    #[serde(default)]
    pub cancelled_ids: BTreeSet<String>,
}

/// Where the reconciliation store keeps its snapshot between runs.
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<StoreSnapshot>, CourtbookError>;

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), CourtbookError>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Arc<T> {
    fn load(&self) -> Result<Option<StoreSnapshot>, CourtbookError> {
        (**self).load()
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), CourtbookError> {
        (**self).save(snapshot)
    }
}

/// Keeps the last snapshot in memory; state ends with the process.
#[derive(Debug, Default)]
pub struct InMemorySnapshots {
    last: Mutex<Option<StoreSnapshot>>,
}

impl SnapshotStore for InMemorySnapshots {
    fn load(&self) -> Result<Option<StoreSnapshot>, CourtbookError> {
        Ok(self
            .last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), CourtbookError> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}

/// A pretty-printed JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshots {
    path: PathBuf,
}

impl JsonFileSnapshots {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileSnapshots {
    fn load(&self) -> Result<Option<StoreSnapshot>, CourtbookError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading snapshot {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let snapshot: StoreSnapshot = serde_json::from_str(&raw)?;
        debug!(
            "Restored {} local bookings and {} cancellations from {}",
            snapshot.confirmed_local.len(),
            snapshot.cancelled_ids.len(),
            self.path.display()
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), CourtbookError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
