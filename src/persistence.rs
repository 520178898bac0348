//! Snapshot persistence over a key/value store.
//!
//! The whole [`PortfolioSnapshot`] is stored as one JSON document under
//! [`STORAGE_KEY`]. Loading never fails: a missing key, an unreadable store
//! or a malformed payload is logged and degrades to an empty snapshot dated
//! today. Saving overwrites the document and reports failure to the caller.
//!
//! # Usage
//!
//! ```
//! use vertex::persistence::{self, MemoryStore};
//! use vertex::PortfolioSnapshot;
//!
//! let mut store = MemoryStore::default();
//! let snap = PortfolioSnapshot::initial(vertex::today());
//!
//! persistence::save_snapshot(&mut store, &snap).unwrap();
//! assert_eq!(persistence::load_snapshot(&store), snap);
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::StoreError;
use crate::snapshot::{self, PortfolioSnapshot};

/// Key under which the snapshot is stored.
pub const STORAGE_KEY: &str = "vertex_portfolio_state";

/// A string key/value store.
pub trait SnapshotStore {
    /// Value for `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never sees a half-written document.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
            file.write_all(value.as_bytes()).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        std::fs::rename(&tmp, &path).map_err(io_err)
    }
}

/// Load the snapshot, degrading to an empty one dated today.
pub fn load_snapshot(store: &impl SnapshotStore) -> PortfolioSnapshot {
    match try_load(store) {
        Ok(Some(snap)) => snap,
        Ok(None) => {
            log::warn!("no snapshot stored under {STORAGE_KEY}, starting empty");
            PortfolioSnapshot::empty(snapshot::today())
        }
        Err(e) => {
            log::warn!("failed to load snapshot, starting empty: {e}");
            PortfolioSnapshot::empty(snapshot::today())
        }
    }
}

/// Load the snapshot, surfacing absence and failures.
pub fn try_load(store: &impl SnapshotStore) -> Result<Option<PortfolioSnapshot>, StoreError> {
    let Some(payload) = store.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&payload)?))
}

/// Serialize and write the whole snapshot.
pub fn save_snapshot(
    store: &mut impl SnapshotStore,
    snapshot: &PortfolioSnapshot,
) -> Result<(), StoreError> {
    let result = serde_json::to_string_pretty(snapshot)
        .map_err(StoreError::from)
        .and_then(|payload| store.set(STORAGE_KEY, &payload));

    match &result {
        Ok(()) => log::debug!("saved snapshot dated {}", snapshot.date),
        Err(e) => log::error!("failed to save snapshot: {e}"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::Security;
    use crate::tactical::TacticalAdjustment;
    use crate::types::{AssetClass, Region, Sector};
    use chrono::NaiveDate;

    fn sample() -> PortfolioSnapshot {
        let date = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let mut snap = PortfolioSnapshot::initial(date);
        snap.add_security(
            Security::new(
                "TB-182",
                AssetClass::FixedIncome,
                Sector::Government,
                Region::Tanzania,
            )
            .with_instrument("T-Bill")
            .with_weights(12.0, 10.0)
            .unwrap(),
        );
        snap.add_security(
            Security::new(
                "KCB",
                AssetClass::RegionalEquities,
                Sector::from_label("Fintech"),
                Region::Kenya,
            )
            .with_weights(4.0, 5.0)
            .unwrap(),
        );
        snap.add_adjustment(
            TacticalAdjustment::new(date)
                .with_move("Increased Fixed Income by 2%", 2.0)
                .unwrap(),
        );
        snap.allocations[0].set_current(52.0).unwrap();
        snap
    }

    #[test]
    fn memory_round_trip() {
        let mut store = MemoryStore::new();
        let snap = sample();
        save_snapshot(&mut store, &snap).unwrap();
        assert_eq!(load_snapshot(&store), snap);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("state"));
        let snap = sample();

        save_snapshot(&mut store, &snap).unwrap();
        assert!(store.path_for(STORAGE_KEY).exists());
        assert_eq!(try_load(&store).unwrap(), Some(snap.clone()));

        // Overwrite is wholesale
        let empty = PortfolioSnapshot::empty(snap.date);
        save_snapshot(&mut store, &empty).unwrap();
        assert_eq!(load_snapshot(&store), empty);
    }

    #[test]
    fn missing_key_degrades_to_empty() {
        let store = MemoryStore::new();
        let snap = load_snapshot(&store);
        assert!(snap.securities.is_empty());
        assert!(snap.allocations.is_empty());
        assert_eq!(snap.date, snapshot::today());

        let dir = tempfile::tempdir().unwrap();
        assert!(try_load(&FileStore::new(dir.path())).unwrap().is_none());
    }

    #[test]
    fn malformed_payload_degrades_to_empty() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert!(matches!(try_load(&store), Err(StoreError::Malformed(_))));
        assert!(load_snapshot(&store).securities.is_empty());
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let mut store = MemoryStore::new();
        save_snapshot(&mut store, &sample()).unwrap();
        let payload = store.get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["date"], "2026-06-30");
        assert!(value["totalValue"].is_number());
        assert_eq!(value["securities"][1]["sector"], "Fintech");
        assert_eq!(value["securities"][0]["deviation"], 2.0);
        assert_eq!(value["allocations"][0]["rebalancingRequired"], false);
        assert!(value["tacticalAdjustments"][0]["deviationPercent"].is_number());
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(STORAGE_KEY, r#"{"date": "2026-01-02", "totalValue": 5}"#)
            .unwrap();
        let snap = load_snapshot(&store);
        assert_eq!(snap.date, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(snap.total_value(), 5.0);
        assert!(snap.compliance_checks.is_empty());
    }
}
