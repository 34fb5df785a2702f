//! On-disk snapshot persistence.
//!
//! One snapshot is stored as three JSON files named from the cycle's model
//! name with `_rp`, `_wheel` and `_rail` suffixes. Writes go through a
//! temporary sibling file and `fs::rename`, so a concurrently submitted
//! follow-up job can never observe a half-written record.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use rollover_model::naming;

use crate::snapshot::{CycleSnapshot, NodeSetRecord, RefPointRecord};

/// Errors from reading or writing snapshot files.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot file not found: {0}")]
    Missing(PathBuf),

    #[error("Snapshot record is inconsistent: {0}")]
    Inconsistent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Directory-backed store of per-cycle snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one sub-record file of a cycle.
    pub fn record_path(&self, cycle: u32, record: &str) -> PathBuf {
        self.dir.join(naming::snapshot_file(cycle, record))
    }

    /// Persist a snapshot as its three sub-record files.
    ///
    /// The record invariant (equal array lengths) is checked before
    /// anything is written.
    pub fn save(&self, snapshot: &CycleSnapshot) -> Result<(), SnapshotError> {
        snapshot
            .check_consistent()
            .map_err(SnapshotError::Inconsistent)?;
        fs::create_dir_all(&self.dir)?;

        self.write_record(snapshot.cycle, "rp", &snapshot.rp)?;
        self.write_record(snapshot.cycle, "wheel", &snapshot.wheel)?;
        self.write_record(snapshot.cycle, "rail", &snapshot.rail)
    }

    /// Load the snapshot written at the end of `cycle`.
    pub fn load(&self, cycle: u32) -> Result<CycleSnapshot, SnapshotError> {
        let rp: RefPointRecord = self.read_record(cycle, "rp")?;
        let wheel: NodeSetRecord = self.read_record(cycle, "wheel")?;
        let rail: NodeSetRecord = self.read_record(cycle, "rail")?;

        let snapshot = CycleSnapshot {
            cycle,
            rp,
            wheel,
            rail,
        };
        snapshot
            .check_consistent()
            .map_err(SnapshotError::Inconsistent)?;
        Ok(snapshot)
    }

    fn write_record<T: Serialize>(
        &self,
        cycle: u32,
        record: &str,
        value: &T,
    ) -> Result<(), SnapshotError> {
        let path = self.record_path(cycle, record);
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| SnapshotError::Json {
            path: path.clone(),
            source,
        })?;

        // Atomic publish: readers only ever see the renamed, complete file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read_record<T: DeserializeOwned>(
        &self,
        cycle: u32,
        record: &str,
    ) -> Result<T, SnapshotError> {
        let path = self.record_path(cycle, record);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(SnapshotError::Missing(path));
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Json { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn sample_snapshot(cycle: u32) -> CycleSnapshot {
        CycleSnapshot {
            cycle,
            rp: RefPointRecord {
                x: Vector2::new(0.0, 0.46),
                u: Vector2::new(0.03, -0.0004),
                ur: 0.0653,
                v: Vector2::new(0.05, 0.0),
            },
            wheel: NodeSetRecord {
                labels: vec![11, 12, 13],
                x: vec![
                    Vector2::new(-0.01, 0.002),
                    Vector2::new(0.0, 0.0),
                    Vector2::new(0.01, 0.002),
                ],
                u: vec![Vector2::new(0.03, -0.0003); 3],
                v: vec![Vector2::new(0.05, 0.0); 3],
            },
            rail: NodeSetRecord {
                labels: vec![201, 202],
                x: vec![Vector2::new(-0.05, 0.0), Vector2::new(0.05, 0.0)],
                u: vec![Vector2::zeros(); 2],
                v: vec![Vector2::zeros(); 2],
            },
        }
    }

    #[test]
    fn snapshot_roundtrip_preserves_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SnapshotStore::new(dir.path());

        let snapshot = sample_snapshot(3);
        store.save(&snapshot).expect("save should succeed");
        let loaded = store.load(3).expect("load should succeed");
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn record_files_use_model_name_suffixes() {
        let store = SnapshotStore::new("work");
        assert_eq!(
            store.record_path(3, "wheel"),
            Path::new("work").join("rollover_00003_wheel.json")
        );
    }

    #[test]
    fn load_fails_as_missing_for_absent_cycle() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        match store.load(9) {
            Err(SnapshotError::Missing(path)) => {
                assert!(path.ends_with("rollover_00009_rp.json"));
            }
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn load_fails_for_corrupt_payload() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        store.save(&sample_snapshot(2)).expect("save should succeed");
        fs::write(store.record_path(2, "wheel"), "{not json").expect("overwrite");
        assert!(matches!(store.load(2), Err(SnapshotError::Json { .. })));
    }

    #[test]
    fn save_rejects_inconsistent_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        let mut snapshot = sample_snapshot(1);
        snapshot.wheel.u.pop();
        assert!(matches!(
            store.save(&snapshot),
            Err(SnapshotError::Inconsistent(_))
        ));
        // Nothing may be published after a failed save.
        assert!(!store.record_path(1, "rp").exists());
    }

    #[test]
    fn write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        store.save(&sample_snapshot(4)).expect("save should succeed");

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
