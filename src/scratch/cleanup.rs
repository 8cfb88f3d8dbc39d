//! Stale scratch session cleanup
//!
//! An entry is only deleted after it has been renamed: a successful rename
//! shows no other process holds a lock on it. The probe is racy (a lock can be
//! taken between the rename and the delete) and that is accepted.
//!
//! Entries already carrying the `ready_for_deletion_` prefix are leftovers of
//! a failed delete; they were marked by an earlier run and are removed directly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::DELETION_NAME;

/// Filesystem operations the cleanup needs
pub(crate) trait EntryFs {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

pub(crate) struct RealFs;

impl EntryFs for RealFs {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CleanupOutcome {
    Deleted,
    /// Rename failed, the entry is in use and was left alone
    Locked,
    /// Renamed but could not be removed
    DeleteFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CleanupEntry {
    pub(crate) path: PathBuf,
    pub(crate) outcome: CleanupOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct CleanupReport {
    pub(crate) entries: Vec<CleanupEntry>,
}

impl CleanupReport {
    fn count(&self, outcome: CleanupOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub(crate) fn deleted(&self) -> usize {
        self.count(CleanupOutcome::Deleted)
    }

    pub(crate) fn locked(&self) -> usize {
        self.count(CleanupOutcome::Locked)
    }

    pub(crate) fn failed(&self) -> usize {
        self.count(CleanupOutcome::DeleteFailed)
    }
}

/// Remove every unlocked directory directly under `base`
pub(crate) fn cleanup_stale_sessions(base: &Path) -> CleanupReport {
    cleanup_with(base, &RealFs)
}

pub(crate) fn cleanup_with(base: &Path, fs_ops: &dyn EntryFs) -> CleanupReport {
    let mut report = CleanupReport::default();

    let read_dir = match fs::read_dir(base) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!(base = %base.display(), error = %e, "cannot list scratch path");
            return report;
        }
    };

    let mut dirs: Vec<PathBuf> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();

    for dir in dirs {
        let outcome = remove_if_unlocked(base, &dir, fs_ops);
        tracing::debug!(path = %dir.display(), ?outcome, "stale scratch entry");
        report.entries.push(CleanupEntry { path: dir, outcome });
    }

    report
}

fn remove_if_unlocked(base: &Path, dir: &Path, fs_ops: &dyn EntryFs) -> CleanupOutcome {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let marked = if name.starts_with(&format!("{DELETION_NAME}_")) {
        dir.to_path_buf()
    } else {
        let target = deletion_target(base, &name);
        if fs_ops.rename(dir, &target).is_err() {
            return CleanupOutcome::Locked;
        }
        target
    };

    match fs_ops.remove_dir_all(&marked) {
        Ok(()) => CleanupOutcome::Deleted,
        Err(_) => CleanupOutcome::DeleteFailed,
    }
}

/// First free `ready_for_deletion_<name>[_N]` under `base`
fn deletion_target(base: &Path, name: &str) -> PathBuf {
    let target = base.join(format!("{DELETION_NAME}_{name}"));
    if !target.exists() {
        return target;
    }
    let mut n = 1u32;
    loop {
        let candidate = base.join(format!("{DELETION_NAME}_{name}_{n}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Refuses to rename entries whose name is listed as locked
    struct LockingFs {
        locked: Vec<&'static str>,
        fail_delete: bool,
    }

    impl EntryFs for LockingFs {
        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            let name = from.file_name().unwrap().to_string_lossy();
            if self.locked.iter().any(|l| *l == name) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "in use"));
            }
            fs::rename(from, to)
        }

        fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
            if self.fail_delete {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            fs::remove_dir_all(path)
        }
    }

    fn make_session(base: &Path, name: &str) {
        let gdb = base.join(name).join("scratch.gdb");
        fs::create_dir_all(&gdb).unwrap();
        fs::write(gdb.join("a00000001.gdbtable"), b"raster").unwrap();
    }

    fn entry_names(base: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(base)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_removes_all_unlocked_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["scratch_20250101_000000", "scratch_20250102_000000", "other"] {
            make_session(dir.path(), name);
        }

        let report = cleanup_stale_sessions(dir.path());
        assert_eq!(report.deleted(), 3);
        assert_eq!(report.locked(), 0);
        assert!(entry_names(dir.path()).is_empty());
    }

    #[test]
    fn test_leaves_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        make_session(dir.path(), "scratch_20250101_000000");
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        let report = cleanup_stale_sessions(dir.path());
        assert_eq!(report.entries.len(), 1);
        assert_eq!(entry_names(dir.path()), vec!["notes.txt"]);
    }

    #[test]
    fn test_locked_directories_remain() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["scratch_a", "scratch_b", "scratch_c"] {
            make_session(dir.path(), name);
        }
        let fs_ops = LockingFs {
            locked: vec!["scratch_b"],
            fail_delete: false,
        };

        let report = cleanup_with(dir.path(), &fs_ops);
        assert_eq!(report.deleted(), 2);
        assert_eq!(report.locked(), 1);
        assert_eq!(report.entries[1].outcome, CleanupOutcome::Locked);
        assert_eq!(entry_names(dir.path()), vec!["scratch_b"]);
        assert!(dir.path().join("scratch_b/scratch.gdb").exists());
    }

    #[test]
    fn test_failed_delete_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        make_session(dir.path(), "scratch_a");
        let fs_ops = LockingFs {
            locked: Vec::new(),
            fail_delete: true,
        };

        let report = cleanup_with(dir.path(), &fs_ops);
        assert_eq!(report.failed(), 1);
        assert_eq!(entry_names(dir.path()), vec!["ready_for_deletion_scratch_a"]);

        // A later run picks the leftover up again
        let report = cleanup_stale_sessions(dir.path());
        assert_eq!(report.deleted(), 1);
        assert!(entry_names(dir.path()).is_empty());
    }

    #[test]
    fn test_existing_leftover_does_not_block_rename() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("abc")).unwrap();
        make_session(dir.path(), "ready_for_deletion_abc");

        let report = cleanup_stale_sessions(dir.path());
        assert_eq!(report.deleted(), 2);
        assert_eq!(report.locked(), 0);
        assert!(entry_names(dir.path()).is_empty());
    }

    #[test]
    fn test_undeletable_leftover_keeps_its_name() {
        let dir = tempfile::tempdir().unwrap();
        make_session(dir.path(), "abc");
        make_session(dir.path(), "ready_for_deletion_abc");
        let fs_ops = LockingFs {
            locked: Vec::new(),
            fail_delete: true,
        };

        let report = cleanup_with(dir.path(), &fs_ops);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.locked(), 0);
        assert_eq!(
            entry_names(dir.path()),
            vec!["ready_for_deletion_abc", "ready_for_deletion_abc_1"]
        );

        let report = cleanup_with(dir.path(), &fs_ops);
        assert_eq!(report.failed(), 2);
        assert_eq!(
            entry_names(dir.path()),
            vec!["ready_for_deletion_abc", "ready_for_deletion_abc_1"]
        );
    }

    #[test]
    fn test_missing_base_is_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = cleanup_stale_sessions(&dir.path().join("missing"));
        assert!(report.entries.is_empty());
    }
}
