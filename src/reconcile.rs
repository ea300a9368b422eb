//! Output reconciliation: apply classified changes to the merged output root.
//!
//! A pass walks the change records in order and touches only the paths they
//! name:
//!
//! - a directory record ends the pass on the spot; later records are left
//!   unapplied and the report says the pass is incomplete;
//! - removed → delete the target if present (already absent is fine);
//! - added / modified → create the parent chain, then copy the source into
//!   place through a temp file in the same directory and rename it over the
//!   target, so readers see the old content or the new, never a mix.
//!
//! Every target is derived lexically from the output root and the record's
//! relative path, and must stay inside the root. Symlinked directories that
//! lead outside the root are refused as well.
//!
//! # Directory records
//!
//! The first directory record ends the whole pass, matching the host copy
//! task. Until its owners confirm otherwise this stays as-is; it shows up as
//! [`PassOutcome::AbortedOnDirectory`] and a warning.

use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::instrument;

use crate::change::{ChangeKind, EntryType, FileChangeRecord, NormalizedPath};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that end (or, for collected delete failures, mark) a pass.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A record's target resolves outside the output root.
    #[error("`{path}` resolves outside the output root {}", root.display())]
    PathEscape {
        /// The offending relative path.
        path: NormalizedPath,
        /// The output root.
        root: PathBuf,
    },

    /// The target's parent directory chain could not be created.
    #[error("failed to create target directory {}", dir.display())]
    DirectoryCreationFailure {
        /// The directory that could not be created.
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source content could not be copied into place.
    #[error("failed to copy {} to {}", from.display(), to.display())]
    CopyFailure {
        /// The record's source location.
        from: PathBuf,
        /// The target inside the output root.
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target exists but could not be deleted.
    #[error("failed to delete {}", target.display())]
    DeleteFailure {
        /// The target inside the output root.
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record reached the reconciler in a shape it has no handling for.
    #[error("internal error: no handling for {kind} record `{path}` ({detail})")]
    UnclassifiableChange {
        /// Relative path of the record.
        path: NormalizedPath,
        /// Kind of the record.
        kind: ChangeKind,
        /// What made the record unhandled.
        detail: &'static str,
    },
}

// ---------------------------------------------------------------------------
// OutputRoot
// ---------------------------------------------------------------------------

/// The directory a reconciler mirrors changes into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRoot {
    path: PathBuf,
}

impl OutputRoot {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The conventional root for a copy task: `<build_dir>/intermediates/incremental/<task_name>`.
    #[must_use]
    pub fn for_task(build_dir: &Path, task_name: &str) -> Self {
        Self::new(
            build_dir
                .join("intermediates")
                .join("incremental")
                .join(task_name),
        )
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lexically resolve `relative` against the root.
    ///
    /// # Errors
    /// [`ReconcileError::PathEscape`] for absolute paths, paths whose `..`
    /// segments climb above the root, and paths that resolve to the root itself.
    pub fn resolve(&self, relative: &NormalizedPath) -> Result<PathBuf, ReconcileError> {
        let escape = || ReconcileError::PathEscape {
            path: relative.clone(),
            root: self.path.clone(),
        };
        if relative.is_absolute() {
            return Err(escape());
        }
        let mut parts: Vec<&str> = Vec::new();
        for segment in relative.segments() {
            if segment == ".." {
                parts.pop().ok_or_else(escape)?;
            } else {
                parts.push(segment);
            }
        }
        if parts.is_empty() {
            return Err(escape());
        }
        Ok(parts
            .into_iter()
            .fold(self.path.clone(), |acc, part| acc.join(part)))
    }

    /// Whether `dir`, after following symlinks, still lies under the root.
    ///
    /// Checks the deepest ancestor of `dir` that exists. If the root itself
    /// does not exist yet, nothing beneath it can be a link.
    fn contains_resolved(&self, dir: &Path) -> io::Result<bool> {
        let root = match self.path.canonicalize() {
            Ok(root) => root,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e),
        };
        let existing = dir
            .ancestors()
            .take_while(|a| a.starts_with(&self.path))
            .find(|a| a.exists());
        match existing {
            Some(ancestor) => Ok(ancestor.canonicalize()?.starts_with(root)),
            None => Ok(true),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy and report
// ---------------------------------------------------------------------------

/// What to do when a delete fails for a reason other than "already absent".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteFailurePolicy {
    /// End the pass with the error.
    Abort,
    /// Keep going; the failures are listed in the [`PassReport`].
    #[default]
    Collect,
}

impl fmt::Display for DeleteFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Collect => write!(f, "collect"),
        }
    }
}

/// How a pass ended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PassOutcome {
    /// Every record was processed.
    #[default]
    Completed,
    /// A directory record ended the pass; it and everything after it were skipped.
    AbortedOnDirectory {
        /// Relative path of the directory record.
        path: NormalizedPath,
    },
}

/// What a pass did.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Records whose content was copied into place.
    pub copied: usize,
    /// Removed records whose target was deleted.
    pub deleted: usize,
    /// Removed records whose target was already gone.
    pub already_absent: usize,
    /// Delete failures kept under [`DeleteFailurePolicy::Collect`].
    pub delete_failures: Vec<ReconcileError>,
    pub outcome: PassOutcome,
}

impl PassReport {
    /// True only if every record was applied without a collected failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome == PassOutcome::Completed && self.delete_failures.is_empty()
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "copied {}, deleted {}, already absent {}",
            self.copied, self.deleted, self.already_absent
        )?;
        if !self.delete_failures.is_empty() {
            write!(f, ", {} delete failure(s)", self.delete_failures.len())?;
        }
        if let PassOutcome::AbortedOnDirectory { path } = &self.outcome {
            write!(f, "; stopped at directory entry `{path}`")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Applies change records to an [`OutputRoot`].
///
/// Records are processed sequentially, in input order. The caller is expected
/// to hand over at most one record per relative path per pass.
#[derive(Clone, Debug)]
pub struct Reconciler {
    root: OutputRoot,
    delete_failures: DeleteFailurePolicy,
}

impl Reconciler {
    #[must_use]
    pub const fn new(root: OutputRoot) -> Self {
        Self {
            root,
            delete_failures: DeleteFailurePolicy::Collect,
        }
    }

    #[must_use]
    pub const fn with_delete_failure_policy(mut self, policy: DeleteFailurePolicy) -> Self {
        self.delete_failures = policy;
        self
    }

    #[must_use]
    pub const fn root(&self) -> &OutputRoot {
        &self.root
    }

    /// Run one reconciliation pass.
    ///
    /// # Errors
    /// Any fatal [`ReconcileError`] ends the pass immediately. Records applied
    /// before the failure stay applied.
    #[instrument(skip_all, fields(root = %self.root.path().display()))]
    pub fn reconcile<I>(&self, records: I) -> Result<PassReport, ReconcileError>
    where
        I: IntoIterator<Item = FileChangeRecord>,
    {
        let mut report = PassReport::default();
        for record in records {
            if record.entry_type() == EntryType::Directory {
                tracing::warn!(
                    path = %record.relative_path(),
                    kind = %record.kind(),
                    "directory entry in change set; remaining changes are not applied"
                );
                report.outcome = PassOutcome::AbortedOnDirectory {
                    path: record.relative_path().clone(),
                };
                break;
            }
            self.apply(&record, &mut report)?;
        }
        tracing::info!(
            copied = report.copied,
            deleted = report.deleted,
            already_absent = report.already_absent,
            delete_failures = report.delete_failures.len(),
            complete = report.is_complete(),
            "reconciliation pass finished"
        );
        Ok(report)
    }

    fn apply(&self, record: &FileChangeRecord, report: &mut PassReport) -> Result<(), ReconcileError> {
        let target = self.root.resolve(record.relative_path())?;
        match (record.kind(), record.source()) {
            (ChangeKind::Removed, None) => self.delete(record, &target, report),
            (ChangeKind::Added | ChangeKind::Modified, Some(source)) => {
                self.copy(record, source, &target)?;
                report.copied += 1;
                Ok(())
            }
            (ChangeKind::Removed, Some(_)) => Err(ReconcileError::UnclassifiableChange {
                path: record.relative_path().clone(),
                kind: record.kind(),
                detail: "removed record carries a source location",
            }),
            (ChangeKind::Added | ChangeKind::Modified, None) => {
                Err(ReconcileError::UnclassifiableChange {
                    path: record.relative_path().clone(),
                    kind: record.kind(),
                    detail: "record has no source location",
                })
            }
        }
    }

    fn delete(
        &self,
        record: &FileChangeRecord,
        target: &Path,
        report: &mut PassReport,
    ) -> Result<(), ReconcileError> {
        let parent = target.parent().unwrap_or(target);
        self.ensure_contained(record, parent, |source| ReconcileError::DeleteFailure {
            target: target.to_owned(),
            source,
        })?;

        match fs::remove_file(target) {
            Ok(()) => {
                tracing::debug!(path = %target.display(), "deleted file");
                report.deleted += 1;
                Ok(())
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                report.already_absent += 1;
                Ok(())
            }
            Err(source) => {
                if self.delete_failures == DeleteFailurePolicy::Abort {
                    return Err(ReconcileError::DeleteFailure {
                        target: target.to_owned(),
                        source,
                    });
                }
                tracing::warn!(path = %target.display(), error = %source, "delete failed; continuing");
                report.delete_failures.push(ReconcileError::DeleteFailure {
                    target: target.to_owned(),
                    source,
                });
                Ok(())
            }
        }
    }

    fn copy(&self, record: &FileChangeRecord, source: &Path, target: &Path) -> Result<(), ReconcileError> {
        let Some(dir) = target.parent() else {
            return Err(ReconcileError::PathEscape {
                path: record.relative_path().clone(),
                root: self.root.path().to_owned(),
            });
        };
        let creation_failure = |source: io::Error| ReconcileError::DirectoryCreationFailure {
            dir: dir.to_owned(),
            source,
        };

        // Checked before creating so a symlinked ancestor never gets written through.
        self.ensure_contained(record, dir, creation_failure)?;
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(creation_failure)?;
        }
        self.ensure_contained(record, dir, creation_failure)?;

        copy_into_place(source, dir, target).map_err(|e| ReconcileError::CopyFailure {
            from: source.to_owned(),
            to: target.to_owned(),
            source: e,
        })?;
        tracing::debug!(
            from = %source.display(),
            path = %target.display(),
            "copied file"
        );
        Ok(())
    }

    /// Refuse `record` if `dir` resolves outside the root. `on_io` wraps a
    /// failure of the check itself.
    fn ensure_contained(
        &self,
        record: &FileChangeRecord,
        dir: &Path,
        on_io: impl FnOnce(io::Error) -> ReconcileError,
    ) -> Result<(), ReconcileError> {
        if self.root.contains_resolved(dir).map_err(on_io)? {
            Ok(())
        } else {
            Err(ReconcileError::PathEscape {
                path: record.relative_path().clone(),
                root: self.root.path().to_owned(),
            })
        }
    }
}

/// Stage `source` in `dir`, then rename it over `target`.
fn copy_into_place(source: &Path, dir: &Path, target: &Path) -> io::Result<()> {
    let mut input = File::open(source)?;
    let permissions = input.metadata()?.permissions();

    let mut staged = NamedTempFile::new_in(dir)?;
    io::copy(&mut input, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    fs::set_permissions(staged.path(), permissions)?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn path(p: &str) -> NormalizedPath {
        NormalizedPath::new(p).unwrap()
    }

    /// (sources dir, output dir, reconciler over the output dir)
    fn setup() -> (TempDir, TempDir, Reconciler) {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let reconciler = Reconciler::new(OutputRoot::new(out.path().to_owned()));
        (src, out, reconciler)
    }

    fn write_source(src: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let p = src.path().join(name);
        fs::write(&p, content).unwrap();
        p
    }

    fn directory(p: &str) -> FileChangeRecord {
        FileChangeRecord::from_parts_unchecked(path(p), ChangeKind::Added, EntryType::Directory, None)
    }

    // -- OutputRoot --

    #[test]
    fn for_task_uses_incremental_intermediates() {
        let root = OutputRoot::for_task(Path::new("/proj/build"), "copyOutput");
        assert_eq!(
            root.path(),
            Path::new("/proj/build/intermediates/incremental/copyOutput")
        );
    }

    #[test]
    fn resolve_stays_inside_root() {
        let root = OutputRoot::new(PathBuf::from("/out"));
        assert_eq!(
            root.resolve(&path("com/example/A.class")).unwrap(),
            PathBuf::from("/out/com/example/A.class")
        );
        assert_eq!(
            root.resolve(&path("com/../B.class")).unwrap(),
            PathBuf::from("/out/B.class")
        );
    }

    #[test]
    fn resolve_rejects_escapes() {
        let root = OutputRoot::new(PathBuf::from("/out"));
        for escaping in ["../A.class", "com/../../A.class", "/etc/passwd", "com/..", "C:/x"] {
            assert!(
                matches!(root.resolve(&path(escaping)), Err(ReconcileError::PathEscape { .. })),
                "{escaping} should escape"
            );
        }
    }

    // -- Removed --

    #[test]
    fn delete_of_absent_target_is_noop() {
        let (_src, out, reconciler) = setup();
        let report = reconciler
            .reconcile([FileChangeRecord::removed(path("com/Gone.class"))])
            .unwrap();
        assert_eq!(report.already_absent, 1);
        assert_eq!(report.deleted, 0);
        assert!(report.is_complete());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn delete_removes_existing_target() {
        let (_src, out, reconciler) = setup();
        fs::create_dir_all(out.path().join("com")).unwrap();
        fs::write(out.path().join("com/A.class"), b"old").unwrap();

        let report = reconciler
            .reconcile([FileChangeRecord::removed(path("com/A.class"))])
            .unwrap();
        assert_eq!(report.deleted, 1);
        assert!(!out.path().join("com/A.class").exists());
    }

    #[test]
    fn delete_under_file_ancestor_counts_as_absent() {
        let (_src, out, reconciler) = setup();
        fs::write(out.path().join("com"), b"not a dir").unwrap();
        let report = reconciler
            .reconcile([FileChangeRecord::removed(path("com/A.class"))])
            .unwrap();
        assert_eq!(report.already_absent, 1);
    }

    #[test]
    fn delete_failure_aborts_under_abort_policy() {
        let (src, out, reconciler) = setup();
        let reconciler = reconciler.with_delete_failure_policy(DeleteFailurePolicy::Abort);
        fs::create_dir_all(out.path().join("A.class/inner")).unwrap();
        let b = write_source(&src, "B.class", b"b");

        let err = reconciler
            .reconcile([
                FileChangeRecord::removed(path("A.class")),
                FileChangeRecord::added(path("B.class"), b),
            ])
            .unwrap_err();
        assert!(matches!(err, ReconcileError::DeleteFailure { .. }));
        assert!(!out.path().join("B.class").exists());
    }

    #[test]
    fn delete_failure_is_collected_by_default() {
        let (src, out, reconciler) = setup();
        fs::create_dir_all(out.path().join("A.class/inner")).unwrap();
        let b = write_source(&src, "B.class", b"b");

        let report = reconciler
            .reconcile([
                FileChangeRecord::removed(path("A.class")),
                FileChangeRecord::added(path("B.class"), b),
            ])
            .unwrap();
        assert_eq!(report.delete_failures.len(), 1);
        assert_eq!(report.copied, 1);
        assert!(!report.is_complete());
        assert!(report.to_string().contains("1 delete failure(s)"));
        assert_eq!(fs::read(out.path().join("B.class")).unwrap(), b"b");
    }

    // -- Added / Modified --

    #[test]
    fn added_creates_parents_and_copies_bytes() {
        let (src, out, reconciler) = setup();
        let content = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x41];
        let a = write_source(&src, "A.class", &content);

        let report = reconciler
            .reconcile([FileChangeRecord::added(path("com/example/deep/A.class"), a)])
            .unwrap();
        assert_eq!(report.copied, 1);
        assert_eq!(
            fs::read(out.path().join("com/example/deep/A.class")).unwrap(),
            content
        );
    }

    #[test]
    fn modified_overwrites_existing_content() {
        let (src, out, reconciler) = setup();
        fs::write(out.path().join("A.class"), b"a much longer previous version").unwrap();
        let a = write_source(&src, "A.class", b"new");

        reconciler
            .reconcile([FileChangeRecord::modified(path("A.class"), a)])
            .unwrap();
        assert_eq!(fs::read(out.path().join("A.class")).unwrap(), b"new");
    }

    #[test]
    fn copy_leaves_no_staging_files_behind() {
        let (src, out, reconciler) = setup();
        let a = write_source(&src, "A.class", b"a");
        reconciler
            .reconcile([FileChangeRecord::added(path("A.class"), a)])
            .unwrap();
        let names: Vec<_> = fs::read_dir(out.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("A.class")]);
    }

    #[test]
    fn missing_source_is_a_copy_failure_naming_both_paths() {
        let (src, out, reconciler) = setup();
        let missing = src.path().join("Missing.class");
        let err = reconciler
            .reconcile([FileChangeRecord::added(path("Missing.class"), missing.clone())])
            .unwrap_err();
        match &err {
            ReconcileError::CopyFailure { from, to, .. } => {
                assert_eq!(from, &missing);
                assert_eq!(to, &out.path().join("Missing.class"));
            }
            other => panic!("expected CopyFailure, got {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("Missing.class"));
        assert!(!out.path().join("Missing.class").exists());
    }

    #[test]
    fn blocked_parent_is_a_directory_creation_failure() {
        let (src, out, reconciler) = setup();
        fs::write(out.path().join("com"), b"file in the way").unwrap();
        let a = write_source(&src, "A.class", b"a");
        let err = reconciler
            .reconcile([FileChangeRecord::added(path("com/A.class"), a)])
            .unwrap_err();
        assert!(
            matches!(&err, ReconcileError::DirectoryCreationFailure { dir, .. } if dir == &out.path().join("com"))
        );
    }

    #[test]
    fn escaping_record_fails_the_pass() {
        let (src, out, reconciler) = setup();
        let a = write_source(&src, "A.class", b"a");
        let err = reconciler
            .reconcile([FileChangeRecord::added(path("../A.class"), a)])
            .unwrap_err();
        assert!(matches!(err, ReconcileError::PathEscape { .. }));
        assert!(!out.path().parent().unwrap().join("A.class").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_out_of_root_is_an_escape() {
        let (src, out, reconciler) = setup();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), out.path().join("link")).unwrap();
        let a = write_source(&src, "A.class", b"a");

        let err = reconciler
            .reconcile([FileChangeRecord::added(path("link/A.class"), a)])
            .unwrap_err();
        assert!(matches!(err, ReconcileError::PathEscape { .. }));
        assert!(!outside.path().join("A.class").exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt as _;

        let (src, out, reconciler) = setup();
        let a = write_source(&src, "run.sh", b"#!/bin/sh\n");
        fs::set_permissions(&a, fs::Permissions::from_mode(0o755)).unwrap();
        reconciler
            .reconcile([FileChangeRecord::added(path("run.sh"), a)])
            .unwrap();
        let mode = fs::metadata(out.path().join("run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    // -- Pass-level behaviour --

    /// Records after a directory entry are never applied, even valid ones.
    #[test]
    fn directory_record_ends_the_pass() {
        let (src, out, reconciler) = setup();
        let one = write_source(&src, "One.class", b"1");
        let three = write_source(&src, "Three.class", b"3");

        let report = reconciler
            .reconcile([
                FileChangeRecord::added(path("One.class"), one),
                directory("com/example"),
                FileChangeRecord::added(path("Three.class"), three),
            ])
            .unwrap();

        assert!(out.path().join("One.class").exists());
        assert!(!out.path().join("Three.class").exists());
        assert!(!out.path().join("com/example").exists());
        assert_eq!(report.copied, 1);
        assert_eq!(
            report.outcome,
            PassOutcome::AbortedOnDirectory {
                path: path("com/example")
            }
        );
        assert!(!report.is_complete());
        assert!(report.to_string().contains("stopped at directory entry `com/example`"));
    }

    #[test]
    fn unhandled_record_shape_is_fatal() {
        let (_src, _out, reconciler) = setup();
        let broken =
            FileChangeRecord::from_parts_unchecked(path("A.class"), ChangeKind::Added, EntryType::File, None);
        let err = reconciler.reconcile([broken]).unwrap_err();
        assert!(matches!(err, ReconcileError::UnclassifiableChange { .. }));

        let broken = FileChangeRecord::from_parts_unchecked(
            path("A.class"),
            ChangeKind::Removed,
            EntryType::File,
            Some(PathBuf::from("/src/A.class")),
        );
        let err = reconciler.reconcile([broken]).unwrap_err();
        assert!(matches!(err, ReconcileError::UnclassifiableChange { .. }));
    }

    #[test]
    fn untouched_paths_are_left_alone() {
        let (src, out, reconciler) = setup();
        fs::write(out.path().join("Keep.class"), b"keep").unwrap();
        fs::write(out.path().join("Old.class"), b"old").unwrap();
        let a = write_source(&src, "A.class", b"a");

        reconciler
            .reconcile([
                FileChangeRecord::added(path("A.class"), a),
                FileChangeRecord::removed(path("Old.class")),
            ])
            .unwrap();
        assert_eq!(fs::read(out.path().join("Keep.class")).unwrap(), b"keep");
        assert!(!out.path().join("Old.class").exists());
    }

    #[test]
    fn output_root_is_created_on_first_copy() {
        let src = tempfile::tempdir().unwrap();
        let base = tempfile::tempdir().unwrap();
        let root = OutputRoot::for_task(base.path(), "copyOutput");
        let reconciler = Reconciler::new(root.clone());
        let a = write_source(&src, "A.class", b"a");

        reconciler
            .reconcile([FileChangeRecord::added(path("A.class"), a)])
            .unwrap();
        assert!(root.path().join("A.class").is_file());
    }

    #[test]
    fn empty_change_set_completes() {
        let (_src, _out, reconciler) = setup();
        let report = reconciler.reconcile(Vec::new()).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.to_string(), "copied 0, deleted 0, already absent 0");
    }
}
