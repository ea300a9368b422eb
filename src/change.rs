//! Change classification: raw host observations → [`FileChangeRecord`]s.
//!
//! The host build tool reports what changed under a set of watched compiler
//! output roots. Each observation classifies into exactly one record, and the
//! same observation always classifies the same way. Nothing here touches the
//! filesystem.
//!
//! | change            | file type   | record                          |
//! |-------------------|-------------|---------------------------------|
//! | added / modified  | file        | same kind, FILE, with source    |
//! | added / modified  | directory   | same kind, DIRECTORY, with source |
//! | added / modified  | missing     | error (unclassifiable)          |
//! | removed           | file / missing | REMOVED, FILE, no source     |
//! | removed           | directory   | REMOVED, DIRECTORY, no source   |

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while classifying observations or building records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// A relative path could not be normalized.
    #[error("invalid relative path `{raw}`: {reason}")]
    InvalidPath {
        /// The path as reported.
        raw: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The host gave no normalized path and the file is under no watched root.
    #[error("{} is not under any watched input root", file.display())]
    OutsideWatchedInputs {
        /// The reported file.
        file: PathBuf,
    },

    /// The change/file-type combination has no record shape.
    #[error("cannot classify {change} of {file_type} entry {}", file.display())]
    Unclassifiable {
        /// The reported file.
        file: PathBuf,
        /// The reported change type.
        change: RawChangeType,
        /// The reported file type.
        file_type: RawFileType,
    },

    /// An added or modified record was built without a source location.
    #[error("{kind} record for `{path}` has no source location")]
    MissingSource {
        /// Relative path of the record.
        path: NormalizedPath,
        /// Kind of the record.
        kind: ChangeKind,
    },

    /// A removed record was built with a source location.
    #[error("removed record for `{path}` must not carry a source location")]
    UnexpectedSource {
        /// Relative path of the record.
        path: NormalizedPath,
    },
}

// ---------------------------------------------------------------------------
// NormalizedPath
// ---------------------------------------------------------------------------

/// A platform-independent relative path with `/` separators.
///
/// Normalization is purely lexical: `\` becomes `/`, empty and `.` segments
/// are dropped. `..` segments and absolute forms are kept as reported so the
/// reconciler can refuse them instead of silently rebasing them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Normalize `raw`.
    ///
    /// # Errors
    /// Returns [`ClassifyError::InvalidPath`] if no segment remains.
    pub fn new(raw: &str) -> Result<Self, ClassifyError> {
        Self::lexical(raw).non_root(raw)
    }

    /// The watched root itself. Only directory records carry it.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// True for [`NormalizedPath::root`].
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalize without rejecting the empty result; it becomes the root.
    fn lexical(raw: &str) -> Self {
        let unified = raw.replace('\\', "/");
        let absolute = unified.starts_with('/');
        let segments: Vec<&str> = unified
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.is_empty() {
            return Self::root();
        }
        let joined = segments.join("/");
        Self(if absolute { format!("/{joined}") } else { joined })
    }

    fn non_root(self, raw: &str) -> Result<Self, ClassifyError> {
        if self.is_root() {
            return Err(ClassifyError::InvalidPath {
                raw: raw.to_owned(),
                reason: "path has no segments".to_owned(),
            });
        }
        Ok(self)
    }

    /// Build from a relative filesystem path (e.g. after stripping a root).
    ///
    /// # Errors
    /// Returns [`ClassifyError::InvalidPath`] for non-UTF-8 or empty paths.
    pub fn from_relative(path: &Path) -> Result<Self, ClassifyError> {
        Self::lexical_relative(path)?.non_root(&path.display().to_string())
    }

    fn lexical_relative(path: &Path) -> Result<Self, ClassifyError> {
        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(os) => {
                    let part = os.to_str().ok_or_else(|| ClassifyError::InvalidPath {
                        raw: path.display().to_string(),
                        reason: "path is not valid UTF-8".to_owned(),
                    })?;
                    parts.push(part);
                }
                Component::ParentDir => parts.push(".."),
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ClassifyError::InvalidPath {
                        raw: path.display().to_string(),
                        reason: "expected a relative path".to_owned(),
                    });
                }
            }
        }
        Ok(Self::lexical(&parts.join("/")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `/`-rooted paths and Windows drive forms (`C:/...`).
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
            || self
                .segments()
                .next()
                .is_some_and(|first| first.len() == 2 && first.ends_with(':'))
    }

    /// The path's segments, in order. A leading `/` is not a segment.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// FileChangeRecord
// ---------------------------------------------------------------------------

/// What happened to an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Whether an entry is a file or a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// One classified change, consumed once by the reconciler.
///
/// A source location is present exactly when the kind is added or modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileChangeRecord {
    relative_path: NormalizedPath,
    kind: ChangeKind,
    entry_type: EntryType,
    source: Option<PathBuf>,
}

impl FileChangeRecord {
    /// Build a record, enforcing the source-location invariant.
    ///
    /// # Errors
    /// [`ClassifyError::MissingSource`] if an added/modified record has no
    /// source; [`ClassifyError::UnexpectedSource`] if a removed one has one.
    pub fn new(
        relative_path: NormalizedPath,
        kind: ChangeKind,
        entry_type: EntryType,
        source: Option<PathBuf>,
    ) -> Result<Self, ClassifyError> {
        match (kind, &source) {
            (ChangeKind::Added | ChangeKind::Modified, None) => {
                return Err(ClassifyError::MissingSource {
                    path: relative_path,
                    kind,
                });
            }
            (ChangeKind::Removed, Some(_)) => {
                return Err(ClassifyError::UnexpectedSource {
                    path: relative_path,
                });
            }
            _ => {}
        }
        Ok(Self {
            relative_path,
            kind,
            entry_type,
            source,
        })
    }

    /// An added file copied from `source`.
    #[must_use]
    pub fn added(relative_path: NormalizedPath, source: PathBuf) -> Self {
        Self::from_parts_unchecked(relative_path, ChangeKind::Added, EntryType::File, Some(source))
    }

    /// A modified file copied from `source`.
    #[must_use]
    pub fn modified(relative_path: NormalizedPath, source: PathBuf) -> Self {
        Self::from_parts_unchecked(relative_path, ChangeKind::Modified, EntryType::File, Some(source))
    }

    /// A removed file.
    #[must_use]
    pub fn removed(relative_path: NormalizedPath) -> Self {
        Self::from_parts_unchecked(relative_path, ChangeKind::Removed, EntryType::File, None)
    }

    pub(crate) const fn from_parts_unchecked(
        relative_path: NormalizedPath,
        kind: ChangeKind,
        entry_type: EntryType,
        source: Option<PathBuf>,
    ) -> Self {
        Self {
            relative_path,
            kind,
            entry_type,
            source,
        }
    }

    #[must_use]
    pub const fn relative_path(&self) -> &NormalizedPath {
        &self.relative_path
    }

    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.kind
    }

    #[must_use]
    pub const fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Where the new content lives. `None` for removed records.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Raw observations
// ---------------------------------------------------------------------------

/// Change type as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawChangeType {
    Added,
    Modified,
    Removed,
}

impl fmt::Display for RawChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "addition"),
            Self::Modified => write!(f, "modification"),
            Self::Removed => write!(f, "removal"),
        }
    }
}

/// File type as reported by the host. Removed entries usually report `Missing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawFileType {
    File,
    Directory,
    Missing,
}

impl fmt::Display for RawFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// One file change as the host build tool reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Absolute location of the changed entry inside a watched root.
    pub file: PathBuf,
    /// Path relative to its watched root, if the host already computed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_path: Option<String>,
    pub change: RawChangeType,
    pub file_type: RawFileType,
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// The compiler output roots whose changes are being mirrored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchedInputs {
    roots: Vec<PathBuf>,
}

impl WatchedInputs {
    #[must_use]
    pub const fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Path of `file` relative to the first root that contains it.
    fn relativize<'a>(&self, file: &'a Path) -> Option<&'a Path> {
        self.roots.iter().find_map(|root| file.strip_prefix(root).ok())
    }
}

/// Turns raw observations into [`FileChangeRecord`]s.
#[derive(Clone, Debug, Default)]
pub struct ChangeClassifier {
    inputs: WatchedInputs,
}

impl ChangeClassifier {
    #[must_use]
    pub const fn new(inputs: WatchedInputs) -> Self {
        Self { inputs }
    }

    #[must_use]
    pub const fn inputs(&self) -> &WatchedInputs {
        &self.inputs
    }

    /// Classify a single observation.
    ///
    /// # Errors
    /// Returns a [`ClassifyError`] if the path cannot be derived or the
    /// change/file-type pair has no record shape.
    pub fn classify_one(&self, observation: &RawObservation) -> Result<FileChangeRecord, ClassifyError> {
        let (kind, entry_type) = match (observation.change, observation.file_type) {
            (RawChangeType::Removed, RawFileType::File | RawFileType::Missing) => {
                (ChangeKind::Removed, EntryType::File)
            }
            (RawChangeType::Removed, RawFileType::Directory) => {
                (ChangeKind::Removed, EntryType::Directory)
            }
            (RawChangeType::Added, RawFileType::File) => (ChangeKind::Added, EntryType::File),
            (RawChangeType::Modified, RawFileType::File) => (ChangeKind::Modified, EntryType::File),
            (RawChangeType::Added, RawFileType::Directory) => {
                (ChangeKind::Added, EntryType::Directory)
            }
            (RawChangeType::Modified, RawFileType::Directory) => {
                (ChangeKind::Modified, EntryType::Directory)
            }
            (change @ (RawChangeType::Added | RawChangeType::Modified), RawFileType::Missing) => {
                return Err(ClassifyError::Unclassifiable {
                    file: observation.file.clone(),
                    change,
                    file_type: RawFileType::Missing,
                });
            }
        };
        let relative_path = self.relative_path(observation, entry_type)?;
        let source = match kind {
            ChangeKind::Removed => None,
            ChangeKind::Added | ChangeKind::Modified => Some(observation.file.clone()),
        };
        FileChangeRecord::new(relative_path, kind, entry_type, source)
    }

    /// Lazily classify a sequence of observations, in input order.
    pub fn classify<I>(
        &self,
        observations: I,
    ) -> impl Iterator<Item = Result<FileChangeRecord, ClassifyError>>
    where
        I: IntoIterator<Item = RawObservation>,
    {
        observations
            .into_iter()
            .map(move |observation| self.classify_one(&observation))
    }

    /// A directory observation may name a watched root itself; a file never can.
    fn relative_path(
        &self,
        observation: &RawObservation,
        entry_type: EntryType,
    ) -> Result<NormalizedPath, ClassifyError> {
        let (path, raw) = match &observation.normalized_path {
            Some(raw) => (NormalizedPath::lexical(raw), raw.clone()),
            None => {
                let relative = self.inputs.relativize(&observation.file).ok_or_else(|| {
                    ClassifyError::OutsideWatchedInputs {
                        file: observation.file.clone(),
                    }
                })?;
                (
                    NormalizedPath::lexical_relative(relative)?,
                    relative.display().to_string(),
                )
            }
        };
        match entry_type {
            EntryType::Directory => Ok(path),
            EntryType::File => path.non_root(&raw),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
