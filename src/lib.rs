//! classfold library crate.
//!
//! Build-time half of a bytecode post-processing toolchain. It keeps one
//! merged output directory in step with the class output of several upstream
//! compilers, and configures the member flag resolution used when classes are
//! rewritten.
//!
//! - [`change`] — classify host file-change observations into records.
//! - [`reconcile`] — apply records to the merged output root.
//! - [`transform`] / [`discovery`] — per-task resolver and plugin discovery settings.
//! - [`config`] — `classfold.toml`.
//!
//! Flag types and resolvers live in `classfold-modifiers`, re-exported as
//! [`modifiers`].

pub mod change;
pub mod config;
pub mod discovery;
pub mod reconcile;
pub mod telemetry;
pub mod transform;

pub use classfold_modifiers as modifiers;

pub use change::{ChangeClassifier, ChangeKind, EntryType, FileChangeRecord, NormalizedPath, RawObservation};
pub use reconcile::{OutputRoot, PassOutcome, PassReport, ReconcileError, Reconciler};
