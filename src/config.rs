//! classfold configuration (`classfold.toml`).
//!
//! Defines the typed configuration for the watched compiler outputs, the
//! merged output root, and the transform settings handed to each task.

use std::io;
use std::path::{Path, PathBuf};

use classfold_modifiers::ModifierResolver;
use serde::Deserialize;
use thiserror::Error;

use crate::change::WatchedInputs;
use crate::discovery::{DiscoverySet, PluginDiscovery};
use crate::reconcile::{DeleteFailurePolicy, OutputRoot};
use crate::transform::TransformTask;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "classfold.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level classfold configuration.
///
/// Missing fields use defaults. Missing file → all defaults (no error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassfoldConfig {
    /// Compiler output roots being mirrored.
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Where the mirror lives and how deletes are handled.
    #[serde(default)]
    pub output: OutputConfig,

    /// Member transformation settings.
    #[serde(default)]
    pub transform: TransformConfig,
}

// ---------------------------------------------------------------------------
// InputsConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    /// Output directories of the upstream compilers, checked in order.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Build directory the default output root is derived from (default: `build`).
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Task name the default output root is derived from.
    #[serde(default = "default_task_name")]
    pub task_name: String,

    /// Explicit output root. Overrides the derived one.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// What a non-idempotent delete failure does to the pass.
    #[serde(default)]
    pub delete_failures: DeleteFailurePolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            task_name: default_task_name(),
            dir: None,
            delete_failures: DeleteFailurePolicy::default(),
        }
    }
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_task_name() -> String {
    "classfoldCopyOutput".to_owned()
}

impl OutputConfig {
    /// `dir` if set, else `<build_dir>/intermediates/incremental/<task_name>`.
    #[must_use]
    pub fn output_root(&self) -> OutputRoot {
        self.dir.as_ref().map_or_else(
            || OutputRoot::for_task(&self.build_dir, &self.task_name),
            |dir| OutputRoot::new(dir.clone()),
        )
    }
}

// ---------------------------------------------------------------------------
// TransformConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    /// Resolver applied to every member (default: `identity`).
    #[serde(default)]
    pub resolver: ModifierResolver,

    /// Plugin discovery locations. Absent and `[]` are different settings.
    #[serde(default)]
    pub discovery: Option<DiscoverySet>,
}

impl TransformConfig {
    #[must_use]
    pub fn plugin_discovery(&self) -> PluginDiscovery {
        PluginDiscovery::new(self.discovery.clone())
    }

    /// A task using the configured resolver, with discovery settings applied.
    #[must_use]
    pub fn task(&self) -> TransformTask {
        let mut task = TransformTask::new(self.resolver);
        self.plugin_discovery().configure(&mut task);
        task
    }
}

impl ClassfoldConfig {
    #[must_use]
    pub fn watched_inputs(&self) -> WatchedInputs {
        WatchedInputs::new(self.inputs.roots.clone())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Why a `classfold.toml` could not be turned into a [`ClassfoldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but reading it failed.
    #[error("could not read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The text is not TOML, or names a setting or value classfold does not know.
    #[error("{}", render_invalid(file.as_deref(), *line, reason))]
    Invalid {
        /// Set once the text is known to come from a file.
        file: Option<PathBuf>,
        /// 1-based line of the offending span, when `toml` reports one.
        line: Option<usize>,
        reason: String,
    },
}

fn render_invalid(file: Option<&Path>, line: Option<usize>, reason: &str) -> String {
    let origin = file.map_or_else(|| "classfold config".to_owned(), |p| p.display().to_string());
    match line {
        Some(line) => format!("{origin}, line {line}: {reason}"),
        None => format!("{origin}: {reason}"),
    }
}

impl ClassfoldConfig {
    /// Read `path`. An absent file is not an error: every setting keeps its default.
    ///
    /// # Errors
    /// [`ConfigError::Unreadable`] when the file exists but cannot be read,
    /// [`ConfigError::Invalid`] (carrying `path`) when its contents are rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Unreadable {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Invalid { line, reason, .. } => ConfigError::Invalid {
                file: Some(path.to_owned()),
                line,
                reason,
            },
            other => other,
        })
    }

    /// Deserialize settings from TOML text.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] with the line of the first rejected span.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Invalid {
            file: None,
            line: e
                .span()
                .map(|span| text[..span.start].matches('\n').count() + 1),
            reason: e.message().to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
