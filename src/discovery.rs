//! Plugin discovery settings.
//!
//! classfold does not discover plugins itself. It only stores the locations a
//! discovery mechanism should search and passes them on to each transform
//! task. "No discovery requested" (`None`) and "discovery over zero
//! locations" (an empty set) are kept distinct.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::transform::TransformTask;

/// Ordered input locations to search for transformation plugins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoverySet(Vec<PathBuf>);

impl DiscoverySet {
    #[must_use]
    pub const fn new(locations: Vec<PathBuf>) -> Self {
        Self(locations)
    }

    #[must_use]
    pub fn locations(&self) -> &[PathBuf] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }
}

impl FromIterator<PathBuf> for DiscoverySet {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<PathBuf>> for DiscoverySet {
    fn from(locations: Vec<PathBuf>) -> Self {
        Self(locations)
    }
}

/// Extension-level discovery settings, applied to every transform task.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluginDiscovery {
    discovery_set: Option<DiscoverySet>,
}

impl PluginDiscovery {
    #[must_use]
    pub const fn new(discovery_set: Option<DiscoverySet>) -> Self {
        Self { discovery_set }
    }

    /// The locations to search, or `None` if no discovery is requested.
    #[must_use]
    pub const fn discovery_set(&self) -> Option<&DiscoverySet> {
        self.discovery_set.as_ref()
    }

    pub fn set_discovery_set(&mut self, discovery_set: Option<DiscoverySet>) {
        self.discovery_set = discovery_set;
    }

    /// Copy these settings onto `task`.
    pub fn configure(&self, task: &mut TransformTask) {
        task.set_discovery_set(self.discovery_set.clone());
    }
}
