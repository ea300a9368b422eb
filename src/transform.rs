//! Transform task settings and member flag resolution.

use classfold_modifiers::{FlagSet, MemberDescriptor, ModifierResolver};

use crate::discovery::DiscoverySet;

/// Settings for one transformation pass.
///
/// The resolver is fixed for the lifetime of the task; every member in the
/// pass goes through the same variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformTask {
    resolver: ModifierResolver,
    discovery_set: Option<DiscoverySet>,
}

impl TransformTask {
    #[must_use]
    pub const fn new(resolver: ModifierResolver) -> Self {
        Self {
            resolver,
            discovery_set: None,
        }
    }

    #[must_use]
    pub const fn resolver(&self) -> ModifierResolver {
        self.resolver
    }

    #[must_use]
    pub const fn discovery_set(&self) -> Option<&DiscoverySet> {
        self.discovery_set.as_ref()
    }

    pub fn set_discovery_set(&mut self, discovery_set: Option<DiscoverySet>) {
        self.discovery_set = discovery_set;
    }

    /// Flags to emit for each member, in order.
    ///
    /// # Errors
    /// Stops at the first member whose flags cannot be read and returns that
    /// member's error unmodified.
    pub fn resolve_all<'m, M, I>(&self, members: I, implemented: bool) -> Result<Vec<FlagSet>, M::Error>
    where
        M: MemberDescriptor + ?Sized + 'm,
        I: IntoIterator<Item = &'m M>,
    {
        members
            .into_iter()
            .map(|member| self.resolver.transform(member, implemented))
            .collect()
    }
}
