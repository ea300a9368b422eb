//! The member capability a resolver is allowed to use.

use std::convert::Infallible;

use crate::flags::FlagSet;

/// A structural member (method-like entity) whose flags can be queried.
///
/// This is the only capability a [`ModifierResolver`](crate::ModifierResolver)
/// needs. Implementations are supplied by whatever owns the member model;
/// resolvers treat them as read-only.
pub trait MemberDescriptor {
    /// Error raised while computing the flags. Resolvers propagate it as-is.
    type Error;

    /// Flags of the member as they would be emitted.
    ///
    /// `implemented` is true when the member is being materialized as part of
    /// an implementation, false for any other context (e.g. an abstract
    /// declaration).
    ///
    /// # Errors
    /// Whatever the underlying member model fails with.
    fn current_flags(&self, implemented: bool) -> Result<FlagSet, Self::Error>;
}

/// A member whose flags are known up front and independent of context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedFlags(pub FlagSet);

impl MemberDescriptor for FixedFlags {
    type Error = Infallible;

    fn current_flags(&self, _implemented: bool) -> Result<FlagSet, Infallible> {
        Ok(self.0)
    }
}
