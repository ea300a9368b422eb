//! Resolver variants that compute the flags to emit for a member.
//!
//! The set of variants is closed. Every variant:
//!
//! - reads the member exactly once, via
//!   [`MemberDescriptor::current_flags`], forwarding the context flag verbatim;
//! - touches nothing else on the member;
//! - is stateless, so all values of a variant are interchangeable.
//!
//! A pipeline picks one variant at configuration time and uses it for every
//! member it processes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flags::FlagSet;
use crate::member::MemberDescriptor;

/// Strategy that adjusts a member's flags before they are emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierResolver {
    /// Emit the member's flags unchanged.
    #[default]
    Identity,
    /// Emit the member's flags with [`FlagSet::SYNCHRONIZED`] cleared.
    Desynchronizing,
}

impl ModifierResolver {
    /// Every known variant.
    pub const ALL: [Self; 2] = [Self::Identity, Self::Desynchronizing];

    /// Compute the flags to emit for `member`.
    ///
    /// # Errors
    /// Returns the member's own error unmodified if reading its flags fails.
    pub fn transform<M>(self, member: &M, implemented: bool) -> Result<FlagSet, M::Error>
    where
        M: MemberDescriptor + ?Sized,
    {
        let flags = member.current_flags(implemented)?;
        Ok(match self {
            Self::Identity => flags,
            Self::Desynchronizing => flags.without(FlagSet::SYNCHRONIZED),
        })
    }

    /// The configuration name of this variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Desynchronizing => "desynchronizing",
        }
    }
}

impl fmt::Display for ModifierResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unknown resolver name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown modifier resolver '{name}' (expected one of: identity, desynchronizing)")]
pub struct ParseResolverError {
    /// The name that did not match any variant.
    pub name: String,
}

impl FromStr for ModifierResolver {
    type Err = ParseResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseResolverError { name: s.to_owned() })
    }
}
