//! Member flag resolution for classfold.
//!
//! A transformation pass asks a [`ModifierResolver`] which flags to emit for
//! each member it rewrites. The resolver reads the member's current flags
//! exactly once through [`MemberDescriptor`] and returns an adjusted
//! [`FlagSet`]; it never touches anything else on the member.
//!
//! # Crate layout
//!
//! - [`flags`] — the [`FlagSet`] bitmask and the named access-flag bits.
//! - [`member`] — the [`MemberDescriptor`] capability supplied by callers.
//! - [`resolver`] — the closed set of [`ModifierResolver`] variants.

pub mod flags;
pub mod member;
pub mod resolver;

pub use flags::FlagSet;
pub use member::{FixedFlags, MemberDescriptor};
pub use resolver::{ModifierResolver, ParseResolverError};
