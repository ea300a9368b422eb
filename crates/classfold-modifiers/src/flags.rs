//! Member flag bitmask.
//!
//! Bits follow the JVM method access-flag layout. Each bit is independent:
//! clearing one never disturbs another.

use std::fmt;
use std::num::ParseIntError;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

/// A set of structural member flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagSet(u32);

impl FlagSet {
    pub const EMPTY: Self = Self(0);
    pub const PUBLIC: Self = Self(0x0001);
    pub const PRIVATE: Self = Self(0x0002);
    pub const PROTECTED: Self = Self(0x0004);
    pub const STATIC: Self = Self(0x0008);
    pub const FINAL: Self = Self(0x0010);
    /// The member acquires the receiver's monitor on invocation.
    pub const SYNCHRONIZED: Self = Self(0x0020);
    pub const BRIDGE: Self = Self(0x0040);
    pub const VARARGS: Self = Self(0x0080);
    pub const NATIVE: Self = Self(0x0100);
    pub const ABSTRACT: Self = Self(0x0400);
    pub const STRICT: Self = Self(0x0800);
    pub const SYNTHETIC: Self = Self(0x1000);

    const NAMED: [(Self, &'static str); 12] = [
        (Self::PUBLIC, "public"),
        (Self::PRIVATE, "private"),
        (Self::PROTECTED, "protected"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::SYNCHRONIZED, "synchronized"),
        (Self::BRIDGE, "bridge"),
        (Self::VARARGS, "varargs"),
        (Self::NATIVE, "native"),
        (Self::ABSTRACT, "abstract"),
        (Self::STRICT, "strict"),
        (Self::SYNTHETIC, "synthetic"),
    ];

    /// Wrap raw bits. Unknown bits are kept as-is.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `self` with the bits of `other` cleared.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// `self` with the bits of `other` set.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Names of the known bits that are set, lowest bit first.
    ///
    /// Bits with no name are not listed; see [`FlagSet::unnamed_bits`].
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Bits that are set but have no name in this layout.
    #[must_use]
    pub fn unnamed_bits(self) -> Self {
        let named = Self::NAMED
            .iter()
            .fold(Self::EMPTY, |acc, (flag, _)| acc.with(*flag));
        self.without(named)
    }
}

impl BitOr for FlagSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl BitAnd for FlagSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for FlagSet {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl From<u32> for FlagSet {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<FlagSet> for u32 {
    fn from(flags: FlagSet) -> Self {
        flags.0
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Accepts decimal (`42`) or hex (`0x2a`).
impl FromStr for FlagSet {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16)?,
            None => s.parse()?,
        };
        Ok(Self(bits))
    }
}
