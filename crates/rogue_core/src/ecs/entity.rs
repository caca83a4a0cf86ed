//! # Entity Identifiers
//!
//! Entities are opaque 64-bit identifiers. The database hands them out from
//! a monotonically increasing counter starting at 1 and never reuses them,
//! so a stale id can never alias a newer entity.

use std::fmt;

/// Unique identifier for a bundle of components.
///
/// `Entity(0)` is reserved as [`Entity::NONE`], the "no entity" sentinel
/// stored in empty map cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// The reserved "no entity" value.
    pub const NONE: Self = Self(0);

    /// Wraps a raw identifier.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Checks if this is the sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Checks if this refers to an actual entity.
    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for Entity {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic entity id allocator.
///
/// Starts at 1 so the sentinel is never issued.
#[derive(Debug)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    /// Creates an allocator whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Issues the next id.
    ///
    /// # Panics
    ///
    /// Panics if the 64-bit id space is exhausted.
    #[inline]
    pub fn allocate(&mut self) -> Entity {
        let id = self.next;
        self.next = self
            .next
            .checked_add(1)
            .unwrap_or_else(|| panic!("entity id space exhausted"));
        Entity(id)
    }

    /// Returns the id the next call to [`allocate`](Self::allocate) will issue.
    #[inline]
    #[must_use]
    pub const fn peek(&self) -> Entity {
        Entity(self.next)
    }

    /// Number of ids issued so far.
    #[inline]
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
