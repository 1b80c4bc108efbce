//! Typed ID wrappers for domain entities.
//!
//! Catalog ids are database-assigned integers. The zero value marks an entity
//! that has not been persisted yet.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A strongly-typed wrapper for category IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i32);

impl CategoryId {
    /// Creates a category ID from its raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn into_inner(self) -> i32 {
        self.0
    }

    /// Returns true if this id was assigned by the store.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for CategoryId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A strongly-typed wrapper for product IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i32);

impl ProductId {
    /// Creates a product ID from its raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn into_inner(self) -> i32 {
        self.0
    }

    /// Returns true if this id was assigned by the store.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}
