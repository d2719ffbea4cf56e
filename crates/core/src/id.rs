//! Strongly-typed identifiers used across the domain.
//!
//! All identifiers are positive integers. Zero and negative values are rejected
//! at construction, including when deserialized.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a product (unique system-wide).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ProductId(u32);

/// Identifier of a storage location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct LocationId(u32);

/// Identifier of the supplier that owns a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct SupplierId(u32);

macro_rules! impl_positive_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier, rejecting zero.
            pub fn new(raw: u32) -> DomainResult<Self> {
                if raw == 0 {
                    return Err(DomainError::validation(format!(
                        "{} must be a positive integer",
                        $name
                    )));
                }
                Ok(Self(raw))
            }

            pub fn get(&self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl TryFrom<i64> for $t {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                let raw = u32::try_from(value).map_err(|_| {
                    DomainError::validation(format!(
                        "{} must be a positive integer, got {}",
                        $name, value
                    ))
                })?;
                Self::new(raw)
            }
        }

        impl From<$t> for u32 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Self::try_from(raw)
            }
        }
    };
}

impl_positive_id!(ProductId, "ProductId");
impl_positive_id!(LocationId, "LocationId");
impl_positive_id!(SupplierId, "SupplierId");

/// Hands out product ids for newly created products.
///
/// Ids supplied from outside (imports, reloaded snapshots) must be reported via
/// [`ProductIdAllocator::observe`] so that later allocations never collide with them.
/// Once `u32::MAX` has been handed out or observed, allocation fails.
#[derive(Debug, Clone)]
pub struct ProductIdAllocator {
    // One past the largest id in use; may reach `u32::MAX + 1`.
    next: u64,
}

impl ProductIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocator whose next id is one past the largest observed id.
    pub fn after<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut allocator = Self::new();
        for id in ids {
            allocator.observe(id);
        }
        allocator
    }

    pub fn allocate(&mut self) -> DomainResult<ProductId> {
        let id = self.peek()?;
        self.next += 1;
        Ok(id)
    }

    /// Record an externally supplied id.
    pub fn observe(&mut self, id: ProductId) {
        self.next = self.next.max(u64::from(id.0) + 1);
    }

    /// The id the next call to `allocate` will return.
    pub fn peek(&self) -> DomainResult<ProductId> {
        u32::try_from(self.next)
            .map(ProductId)
            .map_err(|_| DomainError::conflict("product id space exhausted"))
    }
}

impl Default for ProductIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
