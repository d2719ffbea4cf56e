//! Aggregate root trait for mutable domain models.

use crate::entity::Entity;

/// Aggregate root: an entity that guards its own invariants.
///
/// Every state-changing operation on an aggregate either applies completely or
/// leaves the aggregate untouched, and bumps `version()` exactly once when it
/// applies.
pub trait AggregateRoot: Entity {
    /// Monotonically increasing count of applied mutations.
    fn version(&self) -> u64;
}
