//! Inventory routing engine.
//!
//! Tracks capacity-bounded storage locations and routes perishable stock into
//! them by shelf life: batch allocation, redistribution out of Sorting, the
//! expiry sweep to Disposal, operator moves and read-only network analysis.
//! Pure in-memory domain logic; persistence and console I/O live elsewhere.

pub mod allocation;
pub mod analysis;
pub mod audit;
pub mod batch;
pub mod category;
pub mod expiry;
pub mod location;
pub mod network;
pub mod policy;
pub mod product;
pub mod redistribution;
pub mod transfer;

pub use allocation::AllocationOutcome;
pub use analysis::{LocationReport, NetworkReport, Violation, ViolationKind};
pub use audit::{AuditEntry, AuditLog, Endpoint};
pub use batch::Batch;
pub use category::Category;
pub use expiry::ExpiryReport;
pub use location::{AddRefused, Location, VOLUME_TOLERANCE};
pub use network::{LocationValue, Network, Valuation};
pub use product::{Product, ProductEdit};
pub use redistribution::{RedistributionReport, Stranded};
pub use transfer::{MoveReport, Relocation, Skipped};
