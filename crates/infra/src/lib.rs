//! Infrastructure layer: JSON interchange and file storage for the network.

pub mod delivery;
pub mod error;
pub mod snapshot;
pub mod store;

pub use delivery::{import_delivery, DeliveryImport, SkippedRecord};
pub use error::{InterchangeError, InterchangeResult};
pub use snapshot::{export_locations, restore_locations, LocationSnapshot, ProductRecord};
pub use store::FileStore;
