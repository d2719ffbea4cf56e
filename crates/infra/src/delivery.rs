//! Delivery import: a JSON array of product records.
//!
//! Each record is validated on its own; a bad record is skipped and reported,
//! never fatal to the rest of the file.

use serde_json::Value as JsonValue;

use stockroute_inventory::Product;

use crate::error::{InterchangeError, InterchangeResult};
use crate::snapshot::ProductRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position in the source array.
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryImport {
    pub products: Vec<Product>,
    pub skipped: Vec<SkippedRecord>,
}

pub fn import_delivery(json: &str) -> InterchangeResult<DeliveryImport> {
    let records: Vec<JsonValue> =
        serde_json::from_str(json).map_err(|e| InterchangeError::json("delivery", e))?;
    if records.is_empty() {
        return Err(InterchangeError::EmptyDelivery);
    }

    let mut import = DeliveryImport::default();
    for (index, raw) in records.into_iter().enumerate() {
        let name = raw.get("name").and_then(JsonValue::as_str).map(str::to_string);
        let parsed = serde_json::from_value::<ProductRecord>(raw)
            .map_err(|e| e.to_string())
            .and_then(|record| Product::try_from(record).map_err(|e| e.to_string()));

        match parsed {
            Ok(product) => import.products.push(product),
            Err(reason) => {
                tracing::warn!(index, name = ?name, %reason, "skipping delivery record");
                import.skipped.push(SkippedRecord { index, name, reason });
            }
        }
    }

    tracing::info!(
        loaded = import.products.len(),
        skipped = import.skipped.len(),
        "delivery imported"
    );
    Ok(import)
}
