//! Exported shape of the location network.
//!
//! This is the only place categories cross the string boundary.

use serde::{Deserialize, Serialize};

use stockroute_core::{DomainError, DomainResult, LocationId, ProductId, SupplierId};
use stockroute_inventory::{Category, Location, Product};

/// Product as it appears in snapshots and delivery files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i64,
    pub supplier_id: i64,
    #[serde(default)]
    pub name: String,
    pub volume: f64,
    pub price: f64,
    pub days_until_expiry: i32,
}

impl From<&Product> for ProductRecord {
    fn from(p: &Product) -> Self {
        Self {
            id: i64::from(p.id().get()),
            supplier_id: i64::from(p.supplier_id().get()),
            name: p.name().to_string(),
            volume: p.volume(),
            price: p.price(),
            days_until_expiry: p.days_until_expiry(),
        }
    }
}

/// Applies the same validation as batch submission.
impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(r: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(
            ProductId::try_from(r.id)?,
            SupplierId::try_from(r.supplier_id)?,
            r.name,
            r.volume,
            r.price,
            r.days_until_expiry,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    pub id: u32,
    pub category: String,
    pub capacity: f64,
    pub address: String,
    pub occupied_volume: f64,
    pub free_volume: f64,
    pub product_count: usize,
    pub products: Vec<ProductRecord>,
}

impl From<&Location> for LocationSnapshot {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id().get(),
            category: l.category().to_string(),
            capacity: l.capacity(),
            address: l.address().to_string(),
            occupied_volume: l.occupied_volume(),
            free_volume: l.free_volume(),
            product_count: l.len(),
            products: l.products().iter().map(ProductRecord::from).collect(),
        }
    }
}

pub fn export_locations(locations: &[Location]) -> Vec<LocationSnapshot> {
    locations.iter().map(LocationSnapshot::from).collect()
}

/// Rebuild locations from a snapshot.
///
/// The derived fields (`occupiedVolume`, `freeVolume`, `productCount`) are
/// recomputed, not trusted; a mismatch is logged.
pub fn restore_locations(snapshots: Vec<LocationSnapshot>) -> DomainResult<Vec<Location>> {
    snapshots.into_iter().map(restore_location).collect()
}

fn restore_location(s: LocationSnapshot) -> DomainResult<Location> {
    let id = LocationId::new(s.id)?;
    let category: Category = s.category.parse()?;
    let products = s
        .products
        .into_iter()
        .map(Product::try_from)
        .collect::<DomainResult<Vec<_>>>()?;

    let location = Location::restore(id, category, s.capacity, s.address, products)?;
    if location.len() != s.product_count || location.occupied_volume() != s.occupied_volume {
        tracing::warn!(
            location = %id,
            recorded = s.occupied_volume,
            actual = location.occupied_volume(),
            "snapshot totals disagree with product list"
        );
    }
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location_with_products() -> Location {
        let mut loc =
            Location::new(LocationId::new(3).unwrap(), Category::General, 200.0, "3 Warehouse Row").unwrap();
        for (id, volume) in [(1u32, 50.0), (2, 30.0), (3, 40.0)] {
            loc.add(
                Product::new(
                    ProductId::new(id).unwrap(),
                    SupplierId::new(9).unwrap(),
                    format!("crate-{id}"),
                    volume,
                    12.5,
                    200,
                )
                .unwrap(),
            )
            .unwrap();
        }
        loc
    }

    #[test]
    fn snapshot_uses_exported_field_names() {
        let snapshot = LocationSnapshot::from(&location_with_products());
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["category"], "General");
        assert_eq!(json["occupiedVolume"], 120.0);
        assert_eq!(json["freeVolume"], 80.0);
        assert_eq!(json["productCount"], 3);
        assert_eq!(json["products"][0]["supplierId"], 9);
        assert_eq!(json["products"][0]["daysUntilExpiry"], 200);
    }

    #[test]
    fn products_reimported_into_fresh_location_match() {
        let original = location_with_products();
        let json = serde_json::to_string(&export_locations(std::slice::from_ref(&original))).unwrap();
        let parsed: Vec<LocationSnapshot> = serde_json::from_str(&json).unwrap();

        let mut fresh =
            Location::new(original.id(), original.category(), original.capacity(), "elsewhere").unwrap();
        for record in parsed[0].products.clone() {
            fresh.add(Product::try_from(record).unwrap()).unwrap();
        }

        assert_eq!(fresh.occupied_volume(), original.occupied_volume());
        let ids = |l: &Location| l.products().iter().map(|p| p.id()).collect::<Vec<_>>();
        assert_eq!(ids(&fresh), ids(&original));
    }

    #[test]
    fn restore_rebuilds_locations() {
        let snapshots = export_locations(&[location_with_products()]);
        let restored = restore_locations(snapshots).unwrap();
        assert_eq!(restored[0].category(), Category::General);
        assert_eq!(restored[0].occupied_volume(), 120.0);
    }

    #[test]
    fn restore_rejects_unknown_category() {
        let mut snapshots = export_locations(&[location_with_products()]);
        snapshots[0].category = "Freezer".to_string();
        assert!(restore_locations(snapshots).is_err());
    }
}
