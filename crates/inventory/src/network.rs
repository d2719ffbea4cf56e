//! The location network: registry, audit log and the operations a shell drives.

use std::collections::HashSet;

use stockroute_core::{
    DomainError, DomainResult, LocationId, ProductId, ProductIdAllocator, SupplierId,
};

use crate::allocation::{self, AllocationOutcome};
use crate::analysis::{self, NetworkReport};
use crate::audit::{AuditLog, Endpoint};
use crate::batch::Batch;
use crate::category::Category;
use crate::expiry::{self, ExpiryReport};
use crate::location::Location;
use crate::product::{Product, ProductEdit};
use crate::redistribution::{self, RedistributionReport};
use crate::transfer::{self, MoveReport};

/// Value held per location plus the network total.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub locations: Vec<LocationValue>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationValue {
    pub location: LocationId,
    pub category: Category,
    pub value: f64,
}

/// All locations in registration order, with their audit trail.
///
/// Invariants:
/// - location ids are unique
/// - a product id is held by at most one location
#[derive(Debug, Clone, Default)]
pub struct Network {
    locations: Vec<Location>,
    audit: AuditLog,
    product_ids: ProductIdAllocator,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four standard locations: one of each category.
    pub fn with_default_locations() -> DomainResult<Self> {
        let mut network = Self::new();
        let defaults = [
            (1, Category::Cold, 1000.0, "1 Cold Storage Way"),
            (2, Category::Sorting, 1500.0, "2 Central Avenue"),
            (3, Category::General, 2000.0, "3 Warehouse Row"),
            (4, Category::Disposal, 500.0, "4 Disposal Yard"),
        ];
        for (id, category, capacity, address) in defaults {
            network.register_location(Location::new(LocationId::new(id)?, category, capacity, address)?)?;
        }
        Ok(network)
    }

    /// Rebuild a network from reloaded locations and audit trail.
    pub fn from_parts(locations: Vec<Location>, audit: AuditLog) -> DomainResult<Self> {
        let mut network = Self {
            audit,
            ..Self::default()
        };
        for location in locations {
            network.register_location(location)?;
        }
        Ok(network)
    }

    pub fn register_location(&mut self, location: Location) -> DomainResult<()> {
        if self.location(location.id()).is_some() {
            return Err(DomainError::conflict(format!(
                "location {} already registered",
                location.id()
            )));
        }
        if let Some(p) = location.products().iter().find(|p| self.holds(p.id())) {
            return Err(DomainError::conflict(format!(
                "product {} is already held by another location",
                p.id()
            )));
        }

        for p in location.products() {
            self.product_ids.observe(p.id());
        }
        tracing::info!(
            location = %location.id(),
            category = %location.category(),
            capacity = location.capacity(),
            "location registered"
        );
        self.locations.push(location);
        Ok(())
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id() == id)
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn clear_audit(&mut self) {
        tracing::info!(entries = self.audit.len(), "audit log cleared");
        self.audit.clear();
    }

    /// Construct a product with the next free id.
    pub fn new_product(
        &mut self,
        supplier_id: SupplierId,
        name: impl Into<String>,
        volume: f64,
        price: f64,
        days_until_expiry: i32,
    ) -> DomainResult<Product> {
        let id = self.product_ids.peek()?;
        let product = Product::new(id, supplier_id, name, volume, price, days_until_expiry)?;
        self.product_ids.allocate()?;
        Ok(product)
    }

    pub fn product_count(&self) -> usize {
        self.locations.iter().map(Location::len).sum()
    }

    pub fn holds(&self, product_id: ProductId) -> bool {
        self.find_product(product_id).is_some()
    }

    /// The location holding a product, and the product.
    pub fn find_product(&self, product_id: ProductId) -> Option<(&Location, &Product)> {
        self.locations
            .iter()
            .find_map(|l| l.get(product_id).map(|p| (l, p)))
    }

    /// Validate and place a delivery.
    ///
    /// Validation failures (empty batch, repeated or already-held ids) leave the
    /// network unchanged and are returned as errors. A capacity shortfall is a
    /// normal outcome: `Ok(AllocationOutcome::Rejected { .. })`.
    pub fn submit_batch(&mut self, products: Vec<Product>) -> DomainResult<AllocationOutcome> {
        let batch = match self.validate_batch(products) {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(error = %err, "batch refused");
                self.audit.record(format!("batch refused: {err}"));
                return Err(err);
            }
        };
        for p in batch.products() {
            self.product_ids.observe(p.id());
        }
        Ok(allocation::allocate(&mut self.locations, batch, &mut self.audit))
    }

    /// Record a delivery record that was dropped before it became a product.
    pub fn record_skipped_delivery(&mut self, index: usize, name: Option<&str>, reason: &str) {
        let name = name.filter(|n| !n.trim().is_empty()).unwrap_or("unnamed");
        tracing::warn!(index, name, reason, "delivery record skipped");
        self.audit
            .record(format!("delivery record {index} ('{name}') skipped: {reason}"));
    }

    fn validate_batch(&self, products: Vec<Product>) -> DomainResult<Batch> {
        let batch = Batch::new(products)?;
        if let Some(p) = batch.products().iter().find(|p| self.holds(p.id())) {
            return Err(DomainError::conflict(format!(
                "product {} is already held in the network",
                p.id()
            )));
        }
        Ok(batch)
    }

    pub fn run_redistribution(&mut self, scope: Option<LocationId>) -> DomainResult<RedistributionReport> {
        self.ensure_scope(scope)?;
        let report = redistribution::redistribute(&mut self.locations, scope, &mut self.audit);
        tracing::info!(
            moved = report.moved(),
            stranded = report.stranded.len(),
            "redistribution finished"
        );
        Ok(report)
    }

    pub fn run_expiry_sweep(&mut self, scope: Option<LocationId>) -> DomainResult<ExpiryReport> {
        self.ensure_scope(scope)?;
        expiry::sweep_expired(&mut self.locations, scope, &mut self.audit)
    }

    pub fn manual_move(
        &mut self,
        from: LocationId,
        to: LocationId,
        products: &[ProductId],
    ) -> DomainResult<MoveReport> {
        transfer::move_products(&mut self.locations, from, to, products, &mut self.audit)
    }

    pub fn analyze(&self) -> NetworkReport {
        analysis::analyze(&self.locations)
    }

    pub fn valuation(&self) -> Valuation {
        let locations: Vec<LocationValue> = self
            .locations
            .iter()
            .map(|l| LocationValue {
                location: l.id(),
                category: l.category(),
                value: l.total_value(),
            })
            .collect();
        let total = locations.iter().map(|l| l.value).sum();
        Valuation { locations, total }
    }

    /// Administrative rename/reprice. Identity, volume, shelf life and
    /// location are never touched.
    pub fn edit_product(&mut self, product_id: ProductId, edit: &ProductEdit) -> DomainResult<()> {
        if edit.is_empty() {
            return Err(DomainError::validation("product edit changes nothing"));
        }
        let product = self
            .locations
            .iter_mut()
            .find_map(|l| l.get_mut(product_id))
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
        product.apply_edit(edit)?;

        let message = format!(
            "product {} edited: name '{}', price {:.2}",
            product_id,
            product.name(),
            product.price()
        );
        tracing::info!(product = %product_id, "product edited");
        self.audit.record(message);
        Ok(())
    }

    /// Remove a product from the system entirely.
    pub fn delete_product(&mut self, product_id: ProductId) -> DomainResult<Product> {
        let location = self
            .locations
            .iter_mut()
            .find(|l| l.contains(product_id))
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
        let from = Endpoint::of(location);
        let product = location.remove(product_id)?;

        tracing::info!(product = %product_id, "product deleted");
        self.audit.record(format!(
            "deleted product '{}' (id {}, volume {:.1}) from {}",
            product.name(),
            product.id(),
            product.volume(),
            from
        ));
        Ok(product)
    }

    pub fn edit_location_address(&mut self, id: LocationId, address: impl Into<String>) -> DomainResult<()> {
        let location = self
            .locations
            .iter_mut()
            .find(|l| l.id() == id)
            .ok_or_else(|| DomainError::not_found(format!("location {id}")))?;
        location.set_address(address)?;
        self.audit
            .record(format!("location {id} address changed to '{}'", location.address()));
        Ok(())
    }

    fn ensure_scope(&self, scope: Option<LocationId>) -> DomainResult<()> {
        match scope {
            Some(id) if self.location(id).is_none() => {
                Err(DomainError::not_found(format!("location {id}")))
            }
            _ => Ok(()),
        }
    }

    /// Ids held across the network, for invariant checks.
    pub fn held_product_ids(&self) -> HashSet<ProductId> {
        self.locations
            .iter()
            .flat_map(|l| l.products().iter().map(Product::id))
            .collect()
    }
}
