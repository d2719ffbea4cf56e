//! Capacity-bounded storage location.

use stockroute_core::{AggregateRoot, DomainError, DomainResult, Entity, LocationId, ProductId};

use crate::category::Category;
use crate::product::Product;

/// A storage location ("warehouse").
///
/// Invariants: the summed volume of held products never exceeds `capacity`
/// (within [`VOLUME_TOLERANCE`]), and no product id is held twice.
/// Every mutation either applies completely or leaves the location untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    id: LocationId,
    category: Category,
    capacity: f64,
    address: String,
    products: Vec<Product>,
    version: u64,
}

/// Slack allowed when comparing volumes, so that an exact fit survives
/// floating-point rounding (e.g. 0.6 + 1.1 against a capacity of 1.7).
pub const VOLUME_TOLERANCE: f64 = 1e-9;

/// An `add` the location refused. Hands the product back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddRefused {
    #[error("location {location} has {free:.1} free, product {} needs {:.1}", .product.id(), .product.volume())]
    NoRoom {
        location: LocationId,
        free: f64,
        product: Product,
    },
    #[error("location {location} already holds product {}", .product.id())]
    AlreadyHeld { location: LocationId, product: Product },
}

impl AddRefused {
    pub fn location(&self) -> LocationId {
        match self {
            AddRefused::NoRoom { location, .. } | AddRefused::AlreadyHeld { location, .. } => *location,
        }
    }

    pub fn product(&self) -> &Product {
        match self {
            AddRefused::NoRoom { product, .. } | AddRefused::AlreadyHeld { product, .. } => product,
        }
    }

    pub fn into_product(self) -> Product {
        match self {
            AddRefused::NoRoom { product, .. } | AddRefused::AlreadyHeld { product, .. } => product,
        }
    }

    pub fn is_no_room(&self) -> bool {
        matches!(self, AddRefused::NoRoom { .. })
    }
}

impl From<&AddRefused> for DomainError {
    fn from(value: &AddRefused) -> Self {
        match value {
            AddRefused::NoRoom {
                location,
                free,
                product,
            } => DomainError::capacity_exceeded(*location, product.volume(), *free),
            AddRefused::AlreadyHeld { .. } => DomainError::conflict(value.to_string()),
        }
    }
}

impl From<AddRefused> for DomainError {
    fn from(value: AddRefused) -> Self {
        DomainError::from(&value)
    }
}

impl Location {
    pub fn new(
        id: LocationId,
        category: Category,
        capacity: f64,
        address: impl Into<String>,
    ) -> DomainResult<Self> {
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(DomainError::validation(format!(
                "location capacity must be positive, got {capacity}"
            )));
        }
        let address = address.into();
        validate_address(&address)?;

        Ok(Self {
            id,
            category,
            capacity,
            address,
            products: Vec::new(),
            version: 0,
        })
    }

    /// Rebuild a location with its held products (e.g. from a snapshot).
    ///
    /// Fails if the products overflow the capacity or repeat an id.
    pub fn restore(
        id: LocationId,
        category: Category,
        capacity: f64,
        address: impl Into<String>,
        products: impl IntoIterator<Item = Product>,
    ) -> DomainResult<Self> {
        let mut location = Self::new(id, category, capacity, address)?;
        for product in products {
            location.add(product)?;
        }
        Ok(location)
    }

    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn occupied_volume(&self) -> f64 {
        self.products.iter().map(Product::volume).sum()
    }

    pub fn free_volume(&self) -> f64 {
        (self.capacity - self.occupied_volume()).max(0.0)
    }

    pub fn total_value(&self) -> f64 {
        self.products.iter().map(Product::price).sum()
    }

    /// Whether `volume` more would stay within capacity. The one capacity test
    /// used by `add` and by every destination search.
    pub fn can_fit(&self, volume: f64) -> bool {
        self.occupied_volume() + volume <= self.capacity + VOLUME_TOLERANCE
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == product_id)
    }

    /// Append `product` if it fits and its id is not already held here;
    /// otherwise return it inside the error.
    pub fn add(&mut self, product: Product) -> Result<(), AddRefused> {
        if self.contains(product.id()) {
            return Err(AddRefused::AlreadyHeld {
                location: self.id,
                product,
            });
        }
        if !self.can_fit(product.volume()) {
            return Err(AddRefused::NoRoom {
                location: self.id,
                free: self.free_volume(),
                product,
            });
        }
        self.products.push(product);
        self.version += 1;
        Ok(())
    }

    /// Remove the product with this id.
    pub fn remove(&mut self, product_id: ProductId) -> DomainResult<Product> {
        let index = self.position(product_id).ok_or_else(|| {
            DomainError::not_found(format!("product {product_id} in location {}", self.id))
        })?;
        self.version += 1;
        Ok(self.products.remove(index))
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> DomainResult<()> {
        let address = address.into();
        validate_address(&address)?;
        self.address = address;
        self.version += 1;
        Ok(())
    }

    pub(crate) fn position(&self, product_id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.id() == product_id)
    }

    pub(crate) fn get_mut(&mut self, product_id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id() == product_id)
    }

    /// Put back a product removed from `index` by a relocation that did not
    /// complete. The volume was held here a moment ago, so capacity still holds.
    pub(crate) fn reinsert(&mut self, index: usize, product: Product) {
        let index = index.min(self.products.len());
        self.products.insert(index, product);
        self.version += 1;
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> LocationId {
        self.id
    }
}

impl AggregateRoot for Location {
    fn version(&self) -> u64 {
        self.version
    }
}

fn validate_address(address: &str) -> DomainResult<()> {
    if address.trim().is_empty() {
        return Err(DomainError::validation("location address cannot be empty"));
    }
    Ok(())
}
