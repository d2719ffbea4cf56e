use std::collections::HashSet;

use stockroute_core::{DomainError, DomainResult};

use crate::category::Category;
use crate::policy;
use crate::product::Product;

/// A delivery: a non-empty set of products placed as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    products: Vec<Product>,
}

impl Batch {
    /// Fails on an empty delivery or a product id repeated inside it.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        if products.is_empty() {
            return Err(DomainError::validation("batch cannot be empty"));
        }

        let mut seen = HashSet::with_capacity(products.len());
        for p in &products {
            if !seen.insert(p.id()) {
                return Err(DomainError::conflict(format!(
                    "product {} appears more than once in batch",
                    p.id()
                )));
            }
        }

        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.products.iter().map(Product::volume).sum()
    }

    pub fn target_category(&self) -> Category {
        policy::classify_batch(self.products.iter().map(Product::days_until_expiry))
    }
}
