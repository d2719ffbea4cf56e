use stockroute_core::{DomainError, DomainResult, Entity, ProductId, SupplierId};

use crate::policy;

/// A unit of perishable stock.
///
/// Identity, volume and shelf life are fixed at construction; only the name and
/// price can be changed afterwards (see [`ProductEdit`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    supplier_id: SupplierId,
    name: String,
    volume: f64,
    price: f64,
    days_until_expiry: i32,
}

impl Product {
    pub fn new(
        id: ProductId,
        supplier_id: SupplierId,
        name: impl Into<String>,
        volume: f64,
        price: f64,
        days_until_expiry: i32,
    ) -> DomainResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        if !(volume.is_finite() && volume > 0.0) {
            return Err(DomainError::validation(format!(
                "product volume must be positive, got {volume}"
            )));
        }
        validate_price(price)?;

        Ok(Self {
            id,
            supplier_id,
            name,
            volume,
            price,
            days_until_expiry,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn days_until_expiry(&self) -> i32 {
        self.days_until_expiry
    }

    pub fn is_expired(&self) -> bool {
        policy::is_expired(self.days_until_expiry)
    }

    /// Apply an administrative edit. Either every field applies or none does.
    pub(crate) fn apply_edit(&mut self, edit: &ProductEdit) -> DomainResult<()> {
        if let Some(name) = &edit.name {
            validate_name(name)?;
        }
        if let Some(price) = edit.price {
            validate_price(price)?;
        }

        if let Some(name) = &edit.name {
            self.name = name.clone();
        }
        if let Some(price) = edit.price {
            self.price = price;
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Administrative rename/reprice. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductEdit {
    pub name: Option<String>,
    pub price: Option<f64>,
}

impl ProductEdit {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            price: None,
        }
    }

    pub fn reprice(price: f64) -> Self {
        Self {
            name: None,
            price: Some(price),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("product name cannot be empty"));
    }
    Ok(())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !(price.is_finite() && price >= 0.0) {
        return Err(DomainError::validation(format!(
            "product price cannot be negative, got {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    fn sid() -> SupplierId {
        SupplierId::new(1).unwrap()
    }

    #[test]
    fn valid_product_is_created() {
        let p = Product::new(pid(1), sid(), "Milk", 2.5, 80.0, 7).unwrap();
        assert_eq!(p.name(), "Milk");
        assert_eq!(p.volume(), 2.5);
        assert!(!p.is_expired());
    }

    #[test]
    fn rejects_empty_name() {
        let err = Product::new(pid(1), sid(), "   ", 1.0, 1.0, 7).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn rejects_non_positive_volume() {
        assert!(Product::new(pid(1), sid(), "Milk", 0.0, 1.0, 7).is_err());
        assert!(Product::new(pid(1), sid(), "Milk", -2.0, 1.0, 7).is_err());
        assert!(Product::new(pid(1), sid(), "Milk", f64::NAN, 1.0, 7).is_err());
    }

    #[test]
    fn rejects_negative_price_but_allows_zero() {
        assert!(Product::new(pid(1), sid(), "Milk", 1.0, -0.01, 7).is_err());
        assert!(Product::new(pid(1), sid(), "Sample", 1.0, 0.0, 7).is_ok());
    }

    #[test]
    fn negative_expiry_is_allowed_and_expired() {
        let p = Product::new(pid(1), sid(), "Old bread", 1.0, 1.0, -2).unwrap();
        assert!(p.is_expired());
    }

    #[test]
    fn invalid_edit_leaves_product_unchanged() {
        let mut p = Product::new(pid(1), sid(), "Milk", 1.0, 10.0, 7).unwrap();
        let edit = ProductEdit {
            name: Some("Cream".to_string()),
            price: Some(-5.0),
        };
        assert!(p.apply_edit(&edit).is_err());
        assert_eq!(p.name(), "Milk");
        assert_eq!(p.price(), 10.0);

        p.apply_edit(&ProductEdit::rename("Cream")).unwrap();
        p.apply_edit(&ProductEdit::reprice(12.0)).unwrap();
        assert_eq!(p.name(), "Cream");
        assert_eq!(p.price(), 12.0);
        assert_eq!(p.id(), pid(1));
    }
}
