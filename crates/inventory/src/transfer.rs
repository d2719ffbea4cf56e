//! Single-item relocation and operator-directed moves.

use stockroute_core::{DomainError, DomainResult, LocationId, ProductId};

use crate::audit::{AuditLog, Endpoint};
use crate::location::Location;

/// A completed relocation of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    pub product: ProductId,
    pub volume: f64,
    pub from: LocationId,
    pub to: LocationId,
}

/// A product an operation left where it was, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub product: ProductId,
    pub reason: DomainError,
}

/// Outcome of [`move_products`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveReport {
    pub moved: Vec<Relocation>,
    pub skipped: Vec<Skipped>,
}

pub(crate) fn index_of(locations: &[Location], id: LocationId) -> Option<usize> {
    locations.iter().position(|l| l.id() == id)
}

/// Move one product between two locations as a single step.
///
/// Either the product ends up in `to`, or it is back in `from` at its original
/// position with both locations holding exactly what they held before.
/// Records the move in `audit`.
pub(crate) fn relocate(
    locations: &mut [Location],
    from: usize,
    to: usize,
    product_id: ProductId,
    audit: &mut AuditLog,
) -> DomainResult<Relocation> {
    let source = &mut locations[from];
    let source_id = source.id();
    let index = source.position(product_id).ok_or_else(|| {
        DomainError::not_found(format!("product {product_id} in location {source_id}"))
    })?;
    let product = source.remove(product_id)?;
    let from_end = Endpoint::of(source);
    let volume = product.volume();

    if let Err(rejected) = locations[to].add(product) {
        let err = DomainError::from(&rejected);
        locations[from].reinsert(index, rejected.into_product());
        return Err(err);
    }

    let destination = &locations[to];
    if let Some(product) = destination.get(product_id) {
        audit.record_movement(product, from_end, Endpoint::of(destination));
    }
    let relocation = Relocation {
        product: product_id,
        volume,
        from: source_id,
        to: destination.id(),
    };
    tracing::info!(
        product = %product_id,
        from = %relocation.from,
        to = %relocation.to,
        volume = relocation.volume,
        "product relocated"
    );
    Ok(relocation)
}

/// Operator-directed move of `products` from one location to another.
///
/// Category rules do not apply. Each product is checked on its own against the
/// destination's free volume; products that do not fit, or that the source
/// does not hold, are skipped and recorded.
pub fn move_products(
    locations: &mut [Location],
    from: LocationId,
    to: LocationId,
    products: &[ProductId],
    audit: &mut AuditLog,
) -> DomainResult<MoveReport> {
    let (Some(src), Some(dst)) = (index_of(locations, from), index_of(locations, to)) else {
        let missing = if index_of(locations, from).is_none() { from } else { to };
        audit.record(format!("manual move aborted: location {missing} not found"));
        return Err(DomainError::not_found(format!("location {missing}")));
    };
    if src == dst {
        return Err(DomainError::validation(
            "manual move requires two different locations",
        ));
    }

    let mut report = MoveReport::default();
    for &product_id in products {
        match relocate(locations, src, dst, product_id, audit) {
            Ok(relocation) => report.moved.push(relocation),
            Err(reason) => {
                tracing::warn!(product = %product_id, %from, %to, error = %reason, "manual move skipped product");
                audit.record(format!(
                    "manual move of product {product_id} from location {from} to location {to} skipped: {reason}"
                ));
                report.skipped.push(Skipped {
                    product: product_id,
                    reason,
                });
            }
        }
    }
    Ok(report)
}
