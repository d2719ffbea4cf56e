//! Retirement of expired stock to the Disposal location.

use stockroute_core::{DomainError, DomainResult, LocationId, ProductId};

use crate::audit::AuditLog;
use crate::category::Category;
use crate::location::Location;
use crate::transfer::{self, Relocation};

#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryReport {
    pub disposal: LocationId,
    pub disposed: Vec<Relocation>,
    /// Expired items left in place because Disposal had no room.
    pub retained: Vec<ProductId>,
}

/// Move every expired item outside Disposal into the first Disposal location.
///
/// With `scope` only that location is swept. Items that do not fit stay where
/// they are; there is no retry.
pub fn sweep_expired(
    locations: &mut [Location],
    scope: Option<LocationId>,
    audit: &mut AuditLog,
) -> DomainResult<ExpiryReport> {
    let Some(disposal) = locations.iter().position(|l| l.category() == Category::Disposal) else {
        tracing::error!("expiry sweep aborted: no disposal location");
        audit.record("expiry sweep aborted: no Disposal location registered");
        return Err(DomainError::not_found("Disposal location"));
    };
    let disposal_id = locations[disposal].id();

    let sources: Vec<usize> = locations
        .iter()
        .enumerate()
        .filter(|(_, l)| l.category() != Category::Disposal)
        .filter(|(_, l)| scope.is_none_or(|id| l.id() == id))
        .map(|(i, _)| i)
        .collect();

    let mut report = ExpiryReport {
        disposal: disposal_id,
        disposed: Vec::new(),
        retained: Vec::new(),
    };
    for source in sources {
        let expired: Vec<ProductId> = locations[source]
            .products()
            .iter()
            .filter(|p| p.is_expired())
            .map(|p| p.id())
            .collect();

        for product in expired {
            match transfer::relocate(locations, source, disposal, product, audit) {
                Ok(relocation) => report.disposed.push(relocation),
                Err(reason) => {
                    let location = locations[source].id();
                    tracing::warn!(%product, %location, error = %reason, "expired item left in place");
                    audit.record(format!(
                        "expiry sweep: product {product} in location {location} not moved to disposal: {reason}"
                    ));
                    report.retained.push(product);
                }
            }
        }
    }

    tracing::info!(
        disposal = %disposal_id,
        disposed = report.disposed.len(),
        retained = report.retained.len(),
        "expiry sweep finished"
    );
    Ok(report)
}
