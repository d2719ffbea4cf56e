//! Per-item redistribution of stock held in Sorting locations.

use stockroute_core::{LocationId, ProductId};

use crate::audit::AuditLog;
use crate::category::Category;
use crate::location::Location;
use crate::policy;
use crate::transfer::{self, Relocation};

/// An item redistribution could not place anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Stranded {
    pub product: ProductId,
    pub location: LocationId,
    pub target: Category,
    pub volume: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedistributionReport {
    pub relocations: Vec<Relocation>,
    pub stranded: Vec<Stranded>,
}

impl RedistributionReport {
    pub fn moved(&self) -> usize {
        self.relocations.len()
    }
}

/// Empty every Sorting location (or only `scope`) into Cold/General.
///
/// Each item goes to the first location of its own category, in registration
/// order, with room for it. Items with nowhere to go stay put and are recorded
/// in the audit log as a failed redistribution.
pub fn redistribute(
    locations: &mut [Location],
    scope: Option<LocationId>,
    audit: &mut AuditLog,
) -> RedistributionReport {
    let sources: Vec<usize> = locations
        .iter()
        .enumerate()
        .filter(|(_, l)| l.category() == Category::Sorting)
        .filter(|(_, l)| scope.is_none_or(|id| l.id() == id))
        .map(|(i, _)| i)
        .collect();

    let mut report = RedistributionReport::default();
    for source in sources {
        // Snapshot so moves made below do not disturb the walk.
        let snapshot: Vec<(ProductId, i32, f64)> = locations[source]
            .products()
            .iter()
            .map(|p| (p.id(), p.days_until_expiry(), p.volume()))
            .collect();
        tracing::debug!(location = %locations[source].id(), items = snapshot.len(), "redistributing sorting location");

        for (product, days, volume) in snapshot {
            let target = policy::classify_item(days);
            let moved = first_fit(locations, source, target, product, volume, audit);

            match moved {
                Some(relocation) => report.relocations.push(relocation),
                None => {
                    let location = locations[source].id();
                    tracing::warn!(%product, %location, %target, volume, "no destination for sorting item");
                    audit.record(format!(
                        "redistribution failed: product {product} (volume {volume:.1}) in location {location} has no {target} location with room"
                    ));
                    report.stranded.push(Stranded {
                        product,
                        location,
                        target,
                        volume,
                    });
                }
            }
        }
    }
    report
}

/// Relocate `product` to the first `category` location, in registration
/// order, that takes it. A refused add moves on to the next candidate.
fn first_fit(
    locations: &mut [Location],
    source: usize,
    category: Category,
    product: ProductId,
    volume: f64,
    audit: &mut AuditLog,
) -> Option<Relocation> {
    let candidates: Vec<usize> = locations
        .iter()
        .enumerate()
        .filter(|(_, l)| l.category() == category && l.can_fit(volume))
        .map(|(i, _)| i)
        .collect();

    for to in candidates {
        match transfer::relocate(locations, source, to, product, audit) {
            Ok(relocation) => return Some(relocation),
            Err(err) if err.is_capacity_exceeded() => {
                tracing::debug!(%product, location = %locations[to].id(), error = %err, "candidate refused item");
            }
            Err(err) => {
                tracing::warn!(%product, error = %err, "relocation aborted");
                return None;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stockroute_core::SupplierId;

    use crate::product::Product;

    fn lid(raw: u32) -> LocationId {
        LocationId::new(raw).unwrap()
    }

    fn location(id: u32, category: Category, capacity: f64) -> Location {
        Location::new(lid(id), category, capacity, format!("{id} Canal St")).unwrap()
    }

    fn product(id: u32, volume: f64, days: i32) -> Product {
        Product::new(
            ProductId::new(id).unwrap(),
            SupplierId::new(3).unwrap(),
            format!("item-{id}"),
            volume,
            1.0,
            days,
        )
        .unwrap()
    }

    fn network() -> Vec<Location> {
        vec![
            location(1, Category::Cold, 100.0),
            location(2, Category::Sorting, 100.0),
            location(3, Category::General, 100.0),
        ]
    }

    #[test]
    fn splits_mixed_sorting_stock() {
        let mut locations = network();
        locations[1].add(product(1, 10.0, 25)).unwrap();
        locations[1].add(product(2, 10.0, 60)).unwrap();
        let mut audit = AuditLog::new();

        let report = redistribute(&mut locations, None, &mut audit);

        assert_eq!(report.moved(), 2);
        assert!(report.stranded.is_empty());
        assert!(locations[1].is_empty());
        assert!(locations[0].contains(ProductId::new(1).unwrap()));
        assert!(locations[2].contains(ProductId::new(2).unwrap()));
        assert_eq!(audit.len(), 2);
    }

    #[test]
    fn first_location_with_room_in_registration_order() {
        let mut locations = vec![
            location(9, Category::Cold, 5.0),
            location(4, Category::Cold, 50.0),
            location(6, Category::Cold, 500.0),
            location(2, Category::Sorting, 100.0),
        ];
        locations[3].add(product(1, 10.0, 3)).unwrap();
        let mut audit = AuditLog::new();

        let report = redistribute(&mut locations, None, &mut audit);

        assert_eq!(report.relocations[0].to, lid(4));
    }

    #[test]
    fn exact_fit_destination_is_used_despite_rounding() {
        let mut tight = location(1, Category::Cold, 1.7);
        tight.add(product(1, 0.6, 10)).unwrap();
        let mut locations = vec![
            tight,
            location(2, Category::Cold, 100.0),
            location(3, Category::Sorting, 100.0),
        ];
        locations[2].add(product(2, 1.1, 5)).unwrap();
        let mut audit = AuditLog::new();

        let report = redistribute(&mut locations, None, &mut audit);

        assert!(report.stranded.is_empty());
        assert_eq!(report.relocations[0].to, lid(1));
        assert!(locations[0].contains(ProductId::new(2).unwrap()));
        assert!(locations[2].is_empty());
    }

    #[test]
    fn item_without_destination_stays_and_is_audited() {
        let mut locations = vec![
            location(1, Category::Cold, 5.0),
            location(2, Category::Sorting, 100.0),
        ];
        locations[1].add(product(1, 10.0, 3)).unwrap();
        let mut audit = AuditLog::new();

        let report = redistribute(&mut locations, None, &mut audit);

        assert_eq!(report.moved(), 0);
        assert_eq!(report.stranded.len(), 1);
        assert_eq!(report.stranded[0].target, Category::Cold);
        assert!(locations[1].contains(ProductId::new(1).unwrap()));
        assert!(audit.entries()[0].message().starts_with("redistribution failed"));
    }

    #[test]
    fn scope_limits_sweep_to_one_location() {
        let mut locations = network();
        locations.push(location(4, Category::Sorting, 100.0));
        locations[1].add(product(1, 1.0, 60)).unwrap();
        locations[3].add(product(2, 1.0, 60)).unwrap();
        let mut audit = AuditLog::new();

        let report = redistribute(&mut locations, Some(lid(4)), &mut audit);

        assert_eq!(report.moved(), 1);
        assert_eq!(locations[1].len(), 1);
        assert!(locations[3].is_empty());
    }

    #[test]
    fn non_sorting_locations_are_untouched() {
        let mut locations = network();
        locations[2].add(product(1, 1.0, 3)).unwrap();
        let mut audit = AuditLog::new();

        let report = redistribute(&mut locations, None, &mut audit);

        assert_eq!(report, RedistributionReport::default());
        assert_eq!(locations[2].len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a second sweep right after the first moves nothing.
        #[test]
        fn second_sweep_is_a_no_op(
            items in prop::collection::vec((1u32..30, -10i32..120), 0..20),
            cold in 1u32..200,
            general in 1u32..200
        ) {
            let mut locations = vec![
                location(1, Category::Cold, cold as f64),
                location(2, Category::Sorting, 10_000.0),
                location(3, Category::General, general as f64),
            ];
            for (i, (volume, days)) in items.iter().enumerate() {
                locations[1].add(product(i as u32 + 1, *volume as f64, *days)).unwrap();
            }
            let mut audit = AuditLog::new();

            let first = redistribute(&mut locations, None, &mut audit);
            let after_first = locations.clone();
            let second = redistribute(&mut locations, None, &mut audit);

            prop_assert_eq!(second.moved(), 0);
            prop_assert_eq!(second.stranded.len(), first.stranded.len());
            prop_assert_eq!(locations, after_first);
        }
    }
}
