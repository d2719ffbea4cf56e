//! Read-only diagnostics over the location network.
//!
//! Flags stock that sits somewhere the routing rules say it should not.
//! Nothing here mutates state or triggers a fix.

use stockroute_core::{LocationId, ProductId};

use crate::category::Category;
use crate::location::Location;
use crate::policy;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Expired stock held outside Disposal.
    ExpiredOutsideDisposal,
    /// Anything held in a Sorting location.
    SortingNotEmpty,
    /// Long-term stock held in Cold.
    LongTermInCold,
    /// Short-term (not yet expired) stock held in General.
    ShortTermInGeneral,
}

impl ViolationKind {
    pub fn recommendation(&self) -> &'static str {
        match self {
            ViolationKind::ExpiredOutsideDisposal => "run the expiry sweep to move expired stock to disposal",
            ViolationKind::SortingNotEmpty => "run redistribution to empty the sorting location",
            ViolationKind::LongTermInCold => "move long shelf-life stock to a General location",
            ViolationKind::ShortTermInGeneral => "move short shelf-life stock to a Cold location",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub products: Vec<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationReport {
    pub location: LocationId,
    pub category: Category,
    pub violations: Vec<Violation>,
}

impl LocationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkReport {
    pub locations: Vec<LocationReport>,
}

impl NetworkReport {
    pub fn is_clean(&self) -> bool {
        self.locations.iter().all(LocationReport::is_clean)
    }

    pub fn violation_count(&self) -> usize {
        self.locations.iter().map(|l| l.violations.len()).sum()
    }

    pub fn for_location(&self, id: LocationId) -> Option<&LocationReport> {
        self.locations.iter().find(|l| l.location == id)
    }

    /// Every flagged product, whatever the violation.
    pub fn flagged_products(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.locations
            .iter()
            .flat_map(|l| l.violations.iter())
            .flat_map(|v| v.products.iter().copied())
    }
}

impl core::fmt::Display for NetworkReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for report in &self.locations {
            write!(f, "location {} ({}): ", report.location, report.category)?;
            if report.is_clean() {
                writeln!(f, "no violations")?;
                continue;
            }
            writeln!(f, "violations found")?;
            for v in &report.violations {
                writeln!(f, "  - {} ({} item(s))", v.kind.recommendation(), v.products.len())?;
            }
        }
        Ok(())
    }
}

pub fn analyze(locations: &[Location]) -> NetworkReport {
    NetworkReport {
        locations: locations.iter().map(analyze_location).collect(),
    }
}

fn analyze_location(location: &Location) -> LocationReport {
    let category = location.category();
    let mut violations = Vec::new();

    let mut flag = |kind: ViolationKind, matches: &dyn Fn(i32) -> bool| {
        let products: Vec<ProductId> = location
            .products()
            .iter()
            .filter(|p| matches(p.days_until_expiry()))
            .map(|p| p.id())
            .collect();
        if !products.is_empty() {
            violations.push(Violation { kind, products });
        }
    };

    if category != Category::Disposal {
        flag(ViolationKind::ExpiredOutsideDisposal, &policy::is_expired);
    }
    match category {
        Category::Sorting => flag(ViolationKind::SortingNotEmpty, &|_: i32| true),
        Category::Cold => flag(ViolationKind::LongTermInCold, &policy::is_long_term),
        Category::General => flag(ViolationKind::ShortTermInGeneral, &|d: i32| {
            !policy::is_expired(d) && !policy::is_long_term(d)
        }),
        Category::Disposal => {}
    }

    if !violations.is_empty() {
        tracing::debug!(location = %location.id(), count = violations.len(), "location has violations");
    }
    LocationReport {
        location: location.id(),
        category,
        violations,
    }
}
