//! Plain-text rendering of engine state and reports.

use std::fmt::Write;

use stockroute_inventory::{
    AllocationOutcome, AuditLog, ExpiryReport, Location, MoveReport, RedistributionReport, Valuation,
};

pub fn locations(locations: &[Location]) -> String {
    let mut out = String::new();
    for l in locations {
        let _ = writeln!(out, "location {} ({})", l.id(), l.category());
        let _ = writeln!(out, "  address:  {}", l.address());
        let _ = writeln!(
            out,
            "  volume:   {:.1} / {:.1} used, {:.1} free",
            l.occupied_volume(),
            l.capacity(),
            l.free_volume()
        );
        let _ = writeln!(out, "  products: {}", l.len());
        for p in l.products() {
            let _ = writeln!(
                out,
                "    #{} {} (supplier {}, volume {:.1}, price {:.2}, {} day(s) left)",
                p.id(),
                p.name(),
                p.supplier_id(),
                p.volume(),
                p.price(),
                p.days_until_expiry()
            );
        }
    }
    out
}

pub fn allocation(outcome: &AllocationOutcome) -> String {
    match outcome {
        AllocationOutcome::Placed {
            location,
            category,
            products,
        } => format!(
            "placed {} product(s) in location {location} ({category})\n",
            products.len()
        ),
        AllocationOutcome::Rejected {
            category,
            required_volume,
        } => format!("rejected: no {category} location with {required_volume:.1} free volume\n"),
    }
}

pub fn redistribution(report: &RedistributionReport) -> String {
    let mut out = String::new();
    for r in &report.relocations {
        let _ = writeln!(out, "moved product {} from location {} to location {}", r.product, r.from, r.to);
    }
    for s in &report.stranded {
        let _ = writeln!(
            out,
            "left product {} in location {}: no {} location with {:.1} free",
            s.product, s.location, s.target, s.volume
        );
    }
    let _ = writeln!(out, "{} moved, {} left in place", report.moved(), report.stranded.len());
    out
}

pub fn expiry(report: &ExpiryReport) -> String {
    let mut out = String::new();
    for r in &report.disposed {
        let _ = writeln!(out, "disposed product {} from location {}", r.product, r.from);
    }
    for p in &report.retained {
        let _ = writeln!(out, "no room in disposal for product {p}");
    }
    let _ = writeln!(
        out,
        "{} moved to location {}, {} left in place",
        report.disposed.len(),
        report.disposal,
        report.retained.len()
    );
    out
}

pub fn manual_move(report: &MoveReport) -> String {
    let mut out = String::new();
    for r in &report.moved {
        let _ = writeln!(out, "moved product {} from location {} to location {}", r.product, r.from, r.to);
    }
    for s in &report.skipped {
        let _ = writeln!(out, "skipped product {}: {}", s.product, s.reason);
    }
    out
}

pub fn valuation(valuation: &Valuation) -> String {
    let mut out = String::new();
    for l in &valuation.locations {
        let _ = writeln!(out, "location {} ({}): {:.2}", l.location, l.category, l.value);
    }
    let _ = writeln!(out, "total: {:.2}", valuation.total);
    out
}

pub fn audit(log: &AuditLog) -> String {
    if log.is_empty() {
        return "audit log is empty\n".to_string();
    }
    let mut out = String::new();
    for line in log.export() {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "{} entries", log.len());
    out
}
