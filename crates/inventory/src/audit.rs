//! Append-only, timestamped record of placements, moves and rejections.

use chrono::{DateTime, NaiveDateTime, Utc};
use stockroute_core::LocationId;

use crate::category::Category;
use crate::location::Location;
use crate::product::Product;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    timestamp: DateTime<Utc>,
    message: String,
}

impl AuditEntry {
    pub fn new(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `[YYYY-MM-DD HH:MM:SS] message`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), self.message)
    }

    /// Inverse of [`AuditEntry::render`].
    pub fn parse(rendered: &str) -> Option<Self> {
        let rest = rendered.strip_prefix('[')?;
        let (stamp, message) = rest.split_once("] ")?;
        let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
        Some(Self::new(naive.and_utc(), message))
    }
}

/// One end of a movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Fresh stock arriving in a batch.
    Supplier,
    Location { id: LocationId, category: Category },
}

impl Endpoint {
    pub fn of(location: &Location) -> Self {
        Endpoint::Location {
            id: location.id(),
            category: location.category(),
        }
    }
}

impl core::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Endpoint::Supplier => f.write_str("supplier"),
            Endpoint::Location { id, category } => write!(f, "location {id} ({category})"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from rendered entries. Lines that do not parse are dropped.
    pub fn from_rendered<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for line in lines {
            match AuditEntry::parse(line.as_ref()) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(line = line.as_ref(), "skipping malformed audit entry"),
            }
        }
        Self { entries }
    }

    pub fn record(&mut self, message: impl Into<String>) {
        self.record_at(Utc::now(), message);
    }

    pub fn record_at(&mut self, timestamp: DateTime<Utc>, message: impl Into<String>) {
        self.entries.push(AuditEntry::new(timestamp, message));
    }

    pub fn record_movement(&mut self, product: &Product, from: Endpoint, to: Endpoint) {
        self.record(format!(
            "moved product '{}' (id {}, volume {:.1}) from {} to {}",
            product.name(),
            product.id(),
            product.volume(),
            from,
            to
        ));
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered entries in insertion order.
    pub fn export(&self) -> Vec<String> {
        self.entries.iter().map(AuditEntry::render).collect()
    }

    /// Operator-level administrative clear.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
