//! Routing class of a storage location.

use core::str::FromStr;

use stockroute_core::DomainError;

/// Category of a location. Every location has exactly one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Refrigerated storage for short shelf-life goods.
    Cold,
    /// Transit area for mixed batches awaiting redistribution.
    Sorting,
    /// Ambient storage for long shelf-life goods.
    General,
    /// Holding area for expired goods.
    Disposal,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Cold,
        Category::Sorting,
        Category::General,
        Category::Disposal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cold => "Cold",
            Category::Sorting => "Sorting",
            Category::General => "General",
            Category::Disposal => "Disposal",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::validation(format!("unknown location category: {s:?}")))
    }
}
