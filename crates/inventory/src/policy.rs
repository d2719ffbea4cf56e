//! Shelf-life classification rules.
//!
//! Pure functions only: batches are classified as a whole at submission time,
//! items are classified individually during redistribution.

use crate::category::Category;

/// Items with at least this many days left are long-term stock.
pub const SHELF_LIFE_THRESHOLD_DAYS: i32 = 30;

/// Items at or below this many days left are expired.
pub const EXPIRED_AT_OR_BELOW_DAYS: i32 = 0;

pub fn is_long_term(days_until_expiry: i32) -> bool {
    days_until_expiry >= SHELF_LIFE_THRESHOLD_DAYS
}

pub fn is_expired(days_until_expiry: i32) -> bool {
    days_until_expiry <= EXPIRED_AT_OR_BELOW_DAYS
}

/// Target category for a whole batch.
///
/// - every item long-term → `General`
/// - every item short-term → `Cold`
/// - anything else → `Sorting`
///
/// Callers guarantee a non-empty input (see [`crate::Batch`]).
pub fn classify_batch<I>(expiry_days: I) -> Category
where
    I: IntoIterator<Item = i32>,
{
    let mut all_long = true;
    let mut all_short = true;
    for days in expiry_days {
        if is_long_term(days) {
            all_short = false;
        } else {
            all_long = false;
        }
    }

    if all_long {
        Category::General
    } else if all_short {
        Category::Cold
    } else {
        Category::Sorting
    }
}

/// Terminal category for a single item. Never `Sorting`.
pub fn classify_item(days_until_expiry: i32) -> Category {
    if is_long_term(days_until_expiry) {
        Category::General
    } else {
        Category::Cold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn long_term_batch_goes_to_general() {
        assert_eq!(classify_batch([365, 180, 90]), Category::General);
        assert_eq!(classify_batch([30]), Category::General);
    }

    #[test]
    fn short_term_batch_goes_to_cold() {
        assert_eq!(classify_batch([7, 14]), Category::Cold);
        assert_eq!(classify_batch([29, -3]), Category::Cold);
    }

    #[test]
    fn mixed_batch_goes_to_sorting() {
        assert_eq!(classify_batch([25, 60]), Category::Sorting);
    }

    #[test]
    fn expiry_threshold_is_inclusive_of_zero() {
        assert!(is_expired(0));
        assert!(is_expired(-1));
        assert!(!is_expired(1));
    }

    proptest! {
        #[test]
        fn items_never_classify_to_sorting(days in -400i32..400) {
            let c = classify_item(days);
            prop_assert!(c == Category::General || c == Category::Cold);
        }

        #[test]
        fn single_item_batch_matches_item_rule(days in -400i32..400) {
            prop_assert_eq!(classify_batch([days]), classify_item(days));
        }
    }
}
