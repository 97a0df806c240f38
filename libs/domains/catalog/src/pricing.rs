//! Price resolution and per-product variant-price aggregates.
//!
//! All arithmetic is `Decimal`; floats never touch commerce amounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;

use crate::models::{VariantPrice, VariantPriceStats};

/// Effective price of a variant at instant `at`.
///
/// The discount applies when it is present, non-zero, and its validity
/// window (closed interval, either bound optional) contains `at`; otherwise
/// the regular price stands.
pub fn effective_price(
    regular: Decimal,
    discount: Option<Decimal>,
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
) -> Decimal {
    let Some(discount) = discount.filter(|d| !d.is_zero()) else {
        return regular;
    };

    let in_window = match (window_start, window_end) {
        (None, None) => true,
        (Some(start), Some(end)) => start <= at && at <= end,
        (Some(start), None) => at >= start,
        (None, Some(end)) => at <= end,
    };

    if in_window { discount } else { regular }
}

/// Discount as a rounded integer percentage of the regular price.
///
/// `None` when the discount is absent/zero or the regular price is not
/// positive (keeps the zero-regular variant out of the aggregates).
pub fn discount_percentage(regular: Decimal, discount: Option<Decimal>) -> Option<i32> {
    let discount = discount.filter(|d| !d.is_zero())?;
    if regular <= Decimal::ZERO {
        return None;
    }

    let percent = (regular - discount) / regular * Decimal::from(100);
    percent.round().to_i32()
}

/// Aggregate price statistics over a product's active variants.
///
/// `None` when the slice is empty; discount fields `None` when no variant
/// carries a non-zero discount.
pub fn variant_price_stats(prices: &[VariantPrice]) -> Option<VariantPriceStats> {
    if prices.is_empty() {
        return None;
    }

    let regular_price_min = prices.iter().map(|p| p.regular).min()?;
    let regular_price_max = prices.iter().map(|p| p.regular).max()?;

    let discounts: Vec<Decimal> = prices
        .iter()
        .filter_map(|p| p.discount.filter(|d| !d.is_zero()))
        .collect();

    let max_discount_percentage = prices
        .iter()
        .filter_map(|p| discount_percentage(p.regular, p.discount))
        .max();

    Some(VariantPriceStats {
        regular_price_min,
        regular_price_max,
        discount_price_min: discounts.iter().min().copied(),
        discount_price_max: discounts.iter().max().copied(),
        max_discount_percentage,
    })
}

/// Group `(product_id, prices)` rows and aggregate each product's stats.
/// Products whose aggregate is absent are left out of the map.
pub fn stats_by_product<I>(prices: I) -> HashMap<i64, VariantPriceStats>
where
    I: IntoIterator<Item = (i64, VariantPrice)>,
{
    let mut grouped: HashMap<i64, Vec<VariantPrice>> = HashMap::new();
    for (product_id, price) in prices {
        grouped.entry(product_id).or_default().push(price);
    }

    grouped
        .into_iter()
        .filter_map(|(product_id, prices)| {
            variant_price_stats(&prices).map(|stats| (product_id, stats))
        })
        .collect()
}
