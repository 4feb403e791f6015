//! Money calculation utilities using rust_decimal for precision
//!
//! Totals are summed as `Decimal` and converted back to `f64` (rounded to
//! 2 decimal places) for storage/serialization.

use super::error::StoreError;
use rust_decimal::prelude::*;
use shared::LineItem;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// f64 noise allowed when checking a price is whole cents (12.99 × 100 = 1298.9999999999998)
const CENT_TOLERANCE: f64 = 1e-6;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// unit_price × quantity
pub fn line_total(item: &LineItem) -> Decimal {
    to_decimal(item.unit_price) * Decimal::from(item.quantity)
}

/// Σ(unit_price × quantity) over all lines
pub fn order_total(items: &[LineItem]) -> f64 {
    to_f64(items.iter().map(line_total).sum())
}

/// Σ of already-rounded amounts (sale totals, expenses)
pub fn sum_amounts(amounts: impl IntoIterator<Item = f64>) -> f64 {
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

/// Price must be finite, non-negative, below [`MAX_PRICE`] and whole cents
///
/// With whole-cent prices the rounded order total equals the sum of its lines.
pub fn validate_price(item: &LineItem) -> Result<(), StoreError> {
    let price = item.unit_price;
    if !price.is_finite()
        || price < 0.0
        || price > MAX_PRICE
        || !is_whole_cents(price)
    {
        return Err(StoreError::InvalidPrice {
            item_id: item.item_id.clone(),
            price,
        });
    }
    Ok(())
}

fn is_whole_cents(price: f64) -> bool {
    let cents = price * 100.0;
    (cents - cents.round()).abs() < CENT_TOLERANCE
}

/// Quantity must be in `1..=MAX_QUANTITY`
pub fn validate_quantity(item_id: &str, quantity: i32) -> Result<(), StoreError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(StoreError::InvalidQuantity {
            item_id: item_id.to_string(),
            quantity,
        });
    }
    Ok(())
}
