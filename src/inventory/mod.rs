//! Inventory adjuster: stock arithmetic for the order ledger
//!
//! Pure functions over product rows. The storage backend invokes them
//! inside its atomic section, so concurrent reservations serialize on the
//! backend's write lock and an order either applies all of its claims or
//! none of them.
//!
//! Policy: **fail-closed**. A claim that cannot be covered is an error and
//! counters never go below zero.

use uuid::Uuid;

use crate::catalog::Product;
use crate::core::{ShopResult, StockError, ValidationError};
use crate::orders::OrderItem;

/// One stock decrement owed by an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockClaim {
    pub product_id: Uuid,
    pub size: Option<String>,
    pub quantity: u32,
}

/// The claims an order's line items place against the catalog, one per
/// line in order. Duplicate lines against the same product are deliberate:
/// applied sequentially they drain the same counter and fail closed
/// together when it runs out.
pub fn claims_for(items: &[OrderItem]) -> Vec<StockClaim> {
    items
        .iter()
        .map(|item| StockClaim {
            product_id: item.product_id,
            size: item.size.clone(),
            quantity: item.quantity,
        })
        .collect()
}

/// Decrement the counter a claim targets, failing when it cannot cover
/// the requested quantity.
pub fn reserve(product: &mut Product, claim: &StockClaim) -> Result<(), StockError> {
    match &claim.size {
        Some(label) => {
            let Some(variant) = product.size_mut(label) else {
                // Variant validated at request time; a vanished label means
                // the product was edited since, so there is nothing to sell.
                return Err(StockError::Insufficient {
                    product_id: claim.product_id,
                    size: Some(label.clone()),
                    requested: claim.quantity,
                    available: 0,
                });
            };
            if variant.stock < claim.quantity {
                return Err(StockError::Insufficient {
                    product_id: claim.product_id,
                    size: Some(label.clone()),
                    requested: claim.quantity,
                    available: variant.stock,
                });
            }
            variant.stock -= claim.quantity;
            Ok(())
        }
        None => {
            if product.stock < claim.quantity {
                return Err(StockError::Insufficient {
                    product_id: claim.product_id,
                    size: None,
                    requested: claim.quantity,
                    available: product.stock,
                });
            }
            product.stock -= claim.quantity;
            Ok(())
        }
    }
}

/// Return a claim's units to the catalog (order cancelled while its
/// reservation was still held).
///
/// If the variant label has been edited away since the sale, the units
/// fall back to the aggregate counter rather than disappearing.
pub fn release(product: &mut Product, claim: &StockClaim) {
    match &claim.size {
        Some(label) => match product.size_mut(label) {
            Some(variant) => variant.stock = variant.stock.saturating_add(claim.quantity),
            None => {
                tracing::warn!(
                    product_id = %claim.product_id,
                    size = %label,
                    "released units for a removed size variant, restocking aggregate counter"
                );
                product.stock = product.stock.saturating_add(claim.quantity);
            }
        },
        None => product.stock = product.stock.saturating_add(claim.quantity),
    }
}

/// Admin stock override, bypassing the order flow.
///
/// Applies `delta` to the aggregate counter, or to the named variant.
/// Fails when the result would go below zero (no clamping) and returns
/// the new level.
pub fn adjust(product: &mut Product, size: Option<&str>, delta: i64) -> ShopResult<u32> {
    let product_id = product.id;
    let counter = match size {
        Some(label) => match product.size_mut(label) {
            Some(variant) => &mut variant.stock,
            None => {
                return Err(ValidationError::field(
                    "size",
                    format!("'{}' is not a declared variant", label),
                )
                .into());
            }
        },
        None => &mut product.stock,
    };

    let next = i64::from(*counter) + delta;
    if next < 0 {
        return Err(StockError::OutOfRange {
            product_id,
            size: size.map(str::to_string),
            delta,
            available: *counter,
        }
        .into());
    }
    // Stock counters fit u32 in practice; clamp rather than wrap if an
    // adjustment overshoots.
    *counter = u32::try_from(next).unwrap_or(u32::MAX);
    Ok(*counter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductDraft, ProductSize};
    use crate::core::Money;
    use chrono::Utc;

    fn product(stock: u32, sizes: Vec<ProductSize>) -> Product {
        ProductDraft {
            name: "Maillot".to_string(),
            description: String::new(),
            price: Money::from_minor(15_000),
            discount_price: None,
            stock,
            sizes,
            category_id: None,
            allow_flocage: false,
            allow_gravure: false,
            featured: false,
            images: vec![],
        }
        .into_product(Utc::now())
    }

    fn claim(product: &Product, size: Option<&str>, quantity: u32) -> StockClaim {
        StockClaim {
            product_id: product.id,
            size: size.map(str::to_string),
            quantity,
        }
    }

    #[test]
    fn test_reserve_aggregate() {
        let mut p = product(3, vec![]);
        let c = claim(&p, None, 2);
        reserve(&mut p, &c).unwrap();
        assert_eq!(p.stock, 1);
    }

    #[test]
    fn test_reserve_fails_closed() {
        let mut p = product(1, vec![]);
        let c = claim(&p, None, 2);
        let err = reserve(&mut p, &c).unwrap_err();
        assert!(matches!(
            err,
            StockError::Insufficient {
                requested: 2,
                available: 1,
                ..
            }
        ));
        // Nothing was decremented
        assert_eq!(p.stock, 1);
    }

    #[test]
    fn test_reserve_by_size() {
        let mut p = product(
            0,
            vec![
                ProductSize {
                    size: "M".to_string(),
                    stock: 2,
                },
                ProductSize {
                    size: "L".to_string(),
                    stock: 1,
                },
            ],
        );
        let c = claim(&p, Some("M"), 2);
        reserve(&mut p, &c).unwrap();
        assert_eq!(p.size("M").unwrap().stock, 0);
        assert_eq!(p.size("L").unwrap().stock, 1);

        let c = claim(&p, Some("M"), 1);
        let err = reserve(&mut p, &c).unwrap_err();
        assert!(matches!(err, StockError::Insufficient { available: 0, .. }));
    }

    #[test]
    fn test_release_restores_units() {
        let mut p = product(5, vec![]);
        let c = claim(&p, None, 3);
        reserve(&mut p, &c).unwrap();
        assert_eq!(p.stock, 2);
        release(&mut p, &c);
        assert_eq!(p.stock, 5);
    }

    #[test]
    fn test_release_for_removed_variant_falls_back() {
        let mut p = product(1, vec![]);
        let c = StockClaim {
            product_id: p.id,
            size: Some("M".to_string()),
            quantity: 2,
        };
        release(&mut p, &c);
        assert_eq!(p.stock, 3);
    }

    #[test]
    fn test_adjust_floor() {
        let mut p = product(2, vec![]);
        assert_eq!(adjust(&mut p, None, 3).unwrap(), 5);
        assert_eq!(adjust(&mut p, None, -5).unwrap(), 0);

        let err = adjust(&mut p, None, -1).unwrap_err();
        assert_eq!(err.error_code(), "STOCK_OUT_OF_RANGE");
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn test_adjust_unknown_variant() {
        let mut p = product(2, vec![]);
        let err = adjust(&mut p, Some("M"), 1).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
