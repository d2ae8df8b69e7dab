//! # Fulfillment Module
//!
//! Pure planning for the order engine: what an order consumes, what it
//! costs, and how the ledger must move when an order changes.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderRequest.items ──┐                                                 │
//! │                       ├──► plan_order() ──► OrderPlan                   │
//! │  menu (id → MenuItem) ┘                     ├── lines (snapshots)       │
//! │                                             ├── total                   │
//! │                                             └── consumption             │
//! │                                                                         │
//! │  create:  LedgerDelta::reconcile(∅,   new)   = −new                     │
//! │  update:  LedgerDelta::reconcile(old, new)   = old − new                │
//! │  delete:  LedgerDelta::reconcile(old, ∅)     = +old                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both maps are keyed by ingredient id in ascending order, so every
//! transaction touches inventory rows in the same order.
//!
//! ## Example
//! ```rust
//! use hotcoffee_core::{Consumption, LedgerDelta, Quantity};
//!
//! let mut old = Consumption::default();
//! old.add(2, Quantity::from_units(400)).unwrap();
//!
//! let mut new = Consumption::default();
//! new.add(2, Quantity::from_units(200)).unwrap();
//!
//! // One latte fewer gives 200 ml of milk back.
//! let delta = LedgerDelta::reconcile(&old, &new);
//! assert_eq!(delta.get(2), Quantity::from_units(200));
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{MenuItem, OrderLine, OrderLineRequest};

// =============================================================================
// Consumption
// =============================================================================

/// Total ingredient usage of an order, per ingredient id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consumption(BTreeMap<i64, Quantity>);

impl Consumption {
    /// Adds `quantity` of an ingredient.
    pub fn add(&mut self, ingredient_id: i64, quantity: Quantity) -> CoreResult<()> {
        let entry = self.0.entry(ingredient_id).or_default();
        *entry = entry.checked_add(quantity).ok_or_else(overflow)?;
        Ok(())
    }

    /// Usage of one ingredient (zero when unused).
    pub fn get(&self, ingredient_id: i64) -> Quantity {
        self.0.get(&ingredient_id).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, Quantity)> + '_ {
        self.0.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, Quantity)> for Consumption {
    /// Collects stored rows. Rows for the same ingredient are summed.
    fn from_iter<I: IntoIterator<Item = (i64, Quantity)>>(iter: I) -> Self {
        let mut map = BTreeMap::new();
        for (id, qty) in iter {
            *map.entry(id).or_insert_with(Quantity::zero) += qty;
        }
        Consumption(map)
    }
}

// =============================================================================
// Ledger Delta
// =============================================================================

/// Signed per-ingredient change to apply to the ledger. Never holds zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerDelta(BTreeMap<i64, Quantity>);

impl LedgerDelta {
    /// Net change when an order's consumption goes from `old` to `new`.
    ///
    /// Ingredients used less are released (positive), ingredients used more
    /// are deducted (negative), unchanged ones are omitted.
    pub fn reconcile(old: &Consumption, new: &Consumption) -> LedgerDelta {
        let mut map = BTreeMap::new();

        for (id, qty) in old.iter() {
            map.insert(id, qty);
        }
        for (id, qty) in new.iter() {
            let entry = map.entry(id).or_insert_with(Quantity::zero);
            *entry = *entry - qty;
        }

        map.retain(|_, qty| !qty.is_zero());
        LedgerDelta(map)
    }

    /// Delta that takes `consumption` out of the ledger.
    pub fn deduct(consumption: &Consumption) -> LedgerDelta {
        Self::reconcile(&Consumption::default(), consumption)
    }

    /// Delta that puts `consumption` back.
    pub fn restore(consumption: &Consumption) -> LedgerDelta {
        Self::reconcile(consumption, &Consumption::default())
    }

    pub fn get(&self, ingredient_id: i64) -> Quantity {
        self.0.get(&ingredient_id).copied().unwrap_or_default()
    }

    /// Entries in ascending ingredient id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, Quantity)> + '_ {
        self.0.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Order Planning
// =============================================================================

/// Everything the engine needs to persist an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    /// Lines with name and price frozen from the menu.
    pub lines: Vec<OrderLine>,
    pub total: Money,
    pub consumption: Consumption,
}

/// Resolves each line against the menu and sums its consumption.
///
/// ## Errors
/// - `NotFound` for a product id missing from `menu`
/// - `Validation(Overflow)` if the totals do not fit
pub fn plan_order(
    items: &[OrderLineRequest],
    menu: &HashMap<i64, MenuItem>,
) -> CoreResult<OrderPlan> {
    let mut lines = Vec::with_capacity(items.len());
    let mut total = Money::zero();
    let mut consumption = Consumption::default();

    for item in items {
        let menu_item = menu
            .get(&item.product_id)
            .ok_or_else(|| CoreError::not_found("Menu item", item.product_id))?;

        for req in &menu_item.ingredients {
            let needed = req.quantity.checked_mul(item.quantity).ok_or_else(overflow)?;
            consumption.add(req.ingredient_id, needed)?;
        }

        let line_total = Money::from_cents(menu_item.price_cents)
            .checked_mul(item.quantity)
            .ok_or_else(|| overflow_in("total"))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| overflow_in("total"))?;

        lines.push(OrderLine {
            product_id: menu_item.id,
            quantity: item.quantity,
            name: menu_item.name.clone(),
            unit_price_cents: menu_item.price_cents,
        });
    }

    Ok(OrderPlan {
        lines,
        total,
        consumption,
    })
}

fn overflow() -> CoreError {
    overflow_in("quantity")
}

fn overflow_in(field: &str) -> CoreError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IngredientRequirement;
    use chrono::Utc;

    const ESPRESSO: i64 = 1;
    const MILK: i64 = 2;
    const VANILLA: i64 = 3;

    fn menu_item(id: i64, name: &str, price_cents: i64, recipe: &[(i64, Quantity)]) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: String::new(),
            price_cents,
            ingredients: recipe
                .iter()
                .map(|(ingredient_id, quantity)| IngredientRequirement {
                    ingredient_id: *ingredient_id,
                    quantity: *quantity,
                })
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn menu() -> HashMap<i64, MenuItem> {
        let latte = menu_item(
            1,
            "Latte",
            450,
            &[(ESPRESSO, Quantity::from_units(18)), (MILK, Quantity::from_units(200))],
        );
        let vanilla_latte = menu_item(
            2,
            "Vanilla Latte",
            500,
            &[
                (ESPRESSO, Quantity::from_units(18)),
                (MILK, Quantity::from_units(200)),
                (VANILLA, Quantity::from_milli(500)),
            ],
        );
        [(1, latte), (2, vanilla_latte)].into_iter().collect()
    }

    fn line(product_id: i64, quantity: i64) -> OrderLineRequest {
        OrderLineRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_plan_two_lattes() {
        let plan = plan_order(&[line(1, 2)], &menu()).unwrap();

        assert_eq!(plan.consumption.get(MILK), Quantity::from_units(400));
        assert_eq!(plan.consumption.get(ESPRESSO), Quantity::from_units(36));
        assert_eq!(plan.total.cents(), 900);
        assert_eq!(plan.lines[0].name, "Latte");
        assert_eq!(plan.lines[0].unit_price_cents, 450);
    }

    #[test]
    fn test_plan_sums_across_lines() {
        let plan = plan_order(&[line(1, 1), line(2, 3), line(1, 1)], &menu()).unwrap();

        assert_eq!(plan.lines.len(), 3);
        assert_eq!(plan.consumption.get(MILK), Quantity::from_units(1000));
        assert_eq!(plan.consumption.get(VANILLA), Quantity::from_milli(1500));
        assert_eq!(plan.total.cents(), 450 + 1500 + 450);
    }

    #[test]
    fn test_plan_unknown_product() {
        let err = plan_order(&[line(1, 1), line(99, 1)], &menu()).unwrap_err();
        assert_eq!(err, CoreError::not_found("Menu item", 99));
    }

    #[test]
    fn test_plan_overflow_is_rejected() {
        let huge = menu_item(7, "Vat", 1, &[(MILK, Quantity::from_milli(i64::MAX / 2))]);
        let menu: HashMap<_, _> = [(7, huge)].into_iter().collect();

        let err = plan_order(&[line(7, 3)], &menu).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_plan_price_overflow_is_rejected() {
        let gold = menu_item(
            8,
            "Gold Leaf Latte",
            4_611_686_018_427_387_904,
            &[(MILK, Quantity::from_units(1))],
        );
        let menu: HashMap<_, _> = [(8, gold)].into_iter().collect();

        let err = plan_order(&[line(8, 2)], &menu).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::Overflow {
                field: "total".to_string()
            })
        );

        // Each line fits, the sum does not.
        let err = plan_order(&[line(8, 1), line(8, 1)], &menu).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_reconcile_update() {
        let old = plan_order(&[line(1, 2)], &menu()).unwrap().consumption;
        let new = plan_order(&[line(2, 1)], &menu()).unwrap().consumption;

        let delta = LedgerDelta::reconcile(&old, &new);

        // 2 lattes → 1 vanilla latte: one shot and 200 ml back, vanilla taken.
        assert_eq!(delta.get(ESPRESSO), Quantity::from_units(18));
        assert_eq!(delta.get(MILK), Quantity::from_units(200));
        assert_eq!(delta.get(VANILLA), Quantity::from_milli(-500));
    }

    #[test]
    fn test_reconcile_unchanged_is_empty() {
        let old = plan_order(&[line(1, 2)], &menu()).unwrap().consumption;
        let new = plan_order(&[line(1, 1), line(1, 1)], &menu()).unwrap().consumption;

        assert!(LedgerDelta::reconcile(&old, &new).is_empty());
    }

    #[test]
    fn test_deduct_then_restore_cancels() {
        let used = plan_order(&[line(2, 4)], &menu()).unwrap().consumption;

        let deduct = LedgerDelta::deduct(&used);
        let restore = LedgerDelta::restore(&used);

        for (id, qty) in deduct.iter() {
            assert!(qty.is_negative());
            assert_eq!(restore.get(id), -qty);
        }
        let ids: Vec<i64> = deduct.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![ESPRESSO, MILK, VANILLA]);
    }

    #[test]
    fn test_consumption_from_rows() {
        let c: Consumption = vec![
            (MILK, Quantity::from_units(100)),
            (ESPRESSO, Quantity::from_units(18)),
            (MILK, Quantity::from_units(50)),
        ]
        .into_iter()
        .collect();

        assert_eq!(c.len(), 2);
        assert_eq!(c.get(MILK), Quantity::from_units(150));
        assert_eq!(c.get(VANILLA), Quantity::zero());
    }
}
