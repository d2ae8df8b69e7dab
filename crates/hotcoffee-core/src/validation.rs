//! # Validation Module
//!
//! Input validation for menu, inventory and order requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Shape and type checks (deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE, called before any transaction opens             │
//! │  ├── Lengths, ranges, signs                                            │
//! │  └── Duplicates inside one request                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repository (inside the transaction)                          │
//! │  ├── Referenced ids exist                                              │
//! │  └── CHECK / FOREIGN KEY constraints                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hotcoffee_core::validation::{validate_customer_name, validate_line_quantity};
//!
//! validate_customer_name("Ada").unwrap();
//! validate_line_quantity(2).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::quantity::{Quantity, MILLI_PER_UNIT};
use crate::types::{IngredientRequirement, NewInventoryItem, NewMenuItem, OrderRequest};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of menu and inventory names.
pub const MAX_NAME_LEN: usize = 200;
/// Maximum length of a customer name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;
/// Maximum length of a unit label.
pub const MAX_UNIT_LEN: usize = 20;
/// Maximum length of a menu description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Highest menu price, in cents ($1,000,000).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
/// Most stock a single inventory row may hold.
pub const MAX_STOCK: Quantity = Quantity::from_units(1_000_000_000);

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a menu item or ingredient name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use hotcoffee_core::validation::validate_name;
///
/// assert!(validate_name("Flat White").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates the customer name on an order (1..=100 characters).
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_text("customer_name", name, MAX_CUSTOMER_NAME_LEN)
}

/// Validates an inventory unit label such as `ml` or `shots`.
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    validate_text("unit", unit, MAX_UNIT_LEN)
}

/// Descriptions may be empty.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Example
/// ```rust
/// use hotcoffee_core::validation::validate_line_quantity;
///
/// assert!(validate_line_quantity(1).is_ok());
/// assert!(validate_line_quantity(0).is_err());
/// assert!(validate_line_quantity(1000).is_err());
/// ```
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a menu price in cents. Zero is allowed (free refills).
///
/// The upper bound keeps `price × MAX_ITEM_QUANTITY × MAX_ORDER_LINES`
/// well inside `i64`.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price_cents".to_string(),
        });
    }
    if price_cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price_cents".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a starting stock level: `0..=MAX_STOCK`.
pub fn validate_stock_quantity(quantity: Quantity) -> ValidationResult<()> {
    if quantity.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }
    if quantity > MAX_STOCK {
        return Err(stock_out_of_range("quantity"));
    }
    Ok(())
}

/// Validates a manual stock adjustment. Its size may not exceed `MAX_STOCK`.
pub fn validate_stock_delta(delta: Quantity) -> ValidationResult<()> {
    if delta.milli().unsigned_abs() > MAX_STOCK.milli().unsigned_abs() {
        return Err(stock_out_of_range("delta"));
    }
    Ok(())
}

/// `OutOfRange` for a stock value, bounds in whole units.
pub fn stock_out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: MAX_STOCK.milli() / MILLI_PER_UNIT,
    }
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a recipe.
///
/// ## Rules
/// - At least one ingredient
/// - Every per-unit quantity strictly positive
/// - No ingredient listed twice
///
/// Existence of the referenced inventory rows is checked by the repository,
/// inside the write transaction.
pub fn validate_ingredients(ingredients: &[IngredientRequirement]) -> ValidationResult<()> {
    if ingredients.is_empty() {
        return Err(ValidationError::Required {
            field: "ingredients".to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(ingredients.len());
    for req in ingredients {
        if !req.quantity.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "ingredients.quantity".to_string(),
            });
        }
        if !seen.insert(req.ingredient_id) {
            return Err(ValidationError::Duplicate {
                field: "ingredient_id".to_string(),
                value: req.ingredient_id.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a full menu item body.
pub fn validate_menu_item(item: &NewMenuItem) -> ValidationResult<()> {
    validate_name(&item.name)?;
    validate_description(&item.description)?;
    validate_price_cents(item.price_cents)?;
    validate_ingredients(&item.ingredients)
}

/// Validates a new inventory item.
pub fn validate_inventory_item(item: &NewInventoryItem) -> ValidationResult<()> {
    validate_name(&item.name)?;
    validate_unit(&item.unit)?;
    validate_stock_quantity(item.quantity)
}

/// Validates an order create/replace body.
///
/// ## Rules
/// - Customer name 1..=100 characters
/// - 1..=100 lines, each with quantity 1..=999
///
/// The same product may appear on several lines; consumption is summed.
pub fn validate_order_request(order: &OrderRequest) -> ValidationResult<()> {
    validate_customer_name(&order.customer_name)?;

    if order.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if order.items.len() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    for line in &order.items {
        validate_line_quantity(line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderLineRequest;

    fn latte() -> NewMenuItem {
        NewMenuItem {
            name: "Latte".to_string(),
            description: "Espresso with steamed milk".to_string(),
            price_cents: 450,
            ingredients: vec![
                IngredientRequirement {
                    ingredient_id: 1,
                    quantity: Quantity::from_units(18),
                },
                IngredientRequirement {
                    ingredient_id: 2,
                    quantity: Quantity::from_units(200),
                },
            ],
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Mocha").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(201)).is_err());
        assert!(validate_name(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Ada").is_ok());
        assert!(matches!(
            validate_customer_name("  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_customer_name(&"x".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(999).is_ok());
        assert!(validate_line_quantity(0).is_err());
        assert!(validate_line_quantity(-3).is_err());
        assert!(validate_line_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_menu_item() {
        assert!(validate_menu_item(&latte()).is_ok());

        let mut free = latte();
        free.price_cents = 0;
        assert!(validate_menu_item(&free).is_ok());

        let mut negative = latte();
        negative.price_cents = -1;
        assert!(matches!(
            validate_menu_item(&negative),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_validate_price_upper_bound() {
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_price_cents(4_611_686_018_427_387_904).is_err());
        assert!(validate_price_cents(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_stock_bounds() {
        assert!(validate_stock_quantity(MAX_STOCK).is_ok());
        assert!(matches!(
            validate_stock_quantity(Quantity::from_milli(MAX_STOCK.milli() + 1)),
            Err(ValidationError::OutOfRange { max: 1_000_000_000, .. })
        ));

        assert!(validate_stock_delta(Quantity::from_units(-5)).is_ok());
        assert!(validate_stock_delta(MAX_STOCK).is_ok());
        assert!(validate_stock_delta(-MAX_STOCK).is_ok());
        assert!(validate_stock_delta(Quantity::from_milli(i64::MIN)).is_err());
        assert!(validate_stock_delta(Quantity::from_milli(i64::MAX)).is_err());
    }

    #[test]
    fn test_validate_ingredients() {
        assert!(matches!(
            validate_ingredients(&[]),
            Err(ValidationError::Required { .. })
        ));

        let zero = [IngredientRequirement {
            ingredient_id: 1,
            quantity: Quantity::zero(),
        }];
        assert!(matches!(
            validate_ingredients(&zero),
            Err(ValidationError::MustBePositive { .. })
        ));

        let dup = [
            IngredientRequirement {
                ingredient_id: 4,
                quantity: Quantity::from_units(1),
            },
            IngredientRequirement {
                ingredient_id: 4,
                quantity: Quantity::from_units(2),
            },
        ];
        assert!(matches!(
            validate_ingredients(&dup),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_validate_inventory_item() {
        let milk = NewInventoryItem {
            name: "Milk".to_string(),
            quantity: Quantity::from_units(5000),
            unit: "ml".to_string(),
        };
        assert!(validate_inventory_item(&milk).is_ok());

        let empty = NewInventoryItem {
            quantity: Quantity::zero(),
            ..milk.clone()
        };
        assert!(validate_inventory_item(&empty).is_ok());

        let negative = NewInventoryItem {
            quantity: Quantity::from_milli(-1),
            ..milk
        };
        assert!(validate_inventory_item(&negative).is_err());
    }

    #[test]
    fn test_validate_order_request() {
        let order = OrderRequest {
            customer_name: "A".to_string(),
            items: vec![OrderLineRequest {
                product_id: 1,
                quantity: 2,
            }],
        };
        assert!(validate_order_request(&order).is_ok());

        let empty = OrderRequest {
            items: vec![],
            ..order.clone()
        };
        assert!(matches!(
            validate_order_request(&empty),
            Err(ValidationError::Required { .. })
        ));

        let too_many = OrderRequest {
            items: vec![
                OrderLineRequest {
                    product_id: 1,
                    quantity: 1
                };
                MAX_ORDER_LINES + 1
            ],
            ..order
        };
        assert!(matches!(
            validate_order_request(&too_many),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
