//! # Seed Data Generator
//!
//! Populates a development database with a small coffee-shop pantry and
//! menu.
//!
//! ## Usage
//! ```bash
//! cargo run -p hotcoffee-db --bin seed
//!
//! # Specify database path
//! cargo run -p hotcoffee-db --bin seed -- --db ./data/hotcoffee.db
//! ```
//!
//! ## Generated Data
//! - Pantry: espresso beans, milk, oat milk, water, syrups, cocoa, tea
//! - Menu: espresso drinks built from that pantry, each with its recipe

use std::collections::HashMap;
use std::env;

use anyhow::{bail, Context};
use hotcoffee_core::{IngredientRequirement, NewInventoryItem, NewMenuItem, Quantity};
use hotcoffee_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// (name, starting stock, unit)
const PANTRY: &[(&str, f64, &str)] = &[
    ("Espresso beans", 5000.0, "g"),
    ("Whole milk", 20000.0, "ml"),
    ("Oat milk", 8000.0, "ml"),
    ("Water", 50000.0, "ml"),
    ("Vanilla syrup", 1500.0, "ml"),
    ("Caramel syrup", 1500.0, "ml"),
    ("Cocoa powder", 1000.0, "g"),
    ("Black tea", 500.0, "g"),
    ("Cups", 400.0, "pcs"),
];

/// (name, description, price in cents, recipe of (ingredient, per-unit amount))
type Recipe = (&'static str, &'static str, i64, &'static [(&'static str, f64)]);

const MENU: &[Recipe] = &[
    (
        "Espresso",
        "Double shot",
        250,
        &[("Espresso beans", 18.0), ("Cups", 1.0)],
    ),
    (
        "Americano",
        "Espresso topped with hot water",
        300,
        &[("Espresso beans", 18.0), ("Water", 200.0), ("Cups", 1.0)],
    ),
    (
        "Latte",
        "Espresso with steamed milk",
        450,
        &[("Espresso beans", 18.0), ("Whole milk", 200.0), ("Cups", 1.0)],
    ),
    (
        "Oat Latte",
        "Latte with oat milk",
        500,
        &[("Espresso beans", 18.0), ("Oat milk", 200.0), ("Cups", 1.0)],
    ),
    (
        "Cappuccino",
        "Equal parts espresso, milk and foam",
        425,
        &[("Espresso beans", 18.0), ("Whole milk", 120.0), ("Cups", 1.0)],
    ),
    (
        "Vanilla Latte",
        "Latte with vanilla syrup",
        525,
        &[
            ("Espresso beans", 18.0),
            ("Whole milk", 200.0),
            ("Vanilla syrup", 15.0),
            ("Cups", 1.0),
        ],
    ),
    (
        "Caramel Macchiato",
        "Vanilla, milk, espresso and caramel",
        550,
        &[
            ("Espresso beans", 18.0),
            ("Whole milk", 200.0),
            ("Vanilla syrup", 10.0),
            ("Caramel syrup", 7.5),
            ("Cups", 1.0),
        ],
    ),
    (
        "Mocha",
        "Espresso, cocoa and steamed milk",
        525,
        &[
            ("Espresso beans", 18.0),
            ("Whole milk", 180.0),
            ("Cocoa powder", 12.5),
            ("Cups", 1.0),
        ],
    ),
    (
        "Black Tea",
        "Brewed loose-leaf tea",
        275,
        &[("Black tea", 3.0), ("Water", 250.0), ("Cups", 1.0)],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./hotcoffee_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Hot Coffee Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./hotcoffee_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("☕ Hot Coffee Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .context("opening database")?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.inventory().list().await?.len() + db.menus().list().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} menu/inventory rows", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Stocking pantry...");

    let mut ingredient_ids: HashMap<&str, i64> = HashMap::new();
    for (name, stock, unit) in PANTRY {
        let quantity = Quantity::from_decimal(*stock)
            .with_context(|| format!("stock for {name} is not representable"))?;
        let item = db
            .inventory()
            .create(&NewInventoryItem {
                name: name.to_string(),
                quantity,
                unit: unit.to_string(),
            })
            .await
            .with_context(|| format!("creating inventory item {name}"))?;

        println!("  {:>3}  {:<16} {} {}", item.id, item.name, item.quantity, item.unit);
        ingredient_ids.insert(*name, item.id);
    }

    println!();
    println!("Writing menu...");

    for (name, description, price_cents, recipe) in MENU {
        let mut ingredients = Vec::with_capacity(recipe.len());
        for (ingredient, amount) in recipe.iter() {
            let Some(&ingredient_id) = ingredient_ids.get(ingredient) else {
                bail!("{name} uses {ingredient}, which is not in the pantry");
            };
            let quantity = Quantity::from_decimal(*amount)
                .with_context(|| format!("{name}: amount of {ingredient}"))?;
            ingredients.push(IngredientRequirement {
                ingredient_id,
                quantity,
            });
        }

        let item = db
            .menus()
            .create(&NewMenuItem {
                name: name.to_string(),
                description: description.to_string(),
                price_cents: *price_cents,
                ingredients,
            })
            .await
            .with_context(|| format!("creating menu item {name}"))?;

        println!("  {:>3}  {:<18} {}", item.id, item.name, item.price());
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
