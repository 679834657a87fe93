//! # Seed Data Generator
//!
//! Writes a demo café catalog into the database for development.
//!
//! ## Usage
//! ```bash
//! # Generate 60 products (default)
//! cargo run -p till-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p till-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```
//!
//! ## Generated Products
//! - Brewed Drinks: unbounded stock (made to order)
//! - Coffee Supplies, Snacks, Merchandise: counted stock 0 - 80
//!
//! Prices and stock are derived from the product's position, so two runs
//! produce the same catalog.

use std::env;

use till_core::{Catalog, Money, ProductDraft, Stock};
use till_db::{Database, DbConfig};

/// Categories and base product names.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Brewed Drinks",
        &[
            "Americano",
            "Latte",
            "Cappuccino",
            "Flat White",
            "Mocha",
            "Cold Brew",
            "Matcha Latte",
            "Chai Latte",
            "Hot Chocolate",
            "Iced Tea",
        ],
    ),
    (
        "Coffee Supplies",
        &[
            "Coffee Beans (House Blend)",
            "Coffee Beans (Premium)",
            "Decaf Beans",
            "Drip Bags",
            "Paper Filters",
            "Milk Frother",
        ],
    ),
    (
        "Snacks",
        &[
            "Hand-made Cookies (Box)",
            "Butter Croissant",
            "Blueberry Muffin",
            "Cheesecake Slice",
            "Banana Bread",
            "Granola Bar",
        ],
    ),
    (
        "Merchandise",
        &["Ceramic Mug", "Tumbler", "Tote Bag", "Gift Card"],
    ),
];

/// Size variants and the price they add, in cents.
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Regular", 1000), ("Large", 2000)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./till_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Till POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Till POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.catalog().exists().await? {
        let existing = db.catalog().load().await?;
        println!("⚠ Database already has a catalog ({} products)", existing.len());
        println!("  Skipping seed to avoid overwriting it.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = generate_catalog(count)?;
    db.catalog().save(&catalog).await?;

    println!();
    println!("✓ Generated {} products", catalog.len());
    for category in catalog.categories() {
        println!(
            "  {:<16} {}",
            category,
            catalog.by_category(Some(category)).count()
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a catalog of up to `count` products.
fn generate_catalog(count: usize) -> Result<Catalog, till_core::ValidationError> {
    let mut catalog = Catalog::new();

    let drafts = CATEGORIES
        .iter()
        .enumerate()
        .flat_map(|(category_idx, (category, names))| {
            names.iter().enumerate().flat_map(move |(name_idx, name)| {
                SIZES.iter().enumerate().map(move |(size_idx, size)| {
                    generate_draft(
                        category,
                        name,
                        *size,
                        category_idx * 100 + name_idx * 10 + size_idx,
                    )
                })
            })
        })
        .take(count);

    for draft in drafts {
        catalog.upsert(None, draft)?;
    }

    Ok(catalog)
}

/// Generates one product's fields.
fn generate_draft(category: &str, name: &str, size: (&str, i64), seed: usize) -> ProductDraft {
    let (size_name, price_addon) = size;
    // 30.00 - 349.00 in whole units
    let base = 3000 + (seed as i64 * 7919 % 320) * 100;

    let stock = if category == "Brewed Drinks" {
        Stock::Unbounded
    } else {
        Stock::Bounded((seed * 31 % 81) as u32)
    };

    ProductDraft {
        name: format!("{} {}", name, size_name),
        price: Money::from_cents(base + price_addon),
        category: category.to_string(),
        stock,
    }
}
