//! # Seed Data Generator
//!
//! Populates a catalog with sample products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default catalog in ./janorder_dev.db
//! cargo run -p janorder-db --bin seed
//!
//! # Custom amount, catalog and database
//! cargo run -p janorder-db --bin seed -- --count 200 --catalog seasonal --db ./data/orders.db
//! ```
//!
//! Every generated code is a 13-digit JAN/EAN-13 with a valid check digit,
//! so products can be typed or scanned from printed labels.

use std::env;

use janorder_core::identifier::check_digit;
use janorder_core::{Money, ProductRecord, DEFAULT_CATALOG_ID};
use janorder_db::{Database, DbConfig};

/// (name, base unit price in yen, minimum order unit)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Ballpoint Pen Black", 120, 10),
    ("Ballpoint Pen Red", 120, 10),
    ("Mechanical Pencil 0.5", 250, 5),
    ("Eraser", 80, 20),
    ("A4 Copy Paper 500", 550, 5),
    ("B5 Notebook", 150, 10),
    ("Sticky Notes 75mm", 200, 12),
    ("Stapler", 980, 1),
    ("Staples No.10", 110, 24),
    ("Clear Folder A4", 40, 50),
    ("Packing Tape", 260, 6),
    ("Cardboard Box 80", 180, 10),
    ("Bubble Wrap Roll", 1_800, 1),
    ("Highlighter Yellow", 100, 10),
    ("Correction Tape", 300, 5),
];

/// Package variants: (suffix, price multiplier, order unit multiplier)
const PACKS: &[(&str, i64, i64)] = &[("", 1, 1), ("3-Pack", 3, 1), ("Case", 20, 1)];

/// GS1 Japan prefix used for the sample codes.
const JAN_PREFIX: &str = "49";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let available = PRODUCTS.len() * PACKS.len();
    let mut count: usize = available;
    let mut db_path = String::from("./janorder_dev.db");
    let mut catalog_id = String::from(DEFAULT_CATALOG_ID);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = parse_count(&args[i + 1])?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--catalog" => {
                if i + 1 < args.len() {
                    catalog_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("JAN Order Desk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>       Number of products to generate (default: all samples)");
                println!("  -d, --db <PATH>       Database file path (default: ./janorder_dev.db)");
                println!("      --catalog <ID>    Catalog to fill (default: {})", DEFAULT_CATALOG_ID);
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            other => return Err(format!("Unknown argument '{}' (try --help)", other).into()),
        }
        i += 1;
    }

    if count > available {
        eprintln!("⚠ Only {} sample products exist; generating {} instead of {}", available, available, count);
        count = available;
    }

    println!("JAN Order Desk Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Catalog:  {}", catalog_id);
    println!("Products: {}", count);
    println!();

    let db = Database::open(DbConfig::new(&db_path)).await?;
    let catalog = db.catalog();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = catalog.count(&catalog_id).await?;
    if existing > 0 {
        println!("⚠ Catalog '{}' already has {} products", catalog_id, existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut generated = 0;
    'outer: for (pack_idx, (suffix, price_factor, unit_factor)) in PACKS.iter().enumerate() {
        for (product_idx, (name, price, unit)) in PRODUCTS.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let seed = pack_idx * 1000 + product_idx;
            let name = if suffix.is_empty() {
                name.to_string()
            } else {
                format!("{} {}", name, suffix)
            };
            let product = ProductRecord::new(
                jan_code(seed),
                name,
                Money::from_minor(price * price_factor),
                unit * unit_factor,
            )?;

            if let Err(e) = catalog.insert(&catalog_id, &product).await {
                eprintln!("Failed to insert {}: {}", product.code, e);
                continue;
            }

            println!("  {}  {:<32} ¥{:>7}  x{}", product.code, product.name, product.unit_price.to_string(), product.min_order_unit);
            generated += 1;
        }
    }

    println!();
    println!("✓ Generated {} products", generated);

    Ok(())
}

/// `--count` must be a positive whole number.
fn parse_count(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("--count must be at least 1".to_string()),
        Ok(count) => Ok(count),
        Err(_) => Err(format!("Invalid --count '{}': expected a positive whole number", value)),
    }
}

/// Builds a 13-digit JAN code with a valid check digit.
fn jan_code(seed: usize) -> String {
    let body = format!("{}{:010}", JAN_PREFIX, 1_234_500_000 + seed);
    let check = check_digit(&body).unwrap_or(0);
    format!("{}{}", body, check)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12"), Ok(12));
        assert_eq!(parse_count(" 45 "), Ok(45));
        assert_eq!(parse_count("ten"), Err("Invalid --count 'ten': expected a positive whole number".to_string()));
        assert!(parse_count("-3").is_err());
        assert!(parse_count("0").is_err());
    }

    #[test]
    fn test_jan_codes_carry_check_digit() {
        let code = jan_code(0);
        assert_eq!(code.len(), 13);
        assert!(code.starts_with(JAN_PREFIX));
        assert_eq!(check_digit(&code[..12]), code[12..].parse().ok());
    }
}
