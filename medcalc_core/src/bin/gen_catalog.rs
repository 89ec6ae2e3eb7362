//! Generate CATALOG.md from the formula registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-catalog
//! ```
//!
//! The generated file is written to `medcalc_core/CATALOG.md`.

use std::fs;
use std::path::Path;

use medcalc_core::registry::REGISTRY;

fn main() {
    println!("Generating CATALOG.md...");

    let markdown = REGISTRY.catalog_markdown();

    // Relative to workspace root
    let output_path = Path::new("medcalc_core/CATALOG.md");

    match fs::write(output_path, &markdown) {
        Ok(()) => {
            println!("Successfully wrote {} bytes to {}", markdown.len(), output_path.display());
            println!("{} calculators documented.", REGISTRY.len());
        }
        Err(e) => {
            eprintln!("Error writing file: {}", e);
            std::process::exit(1);
        }
    }
}
