//! # JAN Order Desk Entry Point
//!
//! ## Usage
//! ```bash
//! janorder-terminal                          # default config location
//! janorder-terminal --config ./desk.toml     # explicit config file
//! RUST_LOG=debug janorder-terminal           # verbose logs on stderr
//! ```

use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("JAN Order Desk Terminal");
                println!();
                println!("Usage: janorder-terminal [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: <config dir>/terminal.toml)");
                println!("  -h, --help           Show this help");
                println!();
                println!("Environment:");
                println!("  JANORDER_DB_PATH, JANORDER_CATALOG_ID, JANORDER_LEDGER_ID,");
                println!("  JANORDER_SCAN_TIMEOUT_SECS, JANORDER_CURRENCY_SYMBOL,");
                println!("  JANORDER_CURRENCY_DECIMALS, RUST_LOG");
                return;
            }
            other => {
                eprintln!("Unknown argument '{other}' (try --help)");
                std::process::exit(2);
            }
        }
        i += 1;
    }

    janorder_terminal::init_tracing();

    if let Err(e) = janorder_terminal::run(config_path).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
