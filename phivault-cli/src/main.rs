//! `phivault` CLI tool for key provisioning.

#![warn(clippy::pedantic, clippy::nursery)]

use anyhow::bail;
use clap::{Parser, Subcommand};
use phivault::key::{generate_key_hex, KeyMaterial};
use phivault::strength::is_strong;

#[derive(Parser)]
#[command(name = "phivault")]
#[command(about = "phivault key provisioning CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh 256-bit encryption key as 64 hex characters
    Keygen,
    /// Validate a candidate key before provisioning it
    CheckKey {
        /// Hex-encoded candidate key
        key_hex: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen => {
            println!("{}", generate_key_hex());
        }
        Commands::CheckKey { key_hex } => {
            KeyMaterial::load(Some(&key_hex), None)?;
            if !is_strong(&key_hex) {
                bail!("key is degenerate: all-zero or a single repeated byte");
            }
            println!("key is valid");
        }
    }

    Ok(())
}
