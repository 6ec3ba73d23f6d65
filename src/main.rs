use anyhow::{Context, Result};
use clap::Parser;

mod catalog;
mod cli;
mod diff;
mod error;

use catalog::CatalogFile;
use cli::Cli;

fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mapping = diff::load_mapping(&args.diff_file).with_context(|| {
        format!("failed to load diff mapping from {}", args.diff_file.display())
    })?;
    tracing::debug!(mappings = mapping.len(), "built opcode mapping table");

    let mut catalog = CatalogFile::open(&args.opcodes_file).with_context(|| {
        format!("failed to load opcode catalog from {}", args.opcodes_file.display())
    })?;

    // Collisions are advisory: report them and rewrite the catalog anyway.
    let collisions = catalog.apply_remap(&mapping)?;
    for collision in &collisions {
        println!("{collision}");
    }

    catalog.persist().with_context(|| {
        format!("failed to rewrite opcode catalog at {}", args.opcodes_file.display())
    })?;

    Ok(())
}
