//! Entry point for the r5pack tool.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Initialize logging; `--verbose` raises the filter to debug.
//! 3. Map the input executable and pack it into an in-memory image.
//! 4. Write the complete image to the output path in one shot.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use std::fs::File;

use r5pack::config::Config;
use r5pack::image::{pack, PackOptions};
use r5pack::layout::Overrides;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.verbose);

    let opts = PackOptions {
        format: config.format,
        rv64: config.rv64,
        overrides: Overrides {
            entry: config.entry,
            load_addr: config.load_addr,
        },
    };

    // The mapping is dropped before the output is written; by then every
    // byte the image needs is in memory.
    let image = {
        let file = File::open(&config.input)
            .with_context(|| format!("failed to open {}", config.input.display()))?;
        let mmap = unsafe { Mmap::map(&file)? };
        pack(&mmap, &opts)
            .with_context(|| format!("failed to pack {}", config.input.display()))?
    };

    std::fs::write(&config.output, &image)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    tracing::debug!("wrote {} ({} bytes)", config.output.display(), image.len());
    Ok(())
}
