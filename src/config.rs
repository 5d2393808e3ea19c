//! Configuration module.
//!
//! This module defines the command-line interface (CLI) for the packer using
//! `clap`. It handles the input/output paths, the header format selection,
//! and the address overrides.

use clap::Parser;
use std::path::PathBuf;

use crate::header::Format;
use crate::utils::parse_addr;

/// Pack a RISC-V ELF into an R5M firmware image.
///
/// Extracts CODE and DATA from the executable's loadable segments (or from
/// its sections when everything lives in a single segment) and prefixes
/// them with a fixed 64-byte header the VM loader understands.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input ELF file
    pub input: PathBuf,

    /// Output .r5m file
    pub output: PathBuf,

    /// Header format generation to produce
    #[arg(long, value_enum, default_value_t = Format::V1)]
    pub format: Format,

    /// Mark image as RV64 (default: RV32)
    #[arg(long)]
    pub rv64: bool,

    /// Override entry address (hex or dec). Default: ELF e_entry
    #[arg(long, value_parser = parse_addr)]
    pub entry: Option<u64>,

    /// Override base load address (hex or dec).
    /// Default: minimum PT_LOAD p_paddr/p_vaddr
    #[arg(long, value_parser = parse_addr)]
    pub load_addr: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
