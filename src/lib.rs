//! ELF to `.r5m` firmware image packer.
//!
//! This library provides the core components for the `r5pack` tool.
//! It is organized into several modules:
//! - `config`: CLI configuration.
//! - `elf`: reads the executable model (segments, sections, symbols).
//! - `classify`: splits the executable's bytes into CODE, DATA and BSS.
//! - `layout`: plans addresses and file offsets for the image.
//! - `header`: the two `.r5m` header format generations.
//! - `image`: assembles header + CODE + DATA into the final image.
//! - `error`: the packer's error taxonomy.

pub mod classify;
pub mod config;
pub mod elf;
pub mod error;
pub mod header;
pub mod image;
pub mod layout;
pub mod utils;
