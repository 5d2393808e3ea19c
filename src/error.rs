//! Error taxonomy for the packer.
//!
//! Every variant is fatal for the current conversion run: the packer either
//! produces a complete image or fails with one of these.

use thiserror::Error;

/// Errors that can occur while packing an ELF into an `.r5m` image.
#[derive(Error, Debug)]
pub enum PackError {
    /// The executable declares zero PT_LOAD segments.
    #[error("no loadable (PT_LOAD) segments in executable")]
    NoLoadableSegments,

    /// The underlying ELF parse failed or the file is not an ELF at all.
    #[error("malformed executable: {0}")]
    MalformedExecutable(String),

    /// A symbol required by the header format was not found (v2 only).
    #[error("required symbol `{0}` not found in symbol table")]
    MissingRequiredSymbol(&'static str),

    /// The derived RAM size is not strictly positive (v2 only).
    #[error(
        "invalid RAM size: `{symbol}` (0x{stack_top:x}) must lie strictly above \
         the RAM origin (0x{ram_origin:x})"
    )]
    InvalidRamSize {
        symbol: &'static str,
        stack_top: u64,
        ram_origin: u64,
    },

    /// Encoded header length disagrees with the fixed format size.
    /// Indicates an implementation bug, never a bad input.
    #[error("header size mismatch: encoded {actual} bytes, format requires {expected}")]
    HeaderSizeMismatch { actual: usize, expected: usize },

    /// A byte sequence presented as an `.r5m` header could not be decoded.
    #[error("bad image header: {0}")]
    BadHeader(String),
}

impl From<object::read::Error> for PackError {
    fn from(err: object::read::Error) -> Self {
        PackError::MalformedExecutable(err.to_string())
    }
}
