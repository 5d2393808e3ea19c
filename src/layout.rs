//! Image Layout Planner.
//!
//! Computes the addresses and file layout recorded in the header: the base
//! load address, the entry point, the region offsets/sizes, and (v2 only)
//! the RAM size derived from the stack-top symbol.

use crate::classify::ExtractedRegions;
use crate::elf::ExecutableModel;
use crate::error::PackError;
use crate::header::{Format, HEADER_SIZE};

/// Symbol marking the top of usable RAM, required by the v2 format.
pub const STACK_TOP_SYMBOL: &str = "_stack_top";

/// Caller-supplied overrides. `ram_size` is deliberately absent: it is
/// always derived, never overridable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub entry: Option<u64>,
    pub load_addr: Option<u64>,
}

/// The planned image: every derived value the header records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    pub entry: u64,
    pub load_addr: u64,
    /// Present for v2, `None` for v1.
    pub ram_size: Option<u64>,
    pub code_offset: u64,
    pub code_size: u64,
    /// Zero when there are no DATA bytes.
    pub data_offset: u64,
    pub data_size: u64,
    pub bss_size: u64,
    pub total_size: u64,
}

/// Plan the output image for the given regions.
///
/// The model is guaranteed non-empty on segments by the reader, so the
/// minimums below always exist.
pub fn plan(
    model: &ExecutableModel,
    regions: &ExtractedRegions,
    format: Format,
    overrides: Overrides,
) -> Result<ImageLayout, PackError> {
    // Base load address prefers the physical address when one is present.
    let min_base = model
        .segments
        .iter()
        .map(|seg| seg.base_addr())
        .min()
        .unwrap_or(0);
    let load_addr = overrides.load_addr.unwrap_or(min_base);
    let entry = overrides.entry.unwrap_or(model.entry);

    let ram_size = match format {
        Format::V1 => None,
        Format::V2 => Some(compute_ram_size(model)?),
    };

    let code_offset = HEADER_SIZE as u64;
    let code_size = regions.code.len() as u64;
    let (data_offset, data_size) = if regions.data.is_empty() {
        (0, 0)
    } else {
        (code_offset + code_size, regions.data.len() as u64)
    };
    let total_size = HEADER_SIZE as u64 + code_size + data_size;

    Ok(ImageLayout {
        entry,
        load_addr,
        ram_size,
        code_offset,
        code_size,
        data_offset,
        data_size,
        bss_size: regions.bss_size,
        total_size,
    })
}

/// RAM size = stack-top symbol value minus the RAM origin.
///
/// The RAM origin is the minimum *virtual* segment address. This is a
/// different notion from the load address, which prefers physical
/// addresses; the two must not be conflated.
fn compute_ram_size(model: &ExecutableModel) -> Result<u64, PackError> {
    let ram_origin = model
        .segments
        .iter()
        .map(|seg| seg.vaddr)
        .min()
        .unwrap_or(0);
    let stack_top = model.require_symbol(STACK_TOP_SYMBOL)?;
    if stack_top <= ram_origin {
        return Err(PackError::InvalidRamSize {
            symbol: STACK_TOP_SYMBOL,
            stack_top,
            ram_origin,
        });
    }
    Ok(stack_top - ram_origin)
}
