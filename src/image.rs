//! Image assembly.
//!
//! Drives one conversion run end to end: parse the executable, classify its
//! regions, plan the layout, encode the header, and concatenate header +
//! CODE + DATA into a single in-memory buffer. The caller writes that
//! buffer in one shot, so a failed run can never leave a partial image
//! claiming success.

use crate::classify;
use crate::elf::ExecutableModel;
use crate::error::PackError;
use crate::header::{Format, Header, HeaderV1, HeaderV2, FLAG_RV64, R5M_MAGIC};
use crate::layout::{self, ImageLayout, Overrides};

/// Options for one packing run.
#[derive(Debug, Clone, Copy)]
pub struct PackOptions {
    pub format: Format,
    /// Sets flag bit 0 in the header; RV32 otherwise.
    pub rv64: bool,
    pub overrides: Overrides,
}

/// Pack raw executable bytes into a complete `.r5m` image.
pub fn pack(input: &[u8], opts: &PackOptions) -> Result<Vec<u8>, PackError> {
    let model = ExecutableModel::parse(input)?;
    let regions = classify::classify(&model, opts.format);
    let layout = layout::plan(&model, &regions, opts.format, opts.overrides)?;

    let mut flags = 0u16;
    if opts.rv64 {
        flags |= FLAG_RV64;
    }
    let header = build_header(opts.format, flags, &layout);
    log_header(&header, opts.rv64);

    let header_bytes = header.encode()?;
    let mut image = Vec::with_capacity(layout.total_size as usize);
    image.extend_from_slice(&header_bytes);
    image.extend_from_slice(&regions.code);
    image.extend_from_slice(&regions.data);
    Ok(image)
}

/// Fill the version-specific header from the planned layout. Address and
/// size fields are 32-bit in both on-disk formats.
fn build_header(format: Format, flags: u16, layout: &ImageLayout) -> Header {
    match format {
        Format::V1 => Header::V1(HeaderV1 {
            flags,
            entry: layout.entry as u32,
            load_addr: layout.load_addr as u32,
            code_offset: layout.code_offset as u32,
            code_size: layout.code_size as u32,
            data_offset: layout.data_offset as u32,
            data_size: layout.data_size as u32,
            bss_size: layout.bss_size as u32,
            total_size: layout.total_size as u32,
        }),
        Format::V2 => Header::V2(HeaderV2 {
            flags,
            entry: layout.entry as u32,
            load_addr: layout.load_addr as u32,
            ram_size: layout.ram_size.unwrap_or(0) as u32,
            code_offset: layout.code_offset as u32,
            code_size: layout.code_size as u32,
            data_offset: layout.data_offset as u32,
            data_size: layout.data_size as u32,
            bss_size: layout.bss_size as u32,
            total_size: layout.total_size as u32,
        }),
    }
}

fn log_header(header: &Header, rv64: bool) {
    let isa = if rv64 { "RV64" } else { "RV32" };
    tracing::debug!("R5M header:");
    tracing::debug!("  magic      = 0x{R5M_MAGIC:08x}");
    match header {
        Header::V1(h) => {
            tracing::debug!("  version    = 1");
            tracing::debug!("  flags      = 0x{:04x} ({isa})", h.flags);
            tracing::debug!("  entry      = 0x{:08x}", h.entry);
            tracing::debug!("  load_addr  = 0x{:08x}", h.load_addr);
            tracing::debug!("  code_off   = {} (0x{:x})", h.code_offset, h.code_offset);
            tracing::debug!("  code_size  = {} (0x{:x})", h.code_size, h.code_size);
            tracing::debug!("  data_off   = {} (0x{:x})", h.data_offset, h.data_offset);
            tracing::debug!("  data_size  = {} (0x{:x})", h.data_size, h.data_size);
            tracing::debug!("  bss_size   = {} (0x{:x})", h.bss_size, h.bss_size);
            tracing::debug!("  total_size = {} (0x{:x})", h.total_size, h.total_size);
        }
        Header::V2(h) => {
            tracing::debug!("  version    = 2");
            tracing::debug!("  flags      = 0x{:04x} ({isa})", h.flags);
            tracing::debug!("  entry      = 0x{:08x}", h.entry);
            tracing::debug!("  load_addr  = 0x{:08x}", h.load_addr);
            tracing::debug!("  ram_size   = {} (0x{:x})", h.ram_size, h.ram_size);
            tracing::debug!("  code_off   = {} (0x{:x})", h.code_offset, h.code_offset);
            tracing::debug!("  code_size  = {} (0x{:x})", h.code_size, h.code_size);
            tracing::debug!("  data_off   = {} (0x{:x})", h.data_offset, h.data_offset);
            tracing::debug!("  data_size  = {} (0x{:x})", h.data_size, h.data_size);
            tracing::debug!("  bss_size   = {} (0x{:x})", h.bss_size, h.bss_size);
            tracing::debug!("  total_size = {} (0x{:x})", h.total_size, h.total_size);
        }
    }
}
