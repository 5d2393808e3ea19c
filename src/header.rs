//! `.r5m` header formats.
//!
//! Two incompatible header generations exist. They share only the leading
//! magic/version prefix; everything after it is a distinct schema, so the two
//! are modeled as separate field structs behind a tagged [`Header`] variant
//! rather than one struct with optional fields.
//!
//! Both layouts are fixed-width little-endian and exactly 64 bytes.

use crate::error::PackError;

/// `.r5m` header identifier ("r5vm" in little endian).
pub const R5M_MAGIC: u32 = 0x6d76_3572;

/// Fixed header size in bytes, identical for both format generations.
pub const HEADER_SIZE: usize = 64;

/// Flags bit 0: image is RV64 (unset means RV32).
pub const FLAG_RV64: u16 = 0x0001;

/// Header format generation to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Version 1: read-only data is packed with CODE.
    V1,
    /// Version 2: adds `ram_size`, read-only data is packed with DATA.
    V2,
}

impl Format {
    pub fn version(self) -> u16 {
        match self {
            Format::V1 => 1,
            Format::V2 => 2,
        }
    }
}

/// Version 1 header fields (after the magic/version prefix).
///
/// ```text
/// offset  size  field
/// 0       4     magic
/// 4       2     version = 1
/// 6       2     flags        bit0: 1=RV64, 0=RV32
/// 8       4     entry
/// 12      4     load_addr
/// 16      4     code_offset
/// 20      4     code_size
/// 24      4     data_offset  (0 if no data)
/// 28      4     data_size    (0 if no data)
/// 32      4     bss_size
/// 36      4     total_size
/// 40      24    reserved, zero
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderV1 {
    pub flags: u16,
    pub entry: u32,
    pub load_addr: u32,
    pub code_offset: u32,
    pub code_size: u32,
    pub data_offset: u32,
    pub data_size: u32,
    pub bss_size: u32,
    pub total_size: u32,
}

/// Version 2 header fields. `ram_size` sits between `load_addr` and
/// `code_offset`, shrinking the reserved tail to 20 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderV2 {
    pub flags: u16,
    pub entry: u32,
    pub load_addr: u32,
    pub ram_size: u32,
    pub code_offset: u32,
    pub code_size: u32,
    pub data_offset: u32,
    pub data_size: u32,
    pub bss_size: u32,
    pub total_size: u32,
}

/// A versioned `.r5m` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    V1(HeaderV1),
    V2(HeaderV2),
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn get_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn get_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

impl Header {
    pub fn format(&self) -> Format {
        match self {
            Header::V1(_) => Format::V1,
            Header::V2(_) => Format::V2,
        }
    }

    /// Serialize into the fixed 64-byte little-endian layout.
    ///
    /// Deterministic: identical field values always yield identical bytes.
    pub fn encode(&self) -> Result<Vec<u8>, PackError> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        put_u32(&mut buf, R5M_MAGIC);
        put_u16(&mut buf, self.format().version());
        match self {
            Header::V1(h) => {
                put_u16(&mut buf, h.flags);
                put_u32(&mut buf, h.entry);
                put_u32(&mut buf, h.load_addr);
                put_u32(&mut buf, h.code_offset);
                put_u32(&mut buf, h.code_size);
                put_u32(&mut buf, h.data_offset);
                put_u32(&mut buf, h.data_size);
                put_u32(&mut buf, h.bss_size);
                put_u32(&mut buf, h.total_size);
                buf.extend_from_slice(&[0u8; 24]);
            }
            Header::V2(h) => {
                put_u16(&mut buf, h.flags);
                put_u32(&mut buf, h.entry);
                put_u32(&mut buf, h.load_addr);
                put_u32(&mut buf, h.ram_size);
                put_u32(&mut buf, h.code_offset);
                put_u32(&mut buf, h.code_size);
                put_u32(&mut buf, h.data_offset);
                put_u32(&mut buf, h.data_size);
                put_u32(&mut buf, h.bss_size);
                put_u32(&mut buf, h.total_size);
                buf.extend_from_slice(&[0u8; 20]);
            }
        }
        if buf.len() != HEADER_SIZE {
            return Err(PackError::HeaderSizeMismatch {
                actual: buf.len(),
                expected: HEADER_SIZE,
            });
        }
        Ok(buf)
    }

    /// Decode a header from the leading 64 bytes of an image.
    ///
    /// Validates magic and version; the reserved tail is not inspected.
    pub fn decode(bytes: &[u8]) -> Result<Header, PackError> {
        if bytes.len() < HEADER_SIZE {
            return Err(PackError::BadHeader(format!(
                "expected at least {HEADER_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        let magic = get_u32(bytes, 0);
        if magic != R5M_MAGIC {
            return Err(PackError::BadHeader(format!(
                "bad magic 0x{magic:08x}, expected 0x{R5M_MAGIC:08x}"
            )));
        }
        let version = get_u16(bytes, 4);
        let flags = get_u16(bytes, 6);
        match version {
            1 => Ok(Header::V1(HeaderV1 {
                flags,
                entry: get_u32(bytes, 8),
                load_addr: get_u32(bytes, 12),
                code_offset: get_u32(bytes, 16),
                code_size: get_u32(bytes, 20),
                data_offset: get_u32(bytes, 24),
                data_size: get_u32(bytes, 28),
                bss_size: get_u32(bytes, 32),
                total_size: get_u32(bytes, 36),
            })),
            2 => Ok(Header::V2(HeaderV2 {
                flags,
                entry: get_u32(bytes, 8),
                load_addr: get_u32(bytes, 12),
                ram_size: get_u32(bytes, 16),
                code_offset: get_u32(bytes, 20),
                code_size: get_u32(bytes, 24),
                data_offset: get_u32(bytes, 28),
                data_size: get_u32(bytes, 32),
                bss_size: get_u32(bytes, 36),
                total_size: get_u32(bytes, 40),
            })),
            v => Err(PackError::BadHeader(format!("unknown version {v}"))),
        }
    }
}
