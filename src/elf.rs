//! Executable Model Reader.
//!
//! Reads the minimal information the packer needs from an ELF executable:
//! the entry address, every PT_LOAD segment with its raw file-backed bytes,
//! every named section with its raw bytes (for the single-segment fallback),
//! and a symbol table lookup by exact name (required by the v2 format).
//!
//! Both ELFCLASS32 and ELFCLASS64 inputs are accepted; the reader is generic
//! over the `object` crate's raw file header types.

use std::collections::HashMap;

use object::elf;
use object::read::elf::{ElfFile, FileHeader, ProgramHeader};
use object::read::{FileKind, Object, ObjectSection, ObjectSymbol};
use object::Endianness;

use crate::error::PackError;

/// One PT_LOAD segment from the input executable.
#[derive(Debug, Clone)]
pub struct LoadSegment {
    /// Physical address (p_paddr). Often zero in non-bare-metal links.
    pub paddr: u64,
    /// Virtual address (p_vaddr).
    pub vaddr: u64,
    /// PF_X was set on the segment.
    pub is_executable: bool,
    /// File-backed size (p_filesz).
    pub file_size: u64,
    /// Total memory footprint (p_memsz), at least `file_size`.
    pub memory_size: u64,
    /// The file-backed bytes, `file_size` of them.
    pub bytes: Vec<u8>,
}

impl LoadSegment {
    /// Base load address: the physical address when one is present,
    /// otherwise the virtual address.
    pub fn base_addr(&self) -> u64 {
        if self.paddr != 0 {
            self.paddr
        } else {
            self.vaddr
        }
    }

    /// This segment's zero-filled contribution, clamped at zero.
    pub fn bss_size(&self) -> u64 {
        self.memory_size.saturating_sub(self.file_size)
    }
}

/// A named section and its raw bytes, in section-table order.
#[derive(Debug, Clone)]
pub struct NamedSection {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Everything the packer needs from one executable, held in memory so the
/// input file can be released before any output is written.
#[derive(Debug)]
pub struct ExecutableModel {
    /// Declared entry address (e_entry).
    pub entry: u64,
    /// PT_LOAD segments in program-header order. Never empty.
    pub segments: Vec<LoadSegment>,
    /// Named sections in section-table order.
    pub sections: Vec<NamedSection>,
    /// Symbol table, name to value.
    pub symbols: HashMap<String, u64>,
}

impl ExecutableModel {
    /// Parse an executable from raw bytes.
    pub fn parse(data: &[u8]) -> Result<Self, PackError> {
        match FileKind::parse(data)? {
            FileKind::Elf32 => read_elf::<elf::FileHeader32<Endianness>>(data),
            FileKind::Elf64 => read_elf::<elf::FileHeader64<Endianness>>(data),
            kind => Err(PackError::MalformedExecutable(format!(
                "unsupported file kind {kind:?}, expected an ELF executable"
            ))),
        }
    }

    /// Look up a symbol value by exact name.
    pub fn symbol(&self, name: &str) -> Option<u64> {
        self.symbols.get(name).copied()
    }

    /// Look up a symbol the header format cannot do without.
    pub fn require_symbol(&self, name: &'static str) -> Result<u64, PackError> {
        self.symbol(name)
            .ok_or(PackError::MissingRequiredSymbol(name))
    }
}

fn read_elf<Elf>(data: &[u8]) -> Result<ExecutableModel, PackError>
where
    Elf: FileHeader<Endian = Endianness>,
{
    let file = ElfFile::<Elf>::parse(data)?;
    let endian = file.elf_header().endian()?;

    let mut segments = Vec::new();
    for ph in file.elf_program_headers() {
        if ph.p_type(endian) != elf::PT_LOAD {
            continue;
        }
        let bytes = ph.data(endian, data).map_err(|()| {
            PackError::MalformedExecutable("PT_LOAD file range out of bounds".to_string())
        })?;
        segments.push(LoadSegment {
            paddr: ph.p_paddr(endian).into(),
            vaddr: ph.p_vaddr(endian).into(),
            is_executable: ph.p_flags(endian) & elf::PF_X != 0,
            file_size: ph.p_filesz(endian).into(),
            memory_size: ph.p_memsz(endian).into(),
            bytes: bytes.to_vec(),
        });
    }
    if segments.is_empty() {
        return Err(PackError::NoLoadableSegments);
    }

    let mut sections = Vec::new();
    for section in file.sections() {
        let name = section.name()?;
        if name.is_empty() {
            continue;
        }
        sections.push(NamedSection {
            name: name.to_string(),
            bytes: section.data()?.to_vec(),
        });
    }

    let mut symbols = HashMap::new();
    for sym in file.symbols() {
        let name = sym.name()?;
        if name.is_empty() {
            continue;
        }
        symbols.insert(name.to_string(), sym.address());
    }

    tracing::debug!(
        "parsed executable: entry=0x{:08x}, {} PT_LOAD segment(s), {} section(s), {} symbol(s)",
        file.entry(),
        segments.len(),
        sections.len(),
        symbols.len()
    );

    Ok(ExecutableModel {
        entry: file.entry(),
        segments,
        sections,
        symbols,
    })
}
