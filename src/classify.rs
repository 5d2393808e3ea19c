//! Region Classifier.
//!
//! Decides which bytes of the input executable become CODE, which become
//! DATA, and how large the implicit zero-filled BSS region is. The algorithm
//! is chosen structurally, never by a user flag:
//!
//! 1. Segment-based: the input has at least one executable and one
//!    non-executable PT_LOAD. The last segment of each kind wins; earlier
//!    same-kind segments are deliberately dropped from extraction.
//! 2. Section-based fallback: everything lives in one PT_LOAD (common in
//!    simple bare-metal links), so CODE and DATA are assembled from fixed,
//!    format-specific section name sets instead.
//!
//! BSS is counted over every PT_LOAD in both cases, selected or not.

use crate::elf::{ExecutableModel, NamedSection};
use crate::header::Format;

/// v1 packs read-only data with CODE.
const CODE_SECTIONS_V1: &[&str] = &[".text", ".text.init", ".rodata"];
const DATA_SECTIONS_V1: &[&str] = &[".data"];

/// v2 moved read-only data into DATA and picks up the RISC-V small-data
/// sections. The two generations' sets must never be mixed.
const CODE_SECTIONS_V2: &[&str] = &[".text", ".text.init"];
const DATA_SECTIONS_V2: &[&str] = &[".rodata", ".srodata", ".data", ".sdata"];

/// CODE and DATA bytes plus the total BSS size for one image.
///
/// Either byte block may legitimately be empty; that is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRegions {
    pub code: Vec<u8>,
    pub data: Vec<u8>,
    pub bss_size: u64,
}

/// Classify the executable's bytes into CODE, DATA and BSS.
pub fn classify(model: &ExecutableModel, format: Format) -> ExtractedRegions {
    let mut code_seg = None;
    let mut data_seg = None;
    let mut bss_size = 0u64;

    for seg in &model.segments {
        bss_size += seg.bss_size();
        let slot = if seg.is_executable {
            &mut code_seg
        } else {
            &mut data_seg
        };
        if slot.is_some() {
            // Last one wins; the earlier segment still counted toward BSS.
            tracing::debug!(
                "multiple {} segments, keeping the last (addr=0x{:08x})",
                if seg.is_executable { "CODE" } else { "DATA" },
                seg.base_addr()
            );
        }
        *slot = Some(seg);
    }

    match (code_seg, data_seg) {
        (Some(code), Some(data)) => {
            tracing::debug!("using segment-based extraction (distinct CODE and DATA)");
            tracing::debug!(
                "CODE segment: addr=0x{:08x}, filesz=0x{:x}, memsz=0x{:x}",
                code.base_addr(),
                code.file_size,
                code.memory_size
            );
            tracing::debug!(
                "DATA segment: addr=0x{:08x}, filesz=0x{:x}, memsz=0x{:x}",
                data.base_addr(),
                data.file_size,
                data.memory_size
            );
            ExtractedRegions {
                code: code.bytes.clone(),
                data: data.bytes.clone(),
                bss_size,
            }
        }
        _ => {
            tracing::debug!("using section-based extraction (single PT_LOAD)");
            let (code_names, data_names) = match format {
                Format::V1 => (CODE_SECTIONS_V1, DATA_SECTIONS_V1),
                Format::V2 => (CODE_SECTIONS_V2, DATA_SECTIONS_V2),
            };
            ExtractedRegions {
                code: concat_sections(&model.sections, code_names),
                data: concat_sections(&model.sections, data_names),
                bss_size,
            }
        }
    }
}

/// Concatenate the raw bytes of every section whose name is in `names`,
/// in the order the sections appear in the executable. Sections outside
/// the set are excluded from the image on purpose.
fn concat_sections(sections: &[NamedSection], names: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for sec in sections {
        if names.contains(&sec.name.as_str()) {
            out.extend_from_slice(&sec.bytes);
        }
    }
    out
}
