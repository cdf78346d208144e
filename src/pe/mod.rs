//! Minimal PE container parsing under strict bounds.
//!
//! Only the pieces the scan needs are modeled: DOS/COFF/optional headers,
//! the data directory table, and section headers for RVA translation. All
//! offset arithmetic is explicit and checked; a hostile header can make the
//! parse fail, never read out of bounds.

pub mod export;
pub mod utils;
pub mod version;

use tracing::debug;

use crate::error::{Result, ScanError};
use utils::ReadExt;

pub const DOS_SIGNATURE: u16 = 0x5A4D; // MZ
pub const PE_SIGNATURE: [u8; 4] = *b"PE\0\0";
pub const PE32_MAGIC: u16 = 0x10B;
pub const PE32PLUS_MAGIC: u16 = 0x20B;

pub const IMAGE_DIRECTORY_ENTRY_EXPORT: usize = 0;
pub const IMAGE_DIRECTORY_ENTRY_RESOURCE: usize = 2;

pub const IMAGE_FILE_MACHINE_I386: u16 = 0x014C;
pub const IMAGE_FILE_MACHINE_AMD64: u16 = 0x8664;
pub const IMAGE_FILE_MACHINE_ARM64: u16 = 0xAA64;

/// Machine types relevant to trampoline decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    X86,
    X64,
    Arm64,
    Other(u16),
}

impl From<u16> for Machine {
    fn from(raw: u16) -> Self {
        match raw {
            IMAGE_FILE_MACHINE_I386 => Machine::X86,
            IMAGE_FILE_MACHINE_AMD64 => Machine::X64,
            IMAGE_FILE_MACHINE_ARM64 => Machine::Arm64,
            other => Machine::Other(other),
        }
    }
}

impl Machine {
    pub fn raw(&self) -> u16 {
        match self {
            Machine::X86 => IMAGE_FILE_MACHINE_I386,
            Machine::X64 => IMAGE_FILE_MACHINE_AMD64,
            Machine::Arm64 => IMAGE_FILE_MACHINE_ARM64,
            Machine::Other(raw) => *raw,
        }
    }

    /// Expected optional-header width, when the machine is known.
    fn expects_pe32_plus(&self) -> Option<bool> {
        match self {
            Machine::X86 => Some(false),
            Machine::X64 | Machine::Arm64 => Some(true),
            Machine::Other(_) => None,
        }
    }
}

/// One data directory slot (RVA + size).
#[derive(Debug, Clone, Copy, Default)]
pub struct DataDirectory {
    pub rva: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Copy)]
struct SectionHeader {
    va: u32,
    virt_size: u32,
    raw_ptr: u32,
    raw_size: u32,
}

/// Parsed, borrowed view of a PE image.
///
/// Borrows the mapped bytes for the duration of one scan; never mutates or
/// retains them.
pub struct PeView<'data> {
    data: &'data [u8],
    machine: Machine,
    data_dirs: Vec<DataDirectory>,
    sections: Vec<SectionHeader>,
}

impl<'data> PeView<'data> {
    /// Parse the headers of a raw (file-layout) PE image.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        if data.len() < 64 {
            return Err(ScanError::Truncated {
                expected: 64,
                actual: data.len(),
            });
        }
        if data.read_u16_le_at(0) != Some(DOS_SIGNATURE) {
            return Err(ScanError::InvalidFormat("missing MZ signature"));
        }

        let e_lfanew = data
            .read_u32_le_at(0x3C)
            .ok_or(ScanError::InvalidFormat("missing e_lfanew"))? as usize;
        let sig = data
            .read_slice_at(e_lfanew, 4)
            .ok_or(ScanError::Truncated {
                expected: e_lfanew.saturating_add(4),
                actual: data.len(),
            })?;
        if sig != &PE_SIGNATURE {
            return Err(ScanError::InvalidFormat("missing PE signature"));
        }

        // COFF header
        let coff_off = e_lfanew + 4;
        let need = coff_off.saturating_add(20);
        if need > data.len() {
            return Err(ScanError::Truncated {
                expected: need,
                actual: data.len(),
            });
        }
        let machine_raw = data.read_u16_le_at(coff_off).unwrap_or(0);
        let number_of_sections = data.read_u16_le_at(coff_off + 2).unwrap_or(0);
        let size_of_optional_header = data.read_u16_le_at(coff_off + 16).unwrap_or(0);
        let machine = Machine::from(machine_raw);

        // Optional header, layout selected by the width magic
        let opt_off = coff_off + 20;
        let magic = data.read_u16_le_at(opt_off).ok_or(ScanError::Truncated {
            expected: opt_off + 2,
            actual: data.len(),
        })?;
        let is_pe32_plus = match magic {
            PE32_MAGIC => false,
            PE32PLUS_MAGIC => true,
            other => return Err(ScanError::InvalidMagic(other)),
        };

        // A 32-bit image with a 64-bit machine field (or vice versa) would
        // make every directory offset wrong; refuse it as its own condition.
        if let Some(expected) = machine.expects_pe32_plus() {
            if expected != is_pe32_plus {
                return Err(ScanError::WidthMismatch {
                    machine: machine_raw,
                    magic,
                });
            }
        }

        let (count_off, dirs_off) = if is_pe32_plus {
            (opt_off + 108, opt_off + 112)
        } else {
            (opt_off + 92, opt_off + 96)
        };
        let num_dirs = data.read_u32_le_at(count_off).unwrap_or(0).min(16);

        let mut data_dirs = Vec::with_capacity(num_dirs as usize);
        for i in 0..num_dirs as usize {
            let off = dirs_off + i * 8;
            let rva = data.read_u32_le_at(off).unwrap_or(0);
            let size = data.read_u32_le_at(off + 4).unwrap_or(0);
            data_dirs.push(DataDirectory { rva, size });
        }

        // Section headers follow the optional header
        let mut sections = Vec::with_capacity(number_of_sections as usize);
        let mut off = opt_off.saturating_add(size_of_optional_header as usize);
        for _ in 0..number_of_sections {
            if off + 40 > data.len() {
                break;
            }
            sections.push(SectionHeader {
                virt_size: data.read_u32_le_at(off + 8).unwrap_or(0),
                va: data.read_u32_le_at(off + 12).unwrap_or(0),
                raw_size: data.read_u32_le_at(off + 16).unwrap_or(0),
                raw_ptr: data.read_u32_le_at(off + 20).unwrap_or(0),
            });
            off += 40;
        }

        debug!(
            machine = ?machine,
            pe32_plus = is_pe32_plus,
            sections = sections.len(),
            "parsed image headers"
        );

        Ok(Self {
            data,
            machine,
            data_dirs,
            sections,
        })
    }

    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    pub fn machine(&self) -> Machine {
        self.machine
    }

    pub fn data_directory(&self, index: usize) -> Option<DataDirectory> {
        self.data_dirs.get(index).copied()
    }

    /// Translate an RVA into a file offset through the section table.
    pub fn rva_to_offset(&self, rva: u32) -> Option<usize> {
        for s in &self.sections {
            // Use max(VirtualSize, SizeOfRawData) as the mapping window
            let size = s.virt_size.max(s.raw_size);
            if size == 0 {
                continue;
            }
            if rva >= s.va && rva < s.va.saturating_add(size) {
                let delta = rva - s.va;
                // The virtual-only tail past SizeOfRawData is zero-fill in
                // a loaded image; the file has no bytes for it.
                if delta >= s.raw_size {
                    return None;
                }
                let off = (s.raw_ptr as usize).checked_add(delta as usize)?;
                if off < self.data.len() {
                    return Some(off);
                }
                return None;
            }
        }
        None
    }

    /// Exactly `len` bytes at `rva`, or None.
    pub fn slice_at_rva(&self, rva: u32, len: usize) -> Option<&'data [u8]> {
        let off = self.rva_to_offset(rva)?;
        self.data.read_slice_at(off, len)
    }

    /// Up to `max_len` bytes at `rva`, clamped to the end of the mapping.
    /// This is the bounded probe window handed to the trampoline decoder.
    pub fn window_at_rva(&self, rva: u32, max_len: usize) -> Option<&'data [u8]> {
        let off = self.rva_to_offset(rva)?;
        let end = off.saturating_add(max_len).min(self.data.len());
        self.data.get(off..end)
    }

    /// NUL-terminated ASCII string at `rva`, capped at `max_len` bytes.
    pub fn cstring_at_rva(&self, rva: u32, max_len: usize) -> Option<&'data str> {
        let off = self.rva_to_offset(rva)?;
        self.data.read_cstring_at(off, max_len)
    }
}
