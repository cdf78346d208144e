//! Trampoline decoding, dispatched per machine type.
//!
//! Each decoder inspects a small bounded probe window anchored at the
//! export's entry point and either recovers the embedded service number or
//! reports why it could not. Nothing here reads outside the window the
//! walker hands over.

pub mod arm64;
pub mod x86;

use crate::pe::{Machine, PeView};

/// Probe window for 32-bit x86 trampolines.
pub const PROBE_WINDOW_X86: usize = 16;
/// Probe window for x64 trampolines (longer stubs, alignment thunks).
pub const PROBE_WINDOW_X64: usize = 32;
/// ARM64 stubs begin with a single fixed-width supervisor call.
pub const PROBE_WINDOW_ARM64: usize = 4;

/// Per-entry decode result. None of these abort the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The trampoline's service number
    Number(u32),
    /// No load-immediate found inside the window (forwarders, wrappers)
    NotFound,
    /// The decoder hit an invalid encoding before any match
    Malformed,
}

/// Decode the trampoline at `rva` according to `machine`.
pub fn decode_service(view: &PeView, rva: u32, machine: Machine) -> DecodeOutcome {
    match machine {
        Machine::X86 => probe_window(view, rva, PROBE_WINDOW_X86, 32),
        Machine::X64 => probe_window(view, rva, PROBE_WINDOW_X64, 64),
        Machine::Arm64 => match view.slice_at_rva(rva, PROBE_WINDOW_ARM64) {
            Some(w) => arm64::probe(u32::from_le_bytes([w[0], w[1], w[2], w[3]])),
            None => DecodeOutcome::NotFound,
        },
        Machine::Other(_) => DecodeOutcome::NotFound,
    }
}

fn probe_window(view: &PeView, rva: u32, window: usize, bitness: u32) -> DecodeOutcome {
    match view.window_at_rva(rva, window) {
        Some(w) if !w.is_empty() => x86::probe(w, bitness),
        _ => DecodeOutcome::NotFound,
    }
}
