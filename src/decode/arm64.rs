//! ARM64 trampoline probe.
//!
//! Fixed-width ISA, fixed-shape stub: the first word of a service stub is
//! `svc #imm16` with the service number in the immediate field. One word
//! read, no instruction walk.

use super::DecodeOutcome;

/// `svc` with every non-immediate bit pinned: 1101_0100_000 imm16 000_01.
const SVC_PATTERN: u32 = 0xD400_0001;
/// Mask covering everything but the imm16 field (bits 5..=20).
const SVC_MASK: u32 = 0xFFE0_001F;

/// Match the supervisor-call pattern and extract its immediate.
pub fn probe(word: u32) -> DecodeOutcome {
    if word & SVC_MASK == SVC_PATTERN {
        DecodeOutcome::Number((word >> 5) & 0xFFFF)
    } else {
        DecodeOutcome::NotFound
    }
}

/// Encode `svc #number` (test fixtures and round-trip checks).
#[cfg(test)]
pub fn encode_svc(number: u16) -> u32 {
    SVC_PATTERN | ((number as u32) << 5)
}
