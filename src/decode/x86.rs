//! x86/x64 trampoline probe built on the iced-x86 decoder.
//!
//! Service stubs load the number with a 5-byte `mov r32, imm32` somewhere
//! near the entry point; the exact position varies across compiler and
//! instrumentation generations (plain `mov eax, imm` at offset 0, the
//! x64 `mov r10, rcx` prelude, padding and hotpatch thunks). Walking real
//! instructions is the only shape-robust way to find it, so the probe
//! decodes forward until a match, an invalid encoding, or the end of the
//! window.

use iced_x86::{Decoder, DecoderError, DecoderOptions, Instruction, Mnemonic, OpKind};

use super::DecodeOutcome;

/// Encoded length of `mov r32, imm32`, the only form the stubs use.
const LOAD_IMM_LEN: usize = 5;

/// Walk instructions in `window` and extract the first immediate loaded
/// into a general-purpose register by a 5-byte mov.
pub fn probe(window: &[u8], bitness: u32) -> DecodeOutcome {
    let mut decoder = Decoder::new(bitness, window, DecoderOptions::NONE);
    let mut instr = Instruction::default();

    while decoder.can_decode() {
        decoder.decode_out(&mut instr);

        if instr.is_invalid() {
            // An instruction running off the end of the window is window
            // exhaustion, not corruption.
            return match decoder.last_error() {
                DecoderError::NoMoreBytes => DecodeOutcome::NotFound,
                _ => DecodeOutcome::Malformed,
            };
        }

        if instr.len() == LOAD_IMM_LEN
            && instr.mnemonic() == Mnemonic::Mov
            && instr.op_count() == 2
            && instr.op0_kind() == OpKind::Register
            && instr.op1_kind() == OpKind::Immediate32
        {
            return DecodeOutcome::Number(instr.immediate32());
        }
    }

    DecodeOutcome::NotFound
}
