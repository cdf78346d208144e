//! Byte-level read helpers for PE parsing.
//!
//! Every accessor is bounds-checked and returns `Option`; callers translate
//! misses into structured errors or skip the entry.

/// Extension trait for reading primitive types from byte slices
pub trait ReadExt {
    fn read_u16_le_at(&self, offset: usize) -> Option<u16>;
    fn read_u32_le_at(&self, offset: usize) -> Option<u32>;
    fn read_cstring_at(&self, offset: usize, max_len: usize) -> Option<&str>;
    fn read_slice_at(&self, offset: usize, len: usize) -> Option<&[u8]>;
}

impl ReadExt for [u8] {
    #[inline(always)]
    fn read_u16_le_at(&self, offset: usize) -> Option<u16> {
        self.get(offset..offset.checked_add(2)?)
            .and_then(|b| b.try_into().ok())
            .map(u16::from_le_bytes)
    }

    #[inline(always)]
    fn read_u32_le_at(&self, offset: usize) -> Option<u32> {
        self.get(offset..offset.checked_add(4)?)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_le_bytes)
    }

    fn read_cstring_at(&self, offset: usize, max_len: usize) -> Option<&str> {
        let end = offset.checked_add(max_len)?.min(self.len());
        let slice = self.get(offset..end)?;
        let len = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
        std::str::from_utf8(&slice[..len]).ok()
    }

    #[inline(always)]
    fn read_slice_at(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.get(offset..offset.checked_add(len)?)
    }
}

/// Read a NUL-terminated UTF-16LE string of at most `max_chars` characters.
pub fn read_utf16le_string(data: &[u8], offset: usize, max_chars: usize) -> Option<String> {
    let end = offset.checked_add(max_chars.checked_mul(2)?)?.min(data.len());
    let slice = data.get(offset..end)?;

    let mut words = Vec::new();
    let mut i = 0;
    while i + 1 < slice.len() {
        let word = u16::from_le_bytes([slice[i], slice[i + 1]]);
        if word == 0 {
            break;
        }
        words.push(word);
        i += 2;
    }
    String::from_utf16(&words).ok()
}

/// Align an offset up to a 4-byte boundary (version resource layout rule).
#[inline(always)]
pub fn align4(value: usize) -> usize {
    (value + 3) & !3
}
