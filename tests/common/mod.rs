//! Synthetic PE image builder for integration tests.
//!
//! Produces a file-layout image with one code section carrying a real
//! export directory, and optionally a resource section holding a minimal
//! version blob with an InternalName value. Only the structures the scanner
//! reads are populated.

#![allow(dead_code)]

pub const MACHINE_I386: u16 = 0x014C;
pub const MACHINE_AMD64: u16 = 0x8664;
pub const MACHINE_ARM64: u16 = 0xAA64;

const TEXT_VA: u32 = 0x1000;
const TEXT_PTR: usize = 0x400;
const E_LFANEW: usize = 0x80;
const COFF_OFF: usize = E_LFANEW + 4;
const OPT_OFF: usize = COFF_OFF + 20;

/// File offset of the optional-header magic, for tests that corrupt it.
pub const MAGIC_OFF: usize = OPT_OFF;

fn put_u16(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut [u8], off: usize, v: u32) {
    buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

fn align(v: usize, to: usize) -> usize {
    (v + to - 1) & !(to - 1)
}

/// UTF-16LE VS_VERSIONINFO-shaped blob carrying one InternalName value.
fn version_blob(internal_name: &str) -> Vec<u8> {
    let mut blob = vec![0u8; 6]; // wLength/wValueLength/wType placeholder
    for unit in "InternalName".encode_utf16() {
        blob.extend_from_slice(&unit.to_le_bytes());
    }
    blob.extend_from_slice(&[0, 0]);
    while blob.len() % 4 != 0 {
        blob.push(0);
    }
    for unit in internal_name.encode_utf16() {
        blob.extend_from_slice(&unit.to_le_bytes());
    }
    blob.extend_from_slice(&[0, 0]);
    blob
}

/// Three-level resource tree with a single RT_VERSION leaf.
fn resource_section(rsrc_va: u32, internal_name: &str) -> Vec<u8> {
    const SUBDIR: u32 = 0x8000_0000;
    let blob = version_blob(internal_name);
    let mut sec = vec![0u8; 0x58];

    // root: one ID entry, type 16 (RT_VERSION) -> dir at 0x18
    put_u16(&mut sec, 14, 1);
    put_u32(&mut sec, 16, 16);
    put_u32(&mut sec, 20, SUBDIR | 0x18);
    // name level: one ID entry -> dir at 0x30
    put_u16(&mut sec, 0x18 + 14, 1);
    put_u32(&mut sec, 0x18 + 16, 1);
    put_u32(&mut sec, 0x18 + 20, SUBDIR | 0x30);
    // language level: one ID entry -> data entry at 0x48
    put_u16(&mut sec, 0x30 + 14, 1);
    put_u32(&mut sec, 0x30 + 16, 0x409);
    put_u32(&mut sec, 0x30 + 20, 0x48);
    // data entry: blob follows the fixed tree
    put_u32(&mut sec, 0x48, rsrc_va + 0x58);
    put_u32(&mut sec, 0x48 + 4, blob.len() as u32);

    sec.extend_from_slice(&blob);
    sec
}

/// Build a raw PE image exporting `exports` (name, entry-point code) in
/// table order, optionally with a version resource naming the dll.
pub fn build_image(
    machine: u16,
    exports: &[(&str, &[u8])],
    internal_name: Option<&str>,
) -> Vec<u8> {
    let pe32_plus = machine != MACHINE_I386;
    let opt_size: usize = if pe32_plus { 240 } else { 224 };
    let n = exports.len();

    // .text payload: export directory, three tables, name strings, code
    let funcs_off = 40;
    let names_off = funcs_off + 4 * n;
    let ords_off = names_off + 4 * n;
    let tables_end = ords_off + 2 * n;

    let mut name_rvas = Vec::with_capacity(n);
    let mut strings = Vec::new();
    for (name, _) in exports {
        name_rvas.push(TEXT_VA + (tables_end + strings.len()) as u32);
        strings.extend_from_slice(name.as_bytes());
        strings.push(0);
    }

    let code_base = align(tables_end + strings.len(), 16);
    let mut code_rvas = Vec::with_capacity(n);
    let mut code = Vec::new();
    for (_, bytes) in exports {
        code_rvas.push(TEXT_VA + (code_base + code.len()) as u32);
        code.extend_from_slice(bytes);
        while code.len() % 16 != 0 {
            code.push(0xCC);
        }
    }

    let mut text = vec![0u8; tables_end];
    put_u32(&mut text, 20, n as u32); // NumberOfFunctions
    put_u32(&mut text, 24, n as u32); // NumberOfNames
    put_u32(&mut text, 28, TEXT_VA + funcs_off as u32);
    put_u32(&mut text, 32, TEXT_VA + names_off as u32);
    put_u32(&mut text, 36, TEXT_VA + ords_off as u32);
    for i in 0..n {
        put_u32(&mut text, funcs_off + 4 * i, code_rvas[i]);
        put_u32(&mut text, names_off + 4 * i, name_rvas[i]);
        put_u16(&mut text, ords_off + 2 * i, i as u16);
    }
    text.extend_from_slice(&strings);
    text.resize(code_base, 0);
    text.extend_from_slice(&code);

    let text_raw = align(text.len().max(1), 0x200);
    let rsrc_va = (TEXT_VA as usize + align(text.len().max(1), 0x1000)) as u32;
    let rsrc = internal_name.map(|name| resource_section(rsrc_va, name));

    // Headers
    let mut img = vec![0u8; TEXT_PTR];
    img[0] = b'M';
    img[1] = b'Z';
    put_u32(&mut img, 0x3C, E_LFANEW as u32);
    img[E_LFANEW..E_LFANEW + 4].copy_from_slice(b"PE\0\0");

    let nsections = 1 + rsrc.is_some() as u16;
    put_u16(&mut img, COFF_OFF, machine);
    put_u16(&mut img, COFF_OFF + 2, nsections);
    put_u16(&mut img, COFF_OFF + 16, opt_size as u16);
    put_u16(
        &mut img,
        OPT_OFF,
        if pe32_plus { 0x20B } else { 0x10B },
    );

    let (count_off, dirs_off) = if pe32_plus {
        (OPT_OFF + 108, OPT_OFF + 112)
    } else {
        (OPT_OFF + 92, OPT_OFF + 96)
    };
    put_u32(&mut img, count_off, 16);
    // directory 0: exports
    put_u32(&mut img, dirs_off, TEXT_VA);
    put_u32(&mut img, dirs_off + 4, text.len() as u32);
    // directory 2: resources
    if let Some(rsrc) = &rsrc {
        put_u32(&mut img, dirs_off + 16, rsrc_va);
        put_u32(&mut img, dirs_off + 20, rsrc.len() as u32);
    }

    // Section headers
    let mut sec_off = OPT_OFF + opt_size;
    let mut put_section = |img: &mut Vec<u8>, name: &[u8], va: u32, vsz: u32, rp: u32, rsz: u32| {
        img[sec_off..sec_off + name.len()].copy_from_slice(name);
        put_u32(img, sec_off + 8, vsz);
        put_u32(img, sec_off + 12, va);
        put_u32(img, sec_off + 16, rsz);
        put_u32(img, sec_off + 20, rp);
        sec_off += 40;
    };
    put_section(
        &mut img,
        b".text",
        TEXT_VA,
        text.len() as u32,
        TEXT_PTR as u32,
        text_raw as u32,
    );
    if let Some(rsrc) = &rsrc {
        put_section(
            &mut img,
            b".rsrc",
            rsrc_va,
            rsrc.len() as u32,
            (TEXT_PTR + text_raw) as u32,
            align(rsrc.len(), 0x200) as u32,
        );
    }

    // Raw section data
    img.extend_from_slice(&text);
    img.resize(TEXT_PTR + text_raw, 0);
    if let Some(rsrc) = &rsrc {
        img.extend_from_slice(rsrc);
        img.resize(TEXT_PTR + text_raw + align(rsrc.len(), 0x200), 0);
    }

    img
}

/// The x64 service stub shape: mov r10, rcx; mov eax, imm32; syscall; ret.
pub fn x64_stub(number: u32) -> Vec<u8> {
    let mut code = vec![0x4C, 0x8B, 0xD1, 0xB8];
    code.extend_from_slice(&number.to_le_bytes());
    code.extend_from_slice(&[0x0F, 0x05, 0xC3]);
    code
}

/// The 32-bit service stub shape: mov eax, imm32; ret.
pub fn x86_stub(number: u32) -> Vec<u8> {
    let mut code = vec![0xB8];
    code.extend_from_slice(&number.to_le_bytes());
    code.push(0xC3);
    code
}

/// The ARM64 service stub shape: svc #number; ret.
pub fn arm64_stub(number: u16) -> Vec<u8> {
    let svc: u32 = 0xD400_0001 | ((number as u32) << 5);
    let mut code = svc.to_le_bytes().to_vec();
    code.extend_from_slice(&0xD65F_03C0u32.to_le_bytes());
    code
}
