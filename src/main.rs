use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sstdump::{detect_family, scan, DllFamily, MappedImage, PeView, ScanError};

/// Dump system service numbers from ntdll/win32u/iumdll export trampolines.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the target dll (ntdll.dll, win32u.dll or iumdll.dll)
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    sstdump::logging::init_tracing();
    let args = Args::parse();

    let image = MappedImage::map(&args.input)
        .with_context(|| format!("cannot map input file {}", args.input.display()))?;
    let view = PeView::parse(image.data())
        .with_context(|| format!("not a usable image: {}", args.input.display()))?;

    let family = detect_family(&view);
    if family == DllFamily::Unknown {
        return Err(ScanError::UnknownFamily.into());
    }

    let services = scan(&view, family)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in &services {
        writeln!(out, "{}\t{}", entry.name, entry.number)?;
    }
    Ok(())
}
