//! Build a PRAY file from a JSON manifest.
//!
//! ```json
//! {
//!   "compress": true,
//!   "blocks": [
//!     { "prefix": "MESG", "name": "hello", "tags": [["Subject", "Hi"], ["Sender UserID", 1]] },
//!     { "prefix": "FILE", "name": "hello.wav", "file": "sounds/hello.wav" }
//!   ]
//! }
//! ```
//!
//! `file` paths are relative to the manifest.

use prayer::json::Manifest;
use std::error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <manifest.json> <out>", args[0]);
        std::process::exit(1);
    }

    let manifest_path = Path::new(&args[1]);
    let manifest: Manifest = serde_json::from_slice(&std::fs::read(manifest_path)?)?;
    let compress = manifest.compress;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let file = manifest.into_file(base)?;

    let out = BufWriter::new(File::create(&args[2])?);
    file.write(out, compress)?;
    log::info!("wrote {} blocks to {}", file.len(), args[2]);
    Ok(())
}
