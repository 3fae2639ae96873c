//! Print every block of a PRAY file: its prefix, name, and body size, plus
//! the variables of blocks that carry tag lists.

use prayer::{BlockBody, PrayFile, TagValue};
use std::error;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        std::process::exit(1);
    }

    let data = std::fs::read(&args[1])?;
    let file = PrayFile::from_slice(&data)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for block in &file {
        writeln!(
            out,
            "{} {:?} ({} bytes{})",
            block.prefix(),
            block.name(),
            block.body().len(),
            if block.is_compressed() {
                ", compressed"
            } else {
                ""
            }
        )?;

        let tags = match block.decode_body() {
            Ok(BlockBody::Tags(tags)) => tags,
            Ok(BlockBody::Opaque(_)) => continue,
            Err(e) => {
                log::warn!("unable to read tags of {}: {}", block.name(), e);
                continue;
            }
        };

        for (key, value) in &tags {
            match value {
                TagValue::Integer(x) => writeln!(out, "  {} = {}", key, x)?,
                TagValue::Text(x) => writeln!(out, "  {} = {:?}", key, x)?,
            }
        }
    }

    Ok(())
}
