//! Write the decompressed body of every block in a PRAY file to
//! `<dir>/<file>-<prefix>-<index>.blk`

use prayer::Blocks;
use std::error;
use std::path::Path;

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <file> <dir>", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let dir = Path::new(&args[2]);
    let stem = path
        .file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("pray"));

    let data = std::fs::read(path)?;
    std::fs::create_dir_all(dir)?;

    for (index, entry) in Blocks::from_slice(&data)?.enumerate() {
        let (offset, block) = entry?;
        let out = dir.join(format!("{}-{}-{}.blk", stem, block.prefix(), index));
        log::info!(
            "block {} {:?} at offset {} -> {}",
            block.prefix(),
            block.name(),
            offset,
            out.display()
        );
        std::fs::write(out, block.body())?;
    }

    Ok(())
}
