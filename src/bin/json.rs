//! Print a PRAY file as JSON

use prayer::PrayFile;
use std::error;
use std::io;

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        std::process::exit(1);
    }

    let data = std::fs::read(&args[1])?;
    let file = PrayFile::from_slice(&data)?;
    let json = prayer::json::to_json(&file)?;

    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &json)?;
    println!();
    Ok(())
}
