/*!

A reader and writer for PRAY files: the block container used by the Creatures
series for agents, exported creatures, and warp messages.

## Features

- ✔ Lossless: files written by this crate read back block for block
- ✔ Tolerant: compressed and uncompressed blocks can be mixed freely in a file
- ✔ Faithful: names and tag strings use the same windows-1252 code page as the games
- ✔ Safe: malformed input produces an error pointing at the offending offset, never a panic

## Quick Start

A PRAY file is the 4 byte magic `PRAY` followed by blocks. Each block has a 4
character prefix, a name, and a body that may be zlib compressed.

```rust
use prayer::{Block, PrayFile, TagList};

let mut tags = TagList::new();
tags.push("Agent Type", 0u32);
tags.push("Agent Description", "A bouncing ball");
tags.push("Script Count", 1u32);

let mut file = PrayFile::new();
file.push(Block::from_body("AGNT".parse()?, "Ball", &tags)?);
file.push(Block::new("FILE".parse()?, "ball.c16", vec![0u8; 64])?);

let data = file.to_bytes(true)?;
let decoded = PrayFile::from_slice(&data)?;
assert_eq!(decoded.blocks()[0].name(), "Ball");

let agent = decoded.blocks()[0].tags()?;
assert_eq!(agent.integer("Script Count"), Some(1));
assert_eq!(agent.text("Agent Description"), Some("A bouncing ball"));
# Ok::<(), prayer::Error>(())
```

## Tag Variable Lists

Many blocks (`AGNT`, `DSAG`, `warp`, `MESG`, and others) carry a tag list: a
sequence of integer variables followed by a sequence of string variables. The
encoding always writes integers before strings, so a decoded list keeps each
type's order but not how the two were interleaved when built.

```rust
use prayer::{TagList, TagValue};

let mut tags = TagList::new();
tags.push("Subject", "Test");
tags.push("Sender UserID", 17827u32);

let data = tags.to_bytes()?;
let decoded = TagList::from_slice(&data)?;
assert_eq!(decoded.as_slice()[0], (String::from("Sender UserID"), TagValue::Integer(17827)));
assert_eq!(decoded.as_slice()[1], (String::from("Subject"), TagValue::Text(String::from("Test"))));
# Ok::<(), prayer::Error>(())
```

## One Level Lower

Files don't need to be decoded all at once. `Blocks` lazily walks a file and
reports where each block starts, and `PrayWriterBuilder` streams blocks into
any writer.

```rust
use prayer::{Block, Blocks, CompressionMode, PrayFile, PrayWriterBuilder};

let file: PrayFile = vec![Block::new("GENE".parse()?, "norn.gen", b"dna3".to_vec())?].into();
let data = file.to_bytes(false)?;

let mut writer = PrayWriterBuilder::new()
    .compression_mode(CompressionMode::Preserve)
    .from_writer(Vec::new());

for entry in Blocks::from_slice(&data)? {
    let (offset, block) = entry?;
    assert_eq!(offset, 4);
    writer.write_block(&block)?;
}

assert_eq!(writer.into_inner()?, data);
# Ok::<(), prayer::Error>(())
```

*/

mod block;
mod compression;
mod data;
mod encoding;
mod errors;
mod kind;
mod pray;
mod tags;
pub(crate) mod util;

#[cfg(feature = "json")]
pub mod json;

pub use self::block::*;
pub use self::encoding::Windows1252Encoding;
pub use self::errors::*;
pub use self::kind::*;
pub use self::pray::*;
pub use self::tags::*;
