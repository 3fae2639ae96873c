use crate::{Block, BlockKind, Error, ErrorKind, Prefix};
use std::io::Write;

/// The 4 bytes every PRAY file starts with
pub const MAGIC: &[u8; 4] = b"PRAY";

/// zlib compression level used when none is configured
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// An ordered collection of blocks
///
/// ```
/// use prayer::{Block, PrayFile};
///
/// let mut file = PrayFile::new();
/// file.push(Block::new("FILE".parse()?, "a.txt", vec![0u8; 10])?);
/// file.push(Block::new("FILE".parse()?, "b.txt", vec![1u8; 20])?);
///
/// let data = file.to_bytes(false)?;
/// assert_eq!(&data[..4], b"PRAY");
///
/// let decoded = PrayFile::from_slice(&data)?;
/// assert_eq!(decoded, file);
/// # Ok::<(), prayer::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PrayFile {
    blocks: Vec<Block>,
}

impl PrayFile {
    /// Creates a file with no blocks
    pub fn new() -> Self {
        PrayFile::default()
    }

    /// Decode every block of a PRAY file.
    ///
    /// The first malformed block fails the whole file; the error's offset
    /// points at the block (or the part of it) that could not be decoded.
    pub fn from_slice(data: &[u8]) -> Result<PrayFile, Error> {
        let blocks = Blocks::from_slice(data)?
            .map(|x| x.map(|(_, block)| block))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PrayFile { blocks })
    }

    /// The blocks in file order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Mutable access to the blocks
    pub fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// Consume the file and return its blocks
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Appends a block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Iterate over the blocks in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// The number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the file has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The first block with the given prefix
    pub fn find(&self, prefix: Prefix) -> Option<&Block> {
        self.blocks.iter().find(|x| x.prefix() == prefix)
    }

    /// Every block of the given kind
    pub fn of_kind(&self, kind: BlockKind) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().filter(move |x| x.kind() == kind)
    }

    /// Serialize the file, optionally compressing every body
    pub fn to_bytes(&self, compress: bool) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.write(&mut out, compress)?;
        Ok(out)
    }

    /// Serialize the file, optionally compressing every body
    pub fn write<W: Write>(&self, writer: W, compress: bool) -> Result<(), Error> {
        let mut writer = PrayWriterBuilder::new().compress(compress).from_writer(writer);
        for block in &self.blocks {
            writer.write_block(block)?;
        }
        writer.into_inner()?;
        Ok(())
    }
}

impl From<Vec<Block>> for PrayFile {
    fn from(blocks: Vec<Block>) -> Self {
        PrayFile { blocks }
    }
}

impl FromIterator<Block> for PrayFile {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        PrayFile {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PrayFile {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for PrayFile {
    type Item = Block;
    type IntoIter = std::vec::IntoIter<Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

/// Lazily decodes the blocks of a PRAY file one at a time.
///
/// Yields each block with the offset of its header. After an error the
/// iterator is exhausted: a bad block leaves no trustworthy offset for the
/// next one.
///
/// ```
/// use prayer::{Block, Blocks, PrayFile};
///
/// let file: PrayFile = vec![Block::new("GENE".parse()?, "norn.gen", b"dna3".to_vec())?].into();
/// let data = file.to_bytes(true)?;
///
/// for entry in Blocks::from_slice(&data)? {
///     let (offset, block) = entry?;
///     assert_eq!(offset, 4);
///     assert_eq!(block.body(), b"dna3");
/// }
/// # Ok::<(), prayer::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Blocks<'a> {
    /// Verify the magic and prepare to walk the blocks that follow it
    pub fn from_slice(data: &'a [u8]) -> Result<Self, Error> {
        if !data.starts_with(MAGIC) {
            return Err(Error::new(ErrorKind::MissingMagic));
        }

        Ok(Blocks {
            data,
            offset: MAGIC.len(),
            failed: false,
        })
    }

    /// Offset of the next block to decode
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<(usize, Block), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let offset = self.offset;
        match Block::decode_at(self.data, offset) {
            Ok((block, consumed)) => {
                self.offset += consumed;
                Some(Ok((offset, block)))
            }
            Err(e) => {
                log::debug!("stopped walking blocks at offset {}: {}", offset, e);
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> std::iter::FusedIterator for Blocks<'a> {}

/// How block bodies are stored when written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMode {
    /// Store every body verbatim
    #[default]
    Uncompressed,

    /// zlib compress every body
    Compressed,

    /// Compress the bodies of blocks that were compressed when read
    Preserve,
}

/// Construct a customized PRAY writer.
///
/// Bodies are stored uncompressed unless configured otherwise.
///
/// ```
/// use prayer::{Block, PrayFile, PrayWriterBuilder};
/// # fn main() -> Result<(), prayer::Error> {
/// let mut writer = PrayWriterBuilder::new()
///     .compress(true)
///     .compression_level(9)
///     .from_writer(Vec::new());
///
/// writer.write_block(&Block::new("FILE".parse()?, "zeros", vec![0u8; 4096])?)?;
/// let data = writer.into_inner()?;
/// assert!(data.len() < 4096);
///
/// let file = PrayFile::from_slice(&data)?;
/// assert_eq!(file.blocks()[0].body(), &[0u8; 4096][..]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PrayWriterBuilder {
    mode: CompressionMode,
    level: u32,
}

impl Default for PrayWriterBuilder {
    fn default() -> Self {
        PrayWriterBuilder {
            mode: CompressionMode::Uncompressed,
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl PrayWriterBuilder {
    /// Create a new builder: bodies are stored uncompressed
    pub fn new() -> Self {
        PrayWriterBuilder::default()
    }

    /// Compress every body, or store every body verbatim
    pub fn compress(&mut self, compress: bool) -> &mut PrayWriterBuilder {
        self.mode = if compress {
            CompressionMode::Compressed
        } else {
            CompressionMode::Uncompressed
        };
        self
    }

    /// Set how bodies are stored
    pub fn compression_mode(&mut self, mode: CompressionMode) -> &mut PrayWriterBuilder {
        self.mode = mode;
        self
    }

    /// zlib compression level from 0 (none) to 9 (best). Larger values are
    /// clamped to 9.
    pub fn compression_level(&mut self, level: u32) -> &mut PrayWriterBuilder {
        self.level = level.min(9);
        self
    }

    /// Create a writer that streams a PRAY file into `writer`
    pub fn from_writer<W>(&self, writer: W) -> PrayWriter<W>
    where
        W: Write,
    {
        PrayWriter {
            writer,
            mode: self.mode,
            level: self.level,
            wrote_magic: false,
        }
    }
}

/// Streams blocks into a PRAY file
///
/// Instantiated via `PrayWriterBuilder`
#[derive(Debug)]
pub struct PrayWriter<W> {
    writer: W,
    mode: CompressionMode,
    level: u32,
    wrote_magic: bool,
}

impl<W: Write> PrayWriter<W> {
    /// Get inner writer, keeping ownership
    pub fn inner(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Append a block. A block that fails to encode writes nothing.
    pub fn write_block(&mut self, block: &Block) -> Result<(), Error> {
        let compress = match self.mode {
            CompressionMode::Uncompressed => false,
            CompressionMode::Compressed => true,
            CompressionMode::Preserve => block.is_compressed(),
        };

        let mut buf = Vec::new();
        block.write_with_level(&mut buf, compress.then_some(self.level))?;
        self.write_magic()?;
        self.writer.write_all(&buf)?;
        Ok(())
    }

    /// Finish the file (a file without blocks is just the magic) and return
    /// the underlying writer
    pub fn into_inner(mut self) -> Result<W, Error> {
        self.write_magic()?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_magic(&mut self) -> Result<(), Error> {
        if !self.wrote_magic {
            self.writer.write_all(MAGIC)?;
            self.wrote_magic = true;
        }
        Ok(())
    }
}
