use crate::{
    compression::{self, DecompressError},
    encoding::encode_text,
    util::{get_split, read_u32},
    BlockBody, BlockKind, BodyFormat, BodyFormatKind, Error, ErrorKind, TagList,
    Windows1252Encoding,
};
use std::{borrow::Cow, fmt, io::Write, str::FromStr};

/// Maximum number of encoded bytes in a block name. The name field is 128
/// bytes and always keeps room for a terminating NUL.
pub const MAX_NAME_LEN: usize = 127;

/// The 4 character type tag at the start of every block (eg: `AGNT`, `CREA`)
///
/// ```
/// use prayer::Prefix;
///
/// let prefix: Prefix = "warp".parse().unwrap();
/// assert_eq!(prefix.as_bytes(), b"warp");
/// assert_eq!(prefix.to_string(), "warp");
/// assert!("toolong".parse::<Prefix>().is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Prefix([u8; 4]);

impl Prefix {
    /// Creates a prefix from its raw bytes
    pub const fn new(data: [u8; 4]) -> Prefix {
        Prefix(data)
    }

    /// The raw windows-1252 bytes of the prefix
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Decode the prefix into a string
    pub fn to_utf8(&self) -> Cow<str> {
        Windows1252Encoding::decode(&self.0)
    }
}

impl FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Windows1252Encoding::encode(s)
            .and_then(|x| <[u8; 4]>::try_from(x.as_ref()).ok())
            .map(Prefix)
            .ok_or_else(|| Error::new(ErrorKind::InvalidPrefix(String::from(s))))
    }
}

impl TryFrom<&str> for Prefix {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Prefix {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Prefix> for String {
    fn from(value: Prefix) -> Self {
        value.to_utf8().into_owned()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_utf8())
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({:?})", self.to_utf8())
    }
}

/// The fixed 144 byte header that precedes every block body
///
/// | size      | field                                   |
/// |-----------|-----------------------------------------|
/// | 4 bytes   | prefix                                  |
/// | 128 bytes | name, NUL padded                        |
/// | u32 LE    | stored (possibly compressed) body length |
/// | u32 LE    | decompressed body length                |
/// | u32 LE    | flags, bit 0 set when compressed        |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    prefix: Prefix,
    name: [u8; 128],
    stored_len: u32,
    decompressed_len: u32,
    flags: u32,
}

impl BlockHeader {
    /// Size of an encoded header in bytes
    pub const SIZE: usize = 144;

    /// Bit in the flags field signalling a zlib compressed body
    pub const COMPRESSED_FLAG: u32 = 0x1;

    /// Parses a header from the start of a slice
    ///
    /// ```
    /// use prayer::BlockHeader;
    ///
    /// let mut data = vec![0u8; 144];
    /// data[..4].copy_from_slice(b"FILE");
    /// data[4..13].copy_from_slice(b"hello.txt");
    /// data[132..136].copy_from_slice(&5u32.to_le_bytes());
    /// data[136..140].copy_from_slice(&5u32.to_le_bytes());
    ///
    /// let header = BlockHeader::from_slice(&data).unwrap();
    /// assert_eq!(header.prefix().as_bytes(), b"FILE");
    /// assert_eq!(header.name().unwrap(), "hello.txt");
    /// assert_eq!(header.stored_len(), 5);
    /// assert!(!header.is_compressed());
    /// ```
    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        BlockHeader::parse(data, 0)
    }

    /// Parses the header starting at `offset` in `data`, reporting errors
    /// against that offset
    pub(crate) fn parse(data: &[u8], offset: usize) -> Result<Self, Error> {
        let data = data.get(offset..).unwrap_or_default();
        let (prefix, rest) = get_split::<4>(data).ok_or_else(|| truncated(offset, data))?;
        let (name, rest) = get_split::<128>(rest).ok_or_else(|| truncated(offset, data))?;
        let (stored_len, rest) = read_u32(rest).ok_or_else(|| truncated(offset, data))?;
        let (decompressed_len, rest) = read_u32(rest).ok_or_else(|| truncated(offset, data))?;
        let (flags, _) = read_u32(rest).ok_or_else(|| truncated(offset, data))?;

        Ok(BlockHeader {
            prefix: Prefix::new(prefix),
            name,
            stored_len,
            decompressed_len,
            flags,
        })
    }

    /// The block's prefix
    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// The name bytes with trailing NUL padding removed
    pub fn raw_name(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .rposition(|&x| x != 0)
            .map_or(0, |ind| ind + 1);
        &self.name[..len]
    }

    /// The decoded name. Fails if the name fills all 128 bytes, leaving no
    /// room for a terminator.
    pub fn name(&self) -> Result<Cow<str>, Error> {
        let raw = self.raw_name();
        let name = Windows1252Encoding::decode(raw);
        if raw.len() > MAX_NAME_LEN {
            return Err(Error::new(ErrorKind::InvalidNameEncoding {
                offset: None,
                name: name.into_owned(),
            }));
        }

        Ok(name)
    }

    /// Number of body bytes that follow the header on the wire
    pub fn stored_len(&self) -> u32 {
        self.stored_len
    }

    /// Length of the body once decompressed
    pub fn decompressed_len(&self) -> u32 {
        self.decompressed_len
    }

    /// The raw flags field
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Whether the body must be inflated.
    ///
    /// Some producers set the compression bit on bodies stored verbatim; when
    /// the stored and decompressed lengths agree the body is read as is.
    pub fn is_compressed(&self) -> bool {
        self.flags & Self::COMPRESSED_FLAG != 0 && self.stored_len != self.decompressed_len
    }

    /// Total number of bytes the header and its body occupy on the wire
    pub fn block_len(&self) -> usize {
        Self::SIZE + self.stored_len as usize
    }

    /// Writes the header in its wire format
    pub fn write<W>(&self, mut writer: W) -> std::io::Result<()>
    where
        W: Write,
    {
        writer.write_all(self.prefix.as_bytes())?;
        writer.write_all(&self.name)?;
        writer.write_all(&self.stored_len.to_le_bytes())?;
        writer.write_all(&self.decompressed_len.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        Ok(())
    }
}

fn truncated(offset: usize, data: &[u8]) -> Error {
    Error::new(ErrorKind::TruncatedHeader {
        offset,
        available: data.len(),
    })
}

fn length_field(len: usize) -> Result<u32, Error> {
    u32::try_from(len).map_err(|_| Error::new(ErrorKind::LengthOverflow { len }))
}

/// Validate a block name and return its encoded bytes. Trailing NULs are
/// rejected as they are indistinguishable from the name field's padding.
fn encode_name(name: &str) -> Result<Cow<[u8]>, Error> {
    let encoded = encode_text(name)?;
    if encoded.len() > MAX_NAME_LEN || encoded.last() == Some(&0) {
        return Err(Error::new(ErrorKind::InvalidNameEncoding {
            offset: None,
            name: String::from(name),
        }));
    }

    Ok(encoded)
}

/// A single chunk of a PRAY file: prefix, name, and decompressed body
///
/// ```
/// use prayer::Block;
///
/// let block = Block::new("FILE".parse()?, "hello.txt", b"hi there".to_vec())?;
/// let data = block.to_bytes(true)?;
///
/// let decoded = Block::from_slice(&data)?;
/// assert_eq!(decoded.name(), "hello.txt");
/// assert_eq!(decoded.body(), b"hi there");
/// # Ok::<(), prayer::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Block {
    prefix: Prefix,
    name: String,
    compressed: bool,
    body: Vec<u8>,
}

impl Block {
    /// Creates an uncompressed block. Fails if the name is not windows-1252
    /// encodable in 127 bytes or fewer, or if it ends with a NUL.
    pub fn new<N, B>(prefix: Prefix, name: N, body: B) -> Result<Block, Error>
    where
        N: Into<String>,
        B: Into<Vec<u8>>,
    {
        let name = name.into();
        encode_name(&name)?;
        Ok(Block {
            prefix,
            name,
            compressed: false,
            body: body.into(),
        })
    }

    /// Creates a block whose body is the encoding of `contents`
    ///
    /// ```
    /// use prayer::{Block, TagList};
    ///
    /// let mut tags = TagList::new();
    /// tags.push("Subject", "Test");
    /// tags.push("Sender UserID", 17827u32);
    ///
    /// let block = Block::from_body("IMSG".parse()?, "17827_message", &tags)?;
    /// assert_eq!(block.tags()?, tags);
    /// # Ok::<(), prayer::Error>(())
    /// ```
    pub fn from_body<N, B>(prefix: Prefix, name: N, contents: &B) -> Result<Block, Error>
    where
        N: Into<String>,
        B: BodyFormat,
    {
        let body = contents.encode_body()?;
        Block::new(prefix, name, body)
    }

    /// Creates a block whose body is a tag variable list
    pub fn with_tags<N>(prefix: Prefix, name: N, tags: &TagList) -> Result<Block, Error>
    where
        N: Into<String>,
    {
        Block::from_body(prefix, name, tags)
    }

    /// Decodes the block starting at `offset` within `data`.
    ///
    /// Returns the block and the number of bytes it occupies (header and
    /// stored body) so the caller can advance to the next block. Bytes past
    /// the end of this block are ignored. Error offsets are absolute within
    /// `data`.
    pub fn decode_at(data: &[u8], offset: usize) -> Result<(Block, usize), Error> {
        let header = BlockHeader::parse(data, offset)?;
        let name = header.name().map_err(|e| match e.into_kind() {
            ErrorKind::InvalidNameEncoding { name, .. } => {
                Error::new(ErrorKind::InvalidNameEncoding {
                    offset: Some(offset + 4),
                    name,
                })
            }
            kind => Error::new(kind),
        })?;

        let body_offset = offset + BlockHeader::SIZE;
        let stored_len = header.stored_len() as usize;
        let decompressed_len = header.decompressed_len() as usize;
        let remaining = data.get(body_offset..).unwrap_or_default();
        let stored = remaining.get(..stored_len).ok_or_else(|| {
            Error::new(ErrorKind::TruncatedBody {
                offset: body_offset,
                expected: stored_len,
                available: remaining.len(),
            })
        })?;

        let compressed = header.is_compressed();
        if !compressed && header.flags() & BlockHeader::COMPRESSED_FLAG != 0 {
            log::debug!(
                "block {} at offset {} flagged compressed with equal lengths, reading verbatim",
                header.prefix(),
                offset
            );
        }

        let body = if compressed {
            compression::decompress(stored, decompressed_len).map_err(|e| match e {
                DecompressError::Corrupt(source) => {
                    Error::new(ErrorKind::CorruptCompressedData {
                        offset: body_offset,
                        source,
                    })
                }
                DecompressError::LengthMismatch { expected, actual } => {
                    Error::new(ErrorKind::DecompressedLengthMismatch {
                        offset: body_offset,
                        expected,
                        actual,
                    })
                }
            })?
        } else if stored_len != decompressed_len {
            return Err(Error::new(ErrorKind::UncompressedLengthMismatch {
                offset: body_offset,
                stored: stored_len,
                decompressed: decompressed_len,
            }));
        } else {
            stored.to_vec()
        };

        log::trace!(
            "decoded block {} {:?} at offset {} ({} stored bytes, compressed: {})",
            header.prefix(),
            name,
            offset,
            stored_len,
            compressed
        );

        let block = Block {
            prefix: header.prefix(),
            name: name.into_owned(),
            compressed,
            body,
        };

        Ok((block, header.block_len()))
    }

    /// Decodes the block at the start of `data`
    pub fn from_slice(data: &[u8]) -> Result<Block, Error> {
        Block::decode_at(data, 0).map(|(block, _)| block)
    }

    /// The block's prefix
    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// Changes the block's prefix
    pub fn set_prefix(&mut self, prefix: Prefix) {
        self.prefix = prefix;
    }

    /// The recognized kind of block this prefix denotes
    pub fn kind(&self) -> BlockKind {
        BlockKind::from(self.prefix)
    }

    /// The block's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the block. The previous name is kept on failure.
    pub fn set_name<N: Into<String>>(&mut self, name: N) -> Result<(), Error> {
        let name = name.into();
        encode_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Whether the body was stored compressed when this block was read
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The decompressed body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replaces the decompressed body
    pub fn set_body<B: Into<Vec<u8>>>(&mut self, body: B) {
        self.body = body.into();
    }

    /// Consume the block and return its decompressed body
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Interpret the body according to the block's kind
    pub fn decode_body(&self) -> Result<BlockBody, Error> {
        match self.kind().body_format() {
            BodyFormatKind::Tags => TagList::decode_body(&self.body).map(BlockBody::Tags),
            BodyFormatKind::Opaque => Ok(BlockBody::Opaque(self.body.clone())),
        }
    }

    /// Interpret the body as a tag variable list regardless of kind
    pub fn tags(&self) -> Result<TagList, Error> {
        TagList::decode_body(&self.body)
    }

    /// Serialize the block, optionally compressing the body
    pub fn to_bytes(&self, compress: bool) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(BlockHeader::SIZE + self.body.len());
        self.write(&mut out, compress)?;
        Ok(out)
    }

    /// Write the block, optionally compressing the body at the default level
    pub fn write<W: Write>(&self, writer: W, compress: bool) -> Result<(), Error> {
        let level = if compress {
            Some(crate::pray::DEFAULT_COMPRESSION_LEVEL)
        } else {
            None
        };
        self.write_with_level(writer, level)
    }

    /// Write the block, compressing the body at `level` when given.
    ///
    /// The header is fully computed before any bytes are written, so an
    /// invalid name produces no output.
    pub(crate) fn write_with_level<W: Write>(
        &self,
        mut writer: W,
        level: Option<u32>,
    ) -> Result<(), Error> {
        let (header, stored) = self.encode(level)?;
        header.write(&mut writer)?;
        writer.write_all(&stored)?;
        Ok(())
    }

    fn encode(&self, level: Option<u32>) -> Result<(BlockHeader, Cow<[u8]>), Error> {
        let encoded_name = encode_name(&self.name)?;
        let mut name = [0u8; 128];
        name[..encoded_name.len()].copy_from_slice(&encoded_name);

        let decompressed_len = length_field(self.body.len())?;
        let stored = match level {
            Some(level) => {
                let packed = compression::compress(&self.body, level)?;

                // A compressed body the same size as the original would be
                // read back verbatim, so it must be stored verbatim.
                if packed.len() == self.body.len() {
                    log::debug!(
                        "block {} {:?} compresses to its own length, storing uncompressed",
                        self.prefix,
                        self.name
                    );
                    Cow::Borrowed(self.body.as_slice())
                } else {
                    Cow::Owned(packed)
                }
            }
            None => Cow::Borrowed(self.body.as_slice()),
        };

        let flags = match stored {
            Cow::Owned(_) => BlockHeader::COMPRESSED_FLAG,
            Cow::Borrowed(_) => 0,
        };

        let header = BlockHeader {
            prefix: self.prefix,
            name,
            stored_len: length_field(stored.len())?,
            decompressed_len,
            flags,
        };

        log::trace!(
            "encoded block {} {:?} ({} stored bytes, compressed: {})",
            self.prefix,
            self.name,
            header.stored_len,
            flags != 0
        );

        Ok((header, stored))
    }
}
