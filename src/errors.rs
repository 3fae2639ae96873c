use std::fmt;

/// An error that can occur when reading or writing PRAY data
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume the error and return the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }
}

/// Specific type of error
///
/// Offsets are relative to the start of the buffer handed to the decoder: the
/// whole file (magic included) for containers, the block body for tag lists.
/// Header errors point at the start of the block, name errors at the name
/// field, and errors about a block's body (truncation, length mismatches,
/// corrupt zlib data) at the first byte after the 144 byte header.
#[derive(Debug)]
pub enum ErrorKind {
    /// The data does not begin with the `PRAY` magic
    MissingMagic,

    /// Fewer than 144 bytes remain where a block header should start
    TruncatedHeader { offset: usize, available: usize },

    /// The block body is shorter than the stored length in its header
    TruncatedBody {
        offset: usize,
        expected: usize,
        available: usize,
    },

    /// A count or length in a tag variable list runs past the end of the body
    TruncatedVariableList {
        offset: usize,
        expected: usize,
        available: usize,
    },

    /// An uncompressed block declares different stored and decompressed lengths
    UncompressedLengthMismatch {
        offset: usize,
        stored: usize,
        decompressed: usize,
    },

    /// Inflating a compressed body did not produce the declared length
    DecompressedLengthMismatch {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    /// The body of a compressed block is not a valid zlib stream
    CorruptCompressedData {
        offset: usize,
        source: std::io::Error,
    },

    /// A name, key, or string value is not representable in windows-1252, or a
    /// block name is longer than 127 bytes or ends with a NUL. Only names read from a file that
    /// fill all 128 bytes without a terminator carry an offset.
    InvalidNameEncoding { offset: Option<usize>, name: String },

    /// A block prefix is not exactly 4 windows-1252 characters
    InvalidPrefix(String),

    /// A tag value was neither an unsigned 32 bit integer nor a string
    UnsupportedVariableType { key: String },

    /// A body, key, or value is too long for its 32 bit length field
    LengthOverflow { len: usize },

    /// The destination writer failed
    Io(std::io::Error),
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::TruncatedHeader { offset, .. } => Some(offset),
            ErrorKind::TruncatedBody { offset, .. } => Some(offset),
            ErrorKind::TruncatedVariableList { offset, .. } => Some(offset),
            ErrorKind::UncompressedLengthMismatch { offset, .. } => Some(offset),
            ErrorKind::DecompressedLengthMismatch { offset, .. } => Some(offset),
            ErrorKind::CorruptCompressedData { offset, .. } => Some(offset),
            ErrorKind::InvalidNameEncoding { offset, .. } => offset,
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::CorruptCompressedData { ref source, .. } => Some(source),
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::MissingMagic => write!(f, "not a PRAY file: missing PRAY magic"),
            ErrorKind::TruncatedHeader { offset, available } => write!(f,
                "truncated block header: needed 144 bytes but only {} remain (offset: {})",
                available,
                offset
            ),
            ErrorKind::TruncatedBody { offset, expected, available } => write!(f,
                "truncated block body: expected {} bytes but only {} remain (offset: {})",
                expected,
                available,
                offset
            ),
            ErrorKind::TruncatedVariableList { offset, expected, available } => write!(f,
                "truncated tag variable list: expected {} bytes but only {} remain (offset: {})",
                expected,
                available,
                offset
            ),
            ErrorKind::UncompressedLengthMismatch { offset, stored, decompressed } => write!(f,
                "uncompressed block stores {} bytes but declares {} decompressed bytes (offset: {})",
                stored,
                decompressed,
                offset
            ),
            ErrorKind::DecompressedLengthMismatch { offset, expected, actual } => write!(f,
                "expected block body to decompress to {} bytes but got {} (offset: {})",
                expected,
                actual,
                offset
            ),
            ErrorKind::CorruptCompressedData { offset, ref source } => {
                write!(f, "corrupt compressed block body (offset: {}): {}", offset, source)
            }
            ErrorKind::InvalidNameEncoding { offset: Some(offset), ref name } => write!(f,
                "block name is not terminated within 128 bytes (offset: {}): {:?}",
                offset,
                name
            ),
            ErrorKind::InvalidNameEncoding { offset: None, ref name } => write!(f,
                "not windows-1252 text or not a valid block name (127 bytes max, no trailing NUL): {:?}",
                name
            ),
            ErrorKind::InvalidPrefix(ref prefix) => write!(f,
                "block prefix must be exactly 4 windows-1252 characters: {:?}",
                prefix
            ),
            ErrorKind::UnsupportedVariableType { ref key } => write!(f,
                "tag variable {:?} is neither an unsigned 32 bit integer nor a string",
                key
            ),
            ErrorKind::LengthOverflow { len } => {
                write!(f, "length of {} bytes does not fit in a 32 bit field", len)
            }
            ErrorKind::Io(ref err) => write!(f, "IO error: {}", err),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn offsets_are_reported() {
        let err = Error::from(ErrorKind::TruncatedHeader {
            offset: 4,
            available: 3,
        });
        assert_eq!(err.offset(), Some(4));
        assert!(err.to_string().contains("offset: 4"));

        let err = Error::from(ErrorKind::MissingMagic);
        assert_eq!(err.offset(), None);
    }

    #[test]
    fn io_errors_expose_source() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(err.source().is_some());
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
    }
}
