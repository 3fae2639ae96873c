use crate::{
    data::{windows_1252_byte, WINDOWS_1252},
    Error, ErrorKind,
};
use std::borrow::Cow;

/// The single byte character set used for block names, tag keys, and tag
/// string values.
///
/// Every byte decodes to exactly one character, so decoding never fails and
/// encoding a decoded string reproduces the original bytes.
///
/// ```
/// use prayer::Windows1252Encoding;
///
/// assert_eq!(Windows1252Encoding::decode(b"Sender UserID"), "Sender UserID");
/// assert_eq!(Windows1252Encoding::decode(b"\xa7Grendel\x8a"), "§GrendelŠ");
/// assert_eq!(Windows1252Encoding::decode(b"hi\x81"), "hi\u{81}");
///
/// assert_eq!(Windows1252Encoding::encode("Š€").as_deref(), Some(&b"\x8a\x80"[..]));
/// assert_eq!(Windows1252Encoding::encode("☎"), None);
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct Windows1252Encoding;

impl Windows1252Encoding {
    /// Creates a new windows 1252 codec
    pub fn new() -> Self {
        Windows1252Encoding
    }

    /// Decode windows-1252 bytes, borrowing when the data is ascii
    pub fn decode(data: &[u8]) -> Cow<str> {
        match std::str::from_utf8(data) {
            Ok(s) if data.is_ascii() => Cow::Borrowed(s),
            _ => Cow::Owned(data.iter().map(|&x| WINDOWS_1252[usize::from(x)]).collect()),
        }
    }

    /// Encode a string into windows-1252 bytes. Returns `None` if any
    /// character lies outside of the code page.
    pub fn encode(s: &str) -> Option<Cow<[u8]>> {
        if s.is_ascii() {
            return Some(Cow::Borrowed(s.as_bytes()));
        }

        s.chars()
            .map(windows_1252_byte)
            .collect::<Option<Vec<u8>>>()
            .map(Cow::Owned)
    }
}

/// Encode text destined for the wire, failing with `InvalidNameEncoding`
pub(crate) fn encode_text(s: &str) -> Result<Cow<[u8]>, Error> {
    Windows1252Encoding::encode(s).ok_or_else(|| {
        Error::new(ErrorKind::InvalidNameEncoding {
            offset: None,
            name: String::from(s),
        })
    })
}
