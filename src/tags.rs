use crate::{encoding::encode_text, BodyFormat, Error, ErrorKind, Windows1252Encoding};
use std::io::Write;

/// The value of a tag variable
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum TagValue {
    /// An unsigned 32 bit integer
    Integer(u32),

    /// A windows-1252 string
    Text(String),
}

impl TagValue {
    /// The integer value, if this is an integer
    pub fn as_integer(&self) -> Option<u32> {
        match *self {
            TagValue::Integer(x) => Some(x),
            TagValue::Text(_) => None,
        }
    }

    /// The string value, if this is a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Integer(_) => None,
            TagValue::Text(x) => Some(x),
        }
    }

    /// Whether this is an integer
    pub fn is_integer(&self) -> bool {
        matches!(self, TagValue::Integer(_))
    }
}

impl From<u32> for TagValue {
    fn from(value: u32) -> Self {
        TagValue::Integer(value)
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(String::from(value))
    }
}

/// An ordered list of named integer and string variables.
///
/// Keys may repeat. The wire format stores every integer variable before any
/// string variable, so the list is kept in that same order: pushing an
/// integer places it after the existing integers, pushing a string places it
/// at the end. Each type keeps the relative order it was pushed in, while the
/// interleaving between the two types is not retained. This makes decoding
/// an encoded list reproduce the list exactly.
///
/// ```
/// use prayer::{TagList, TagValue};
///
/// let mut tags = TagList::new();
/// tags.push("Subject", "Test");
/// tags.push("Sender UserID", 17827u32);
///
/// let data = tags.to_bytes()?;
/// let decoded = TagList::from_slice(&data)?;
/// assert_eq!(decoded, tags);
///
/// let entries: Vec<_> = decoded.iter().collect();
/// assert_eq!(entries[0], &(String::from("Sender UserID"), TagValue::Integer(17827)));
/// assert_eq!(entries[1], &(String::from("Subject"), TagValue::from("Test")));
/// # Ok::<(), prayer::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<(String, TagValue)>", into = "Vec<(String, TagValue)>")
)]
pub struct TagList {
    entries: Vec<(String, TagValue)>,
    integers: usize,
}

impl TagList {
    /// Creates an empty tag list
    pub fn new() -> Self {
        TagList::default()
    }

    /// Appends a variable after the existing variables of the same type
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<TagValue>,
    {
        let value = value.into();
        if value.is_integer() {
            self.entries.insert(self.integers, (key.into(), value));
            self.integers += 1;
        } else {
            self.entries.push((key.into(), value));
        }
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no variables
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All variables: integers first, then strings
    pub fn iter(&self) -> std::slice::Iter<'_, (String, TagValue)> {
        self.entries.iter()
    }

    /// The entries as a slice
    pub fn as_slice(&self) -> &[(String, TagValue)] {
        &self.entries
    }

    /// The integer variables in order
    pub fn integers(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries[..self.integers]
            .iter()
            .filter_map(|(k, v)| v.as_integer().map(|x| (k.as_str(), x)))
    }

    /// The string variables in order
    pub fn texts(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries[self.integers..]
            .iter()
            .filter_map(|(k, v)| v.as_text().map(|x| (k.as_str(), x)))
    }

    /// Every value stored under `key`
    pub fn get<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a TagValue> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The first integer stored under `key`
    pub fn integer(&self, key: &str) -> Option<u32> {
        self.entries[..self.integers]
            .iter()
            .filter(|(k, _)| k == key)
            .find_map(|(_, v)| v.as_integer())
    }

    /// The first string stored under `key`
    pub fn text(&self, key: &str) -> Option<&str> {
        self.entries[self.integers..]
            .iter()
            .filter(|(k, _)| k == key)
            .find_map(|(_, v)| v.as_text())
    }

    /// Decode a tag block body. Bytes following the string variables are
    /// ignored.
    pub fn from_slice(data: &[u8]) -> Result<TagList, Error> {
        let mut reader = TagReader { data, offset: 0 };
        let mut result = TagList::new();

        let int_count = reader.read_u32()? as usize;
        result.entries.reserve(int_count.min(data.len() / 8));
        for _ in 0..int_count {
            let key = reader.read_text()?;
            let value = reader.read_u32()?;
            result.push(key, value);
        }

        let str_count = reader.read_u32()? as usize;
        result.entries.reserve(str_count.min(data.len() / 8));
        for _ in 0..str_count {
            let key = reader.read_text()?;
            let value = reader.read_text()?;
            result.push(key, value);
        }

        if reader.offset != data.len() {
            log::debug!(
                "{} trailing bytes after tag variables",
                data.len() - reader.offset
            );
        }

        Ok(result)
    }

    /// Encode into the tag block body format
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    /// Encode into the tag block body format.
    ///
    /// Every key and string value is encoded before anything is written, so a
    /// variable that is not windows-1252 produces no output.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut buf = Vec::new();
        let (integers, texts) = self.entries.split_at(self.integers);

        write_len(&mut buf, integers.len())?;
        for (key, value) in integers {
            write_text(&mut buf, key)?;
            if let TagValue::Integer(x) = value {
                buf.extend_from_slice(&x.to_le_bytes());
            }
        }

        write_len(&mut buf, texts.len())?;
        for (key, value) in texts {
            write_text(&mut buf, key)?;
            if let TagValue::Text(x) = value {
                write_text(&mut buf, x)?;
            }
        }

        writer.write_all(&buf)?;
        Ok(())
    }
}

impl BodyFormat for TagList {
    fn decode_body(body: &[u8]) -> Result<Self, Error> {
        TagList::from_slice(body)
    }

    fn encode_body(&self) -> Result<Vec<u8>, Error> {
        self.to_bytes()
    }
}

impl<K, V> FromIterator<(K, V)> for TagList
where
    K: Into<String>,
    V: Into<TagValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = TagList::new();
        result.extend(iter);
        result
    }
}

impl<K, V> Extend<(K, V)> for TagList
where
    K: Into<String>,
    V: Into<TagValue>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.push(key, value);
        }
    }
}

impl From<Vec<(String, TagValue)>> for TagList {
    fn from(value: Vec<(String, TagValue)>) -> Self {
        value.into_iter().collect()
    }
}

impl From<TagList> for Vec<(String, TagValue)> {
    fn from(value: TagList) -> Self {
        value.entries
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a (String, TagValue);
    type IntoIter = std::slice::Iter<'a, (String, TagValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for TagList {
    type Item = (String, TagValue);
    type IntoIter = std::vec::IntoIter<(String, TagValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn write_len(buf: &mut Vec<u8>, len: usize) -> Result<(), Error> {
    let len = u32::try_from(len).map_err(|_| Error::new(ErrorKind::LengthOverflow { len }))?;
    buf.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn write_text(buf: &mut Vec<u8>, text: &str) -> Result<(), Error> {
    let encoded = encode_text(text)?;
    write_len(buf, encoded.len())?;
    buf.extend_from_slice(&encoded);
    Ok(())
}

/// Cursor over a tag block body that tracks the offset for error reporting
struct TagReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> TagReader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let rest = &self.data[self.offset..];
        let result = rest.get(..len).ok_or_else(|| {
            Error::new(ErrorKind::TruncatedVariableList {
                offset: self.offset,
                expected: len,
                available: rest.len(),
            })
        })?;
        self.offset += len;
        Ok(result)
    }

    fn read_u32(&mut self) -> Result<u32, Error> {
        let data = self.take(4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(data);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_text(&mut self) -> Result<String, Error> {
        let len = self.read_u32()? as usize;
        let data = self.take(len)?;
        Ok(Windows1252Encoding::decode(data).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    #[test]
    fn empty_list() {
        let data = TagList::new().to_bytes().unwrap();
        assert_eq!(data, [0u8; 8]);
        assert!(TagList::from_slice(&data).unwrap().is_empty());
    }

    #[test]
    fn integers_are_written_first() {
        let tags: TagList = vec![
            ("Subject", TagValue::from("Test")),
            ("Sender UserID", TagValue::from(17827u32)),
        ]
        .into_iter()
        .collect();

        let data = tags.to_bytes().unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&13u32.to_le_bytes());
        expected.extend_from_slice(b"Sender UserID");
        expected.extend_from_slice(&17827u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&7u32.to_le_bytes());
        expected.extend_from_slice(b"Subject");
        expected.extend_from_slice(&4u32.to_le_bytes());
        expected.extend_from_slice(b"Test");
        assert_eq!(data, expected);

        let decoded = TagList::from_slice(&data).unwrap();
        assert_eq!(
            decoded.as_slice(),
            &[
                (String::from("Sender UserID"), TagValue::Integer(17827)),
                (String::from("Subject"), TagValue::Text(String::from("Test"))),
            ]
        );
    }

    #[test]
    fn per_type_order_is_kept() {
        let mut tags = TagList::new();
        tags.push("s1", "a");
        tags.push("i1", 1u32);
        tags.push("s2", "b");
        tags.push("i2", 2u32);
        tags.push("s1", "c");

        let keys: Vec<_> = tags.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["i1", "i2", "s1", "s2", "s1"]);
        assert_eq!(tags.integers().collect::<Vec<_>>(), [("i1", 1), ("i2", 2)]);
        assert_eq!(
            tags.texts().collect::<Vec<_>>(),
            [("s1", "a"), ("s2", "b"), ("s1", "c")]
        );
    }

    #[test]
    fn duplicate_keys_lookup() {
        let mut tags = TagList::new();
        tags.push("Agent Type", 0u32);
        tags.push("Agent Type", "zero");
        tags.push("Agent Type", 1u32);

        assert_eq!(tags.integer("Agent Type"), Some(0));
        assert_eq!(tags.text("Agent Type"), Some("zero"));
        assert_eq!(tags.get("Agent Type").count(), 3);
        assert_eq!(tags.integer("missing"), None);
    }

    #[test]
    fn windows_1252_text() {
        let mut tags = TagList::new();
        tags.push("Nom", "Noël €");
        let data = tags.to_bytes().unwrap();
        assert!(data.ends_with(b"No\xebl \x80"));
        assert_eq!(TagList::from_slice(&data).unwrap(), tags);
    }

    #[test]
    fn unencodable_text_writes_nothing() {
        let mut tags = TagList::new();
        tags.push("ok", 1u32);
        tags.push("phone", "☎");

        let mut out = Vec::new();
        let err = tags.write(&mut out).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidNameEncoding { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn truncated_counts() {
        let err = TagList::from_slice(&[1, 0]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TruncatedVariableList {
                offset: 0,
                expected: 4,
                available: 2
            }
        ));

        // zero integers, then a missing string count
        let err = TagList::from_slice(&[0, 0, 0, 0]).unwrap_err();
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn truncated_key() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(b"short");
        let err = TagList::from_slice(&data).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TruncatedVariableList {
                offset: 8,
                expected: 100,
                available: 5
            }
        ));
    }

    #[test]
    fn truncated_string_value() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(b"k");
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        data.extend_from_slice(b"value");
        let err = TagList::from_slice(&data).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TruncatedVariableList { offset: 17, available: 5, .. }
        ));
    }

    #[test]
    fn huge_counts_fail_without_allocating() {
        let err = TagList::from_slice(&[0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TruncatedVariableList { offset: 4, .. }
        ));
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut data = TagList::new().to_bytes().unwrap();
        data.extend_from_slice(b"junk");
        assert!(TagList::from_slice(&data).unwrap().is_empty());
    }

    #[derive(Debug, Clone)]
    struct Entries(Vec<(String, TagValue)>);

    impl Arbitrary for Entries {
        fn arbitrary(g: &mut Gen) -> Self {
            let raw: Vec<(Vec<u8>, Option<u32>, Vec<u8>)> = Arbitrary::arbitrary(g);
            let entries = raw
                .into_iter()
                .map(|(key, int, text)| {
                    let key = Windows1252Encoding::decode(&key).into_owned();
                    let value = match int {
                        Some(x) => TagValue::Integer(x),
                        None => TagValue::Text(Windows1252Encoding::decode(&text).into_owned()),
                    };
                    (key, value)
                })
                .collect();
            Entries(entries)
        }
    }

    #[quickcheck]
    fn decode_keeps_per_type_order(entries: Entries) -> bool {
        let tags: TagList = entries.0.iter().cloned().collect();
        let decoded = TagList::from_slice(&tags.to_bytes().unwrap()).unwrap();

        let ints = entries.0.iter().filter(|(_, v)| v.is_integer());
        let texts = entries.0.iter().filter(|(_, v)| !v.is_integer());
        let expected: Vec<_> = ints.chain(texts).cloned().collect();
        decoded.as_slice() == &expected[..]
    }
}
