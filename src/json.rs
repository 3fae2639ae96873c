//! JSON projection of PRAY files and JSON manifests for building them
//!
//! ```
//! use prayer::{json::Manifest, Block, PrayFile};
//!
//! let manifest: Manifest = serde_json::from_str(r#"{
//!     "blocks": [{
//!         "prefix": "MESG",
//!         "name": "hello",
//!         "tags": [["Subject", "Test"], ["Sender UserID", 17827]]
//!     }]
//! }"#).unwrap();
//!
//! let file = manifest.into_file(".")?;
//! let tags = file.blocks()[0].tags()?;
//! assert_eq!(tags.integer("Sender UserID"), Some(17827));
//!
//! let json = prayer::json::to_json(&file)?;
//! assert_eq!(json["blocks"][0]["prefix"], "MESG");
//! # Ok::<(), prayer::Error>(())
//! ```

use crate::{Block, BlockBody, Error, ErrorKind, PrayFile, Prefix, TagList, TagValue};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Render a file as JSON.
///
/// Every block lists its prefix, name, whether it was read compressed, and
/// its body length. Blocks that carry tag lists also list their variables as
/// `[key, value]` pairs in wire order.
pub fn to_json(file: &PrayFile) -> Result<Value, Error> {
    let blocks = file
        .iter()
        .map(block_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({ "blocks": blocks }))
}

fn block_json(block: &Block) -> Result<Value, Error> {
    let mut out = json!({
        "prefix": block.prefix().to_string(),
        "name": block.name(),
        "compressed": block.is_compressed(),
        "length": block.body().len(),
    });

    if let BlockBody::Tags(tags) = block.decode_body()? {
        out["tags"] = tag_list_json(&tags);
    }

    Ok(out)
}

fn tag_list_json(tags: &TagList) -> Value {
    tags.iter()
        .map(|(key, value)| {
            let value = match value {
                TagValue::Integer(x) => json!(x),
                TagValue::Text(x) => json!(x),
            };
            json!([key, value])
        })
        .collect()
}

impl TagValue {
    /// Convert a JSON value into a tag value. Only strings and integers
    /// that fit in 32 unsigned bits are accepted.
    ///
    /// ```
    /// use prayer::TagValue;
    /// use serde_json::json;
    ///
    /// assert_eq!(TagValue::from_json("a", &json!(5)).unwrap(), TagValue::Integer(5));
    /// assert_eq!(TagValue::from_json("b", &json!("x")).unwrap(), TagValue::from("x"));
    /// assert!(TagValue::from_json("c", &json!(-1)).is_err());
    /// assert!(TagValue::from_json("d", &json!(1.5)).is_err());
    /// ```
    pub fn from_json(key: &str, value: &Value) -> Result<TagValue, Error> {
        match value {
            Value::String(x) => Ok(TagValue::Text(x.clone())),
            Value::Number(x) => x
                .as_u64()
                .and_then(|x| u32::try_from(x).ok())
                .map(TagValue::Integer)
                .ok_or_else(|| unsupported(key)),
            _ => Err(unsupported(key)),
        }
    }
}

fn unsupported(key: &str) -> Error {
    Error::new(ErrorKind::UnsupportedVariableType {
        key: String::from(key),
    })
}

/// A description of a PRAY file to build
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Whether block bodies are zlib compressed
    #[serde(default)]
    pub compress: bool,

    /// The blocks in file order
    pub blocks: Vec<ManifestBlock>,
}

/// A single block of a manifest
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestBlock {
    pub prefix: Prefix,
    pub name: String,

    #[serde(flatten)]
    pub body: ManifestBody,
}

/// Where a manifest block's body comes from
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestBody {
    /// A tag list given as `[key, value]` pairs
    Tags(Vec<(String, Value)>),

    /// Raw bytes read from a path, relative to the manifest's directory
    File(PathBuf),
}

impl Manifest {
    /// Build the described file. Relative `file` paths are resolved
    /// against `base`.
    pub fn into_file<P: AsRef<Path>>(self, base: P) -> Result<PrayFile, Error> {
        let base = base.as_ref();
        self.blocks
            .into_iter()
            .map(|block| block.into_block(base))
            .collect()
    }
}

impl ManifestBlock {
    fn into_block(self, base: &Path) -> Result<Block, Error> {
        match self.body {
            ManifestBody::Tags(entries) => {
                let tags = entries
                    .iter()
                    .map(|(key, value)| {
                        TagValue::from_json(key, value).map(|x| (key.as_str(), x))
                    })
                    .collect::<Result<TagList, _>>()?;
                Block::from_body(self.prefix, self.name, &tags)
            }
            ManifestBody::File(path) => {
                let data = std::fs::read(base.join(path))?;
                Block::new(self.prefix, self.name, data)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lists_tags_of_tag_blocks() {
        let mut tags = TagList::new();
        tags.push("Subject", "Test");
        tags.push("Sender UserID", 17827u32);

        let file: PrayFile = vec![
            Block::from_body("IMSG".parse().unwrap(), "msg", &tags).unwrap(),
            Block::new("GENE".parse().unwrap(), "norn.gen", b"dna3".to_vec()).unwrap(),
        ]
        .into();

        let actual = to_json(&file).unwrap();
        let expected = json!({
            "blocks": [
                {
                    "prefix": "IMSG",
                    "name": "msg",
                    "compressed": false,
                    "length": 48,
                    "tags": [["Sender UserID", 17827], ["Subject", "Test"]]
                },
                {
                    "prefix": "GENE",
                    "name": "norn.gen",
                    "compressed": false,
                    "length": 4
                }
            ]
        });
        assert_eq!(actual, expected);
    }

    #[test]
    fn unsupported_values() {
        for value in [json!(null), json!(true), json!([1]), json!({}), json!(4294967296u64)] {
            let err = TagValue::from_json("Script Count", &value).unwrap_err();
            assert!(matches!(
                err.kind(),
                ErrorKind::UnsupportedVariableType { key } if key == "Script Count"
            ));
        }
    }

    #[test]
    fn manifest_builds_tag_blocks() {
        let manifest: Manifest = serde_json::from_value(json!({
            "compress": true,
            "blocks": [
                {
                    "prefix": "AGNT",
                    "name": "Ball",
                    "tags": [["Agent Type", 0], ["Agent Description", "ball"]]
                }
            ]
        }))
        .unwrap();
        assert!(manifest.compress);

        let file = manifest.into_file(".").unwrap();
        let block = &file.blocks()[0];
        assert_eq!(block.prefix().as_bytes(), b"AGNT");
        assert_eq!(block.tags().unwrap().integer("Agent Type"), Some(0));
        assert_eq!(block.tags().unwrap().text("Agent Description"), Some("ball"));
    }

    #[test]
    fn manifest_rejects_bad_tags() {
        let manifest: Manifest = serde_json::from_value(json!({
            "blocks": [{ "prefix": "AGNT", "name": "Ball", "tags": [["Agent Type", -3]] }]
        }))
        .unwrap();

        let err = manifest.into_file(".").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnsupportedVariableType { .. }));
    }

    #[test]
    fn manifest_missing_file() {
        let manifest: Manifest = serde_json::from_value(json!({
            "blocks": [{ "prefix": "FILE", "name": "x", "file": "does/not/exist.bin" }]
        }))
        .unwrap();

        let err = manifest.into_file(".").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
    }
}
