//! Stored image reference

use serde::{Deserialize, Serialize};

/// Pointer to an uploaded image in the object store
///
/// `key` is the canonical object-store identifier, `link` the public URL
/// derived from it. A key is referenced by exactly one category or product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(alias = "Key")]
    pub key: String,
    #[serde(default)]
    pub link: String,
}

impl ImageRef {
    pub fn new(key: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            link: link.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_capitalized_key() {
        let image: ImageRef =
            serde_json::from_str(r#"{"Key":"1700.png","link":"https://b/1700.png"}"#).unwrap();
        assert_eq!(image.key, "1700.png");
    }
}
