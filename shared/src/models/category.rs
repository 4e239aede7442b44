//! Category Model

use super::ImageRef;
use serde::{Deserialize, Serialize};

/// Admin-defined attribute that products of a category must specify
///
/// `value` holds the comma-separated allowed options and stays empty for
/// custom (free-text) properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub custom: bool,
}

impl Property {
    pub fn enumerated(name: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: options.into(),
            custom: false,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            custom: true,
        }
    }

    /// Allowed options, trimmed, empty entries dropped
    pub fn options(&self) -> Vec<&str> {
        self.value
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect()
    }
}

/// Snapshot of a parent category, embedded by value
///
/// An empty object (`{}` or `{"name":""}`) means "no parent". The chain is
/// recursive: each snapshot carries its own parent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentCategory {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<Box<ParentCategory>>,
}

impl ParentCategory {
    pub fn none() -> Self {
        Self::default()
    }

    /// No parent: neither an id nor a name
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_empty()
    }

    /// Grandparent snapshot, if the chain continues
    pub fn parent(&self) -> Option<&ParentCategory> {
        self.parent_category.as_deref()
    }
}

/// Category document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_category: ParentCategory,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub child_categories: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub created: i64,
    pub updated: i64,
}

impl Category {
    /// Snapshot of this category for embedding into a child
    pub fn to_parent_snapshot(&self) -> ParentCategory {
        ParentCategory {
            id: Some(self.id),
            name: self.name.clone(),
            properties: self.properties.clone(),
            parent_category: if self.parent_category.is_empty() {
                None
            } else {
                Some(Box::new(self.parent_category.clone()))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_options_split_and_trim() {
        let p = Property::enumerated("RAM", "4GB, 8GB,,16GB ");
        assert_eq!(p.options(), vec!["4GB", "8GB", "16GB"]);
        assert!(Property::custom("Engraving").options().is_empty());
    }

    #[test]
    fn test_empty_parent_forms() {
        let a: ParentCategory = serde_json::from_str("{}").unwrap();
        let b: ParentCategory = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn test_parent_accepts_full_category_document() {
        let json = r#"{
            "_id": 42,
            "name": "Electronics",
            "properties": [{"name":"Brand","value":"A,B","custom":false}],
            "parentCategory": {},
            "childCategories": ["Phones"],
            "images": [],
            "created": 1,
            "updated": 1
        }"#;
        let parent: ParentCategory = serde_json::from_str(json).unwrap();
        assert_eq!(parent.id, Some(42));
        assert_eq!(parent.properties.len(), 1);
        assert!(parent.parent().is_some_and(ParentCategory::is_empty));
    }
}
