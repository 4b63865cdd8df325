//! Metadata schema description
//!
//! The schema document is a JSON object with at least:
//!
//! ```json
//! {
//!   "properties": { "name": { ... }, "keywords": { "items": { ... } } },
//!   "required": ["name"],
//!   "recommended": ["keywords"]
//! }
//! ```
//!
//! Key order of `properties` defines element order and therefore positions
//! and [`subset_between`] ranges.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::AnalysisError;

/// Priority class of a schema element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Required,
    Recommended,
    Optional,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Required, Self::Recommended, Self::Optional];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Recommended => "recommended",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// One element of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: String,
    /// The element accepts a list of items (its definition has an `items` key).
    pub supports_items: bool,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
    recommended: Vec<String>,
}

/// Ordered element list with priority subsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSchema {
    properties: Vec<PropertyDef>,
    required: Vec<String>,
    recommended: Vec<String>,
}

impl MetadataSchema {
    #[must_use]
    pub fn new(properties: Vec<PropertyDef>, required: Vec<String>, recommended: Vec<String>) -> Self {
        Self {
            properties,
            required,
            recommended,
        }
    }

    /// Reads the schema from a parsed JSON document.
    pub fn from_json(value: Value) -> Result<Self, AnalysisError> {
        let raw: RawSchema =
            serde_json::from_value(value).map_err(|e| AnalysisError::MalformedSchema {
                reason: e.to_string(),
            })?;
        let properties = raw
            .properties
            .into_iter()
            .map(|(name, def)| PropertyDef {
                supports_items: def.get("items").is_some(),
                name,
            })
            .collect();
        Ok(Self::new(properties, raw.required, raw.recommended))
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Element names in schema order.
    #[must_use]
    pub fn element_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    #[must_use]
    pub fn recommended(&self) -> &[String] {
        &self.recommended
    }

    /// Zero-based position of an element in schema order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Position of the last element (`0` for an empty schema).
    #[must_use]
    pub fn max_position(&self) -> usize {
        self.properties.len().saturating_sub(1)
    }

    /// Elements whose definition allows multiple items.
    #[must_use]
    pub fn elements_with_items(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.supports_items)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Elements that are neither required nor recommended, in schema order.
    #[must_use]
    pub fn optional_elements(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| classify_priority(&p.name, self) == Priority::Optional)
            .map(|p| p.name.clone())
            .collect()
    }
}

/// Contiguous slice of `names` from `start` to `end`, both inclusive.
///
/// An `end` that precedes `start` yields an empty list.
///
/// ```
/// # use ersmeta_analysis::schema::subset_between;
/// let names = ["a", "b", "c", "d"];
/// assert_eq!(subset_between(&names, "b", "c").unwrap(), vec!["b", "c"]);
/// assert!(subset_between(&names, "b", "x").is_err());
/// ```
pub fn subset_between<S>(names: &[S], start: &str, end: &str) -> Result<Vec<String>, AnalysisError>
where
    S: AsRef<str>,
{
    let find = |element: &str| {
        names
            .iter()
            .position(|n| n.as_ref() == element)
            .ok_or_else(|| AnalysisError::BoundaryNotFound {
                element: element.to_owned(),
            })
    };
    let start_idx = find(start)?;
    let end_idx = find(end)?;
    if end_idx < start_idx {
        return Ok(vec![]);
    }
    Ok(names[start_idx..=end_idx]
        .iter()
        .map(|n| n.as_ref().to_owned())
        .collect())
}

/// Priority of a property; "required" wins when a property is listed twice.
#[must_use]
pub fn classify_priority(property: &str, schema: &MetadataSchema) -> Priority {
    if schema.required.iter().any(|p| p == property) {
        Priority::Required
    } else if schema.recommended.iter().any(|p| p == property) {
        Priority::Recommended
    } else {
        Priority::Optional
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> MetadataSchema {
        MetadataSchema::from_json(json!({
            "properties": {
                "name": {"type": "string"},
                "keywords": {"type": "array", "items": {"type": "string"}},
                "author": {"type": "array", "items": {}},
                "license": {"type": "string"}
            },
            "required": ["name", "author"],
            "recommended": ["keywords", "author"]
        }))
        .unwrap()
    }

    #[test]
    fn test_property_order_is_preserved() {
        let schema = schema();
        assert_eq!(
            schema.element_names(),
            vec!["name", "keywords", "author", "license"]
        );
        assert_eq!(schema.position("license"), Some(3));
        assert_eq!(schema.max_position(), 3);
    }

    #[test]
    fn test_items_flag() {
        assert_eq!(schema().elements_with_items(), vec!["keywords", "author"]);
    }

    #[test]
    fn test_required_wins_ties() {
        let schema = schema();
        assert_eq!(classify_priority("author", &schema), Priority::Required);
        assert_eq!(classify_priority("keywords", &schema), Priority::Recommended);
        assert_eq!(classify_priority("license", &schema), Priority::Optional);
        assert_eq!(classify_priority("unknown", &schema), Priority::Optional);

        let both = MetadataSchema::new(vec![], vec!["x".into()], vec!["x".into()]);
        assert_eq!(classify_priority("x", &both), Priority::Required);
    }

    #[test]
    fn test_optional_elements() {
        assert_eq!(schema().optional_elements(), vec!["license"]);
    }

    #[test]
    fn test_subset_between_bounds() {
        let names = ["a", "b", "c", "d"];
        assert_eq!(subset_between(&names, "a", "a").unwrap(), vec!["a"]);
        assert_eq!(subset_between(&names, "a", "d").unwrap().len(), 4);
        assert!(subset_between(&names, "d", "b").unwrap().is_empty());
        let err = subset_between(&names, "x", "b").unwrap_err();
        assert!(
            matches!(err, AnalysisError::BoundaryNotFound { ref element } if element == "x")
        );
    }

    #[test]
    fn test_missing_collection_is_malformed() {
        let err = MetadataSchema::from_json(json!({"properties": {}, "required": []})).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedSchema { .. }));
    }
}
