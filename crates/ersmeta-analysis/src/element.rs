//! Element presence and cardinality over metadata records

use serde::Deserialize;
use serde_json::Value;

use crate::{
    AnalysisError,
    schema::{self, MetadataSchema, Priority},
};

/// One metadata record: a key→value document.
pub type MetadataRecord = serde_json::Map<String, Value>;

/// Interprets a parsed JSON document as a metadata record.
///
/// `index` identifies the record in error messages.
pub fn parse_record(index: usize, value: Value) -> Result<MetadataRecord, AnalysisError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AnalysisError::MalformedRecord {
            index,
            reason: format!("expected an object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A named set of elements reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementGroup {
    pub name: String,
    pub elements: Vec<String>,
}

impl ElementGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, elements: Vec<String>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// The priority groups of a schema: required, recommended and bonus (optional).
///
/// Group names are the ones used on the element-count charts.
#[must_use]
pub fn priority_groups(schema: &MetadataSchema) -> Vec<ElementGroup> {
    vec![
        ElementGroup::new("required", schema.required().to_vec()),
        ElementGroup::new("recommended", schema.recommended().to_vec()),
        ElementGroup::new("bonus", schema.optional_elements()),
    ]
}

/// Per-record presence counts for one element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSeries {
    pub label: String,
    pub counts: Vec<usize>,
}

impl PresenceSeries {
    /// Counts as `f64` samples for box-plotting.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn samples(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }
}

/// For each record, how many of `elements` appear as keys.
///
/// Only key existence is checked; the value is never inspected.
///
/// ```
/// # use ersmeta_analysis::element::presence_counts;
/// # use serde_json::json;
/// let records = [json!({"a": 1}), json!({"b": 2, "c": 3})]
///     .map(|v| v.as_object().unwrap().clone());
/// let series = presence_counts(&["a", "b"], &records, "T");
/// assert_eq!(series.label, "T");
/// assert_eq!(series.counts, vec![1, 1]);
/// ```
#[must_use]
pub fn presence_counts<S>(
    elements: &[S],
    records: &[MetadataRecord],
    label: impl Into<String>,
) -> PresenceSeries
where
    S: AsRef<str>,
{
    let counts = records
        .iter()
        .map(|record| {
            elements
                .iter()
                .filter(|e| record.contains_key(e.as_ref()))
                .count()
        })
        .collect();
    PresenceSeries {
        label: label.into(),
        counts,
    }
}

/// Item counts per record (rows) and element (columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardinalityTable {
    pub elements: Vec<String>,
    pub rows: Vec<Vec<usize>>,
}

impl CardinalityTable {
    /// All counts of one element across records.
    #[must_use]
    pub fn column(&self, element: &str) -> Option<Vec<usize>> {
        let idx = self.elements.iter().position(|e| e == element)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }
}

/// Length of each list-valued element per record; `0` for any other value or
/// an absent key.
#[must_use]
pub fn item_cardinality<S>(records: &[MetadataRecord], elements: &[S]) -> CardinalityTable
where
    S: AsRef<str>,
{
    let rows = records
        .iter()
        .map(|record| {
            elements
                .iter()
                .map(|e| match record.get(e.as_ref()) {
                    Some(Value::Array(items)) => items.len(),
                    _ => 0,
                })
                .collect()
        })
        .collect();
    CardinalityTable {
        elements: elements.iter().map(|e| e.as_ref().to_owned()).collect(),
        rows,
    }
}

/// How often one schema element appears across records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementOccurrence {
    pub property: String,
    pub count: usize,
    pub priority: Priority,
    pub position: usize,
}

/// Occurrence of every schema element, sorted by count descending.
///
/// Elements with equal counts keep schema order.
#[must_use]
pub fn element_occurrences(
    schema: &MetadataSchema,
    records: &[MetadataRecord],
) -> Vec<ElementOccurrence> {
    let mut occurrences = schema
        .properties()
        .iter()
        .enumerate()
        .map(|(position, prop)| ElementOccurrence {
            count: records
                .iter()
                .filter(|r| r.contains_key(&prop.name))
                .count(),
            priority: schema::classify_priority(&prop.name, schema),
            position,
            property: prop.name.clone(),
        })
        .collect::<Vec<_>>();
    occurrences.sort_by(|a, b| b.count.cmp(&a.count));
    occurrences
}

/// A named contiguous range of schema elements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThematicArea {
    pub name: String,
    pub first: String,
    pub last: String,
}

impl ThematicArea {
    /// Resolves the range against an ordered element list.
    pub fn resolve<S>(&self, names: &[S]) -> Result<ElementGroup, AnalysisError>
    where
        S: AsRef<str>,
    {
        let elements = schema::subset_between(names, &self.first, &self.last)?;
        Ok(ElementGroup::new(self.name.clone(), elements))
    }
}
