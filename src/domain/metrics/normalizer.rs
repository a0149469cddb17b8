//! Flat-Record Normalizer - converts raw source rows into [`Record`]s.
//!
//! Each data source declares a [`FieldMapping`]: which source key feeds each
//! record field, whether numeric fields are counts or rates, and how a
//! supplied percentage is scaled. Nothing is auto-detected; a fraction-scaled
//! source must say so.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::foundation::{Percentage, RecordId};

use super::record::{Record, Relation};

/// Placeholders that mean "no value" in upstream spreadsheets.
const PLACEHOLDERS: &[&str] = &["-", "--", "n/a", "na", "s.d.", "sd"];

/// Semantic role of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Summable quantity; placeholders read as 0.
    #[default]
    Count,
    /// Rate or ratio; placeholders read as null so averages stay honest.
    Rate,
}

/// How a supplied percentage is written by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentScale {
    /// `0.87` means 87%.
    Fraction,
    /// `87` means 87%.
    #[default]
    Whole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericField {
    pub source: String,
    #[serde(default)]
    pub kind: ValueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageField {
    pub source: String,
    pub scale: PercentScale,
}

/// Source-key mapping for one data domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub target: Option<NumericField>,
    #[serde(default)]
    pub executed: Option<NumericField>,
    #[serde(default)]
    pub percentage: Option<PercentageField>,
    #[serde(default)]
    pub hierarchy_level: Option<String>,
    #[serde(default)]
    pub subtotal_flag: Option<String>,
    #[serde(default)]
    pub total_flag: Option<String>,
}

impl FieldMapping {
    /// Mapping with only id and description keys.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            target: None,
            executed: None,
            percentage: None,
            hierarchy_level: None,
            subtotal_flag: None,
            total_flag: None,
        }
    }

    pub fn with_target(mut self, source: impl Into<String>, kind: ValueKind) -> Self {
        self.target = Some(NumericField {
            source: source.into(),
            kind,
        });
        self
    }

    pub fn with_executed(mut self, source: impl Into<String>, kind: ValueKind) -> Self {
        self.executed = Some(NumericField {
            source: source.into(),
            kind,
        });
        self
    }

    pub fn with_percentage(mut self, source: impl Into<String>, scale: PercentScale) -> Self {
        self.percentage = Some(PercentageField {
            source: source.into(),
            scale,
        });
        self
    }

    pub fn with_hierarchy_level(mut self, source: impl Into<String>) -> Self {
        self.hierarchy_level = Some(source.into());
        self
    }

    pub fn with_flags(
        mut self,
        subtotal: Option<impl Into<String>>,
        total: Option<impl Into<String>>,
    ) -> Self {
        self.subtotal_flag = subtotal.map(Into::into);
        self.total_flag = total.map(Into::into);
        self
    }
}

/// Rows that cannot become a record at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("Row is not a JSON object")]
    NotAnObject,

    #[error("Row has no usable id in field '{0}'")]
    MissingId(String),
}

/// Normalizes one raw row.
///
/// Absent keys become `None`. Only a non-object row or a row without an id
/// is rejected.
pub fn normalize(row: &Value, mapping: &FieldMapping) -> Result<Record, NormalizeError> {
    let object = row.as_object().ok_or(NormalizeError::NotAnObject)?;

    let id = read_id(object, &mapping.id)?;
    let description = object
        .get(&mapping.description)
        .and_then(read_text)
        .unwrap_or_else(|| id.to_string());

    let mut record = Record::new(id, description);
    record.target = mapping
        .target
        .as_ref()
        .and_then(|field| read_numeric(object, field));
    record.executed = mapping
        .executed
        .as_ref()
        .and_then(|field| read_numeric(object, field));
    record.percentage = mapping
        .percentage
        .as_ref()
        .and_then(|field| read_percentage(object, field));
    record.hierarchy_level = mapping
        .hierarchy_level
        .as_ref()
        .and_then(|key| object.get(key))
        .and_then(read_level);
    record.is_subtotal = read_flag(object, mapping.subtotal_flag.as_deref());
    record.is_total = read_flag(object, mapping.total_flag.as_deref());

    Ok(record)
}

/// Result of normalizing a batch of rows.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Normalizes every row, skipping (and logging) rows that cannot be keyed.
pub fn normalize_all(rows: &[Value], mapping: &FieldMapping) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for (index, row) in rows.iter().enumerate() {
        match normalize(row, mapping) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(row = index, error = %e, "Skipping source row");
                batch.skipped += 1;
            }
        }
    }
    debug!(
        normalized = batch.records.len(),
        skipped = batch.skipped,
        "Normalized source rows"
    );
    batch
}

/// Result of parsing a relation table edge by edge.
#[derive(Debug, Clone, Default)]
pub struct RelationBatch {
    pub relations: Vec<Relation>,
    pub skipped: usize,
}

/// Parses each edge on its own; an edge without two usable ids is dropped
/// and logged, the rest of the table survives.
pub fn normalize_relations(edges: Vec<Value>) -> RelationBatch {
    let mut batch = RelationBatch::default();
    for (index, edge) in edges.into_iter().enumerate() {
        match serde_json::from_value::<Relation>(edge) {
            Ok(relation) => batch.relations.push(relation),
            Err(e) => {
                warn!(edge = index, error = %e, "Skipping malformed relation");
                batch.skipped += 1;
            }
        }
    }
    debug!(
        relations = batch.relations.len(),
        skipped = batch.skipped,
        "Parsed relation table"
    );
    batch
}

/// Parses a loose numeric value.
///
/// Accepts JSON numbers and strings with `,` thousands separators, `_`,
/// surrounding whitespace or a trailing `%`. Placeholders (`"-"`, `""`,
/// `"N/A"`) read as `0` for counts and `None` for rates; JSON null and
/// unparseable text are always `None`.
pub fn parse_number(value: &Value, kind: ValueKind) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed.to_lowercase().as_str()) {
                return match kind {
                    ValueKind::Count => Some(0.0),
                    ValueKind::Rate => None,
                };
            }
            let cleaned: String = trimmed
                .trim_end_matches('%')
                .chars()
                .filter(|c| !matches!(c, ',' | '_' | ' '))
                .collect();
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

fn read_id(object: &Map<String, Value>, key: &str) -> Result<RecordId, NormalizeError> {
    let missing = || NormalizeError::MissingId(key.to_string());
    match object.get(key) {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(int) => Ok(RecordId::from(int)),
            None => RecordId::new(n.to_string()).map_err(|_| missing()),
        },
        Some(Value::String(s)) => RecordId::new(s.as_str()).map_err(|_| missing()),
        _ => Err(missing()),
    }
}

fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_numeric(object: &Map<String, Value>, field: &NumericField) -> Option<f64> {
    object
        .get(&field.source)
        .and_then(|value| parse_number(value, field.kind))
}

fn read_percentage(object: &Map<String, Value>, field: &PercentageField) -> Option<Percentage> {
    let raw = parse_number(object.get(&field.source)?, ValueKind::Rate)?;
    match field.scale {
        PercentScale::Fraction => Percentage::from_fraction(raw),
        PercentScale::Whole => Percentage::from_whole(raw),
    }
}

fn read_level(value: &Value) -> Option<u8> {
    let level = parse_number(value, ValueKind::Rate)?;
    if level.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&level) {
        return None;
    }
    Some(level as u8)
}

fn read_flag(object: &Map<String, Value>, key: Option<&str>) -> bool {
    let Some(value) = key.and_then(|k| object.get(k)) else {
        return false;
    };
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "si" | "sí" | "s" | "yes" | "y"
        ),
        _ => false,
    }
}
