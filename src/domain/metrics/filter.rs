//! Filter/Query Layer over flat record lists (the "metas" table).
//!
//! All criteria are optional and AND-combined. An empty criteria value is the
//! identity filter. Search is a case-insensitive substring match on the
//! description; accents are compared as written, so "formacion" does not
//! match "Formación".

use serde::{Deserialize, Serialize};

use super::record::{Record, RecordKind};

/// Row kind selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Total,
    Subtotal,
    Detail,
}

impl KindFilter {
    fn matches(&self, kind: RecordKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Total => kind == RecordKind::Total,
            KindFilter::Subtotal => kind == RecordKind::Subtotal,
            KindFilter::Detail => kind == RecordKind::Detail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Flat hierarchy tags to keep; empty means no constraint.
    #[serde(default)]
    pub levels: Vec<u8>,
    #[serde(default)]
    pub kind: KindFilter,
    #[serde(default)]
    pub percentage_min: Option<f64>,
    #[serde(default)]
    pub percentage_max: Option<f64>,
    #[serde(default)]
    pub search_text: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self == &FilterCriteria::default()
    }

    /// True when the record satisfies every set criterion.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_level(record)
            && self.kind.matches(record.kind())
            && self.matches_percentage(record)
            && self.matches_search(record)
    }

    fn matches_level(&self, record: &Record) -> bool {
        self.levels.is_empty()
            || record
                .hierarchy_level
                .is_some_and(|level| self.levels.contains(&level))
    }

    fn matches_percentage(&self, record: &Record) -> bool {
        if self.percentage_min.is_none() && self.percentage_max.is_none() {
            return true;
        }
        let Some(pct) = record.effective_percentage().map(|p| p.exact()) else {
            return false;
        };
        self.percentage_min.map_or(true, |min| pct >= min)
            && self.percentage_max.map_or(true, |max| pct <= max)
    }

    fn matches_search(&self, record: &Record) -> bool {
        match self.search_text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => record
                .description
                .to_lowercase()
                .contains(&text.to_lowercase()),
        }
    }
}

/// Returns the records matching `criteria`, in input order.
pub fn filter(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Scalar summary of a (filtered) record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub count: usize,
    pub total_count: usize,
    pub subtotal_count: usize,
    pub detail_count: usize,
    /// Mean over records with an executed value; 0 when there are none.
    pub mean_executed: f64,
    /// Mean over records with a percentage; 0 when there are none.
    pub mean_percentage: f64,
}

pub fn summarize(records: &[Record]) -> FilterStats {
    let mut stats = FilterStats {
        count: records.len(),
        ..FilterStats::default()
    };
    for record in records {
        match record.kind() {
            RecordKind::Total => stats.total_count += 1,
            RecordKind::Subtotal => stats.subtotal_count += 1,
            RecordKind::Detail => stats.detail_count += 1,
        }
    }
    stats.mean_executed = mean(records.iter().filter_map(|r| r.executed));
    stats.mean_percentage = mean(
        records
            .iter()
            .filter_map(|r| r.effective_percentage().map(|p| p.exact())),
    );
    stats
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RecordId;

    fn row(id: i64, description: &str, level: u8, target: f64, executed: f64) -> Record {
        Record::new(RecordId::from(id), description)
            .with_values(Some(target), Some(executed))
            .with_hierarchy_level(level)
    }

    fn fixture() -> Vec<Record> {
        vec![
            row(1, "Total Nacional", 1, 1000.0, 950.0).as_total(),
            row(2, "Regional Antioquia", 2, 300.0, 240.0).as_subtotal(),
            row(3, "Regional Bogotá", 2, 400.0, 420.0).as_subtotal(),
            row(4, "Centro de Comercio", 3, 100.0, 95.0),
            row(5, "Centro Agropecuario", 3, 100.0, 70.0),
            row(6, "Formación Titulada", 4, 50.0, 45.0),
        ]
    }

    #[test]
    fn empty_criteria_is_identity() {
        let records = fixture();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(filter(&records, &criteria), records);
    }

    #[test]
    fn kind_filter_selects_by_flags() {
        let records = fixture();
        let totals = filter(
            &records,
            &FilterCriteria {
                kind: KindFilter::Total,
                ..Default::default()
            },
        );
        assert_eq!(totals.len(), 1);

        let details = filter(
            &records,
            &FilterCriteria {
                kind: KindFilter::Detail,
                ..Default::default()
            },
        );
        assert_eq!(details.len(), 3);
    }

    #[test]
    fn percentage_range_is_inclusive() {
        let records = fixture();
        let hits = filter(
            &records,
            &FilterCriteria {
                percentage_min: Some(80.0),
                percentage_max: Some(95.0),
                ..Default::default()
            },
        );
        let ids: Vec<&str> = hits.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4", "6"]);
    }

    #[test]
    fn records_without_percentage_fail_range_bounds() {
        let records = vec![Record::new(RecordId::from(1), "sin meta").with_hierarchy_level(1)];
        let hits = filter(
            &records,
            &FilterCriteria {
                percentage_min: Some(0.0),
                ..Default::default()
            },
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_but_accent_sensitive() {
        let records = fixture();
        let hits = filter(
            &records,
            &FilterCriteria {
                search_text: Some("REGIONAL".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(hits.len(), 2);

        let hits = filter(
            &records,
            &FilterCriteria {
                search_text: Some("bogota".to_string()),
                ..Default::default()
            },
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn blank_search_matches_everything() {
        let records = fixture();
        let hits = filter(
            &records,
            &FilterCriteria {
                search_text: Some("   ".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(hits.len(), records.len());
    }

    #[test]
    fn summarize_counts_kinds_and_means() {
        let stats = summarize(&fixture());
        assert_eq!(stats.count, 6);
        assert_eq!(stats.total_count, 1);
        assert_eq!(stats.subtotal_count, 2);
        assert_eq!(stats.detail_count, 3);
        assert!((stats.mean_executed - 303.333).abs() < 0.001);
    }

    #[test]
    fn summarize_empty_is_zero_not_nan() {
        let stats = summarize(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_executed, 0.0);
        assert_eq!(stats.mean_percentage, 0.0);
    }

    #[test]
    fn criteria_deserialize_from_camel_case() {
        let criteria: FilterCriteria = serde_json::from_str(
            r#"{"levels": [1, 2], "kind": "subtotal", "percentageMin": 90}"#,
        )
        .unwrap();
        assert_eq!(criteria.levels, vec![1, 2]);
        assert_eq!(criteria.kind, KindFilter::Subtotal);
        assert_eq!(criteria.percentage_min, Some(90.0));
        assert!(criteria.search_text.is_none());
    }
}
