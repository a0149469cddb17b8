//! Per-domain engine configuration and the one-shot assembly pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::foundation::ValidationError;

use super::aggregator::{derive_missing_values, AggregationMode, Derivation};
use super::classifier::{ThresholdSet, ThresholdSpec};
use super::hierarchy::{build_with_mode, Forest, HierarchyMode, SortPolicy};
use super::normalizer::{normalize_all, FieldMapping, NormalizedBatch};
use super::record::Relation;

/// How one data domain (formation levels, retention, FIC quotas, ...) is shaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainDefinition {
    /// Stable key used by the data source and the API.
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub hierarchy: HierarchyMode,
    #[serde(default)]
    pub aggregation: AggregationMode,
    #[serde(default)]
    pub derivation: Derivation,
    #[serde(default)]
    pub sort: SortPolicy,
    #[serde(default)]
    pub thresholds: ThresholdSpec,
    pub mapping: FieldMapping,
}

/// Output of [`DomainDefinition::assemble`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDomain {
    pub forest: Forest,
    /// Source rows that could not be normalized.
    pub skipped_rows: usize,
}

impl DomainDefinition {
    pub fn new(key: impl Into<String>, title: impl Into<String>, mapping: FieldMapping) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            hierarchy: HierarchyMode::default(),
            aggregation: AggregationMode::default(),
            derivation: Derivation::default(),
            sort: SortPolicy::default(),
            thresholds: ThresholdSpec::default(),
            mapping,
        }
    }

    pub fn with_hierarchy(mut self, hierarchy: HierarchyMode) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationMode) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_sort(mut self, sort: SortPolicy) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdSpec) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn threshold_set(&self) -> ThresholdSet {
        self.thresholds.resolve()
    }

    /// Whether the source must also provide a relation table.
    pub fn needs_relations(&self) -> bool {
        self.hierarchy == HierarchyMode::Relations
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::empty_field("key"));
        }
        if self.mapping.id.trim().is_empty() {
            return Err(ValidationError::empty_field("mapping.id"));
        }
        self.threshold_set().validate()
    }

    pub fn normalize(&self, rows: &[Value]) -> NormalizedBatch {
        normalize_all(rows, &self.mapping)
    }

    /// Normalize, build, aggregate and sort in one pass.
    pub fn assemble(&self, rows: &[Value], relations: &[Relation]) -> AssembledDomain {
        let batch = self.normalize(rows);
        let mut forest = build_with_mode(batch.records, self.hierarchy, relations);
        derive_missing_values(&mut forest, self.aggregation, self.derivation);
        forest.sort(self.sort);

        debug!(
            domain = %self.key,
            nodes = forest.node_count(),
            roots = forest.roots.len(),
            "Assembled domain forest"
        );

        AssembledDomain {
            forest,
            skipped_rows: batch.skipped,
        }
    }
}

/// The set of domains a dashboard knows about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainCatalog {
    domains: Vec<DomainDefinition>,
}

impl DomainCatalog {
    pub fn new(domains: Vec<DomainDefinition>) -> Self {
        Self { domains }
    }

    pub fn get(&self, key: &str) -> Option<&DomainDefinition> {
        self.domains.iter().find(|d| d.key == key)
    }

    pub fn domains(&self) -> &[DomainDefinition] {
        &self.domains
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Validates every definition and rejects duplicate keys.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for domain in &self.domains {
            domain.validate()?;
            if !seen.insert(domain.key.as_str()) {
                return Err(ValidationError::invalid_format(
                    "domains",
                    format!("duplicate domain key '{}'", domain.key),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RecordId;
    use crate::domain::metrics::classifier::{Category, ThresholdPreset};
    use crate::domain::metrics::normalizer::{PercentScale, ValueKind};
    use serde_json::json;

    fn count_mapping() -> FieldMapping {
        FieldMapping::new("id", "descripcion")
            .with_target("meta", ValueKind::Count)
            .with_executed("ejecucion", ValueKind::Count)
    }

    #[test]
    fn assembles_sum_domain_end_to_end() {
        let definition = DomainDefinition::new("formacion", "Formación", count_mapping());
        let rows = vec![
            json!({ "id": 1, "descripcion": "Técnico", "meta": 100, "ejecucion": 90 }),
            json!({ "id": 2, "descripcion": "Tecnólogo", "meta": 50, "ejecucion": 55 }),
            json!({ "id": 3, "descripcion": "Titulada", "meta": null, "ejecucion": null }),
        ];
        let relations = vec![
            Relation::new(RecordId::from(3), RecordId::from(1)),
            Relation::new(RecordId::from(3), RecordId::from(2)),
        ];

        let assembled = definition.assemble(&rows, &relations);
        let node = assembled.forest.find(&RecordId::from(3)).unwrap();

        assert_eq!(node.record.target, Some(150.0));
        assert_eq!(node.record.executed, Some(145.0));
        assert_eq!(node.record.percentage.unwrap().value(), 96.67);
        assert_eq!(
            definition.threshold_set().classify(node.record.percentage),
            Some(Category::Buena)
        );
        assert_eq!(assembled.skipped_rows, 0);
    }

    #[test]
    fn assembles_path_domain_with_mean_rates() {
        let mapping = FieldMapping::new("codigo", "nombre")
            .with_percentage("retencion", PercentScale::Fraction);
        let definition = DomainDefinition::new("retencion", "Retención", mapping)
            .with_hierarchy(HierarchyMode::PathIds)
            .with_aggregation(AggregationMode::Mean);
        let rows = vec![
            json!({ "codigo": "1", "nombre": "Titulada" }),
            json!({ "codigo": "1.1", "nombre": "Presencial", "retencion": 0.9 }),
            json!({ "codigo": "1.2", "nombre": "Virtual", "retencion": 0.7 }),
            json!({ "codigo": "1.3", "nombre": "Sin dato", "retencion": "-" }),
        ];

        let assembled = definition.assemble(&rows, &[]);
        let root = &assembled.forest.roots[0];
        assert_eq!(root.record.percentage.unwrap().value(), 80.0);
        assert_eq!(root.children.len(), 3);
    }

    #[test]
    fn assemble_counts_skipped_rows() {
        let definition = DomainDefinition::new("fic", "FIC", count_mapping())
            .with_hierarchy(HierarchyMode::Flat);
        let rows = vec![json!({ "id": 1 }), json!(42), json!({ "meta": 3 })];
        let assembled = definition.assemble(&rows, &[]);
        assert_eq!(assembled.forest.node_count(), 1);
        assert_eq!(assembled.skipped_rows, 2);
    }

    #[test]
    fn definition_deserializes_with_defaults() {
        let yaml = r#"
key: certificacion
title: Certificación
mapping:
  id: id
  description: nombre
"#;
        let definition: DomainDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(definition.hierarchy, HierarchyMode::Relations);
        assert_eq!(definition.aggregation, AggregationMode::Sum);
        assert_eq!(definition.sort, SortPolicy::Alternating);
        assert_eq!(definition.threshold_set(), ThresholdSet::PRIMARY);
        assert!(definition.needs_relations());
    }

    #[test]
    fn definition_rejects_invalid_thresholds() {
        let definition = DomainDefinition::new("x", "X", count_mapping()).with_thresholds(
            ThresholdSpec::Custom(ThresholdSet {
                vulnerable_from: 90.0,
                buena_from: 80.0,
                over_execution_above: None,
            }),
        );
        assert!(definition.validate().is_err());
    }

    #[test]
    fn catalog_rejects_duplicate_keys() {
        let catalog = DomainCatalog::new(vec![
            DomainDefinition::new("a", "A", count_mapping()),
            DomainDefinition::new("a", "A again", count_mapping()),
        ]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn catalog_lookup_by_key() {
        let catalog = DomainCatalog::new(vec![
            DomainDefinition::new("a", "A", count_mapping()),
            DomainDefinition::new("b", "B", count_mapping())
                .with_thresholds(ThresholdSpec::Preset(ThresholdPreset::LegacyMap)),
        ]);
        assert!(catalog.validate().is_ok());
        assert_eq!(
            catalog.get("b").unwrap().threshold_set(),
            ThresholdSet::LEGACY_MAP
        );
        assert!(catalog.get("zzz").is_none());
    }
}
