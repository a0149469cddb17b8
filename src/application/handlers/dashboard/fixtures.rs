//! Test fixtures shared by the dashboard handler tests.

use std::sync::Arc;

use serde_json::json;

use crate::adapters::source::InMemorySource;
use crate::domain::foundation::RecordId;
use crate::domain::metrics::{
    AggregationMode, DomainCatalog, DomainDefinition, FieldMapping, HierarchyMode, PercentScale,
    Relation, ValueKind,
};

use super::DomainLoader;

fn id(value: i64) -> RecordId {
    RecordId::from(value)
}

pub fn catalog() -> DomainCatalog {
    let counts = FieldMapping::new("id", "descripcion")
        .with_target("meta", ValueKind::Count)
        .with_executed("ejecucion", ValueKind::Count)
        .with_hierarchy_level("nivel")
        .with_flags(Some("esSubtotal"), Some("esTotal"));
    let rates = FieldMapping::new("codigo", "nombre")
        .with_percentage("retencion", PercentScale::Fraction);

    DomainCatalog::new(vec![
        DomainDefinition::new("formacion", "Formación", counts.clone()),
        DomainDefinition::new("retencion", "Retención", rates)
            .with_hierarchy(HierarchyMode::PathIds)
            .with_aggregation(AggregationMode::Mean),
        DomainDefinition::new("sin_relaciones", "Sin relaciones", counts.clone()),
        DomainDefinition::new("caido", "Caído", counts),
    ])
}

pub fn source() -> Arc<InMemorySource> {
    Arc::new(
        InMemorySource::new()
            .with_rows(
                "formacion",
                vec![
                    json!({ "id": 1, "descripcion": "Técnico", "meta": 100, "ejecucion": 90, "nivel": 2 }),
                    json!({ "id": 2, "descripcion": "Tecnólogo", "meta": 50, "ejecucion": 55, "nivel": 2 }),
                    json!({ "id": 3, "descripcion": "Titulada", "nivel": 1, "esSubtotal": true }),
                    json!({ "id": 4, "descripcion": "Complementaria", "meta": 200, "ejecucion": 150, "nivel": 1, "esSubtotal": true }),
                    json!({ "id": 5, "descripcion": "Total formación", "meta": 350, "ejecucion": 295, "nivel": 0, "esTotal": true }),
                ],
            )
            .with_relations(
                "formacion",
                vec![
                    Relation::new(id(3), id(1)),
                    Relation::new(id(3), id(2)),
                ],
            )
            .with_rows(
                "retencion",
                vec![
                    json!({ "codigo": "1", "nombre": "Titulada" }),
                    json!({ "codigo": "1.1", "nombre": "Presencial", "retencion": 0.9 }),
                    json!({ "codigo": "1.2", "nombre": "Virtual", "retencion": 0.7 }),
                ],
            )
            .with_rows("sin_relaciones", vec![json!({ "id": 1 })])
            .with_rows("caido", vec![])
            .with_failure("caido"),
    )
}

pub fn loader(source: Arc<InMemorySource>) -> DomainLoader {
    DomainLoader::new(source, Arc::new(catalog()))
}
