//! GetDomainTreeHandler - Query handler for one domain's classified forest.

use chrono::Utc;

use crate::domain::dashboard::DomainSnapshot;

use super::{DashboardError, DomainLoader};

/// Query to load the tree view of a domain.
#[derive(Debug, Clone)]
pub struct GetDomainTreeQuery {
    pub domain: String,
}

pub type GetDomainTreeResult = DomainSnapshot;

/// Handler that rebuilds a domain's forest from fresh source data.
pub struct GetDomainTreeHandler {
    loader: DomainLoader,
}

impl GetDomainTreeHandler {
    pub fn new(loader: DomainLoader) -> Self {
        Self { loader }
    }

    pub async fn handle(
        &self,
        query: GetDomainTreeQuery,
    ) -> Result<GetDomainTreeResult, DashboardError> {
        let (definition, assembled) = self.loader.assemble(&query.domain).await?;
        Ok(DomainSnapshot::from_assembled(
            definition,
            assembled,
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::dashboard::fixtures;
    use crate::domain::foundation::RecordId;
    use crate::domain::metrics::{Category, HierarchyMode};
    use crate::ports::SourceError;

    fn handler() -> GetDomainTreeHandler {
        GetDomainTreeHandler::new(fixtures::loader(fixtures::source()))
    }

    fn query(domain: &str) -> GetDomainTreeQuery {
        GetDomainTreeQuery {
            domain: domain.to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_classified_forest() {
        let snapshot = handler().handle(query("formacion")).await.unwrap();

        assert_eq!(snapshot.domain, "formacion");
        assert_eq!(snapshot.hierarchy, HierarchyMode::Relations);
        // 3 (with children 1, 2), 4 and 5 stay roots
        assert_eq!(snapshot.trees.len(), 3);
        assert_eq!(snapshot.node_count(), 5);

        let titulada = snapshot
            .trees
            .iter()
            .find(|t| t.id == RecordId::from(3))
            .unwrap();
        assert_eq!(titulada.percentage.unwrap().value(), 96.67);
        assert_eq!(titulada.category, Some(Category::Buena));
        assert!(titulada.is_subtotal);
    }

    #[tokio::test]
    async fn test_children_follow_alternating_sort() {
        let snapshot = handler().handle(query("formacion")).await.unwrap();
        let titulada = snapshot
            .trees
            .iter()
            .find(|t| t.id == RecordId::from(3))
            .unwrap();
        // children of a level-0 node ascend by target
        let targets: Vec<Option<f64>> = titulada.children.iter().map(|c| c.target).collect();
        assert_eq!(targets, vec![Some(50.0), Some(100.0)]);
    }

    #[tokio::test]
    async fn test_unknown_domain_fails() {
        let result = handler().handle(query("desconocido")).await;
        assert_eq!(
            result.unwrap_err(),
            DashboardError::UnknownDomain("desconocido".to_string())
        );
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let result = handler().handle(query("caido")).await;
        assert!(matches!(
            result,
            Err(DashboardError::Source(SourceError::Unavailable(_)))
        ));
    }
}
