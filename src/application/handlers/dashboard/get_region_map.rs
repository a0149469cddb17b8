//! GetRegionMapHandler - Query handler for the choropleth summary.

use crate::domain::dashboard::RegionMap;

use super::{DashboardError, DomainLoader};

/// Deepest tree level a map can be requested for.
const MAX_MAP_LEVEL: usize = 8;

#[derive(Debug, Clone)]
pub struct GetRegionMapQuery {
    pub domain: String,
    /// Tree depth whose nodes are the map's regions
    pub level: usize,
}

pub type GetRegionMapResult = RegionMap;

pub struct GetRegionMapHandler {
    loader: DomainLoader,
}

impl GetRegionMapHandler {
    pub fn new(loader: DomainLoader) -> Self {
        Self { loader }
    }

    pub async fn handle(
        &self,
        query: GetRegionMapQuery,
    ) -> Result<GetRegionMapResult, DashboardError> {
        if query.level > MAX_MAP_LEVEL {
            return Err(DashboardError::InvalidInput(format!(
                "map level must be at most {}",
                MAX_MAP_LEVEL
            )));
        }

        let (definition, assembled) = self.loader.assemble(&query.domain).await?;
        Ok(RegionMap::from_forest(
            definition.key.clone(),
            &assembled.forest,
            query.level,
        ))
    }
}
