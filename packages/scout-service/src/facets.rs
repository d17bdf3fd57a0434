use serde::Serialize;

use scout_storage::{models::FacetCount, queries};

use crate::{Result, ScoutService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetValue {
	pub value: String,
	pub count: i64,
}
impl From<FacetCount> for FacetValue {
	fn from(facet: FacetCount) -> Self {
		Self { value: facet.value, count: facet.count }
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetsResponse {
	pub object_type: Vec<FacetValue>,
	pub status: Vec<FacetValue>,
	pub department: Vec<FacetValue>,
	pub owner: Vec<FacetValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
	#[serde(rename = "type")]
	pub object_type: String,
	pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
	pub total_count: i64,
	pub by_type: Vec<TypeCount>,
}

impl ScoutService {
	/// Group counts per filterable column over the whole index. Unlike search, store errors
	/// surface to the caller.
	pub async fn facets(&self) -> Result<FacetsResponse> {
		let facets = queries::facets(&self.db).await?;

		Ok(FacetsResponse {
			object_type: into_values(facets.object_type),
			status: into_values(facets.status),
			department: into_values(facets.department),
			owner: into_values(facets.owner),
		})
	}

	pub async fn stats(&self) -> Result<StatsResponse> {
		let stats = queries::index_stats(&self.db).await?;

		Ok(StatsResponse {
			total_count: stats.total_count,
			by_type: stats
				.by_type
				.into_iter()
				.map(|facet| TypeCount { object_type: facet.value, count: facet.count })
				.collect(),
		})
	}
}

fn into_values(facets: Vec<FacetCount>) -> Vec<FacetValue> {
	facets.into_iter().map(FacetValue::from).collect()
}
