use time::OffsetDateTime;

/// One `search_index` row as returned by retrieval, with its ranking score.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct IndexedRecord {
	pub id: String,
	pub reference_no: String,
	pub object_type: String,
	pub title: String,
	pub subtitle: Option<String>,
	pub description: Option<String>,
	pub status: Option<String>,
	pub owner_name: Option<String>,
	pub department: Option<String>,
	pub amount: Option<f64>,
	pub updated_at: OffsetDateTime,
	pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FacetCount {
	pub value: String,
	pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
	pub object_type: Vec<FacetCount>,
	pub status: Vec<FacetCount>,
	pub department: Vec<FacetCount>,
	pub owner: Vec<FacetCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
	pub total_count: i64,
	pub by_type: Vec<FacetCount>,
}
