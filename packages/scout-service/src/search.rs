use std::time::Instant;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use scout_domain::{
	compile::{self, CompiledPredicate},
	intent::SearchIntent,
	page::Page,
};
use scout_storage::{models::IndexedRecord, queries};

use crate::{Error, Result, ScoutService};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub page: Option<i64>,
	#[serde(default)]
	pub size: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
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
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
	#[serde(rename = "relevance_score")]
	pub relevance_score: f64,
}
impl From<IndexedRecord> for SearchResult {
	fn from(record: IndexedRecord) -> Self {
		Self {
			id: record.id,
			reference_no: record.reference_no,
			object_type: record.object_type,
			title: record.title,
			subtitle: record.subtitle,
			description: record.description,
			status: record.status,
			owner_name: record.owner_name,
			department: record.department,
			amount: record.amount,
			updated_at: record.updated_at,
			relevance_score: record.relevance_score,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub query: String,
	pub intent: SearchIntent,
	pub results: Vec<SearchResult>,
	pub total_count: u64,
	pub duration_ms: u64,
}

impl ScoutService {
	/// Extract, compile, retrieve, format.
	///
	/// Only request validation fails. Extraction, query embedding, and retrieval failures degrade
	/// to the keyword intent, recency ordering, and an empty result set respectively.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let started_at = Instant::now();
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::invalid("$.query", "query must be non-empty."));
		}

		let page = self.resolve_page(req.page, req.size)?;
		let intent = self.extract_intent(query).await;
		let predicate = compile::compile(&intent);

		log_skipped_amount(&intent);

		let query_embedding = self.embed_query(query).await;
		let records = self.retrieve(&predicate, query_embedding.as_deref()).await;
		let response = format_response(records, intent, query, page, started_at);

		tracing::info!(
			intent = ?response.intent,
			total_count = response.total_count,
			duration_ms = response.duration_ms,
			"Search completed."
		);

		Ok(response)
	}

	fn resolve_page(&self, page: Option<i64>, size: Option<i64>) -> Result<Page> {
		let max_page_size = self.cfg.search.max_page_size;
		let number = page.unwrap_or(1);
		let size = size.unwrap_or(i64::from(self.cfg.search.default_page_size));
		let number = u32::try_from(number)
			.ok()
			.filter(|number| *number >= 1)
			.ok_or_else(|| Error::invalid("$.page", "page must be at least 1."))?;
		let size = u32::try_from(size)
			.ok()
			.filter(|size| (1..=max_page_size).contains(size))
			.ok_or_else(|| {
				Error::invalid("$.size", format!("size must be between 1 and {max_page_size}."))
			})?;

		Ok(Page { number, size })
	}

	async fn extract_intent(&self, query: &str) -> SearchIntent {
		match self.providers.extractor.extract(query).await {
			Ok(intent) => intent,
			Err(err) => {
				tracing::warn!(error = %err, "Intent extraction failed. Falling back to keywords.");

				SearchIntent::fallback(query)
			},
		}
	}

	async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
		let provider = self.providers.embedding.as_ref()?;
		let texts = [query.to_string()];

		match provider.embed(&texts).await {
			Ok(mut vectors) if vectors.len() == 1 => vectors.pop(),
			Ok(vectors) => {
				tracing::warn!(
					count = vectors.len(),
					"Query embedding returned an unexpected vector count. Ordering by recency."
				);

				None
			},
			Err(err) => {
				tracing::warn!(error = %err, "Query embedding failed. Ordering by recency.");

				None
			},
		}
	}

	async fn retrieve(
		&self,
		predicate: &CompiledPredicate,
		query_embedding: Option<&[f32]>,
	) -> Vec<IndexedRecord> {
		let limit = self.cfg.search.max_results;

		match queries::search_records(&self.db, predicate, query_embedding, limit).await {
			Ok(records) => records,
			Err(err) => {
				tracing::error!(
					error = ?err,
					where_sql = %predicate.where_sql(),
					vector = query_embedding.is_some(),
					"Retrieval failed. Returning no results."
				);

				Vec::new()
			},
		}
	}
}

/// Paginates the ranked set and wraps it in the response envelope.
pub fn format_response(
	records: Vec<IndexedRecord>,
	intent: SearchIntent,
	query: &str,
	page: Page,
	started_at: Instant,
) -> SearchResponse {
	let total_count = records.len() as u64;
	let results = page.slice(records).into_iter().map(SearchResult::from).collect();

	SearchResponse {
		query: query.to_string(),
		intent,
		results,
		total_count,
		duration_ms: started_at.elapsed().as_millis() as u64,
	}
}

fn log_skipped_amount(intent: &SearchIntent) {
	if let Some(expr) = intent.amount_filter.as_deref()
		&& compile::parse_amount_filter(expr).is_none()
	{
		tracing::debug!(amount_filter = expr, "Amount filter is not comparator+integer. Skipped.");
	}
}
