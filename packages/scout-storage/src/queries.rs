use std::{future::Future, time::Duration};

use sqlx::{Postgres, postgres::PgArguments, query::QueryAs};

use scout_domain::compile::{BoundValue, CompiledPredicate};

use crate::{
	Error, Result,
	db::Db,
	models::{FacetCount, Facets, IndexStats, IndexedRecord},
};

const RECORD_COLUMNS: &str = "\
id,
	reference_no,
	object_type,
	title,
	subtitle,
	description,
	status,
	owner_name,
	department,
	amount,
	updated_at";

/// Columns that may be grouped for facets. Names are fixed here and never taken from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetColumn {
	ObjectType,
	Status,
	Department,
	Owner,
}
impl FacetColumn {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::ObjectType => "object_type",
			Self::Status => "status",
			Self::Department => "department",
			Self::Owner => "owner_name",
		}
	}
}

/// Runs the ranked retrieval for a compiled predicate.
///
/// With `query_embedding`, rows without an embedding are skipped and the rest are ordered by
/// cosine distance with `1 - distance` as the score. Without it, rows are ordered by recency and
/// scored `1.0`. Ties fall back to `updated_at DESC, id`.
pub async fn search_records(
	db: &Db,
	predicate: &CompiledPredicate,
	query_embedding: Option<&[f32]>,
	limit: u32,
) -> Result<Vec<IndexedRecord>> {
	if limit == 0 {
		return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
	}

	let sql = render_search_sql(predicate, query_embedding.is_some());
	let mut query = bind_predicate(sqlx::query_as::<_, IndexedRecord>(&sql), predicate);

	if let Some(embedding) = query_embedding {
		query = query.bind(vector_to_pg(embedding));
	}

	let query = query.bind(i64::from(limit));

	with_timeout(db.query_timeout, query.fetch_all(&db.pool)).await
}

pub async fn facet_counts(db: &Db, column: FacetColumn) -> Result<Vec<FacetCount>> {
	let column = column.as_sql();
	let sql = format!(
		"\
SELECT {column} AS value, count(*) AS count
FROM search_index
WHERE {column} IS NOT NULL
GROUP BY {column}
ORDER BY count DESC, value ASC"
	);

	with_timeout(db.query_timeout, sqlx::query_as::<_, FacetCount>(&sql).fetch_all(&db.pool)).await
}

pub async fn facets(db: &Db) -> Result<Facets> {
	Ok(Facets {
		object_type: facet_counts(db, FacetColumn::ObjectType).await?,
		status: facet_counts(db, FacetColumn::Status).await?,
		department: facet_counts(db, FacetColumn::Department).await?,
		owner: facet_counts(db, FacetColumn::Owner).await?,
	})
}

pub async fn index_stats(db: &Db) -> Result<IndexStats> {
	let total_count: i64 = with_timeout(
		db.query_timeout,
		sqlx::query_scalar("SELECT count(*) FROM search_index").fetch_one(&db.pool),
	)
	.await?;
	let by_type = facet_counts(db, FacetColumn::ObjectType).await?;

	Ok(IndexStats { total_count, by_type })
}

/// pgvector text literal, bound as text and cast with `::text::vector`.
pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

fn render_search_sql(predicate: &CompiledPredicate, with_embedding: bool) -> String {
	let filter = predicate.where_sql();
	let next = predicate.next_placeholder();

	if with_embedding {
		let embedding = next;
		let limit = next + 1;

		format!(
			"\
SELECT
	{RECORD_COLUMNS},
	(1 - (embedding <=> ${embedding}::text::vector))::float8 AS relevance_score
FROM search_index
WHERE embedding IS NOT NULL
	AND {filter}
ORDER BY embedding <=> ${embedding}::text::vector ASC, updated_at DESC, id ASC
LIMIT ${limit}"
		)
	} else {
		format!(
			"\
SELECT
	{RECORD_COLUMNS},
	1.0::float8 AS relevance_score
FROM search_index
WHERE {filter}
ORDER BY updated_at DESC, id ASC
LIMIT ${next}"
		)
	}
}

fn bind_predicate<'q, O>(
	mut query: QueryAs<'q, Postgres, O, PgArguments>,
	predicate: &'q CompiledPredicate,
) -> QueryAs<'q, Postgres, O, PgArguments> {
	for param in predicate.params() {
		query = match param {
			BoundValue::Text(value) => query.bind(value.as_str()),
			BoundValue::TextList(values) => query.bind(values.as_slice()),
			BoundValue::Integer(value) => query.bind(*value),
		};
	}

	query
}

async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T>
where
	F: Future<Output = sqlx::Result<T>>,
{
	match tokio::time::timeout(timeout, fut).await {
		Ok(result) => Ok(result?),
		Err(_) => Err(Error::Timeout { timeout_ms: timeout.as_millis() as u64 }),
	}
}

#[cfg(test)]
mod tests {
	use scout_domain::{compile, intent::SearchIntent};

	use super::*;

	#[test]
	fn vector_literal_is_bracketed_and_comma_separated() {
		assert_eq!(vector_to_pg(&[0.5, -1.0, 2.25]), "[0.5,-1,2.25]");
		assert_eq!(vector_to_pg(&[]), "[]");
	}

	#[test]
	fn recency_sql_appends_limit_after_predicate_params() {
		let intent = SearchIntent {
			status_filter: Some("pending".to_string()),
			keywords: vec!["laptop".to_string()],
			..Default::default()
		};
		let sql = render_search_sql(&compile::compile(&intent), false);

		assert!(sql.contains("WHERE status ILIKE $1 AND (title ILIKE $2"));
		assert!(sql.contains("ORDER BY updated_at DESC, id ASC"));
		assert!(sql.ends_with("LIMIT $3"));
		assert!(!sql.contains("<=>"));
	}

	#[test]
	fn vector_sql_binds_embedding_then_limit() {
		let sql = render_search_sql(&compile::compile(&SearchIntent::default()), true);

		assert!(sql.contains("WHERE embedding IS NOT NULL\n\tAND TRUE"));
		assert!(sql.contains("(1 - (embedding <=> $1::text::vector))::float8 AS relevance_score"));
		assert!(sql.contains("ORDER BY embedding <=> $1::text::vector ASC, updated_at DESC, id ASC"));
		assert!(sql.ends_with("LIMIT $2"));
	}

	#[test]
	fn facet_columns_map_to_index_columns() {
		assert_eq!(FacetColumn::Owner.as_sql(), "owner_name");
		assert_eq!(FacetColumn::ObjectType.as_sql(), "object_type");
	}
}
