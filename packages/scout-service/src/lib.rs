pub mod embed;
pub mod facets;
pub mod health;
pub mod search;
pub mod time_serde;

mod error;

pub use embed::{EmbedRequest, EmbedResponse};
pub use error::{Error, Result};
pub use facets::{FacetValue, FacetsResponse, StatsResponse, TypeCount};
pub use health::HealthResponse;
pub use search::{SearchRequest, SearchResponse, SearchResult};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use scout_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use scout_domain::{intent::SearchIntent, vocabulary};
use scout_providers::{embedding, extractor};
use scout_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns a free-text query into a [`SearchIntent`].
pub trait IntentExtractor
where
	Self: Send + Sync,
{
	fn extract<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<SearchIntent>>;

	/// Model identifier when a language model backs this extractor.
	fn model(&self) -> Option<&str>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

/// Asks the chat model for a JSON intent and normalizes it.
pub struct LlmIntentExtractor {
	cfg: LlmProviderConfig,
	stop_words: Vec<String>,
	system_prompt: String,
}
impl LlmIntentExtractor {
	pub fn new(cfg: LlmProviderConfig, stop_words: Vec<String>) -> Self {
		Self { cfg, stop_words, system_prompt: system_prompt() }
	}

	async fn extract_intent(&self, query: &str) -> Result<SearchIntent> {
		let messages = vec![
			serde_json::json!({ "role": "system", "content": self.system_prompt }),
			serde_json::json!({ "role": "user", "content": query }),
		];
		let raw: Value = extractor::extract(&self.cfg, &messages).await?;
		let intent: SearchIntent = serde_json::from_value(raw).map_err(|err| Error::Provider {
			message: format!("Extractor returned an invalid intent: {err}."),
		})?;

		Ok(intent.normalize(&self.stop_words))
	}
}
impl IntentExtractor for LlmIntentExtractor {
	fn extract<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<SearchIntent>> {
		Box::pin(self.extract_intent(query))
	}

	fn model(&self) -> Option<&str> {
		Some(self.cfg.model.as_str())
	}
}

/// Whitespace tokenization only; used when no model is configured.
pub struct KeywordIntentExtractor;
impl IntentExtractor for KeywordIntentExtractor {
	fn extract<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<SearchIntent>> {
		Box::pin(async move { Ok(SearchIntent::fallback(query)) })
	}

	fn model(&self) -> Option<&str> {
		None
	}
}

pub struct DefaultEmbedding {
	cfg: EmbeddingProviderConfig,
}
impl DefaultEmbedding {
	pub fn new(cfg: EmbeddingProviderConfig) -> Self {
		Self { cfg }
	}
}
impl EmbeddingProvider for DefaultEmbedding {
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(&self.cfg, texts).await?) })
	}
}

#[derive(Clone)]
pub struct Providers {
	pub extractor: Arc<dyn IntentExtractor>,
	/// `None` disables `/embed` and vector ranking.
	pub embedding: Option<Arc<dyn EmbeddingProvider>>,
}
impl Providers {
	pub fn new(
		extractor: Arc<dyn IntentExtractor>,
		embedding: Option<Arc<dyn EmbeddingProvider>>,
	) -> Self {
		Self { extractor, embedding }
	}

	/// Model-backed extraction and embeddings wherever an API key is configured.
	pub fn from_config(cfg: &Config) -> Self {
		let extractor: Arc<dyn IntentExtractor> = match cfg.providers.llm.api_key {
			Some(_) => Arc::new(LlmIntentExtractor::new(
				cfg.providers.llm.clone(),
				cfg.search.stop_words.clone(),
			)),
			None => Arc::new(KeywordIntentExtractor),
		};
		let embedding: Option<Arc<dyn EmbeddingProvider>> =
			cfg.providers.embedding.api_key.as_ref().map(|_| {
				Arc::new(DefaultEmbedding::new(cfg.providers.embedding.clone()))
					as Arc<dyn EmbeddingProvider>
			});

		Self { extractor, embedding }
	}
}

pub struct ScoutService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl ScoutService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let providers = Providers::from_config(&cfg);

		Self { cfg, db, providers }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}

fn system_prompt() -> String {
	format!(
		"\
You convert business search queries (Indonesian or English) into a JSON search intent.
Respond with one JSON object and nothing else, using exactly these keys:
- \"entity_types\": list of object types the query asks for, or [].
- \"entity_type\": the single object type when exactly one applies, otherwise null.
- \"keywords\": content words to match in titles and descriptions, without filler words.
- \"status_filter\": a status, or null.
- \"department_filter\": a department, or null.
- \"owner_filter\": a person's name, or null.
- \"amount_filter\": a comparator followed by an integer such as \">50000000\", or null.
Do not repeat words already captured by a filter in \"keywords\".

{}",
		vocabulary::prompt_vocabulary()
	)
}
