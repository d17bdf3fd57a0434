use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
	#[serde(default = "default_query_timeout_ms")]
	pub query_timeout_ms: u64,
	/// Dimension of the `search_index.embedding` column.
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Absent or blank means the model is unavailable and intent extraction uses keywords only.
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	#[serde(default)]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Absent or blank disables `/embed` and vector ranking.
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_page_size: u32,
	pub max_page_size: u32,
	/// Upper bound on the ranked set fetched from the index before pagination.
	pub max_results: u32,
	pub stop_words: Vec<String>,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_page_size: 20,
			max_page_size: 100,
			max_results: 100,
			stop_words: DEFAULT_STOP_WORDS.iter().map(|word| word.to_string()).collect(),
		}
	}
}

/// Filler words that never make useful keyword filters, in both supported query languages.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
	"yang", "untuk", "dan", "semua", "tampilkan", "nilai", "diatas", "dibawah", "di", "ke", "dari",
	"dengan", "atau", "ada", "cari", "carikan", "lihat", "the", "a", "an", "all", "show",
	"find", "list", "value", "above", "below", "with", "for", "and", "or", "of", "in", "me", "my",
];

fn default_log_level() -> String {
	"info".to_string()
}

fn default_acquire_timeout_ms() -> u64 {
	3_000
}

fn default_query_timeout_ms() -> u64 {
	5_000
}
