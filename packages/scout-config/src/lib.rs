mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DEFAULT_STOP_WORDS, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers,
	Search, Service, Storage,
};

use std::{fs, path::Path};

use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes, and validates a config document that is already in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("storage.postgres.acquire_timeout_ms", cfg.storage.postgres.acquire_timeout_ms),
		("storage.postgres.query_timeout_ms", cfg.storage.postgres.query_timeout_ms),
		("providers.llm.timeout_ms", cfg.providers.llm.timeout_ms),
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
	] {
		if value == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.postgres.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.postgres.vector_dim."
				.to_string(),
		});
	}
	if !cfg.providers.llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&cfg.providers.llm.temperature) {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}

	for (label, headers) in [
		("providers.llm.default_headers", &cfg.providers.llm.default_headers),
		("providers.embedding.default_headers", &cfg.providers.embedding.default_headers),
	] {
		if !header_values_are_strings(headers) {
			return Err(Error::Validation { message: format!("{label} values must be strings.") });
		}
	}

	if cfg.search.max_page_size == 0 {
		return Err(Error::Validation {
			message: "search.max_page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_page_size == 0 || cfg.search.default_page_size > cfg.search.max_page_size
	{
		return Err(Error::Validation {
			message: "search.default_page_size must be between 1 and search.max_page_size."
				.to_string(),
		});
	}
	if cfg.search.max_results == 0 {
		return Err(Error::Validation {
			message: "search.max_results must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.llm.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.llm.api_key = None;
	}
	if cfg.providers.embedding.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false)
	{
		cfg.providers.embedding.api_key = None;
	}

	let mut stop_words: Vec<String> = cfg
		.search
		.stop_words
		.iter()
		.map(|word| word.trim().nfkc().collect::<String>().to_lowercase())
		.filter(|word| !word.is_empty())
		.collect();

	stop_words.sort();
	stop_words.dedup();

	cfg.search.stop_words = stop_words;
}

fn header_values_are_strings(headers: &Map<String, Value>) -> bool {
	headers.values().all(Value::is_string)
}
