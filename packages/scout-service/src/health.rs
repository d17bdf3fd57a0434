use serde::Serialize;

use crate::ScoutService;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub llm_available: bool,
	pub embeddings_available: bool,
	pub model: Option<String>,
}

impl ScoutService {
	/// Reports configured capabilities without calling any backend.
	pub fn health(&self) -> HealthResponse {
		let model = self.providers.extractor.model().map(str::to_string);

		HealthResponse {
			status: "healthy",
			llm_available: model.is_some(),
			embeddings_available: self.providers.embedding.is_some(),
			model,
		}
	}
}
