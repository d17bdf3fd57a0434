use serde::{Deserialize, Serialize};

use crate::{Error, Result, ScoutService};

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedRequest {
	pub texts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedResponse {
	pub embeddings: Vec<Vec<f32>>,
}

impl ScoutService {
	/// One vector per input text, in input order.
	pub async fn embed(&self, req: EmbedRequest) -> Result<EmbedResponse> {
		let Some(provider) = self.providers.embedding.as_ref() else {
			return Err(Error::EmbeddingsUnavailable);
		};

		if req.texts.is_empty() {
			return Ok(EmbedResponse { embeddings: Vec::new() });
		}

		let embeddings = provider.embed(&req.texts).await?;

		if embeddings.len() != req.texts.len() {
			return Err(Error::Provider {
				message: format!(
					"Embedding provider returned {} vectors for {} texts.",
					embeddings.len(),
					req.texts.len()
				),
			});
		}

		tracing::debug!(count = embeddings.len(), "Embed request served.");

		Ok(EmbedResponse { embeddings })
	}
}
