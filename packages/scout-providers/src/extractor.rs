use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Sends one chat-completion request and returns the JSON object found in the reply.
pub async fn extract(cfg: &scout_config::LlmProviderConfig, messages: &[Value]) -> Result<Value> {
	let api_key = crate::require_api_key(&cfg.provider_id, cfg.api_key.as_deref())?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"response_format": { "type": "json_object" },
		"messages": messages,
	});
	let res = client
		.post(crate::endpoint(&cfg.api_base, &cfg.path))
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	tracing::debug!(provider_id = %cfg.provider_id, model = %cfg.model, "Extractor replied.");

	parse_extractor_json(json)
}

/// Removes a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````), if any.
pub fn strip_code_fence(content: &str) -> &str {
	let trimmed = content.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let body = match rest.find('\n') {
		Some(index) => &rest[index + 1..],
		None => rest.trim_start_matches(|ch: char| ch.is_ascii_alphanumeric()),
	};
	let body = body.trim_end();

	body.strip_suffix("```").unwrap_or(body).trim()
}

fn parse_extractor_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		let parsed: Value = serde_json::from_str(strip_code_fence(content))?;

		if !parsed.is_object() {
			return Err(Error::InvalidResponse {
				message: "Extractor content is not a JSON object.".to_string(),
			});
		}

		return Ok(parsed);
	}

	Err(Error::InvalidResponse {
		message: "Extractor response is missing message content.".to_string(),
	})
}
