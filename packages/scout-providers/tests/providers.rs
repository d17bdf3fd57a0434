use std::net::SocketAddr;

use axum::{Json, Router, http::HeaderMap, routing::post};
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use scout_config::{EmbeddingProviderConfig, LlmProviderConfig};

async fn serve(router: Router) -> SocketAddr {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock provider.");
	let addr = listener.local_addr().expect("Failed to read mock provider address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, router).await;
	});

	addr
}

fn embedding_config(addr: SocketAddr) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "mock".to_string(),
		api_base: format!("http://{addr}/v1/"),
		api_key: Some("secret".to_string()),
		path: "/embeddings".to_string(),
		model: "mock-embed".to_string(),
		dimensions: 3,
		timeout_ms: 2_000,
		default_headers: Map::new(),
	}
}

fn llm_config(addr: SocketAddr) -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "mock".to_string(),
		api_base: format!("http://{addr}/v1"),
		api_key: Some("secret".to_string()),
		path: "chat/completions".to_string(),
		model: "mock-chat".to_string(),
		temperature: 0.0,
		timeout_ms: 2_000,
		default_headers: Map::new(),
	}
}

/// Answers with one vector per input, `[len, position, 1.0]`, listed in reverse order.
async fn mock_embeddings(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
	assert_eq!(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()), Some("Bearer secret"));

	let inputs = body["input"].as_array().cloned().unwrap_or_default();
	let mut data: Vec<Value> = inputs
		.iter()
		.enumerate()
		.map(|(index, text)| {
			let len = text.as_str().map(str::len).unwrap_or_default();

			serde_json::json!({ "index": index, "embedding": [len as f64, index as f64, 1.0] })
		})
		.collect();

	data.reverse();

	Json(serde_json::json!({ "data": data }))
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		scout_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_header() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	assert!(scout_providers::auth_headers("secret", &defaults).is_err());
}

#[tokio::test]
async fn embeds_in_input_order() {
	let addr = serve(Router::new().route("/v1/embeddings", post(mock_embeddings))).await;
	let cfg = embedding_config(addr);
	let texts = vec!["a".to_string(), "bb".to_string()];
	let first = scout_providers::embedding::embed(&cfg, &texts).await.expect("embed failed");
	let second = scout_providers::embedding::embed(&cfg, &texts).await.expect("embed failed");

	assert_eq!(first, vec![vec![1.0, 0.0, 1.0], vec![2.0, 1.0, 1.0]]);
	assert_eq!(
		first.iter().map(Vec::len).collect::<Vec<_>>(),
		second.iter().map(Vec::len).collect::<Vec<_>>()
	);
}

#[tokio::test]
async fn embedding_count_mismatch_is_an_error() {
	let router = Router::new().route(
		"/v1/embeddings",
		post(|| async { Json(serde_json::json!({ "data": [{ "index": 0, "embedding": [1.0] }] })) }),
	);
	let addr = serve(router).await;
	let texts = vec!["a".to_string(), "b".to_string()];
	let err = scout_providers::embedding::embed(&embedding_config(addr), &texts)
		.await
		.expect_err("expected count mismatch");

	assert!(matches!(err, scout_providers::Error::InvalidResponse { .. }));
}

#[tokio::test]
async fn extracts_fenced_json_from_chat_completion() {
	let router = Router::new().route(
		"/v1/chat/completions",
		post(|Json(body): Json<Value>| async move {
			assert_eq!(body["response_format"]["type"], "json_object");
			assert_eq!(body["messages"][1]["content"], "laptop tertunda");

			Json(serde_json::json!({
				"choices": [{
					"message": {
						"content": "```json\n{\"keywords\": [\"laptop\"], \"status_filter\": \"pending\"}\n```"
					}
				}]
			}))
		}),
	);
	let addr = serve(router).await;
	let messages = vec![
		serde_json::json!({ "role": "system", "content": "Extract intent." }),
		serde_json::json!({ "role": "user", "content": "laptop tertunda" }),
	];
	let parsed = scout_providers::extractor::extract(&llm_config(addr), &messages)
		.await
		.expect("extract failed");

	assert_eq!(parsed["keywords"][0], "laptop");
	assert_eq!(parsed["status_filter"], "pending");
}

#[tokio::test]
async fn upstream_error_status_is_an_error() {
	let router = Router::new().route(
		"/v1/chat/completions",
		post(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down") }),
	);
	let addr = serve(router).await;
	let result = scout_providers::extractor::extract(&llm_config(addr), &[]).await;

	assert!(matches!(result, Err(scout_providers::Error::Reqwest(_))));
}
