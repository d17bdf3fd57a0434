use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use scout_config::{DEFAULT_STOP_WORDS, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(edit: impl FnOnce(&mut toml::Table)) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	edit(root);

	toml::to_string(&value).expect("Failed to render sample config.")
}

fn table<'a>(root: &'a mut toml::Table, path: &[&str]) -> &'a mut toml::Table {
	let mut current = root;

	for key in path {
		current = current
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{key}]."));
	}

	current
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("scout_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn validation_message(result: scout_config::Result<scout_config::Config>) -> String {
	match result {
		Err(Error::Validation { message }) => message,
		Err(other) => panic!("Expected validation error, got {other:?}."),
		Ok(_) => panic!("Expected validation error, got a valid config."),
	}
}

#[test]
fn loads_sample_config_from_disk() {
	let path = write_temp_config(SAMPLE_CONFIG_TOML.to_string());
	let result = scout_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Sample config should load.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8000");
	assert_eq!(cfg.storage.postgres.vector_dim, 768);
	assert_eq!(cfg.providers.llm.api_key.as_deref(), Some("llm-key"));
	assert_eq!(cfg.search.max_results, 100);
}

#[test]
fn missing_file_is_a_read_error() {
	let path = env::temp_dir().join("scout_config_test_missing_file.toml");
	let err = scout_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_file_reports_its_path() {
	let path = write_temp_config("[service\nhttp_bind = 1".to_string());
	let result = scout_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	match result {
		Err(Error::ParseConfig { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("Expected parse error, got {other:?}."),
	}
}

#[test]
fn blank_api_keys_mean_provider_unavailable() {
	let payload = sample_with(|root| {
		table(root, &["providers", "llm"]).insert("api_key".to_string(), Value::from("   "));
		table(root, &["providers", "embedding"]).remove("api_key");
	});
	let cfg = scout_config::parse(&payload).expect("Blank keys must not fail validation.");

	assert!(cfg.providers.llm.api_key.is_none());
	assert!(cfg.providers.embedding.api_key.is_none());
}

#[test]
fn stop_words_are_normalized() {
	let cfg = scout_config::parse(SAMPLE_CONFIG_TOML).expect("Sample config should parse.");

	assert_eq!(cfg.search.stop_words, vec!["all", "tampilkan", "untuk", "yang"]);
}

#[test]
fn full_width_stop_words_fold_to_ascii() {
	let payload = sample_with(|root| {
		let words = vec![Value::from("ＹＡＮＧ"), Value::from(" Ｕｎｔｕｋ ")];

		table(root, &["search"]).insert("stop_words".to_string(), Value::from(words));
	});
	let cfg = scout_config::parse(&payload).expect("Config should parse.");

	assert_eq!(cfg.search.stop_words, vec!["untuk", "yang"]);
}

#[test]
fn search_section_defaults_when_absent() {
	let payload = sample_with(|root| {
		root.remove("search");
	});
	let cfg = scout_config::parse(&payload).expect("Config without [search] should parse.");

	assert_eq!(cfg.search.default_page_size, 20);
	assert_eq!(cfg.search.max_page_size, 100);
	assert_eq!(cfg.search.stop_words.len(), {
		let mut words: Vec<&str> = DEFAULT_STOP_WORDS.to_vec();

		words.sort();
		words.dedup();
		words.len()
	});
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let payload = sample_with(|root| {
		table(root, &["providers", "embedding"]).insert("dimensions".to_string(), Value::from(384));
	});
	let message = validation_message(scout_config::parse(&payload));

	assert!(
		message.contains("providers.embedding.dimensions must match storage.postgres.vector_dim."),
		"Unexpected error message: {message}"
	);
}

#[test]
fn zero_timeouts_are_rejected() {
	let payload = sample_with(|root| {
		table(root, &["storage", "postgres"]).insert("query_timeout_ms".to_string(), Value::from(0));
	});
	let message = validation_message(scout_config::parse(&payload));

	assert_eq!(message, "storage.postgres.query_timeout_ms must be greater than zero.");
}

#[test]
fn default_page_size_must_fit_max_page_size() {
	let payload = sample_with(|root| {
		table(root, &["search"]).insert("default_page_size".to_string(), Value::from(500));
	});
	let message = validation_message(scout_config::parse(&payload));

	assert!(message.starts_with("search.default_page_size"), "Unexpected error message: {message}");
}

#[test]
fn temperature_out_of_range_is_rejected() {
	let payload = sample_with(|root| {
		table(root, &["providers", "llm"]).insert("temperature".to_string(), Value::from(3.5));
	});
	let message = validation_message(scout_config::parse(&payload));

	assert_eq!(message, "providers.llm.temperature must be in the range 0.0-2.0.");
}

#[test]
fn non_string_default_headers_are_rejected() {
	let payload = sample_with(|root| {
		let mut headers = toml::Table::new();

		headers.insert("x-retries".to_string(), Value::from(3));
		table(root, &["providers", "embedding"])
			.insert("default_headers".to_string(), Value::Table(headers));
	});
	let message = validation_message(scout_config::parse(&payload));

	assert_eq!(message, "providers.embedding.default_headers values must be strings.");
}
