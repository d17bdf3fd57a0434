#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Query exceeded {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}
