use std::path::PathBuf;

use serde_json::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Drive API responded with status {status}.")]
	Upstream { status: u16, body: Value },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("{message}")]
	MissingToken { message: String },
	#[error("Failed to read search index at {path:?}.")]
	ReadIndex { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse search index at {path:?}.")]
	ParseIndex { path: PathBuf, source: serde_json::Error },
}
impl Error {
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Reqwest(err) if err.is_timeout())
	}
}
