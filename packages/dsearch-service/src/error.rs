use serde_json::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unknown search provider")]
	UnknownProvider,
	#[error("Drive API responded with status {status}.")]
	Upstream { status: u16, body: Value },
	#[error("Token error: {message}")]
	Token { message: String },
	#[error("Index error: {message}")]
	Index { message: String },
	#[error("Transport error: {message}")]
	Transport { message: String, timeout: bool },
	#[error("Invalid configuration: {message}")]
	Config { message: String },
}
impl From<dsearch_providers::Error> for Error {
	fn from(err: dsearch_providers::Error) -> Self {
		use dsearch_providers::Error as ProviderError;

		let timeout = err.is_timeout();

		match err {
			ProviderError::Upstream { status, body } => Self::Upstream { status, body },
			ProviderError::Reqwest(inner) => Self::Transport { timeout, message: inner.to_string() },
			ProviderError::SerdeJson(inner) => {
				Self::Transport { timeout: false, message: inner.to_string() }
			},
			ProviderError::InvalidResponse { message } => Self::Transport { timeout: false, message },
			ProviderError::InvalidHeaderValue(inner) => Self::Token { message: inner.to_string() },
			ProviderError::MissingToken { message } => Self::Token { message },
			err @ (ProviderError::ReadIndex { .. } | ProviderError::ParseIndex { .. }) => {
				Self::Index { message: err.to_string() }
			},
		}
	}
}
