use std::{fmt, path::PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub drive: Drive,
	pub auth: Auth,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Drive {
	/// Drive API root, e.g. "https://graph.microsoft.com/v1.0/me/drive".
	pub api_base: String,
	/// Directory the remote search is scoped to. "/" searches the whole drive.
	#[serde(default = "default_base_directory")]
	pub base_directory: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Auth {
	pub access_token: Option<String>,
	/// Read on every request so an external refresher can rotate the token.
	pub access_token_env: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub provider: Option<String>,
	pub max_items: u32,
	#[serde(default = "default_fetch_concurrency")]
	pub fetch_concurrency: usize,
	pub max_index_results: Option<usize>,
	pub local_index: Option<LocalIndex>,
}
impl Search {
	pub fn provider_choice(&self) -> ProviderChoice {
		ProviderChoice::parse(self.provider.as_deref())
	}
}

#[derive(Debug, Deserialize)]
pub struct LocalIndex {
	pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChoice {
	Remote,
	LocalIndex,
	Unknown(String),
}
impl ProviderChoice {
	/// An unset provider falls back to the drive's own search endpoint.
	pub fn parse(raw: Option<&str>) -> Self {
		match raw.map(str::trim) {
			None | Some("od") | Some("remote") => Self::Remote,
			Some("lua") | Some("local_index") => Self::LocalIndex,
			Some(other) => Self::Unknown(other.to_string()),
		}
	}
}
impl fmt::Display for ProviderChoice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Remote => f.write_str("remote"),
			Self::LocalIndex => f.write_str("local_index"),
			Self::Unknown(raw) => write!(f, "unknown({raw})"),
		}
	}
}

fn default_base_directory() -> String {
	"/".to_string()
}

fn default_fetch_concurrency() -> usize {
	8
}
