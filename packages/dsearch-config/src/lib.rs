mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Auth, Config, Drive, LocalIndex, ProviderChoice, Search, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

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
	if cfg.drive.api_base.trim().is_empty() {
		return Err(Error::Validation { message: "drive.api_base must be non-empty.".to_string() });
	}
	if !cfg.drive.base_directory.starts_with('/') {
		return Err(Error::Validation {
			message: "drive.base_directory must start with '/'.".to_string(),
		});
	}
	if cfg.drive.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "drive.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.auth.access_token.is_none() && cfg.auth.access_token_env.is_none() {
		return Err(Error::Validation {
			message: "auth.access_token or auth.access_token_env must be set.".to_string(),
		});
	}
	if cfg.search.max_items == 0 {
		return Err(Error::Validation {
			message: "search.max_items must be greater than zero.".to_string(),
		});
	}
	if cfg.search.fetch_concurrency == 0 {
		return Err(Error::Validation {
			message: "search.fetch_concurrency must be greater than zero.".to_string(),
		});
	}

	if let Some(max) = cfg.search.max_index_results
		&& max == 0
	{
		return Err(Error::Validation {
			message: "search.max_index_results must be greater than zero.".to_string(),
		});
	}

	if cfg.search.provider_choice() == ProviderChoice::LocalIndex
		&& cfg.search.local_index.is_none()
	{
		return Err(Error::Validation {
			message: "search.local_index must be set when the local index provider is selected."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.auth.access_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.auth.access_token = None;
	}
	if cfg.auth.access_token_env.as_deref().map(|name| name.trim().is_empty()).unwrap_or(false) {
		cfg.auth.access_token_env = None;
	}
	if cfg.search.provider.as_deref().map(|provider| provider.trim().is_empty()).unwrap_or(false)
	{
		cfg.search.provider = None;
	}

	let trimmed = cfg.drive.api_base.trim_end_matches('/').len();

	cfg.drive.api_base.truncate(trimmed);
}
