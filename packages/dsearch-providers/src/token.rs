use std::{env, fmt};

use crate::{Error, Result};

/// Bearer credential for the drive API. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);
impl AccessToken {
	pub fn new(secret: impl Into<String>) -> Self {
		Self(secret.into())
	}

	pub fn secret(&self) -> &str {
		&self.0
	}
}
impl fmt::Debug for AccessToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("AccessToken(<redacted>)")
	}
}

#[derive(Debug, Clone)]
pub struct ConfigTokenSource {
	literal: Option<AccessToken>,
	env_var: Option<String>,
}
impl ConfigTokenSource {
	pub fn new(cfg: &dsearch_config::Auth) -> Self {
		Self {
			literal: cfg.access_token.clone().map(AccessToken::new),
			env_var: cfg.access_token_env.clone(),
		}
	}

	pub fn resolve(&self) -> Result<AccessToken> {
		if let Some(token) = &self.literal {
			return Ok(token.clone());
		}

		let Some(name) = self.env_var.as_deref() else {
			return Err(Error::MissingToken {
				message: "No access token source is configured.".to_string(),
			});
		};

		match env::var(name) {
			Ok(value) if !value.trim().is_empty() => Ok(AccessToken::new(value.trim())),
			_ => Err(Error::MissingToken {
				message: format!("Environment variable {name} does not hold an access token."),
			}),
		}
	}
}
