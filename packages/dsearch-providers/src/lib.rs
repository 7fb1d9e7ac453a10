pub mod graph;
pub mod index;
pub mod token;

mod error;

pub use error::{Error, Result};
pub use graph::{DriveClient, DriveItem};
pub use index::FileIndex;
pub use token::{AccessToken, ConfigTokenSource};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

pub fn auth_headers(token: &AccessToken) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	let mut value = HeaderValue::from_str(&format!("Bearer {}", token.secret()))?;

	value.set_sensitive(true);
	headers.insert(AUTHORIZATION, value);

	Ok(headers)
}
