use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{AccessToken, Error, Result};

/// Field projection requested for every item, whichever search path produced it.
pub const SELECT_FIELDS: &str = "id,name,file,folder,parentReference";

/// A drive item as the API returned it. Absent fields stay absent and an explicit `null` is
/// kept as `Some(Value::Null)`, so re-serializing reproduces the upstream JSON. A missing `name`
/// reads as empty and is omitted again on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveItem {
	pub id: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub name: String,
	#[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
	pub file: Option<Value>,
	#[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
	pub folder: Option<Value>,
	#[serde(
		default,
		rename = "parentReference",
		deserialize_with = "present",
		skip_serializing_if = "Option::is_none"
	)]
	pub parent_reference: Option<Value>,
	/// Anything else the drive returns, passed through untouched.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
	D: Deserializer<'de>,
{
	Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct SearchPage {
	value: Vec<DriveItem>,
}

#[derive(Debug, Clone)]
pub struct DriveClient {
	client: Client,
	api_base: String,
	search_scope: String,
}
impl DriveClient {
	pub fn new(cfg: &dsearch_config::Drive) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self {
			client,
			api_base: cfg.api_base.clone(),
			search_scope: search_scope(&cfg.base_directory),
		})
	}

	/// Searches below the configured base directory. `sanitized` must already be URL-safe.
	pub async fn search(
		&self,
		token: &AccessToken,
		sanitized: &str,
		top: u32,
	) -> Result<Vec<DriveItem>> {
		let url = format!("{}/root{}/search(q='{sanitized}')", self.api_base, self.search_scope);
		let top = top.to_string();
		let res = self
			.client
			.get(url)
			.headers(crate::auth_headers(token)?)
			.query(&[("select", SELECT_FIELDS), ("top", top.as_str())])
			.send()
			.await?;
		let page: SearchPage = check_status(res).await?.json().await?;

		Ok(page.value)
	}

	pub async fn get_item(&self, token: &AccessToken, id: &str) -> Result<DriveItem> {
		if id.is_empty() {
			return Err(Error::InvalidResponse { message: "Item id must be non-empty.".to_string() });
		}

		let url = format!("{}/items/{}", self.api_base, urlencoding::encode(id));
		let res = self
			.client
			.get(url)
			.headers(crate::auth_headers(token)?)
			.query(&[("select", SELECT_FIELDS)])
			.send()
			.await?;

		Ok(check_status(res).await?.json().await?)
	}
}

/// Drive-relative path of `path` under `base_directory`, encoded as a `:<path>` address
/// segment. The drive root encodes to an empty string.
pub fn encode_path(base_directory: &str, path: &str) -> String {
	let joined = base_directory
		.split('/')
		.chain(path.split('/'))
		.filter(|segment| !segment.is_empty() && *segment != ".")
		.collect::<Vec<_>>()
		.join("/");

	if joined.is_empty() {
		return String::new();
	}

	format!(":{}", urlencoding::encode(&format!("/{joined}")))
}

fn search_scope(base_directory: &str) -> String {
	let encoded = encode_path(base_directory, "/");

	if encoded.is_empty() { encoded } else { format!("{encoded}:") }
}

async fn check_status(res: Response) -> Result<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let text = res.text().await?;
	let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

	tracing::debug!(status = status.as_u16(), "Drive API request failed.");

	Err(Error::Upstream { status: status.as_u16(), body })
}
