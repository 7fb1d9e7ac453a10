pub mod sanitize;
pub mod search;

mod error;

pub use dsearch_providers::{AccessToken, DriveItem};
pub use error::{Error, Result};
pub use sanitize::{SanitizedQuery, sanitize};
pub use search::{LocalIndexSearch, QueryText, RemoteSearch, SearchQuery, SearchStrategy};

use std::{future::Future, pin::Pin, sync::Arc};

use dsearch_config::{Config, ProviderChoice};
use dsearch_providers::{ConfigTokenSource, DriveClient, FileIndex};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait TokenProvider
where
	Self: Send + Sync,
{
	fn access_token(&self) -> BoxFuture<'_, Result<AccessToken>>;
}

pub trait DriveProvider
where
	Self: Send + Sync,
{
	fn search_drive<'a>(
		&'a self,
		token: &'a AccessToken,
		sanitized: &'a str,
		top: u32,
	) -> BoxFuture<'a, Result<Vec<DriveItem>>>;

	fn fetch_item<'a>(
		&'a self,
		token: &'a AccessToken,
		id: &'a str,
	) -> BoxFuture<'a, Result<DriveItem>>;
}

pub trait IndexProvider
where
	Self: Send + Sync,
{
	/// Candidate item ids for the raw query, best match first.
	fn lookup<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub token: Arc<dyn TokenProvider>,
	pub drive: Arc<dyn DriveProvider>,
	pub index: Option<Arc<dyn IndexProvider>>,
}
impl Providers {
	pub fn new(
		token: Arc<dyn TokenProvider>,
		drive: Arc<dyn DriveProvider>,
		index: Option<Arc<dyn IndexProvider>>,
	) -> Self {
		Self { token, drive, index }
	}

	/// Builds the default collaborators. The local index is only loaded when it is selected.
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let token = Arc::new(ConfigTokenSource::new(&cfg.auth));
		let drive = Arc::new(DriveClient::new(&cfg.drive)?);
		let index = match (cfg.search.provider_choice(), cfg.search.local_index.as_ref()) {
			(ProviderChoice::LocalIndex, Some(local)) => {
				Some(Arc::new(FileIndex::load(&local.path)?) as Arc<dyn IndexProvider>)
			},
			_ => None,
		};

		Ok(Self { token, drive, index })
	}
}

pub struct SearchService {
	pub provider: ProviderChoice,
	token: Arc<dyn TokenProvider>,
	strategy: Option<Box<dyn SearchStrategy>>,
}
impl SearchService {
	pub fn new(cfg: &dsearch_config::Search, providers: Providers) -> Result<Self> {
		let provider = cfg.provider_choice();
		let strategy: Option<Box<dyn SearchStrategy>> = match &provider {
			ProviderChoice::Remote => {
				Some(Box::new(RemoteSearch::new(providers.drive, cfg.max_items)))
			},
			ProviderChoice::LocalIndex => {
				let index = providers.index.ok_or_else(|| Error::Config {
					message: "The local index provider is selected but no index is available."
						.to_string(),
				})?;

				Some(Box::new(LocalIndexSearch::new(
					providers.drive,
					index,
					cfg.fetch_concurrency,
					cfg.max_index_results,
				)))
			},
			ProviderChoice::Unknown(raw) => {
				tracing::warn!(
					provider = %raw,
					"Unknown search provider configured. Searches will fail."
				);

				None
			},
		};

		Ok(Self { provider, token: providers.token, strategy })
	}

	pub async fn search(&self, query: SearchQuery) -> Result<Vec<DriveItem>> {
		let SearchQuery::Text(raw) = query else {
			return Ok(Vec::new());
		};
		let Some(strategy) = self.strategy.as_deref() else {
			return Err(Error::UnknownProvider);
		};
		let sanitized = sanitize(&raw);
		let token = self.token.access_token().await?;
		let items = strategy.search(QueryText { raw: &raw, sanitized: &sanitized }, &token).await?;

		tracing::debug!(provider = strategy.name(), items = items.len(), "Search completed.");

		Ok(items)
	}
}

impl TokenProvider for ConfigTokenSource {
	fn access_token(&self) -> BoxFuture<'_, Result<AccessToken>> {
		let token = self.resolve().map_err(Error::from);

		Box::pin(async move { token })
	}
}

impl DriveProvider for DriveClient {
	fn search_drive<'a>(
		&'a self,
		token: &'a AccessToken,
		sanitized: &'a str,
		top: u32,
	) -> BoxFuture<'a, Result<Vec<DriveItem>>> {
		Box::pin(async move { Ok(self.search(token, sanitized, top).await?) })
	}

	fn fetch_item<'a>(
		&'a self,
		token: &'a AccessToken,
		id: &'a str,
	) -> BoxFuture<'a, Result<DriveItem>> {
		Box::pin(async move { Ok(self.get_item(token, id).await?) })
	}
}

impl IndexProvider for FileIndex {
	fn lookup<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		let ids = self.search(query);

		Box::pin(async move { Ok(ids) })
	}
}
