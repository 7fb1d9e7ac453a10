use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};

use crate::{
	AccessToken, BoxFuture, DriveItem, DriveProvider, IndexProvider, Result, SanitizedQuery,
};

/// The `q` parameter as the caller sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
	Missing,
	Text(String),
	/// Sent more than once, so it is not a single string.
	Malformed,
}
impl SearchQuery {
	pub fn from_values<I>(values: I) -> Self
	where
		I: IntoIterator<Item = String>,
	{
		let mut values = values.into_iter();

		match (values.next(), values.next()) {
			(None, _) => Self::Missing,
			(Some(value), None) => Self::Text(value),
			(Some(_), Some(_)) => Self::Malformed,
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct QueryText<'a> {
	pub raw: &'a str,
	pub sanitized: &'a SanitizedQuery,
}

pub trait SearchStrategy
where
	Self: Send + Sync,
{
	fn name(&self) -> &'static str;

	fn search<'a>(
		&'a self,
		query: QueryText<'a>,
		token: &'a AccessToken,
	) -> BoxFuture<'a, Result<Vec<DriveItem>>>;
}

/// One call to the drive's own search endpoint; its results are returned as-is.
pub struct RemoteSearch {
	drive: Arc<dyn DriveProvider>,
	max_items: u32,
}
impl RemoteSearch {
	pub fn new(drive: Arc<dyn DriveProvider>, max_items: u32) -> Self {
		Self { drive, max_items }
	}
}
impl SearchStrategy for RemoteSearch {
	fn name(&self) -> &'static str {
		"remote"
	}

	fn search<'a>(
		&'a self,
		query: QueryText<'a>,
		token: &'a AccessToken,
	) -> BoxFuture<'a, Result<Vec<DriveItem>>> {
		self.drive.search_drive(token, query.sanitized.as_str(), self.max_items)
	}
}

/// Looks ids up in the local index, then fetches each item from the drive.
///
/// The first fetch to fail, in completion order, fails the whole search and drops the fetches
/// still in flight. Results keep the index order regardless of which fetch finishes first.
pub struct LocalIndexSearch {
	drive: Arc<dyn DriveProvider>,
	index: Arc<dyn IndexProvider>,
	concurrency: usize,
	max_results: Option<usize>,
}
impl LocalIndexSearch {
	pub fn new(
		drive: Arc<dyn DriveProvider>,
		index: Arc<dyn IndexProvider>,
		concurrency: usize,
		max_results: Option<usize>,
	) -> Self {
		Self { drive, index, concurrency: concurrency.max(1), max_results }
	}
}
impl SearchStrategy for LocalIndexSearch {
	fn name(&self) -> &'static str {
		"local_index"
	}

	fn search<'a>(
		&'a self,
		query: QueryText<'a>,
		token: &'a AccessToken,
	) -> BoxFuture<'a, Result<Vec<DriveItem>>> {
		Box::pin(async move {
			// The index does its own matching, so it gets the unsanitized text.
			let mut ids = self.index.lookup(query.raw).await?;

			if let Some(max) = self.max_results {
				ids.truncate(max);
			}

			tracing::debug!(candidates = ids.len(), "Resolving local index candidates.");

			let fetches: Vec<BoxFuture<'_, Result<(usize, DriveItem)>>> = ids
				.iter()
				.enumerate()
				.map(|(idx, id)| {
					let fetch = self.drive.fetch_item(token, id);
					let indexed: BoxFuture<'_, Result<(usize, DriveItem)>> =
						Box::pin(async move { fetch.await.map(|item| (idx, item)) });

					indexed
				})
				.collect();
			let mut fetched: Vec<(usize, DriveItem)> =
				stream::iter(fetches).buffer_unordered(self.concurrency).try_collect().await?;

			fetched.sort_by_key(|(idx, _)| *idx);

			Ok(fetched.into_iter().map(|(_, item)| item).collect())
		})
	}
}
