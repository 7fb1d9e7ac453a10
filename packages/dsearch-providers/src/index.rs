use std::{
	collections::{HashMap, HashSet},
	fs,
	path::Path,
};

use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, Result};

/// Read-only view over a pre-built inverted index.
///
/// The file maps lowercase terms to item ids, already in rank order:
///
/// ```json
/// { "terms": { "budget": ["01AB", "01CD"], "2024": ["01CD"] } }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct FileIndex {
	terms: HashMap<String, Vec<String>>,
}
impl FileIndex {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|err| Error::ReadIndex { path: path.to_path_buf(), source: err })?;
		let index: Self = serde_json::from_str(&raw)
			.map_err(|err| Error::ParseIndex { path: path.to_path_buf(), source: err })?;

		tracing::info!(terms = index.terms.len(), "Search index loaded.");

		Ok(index)
	}

	pub fn from_terms(terms: HashMap<String, Vec<String>>) -> Self {
		Self { terms }
	}

	/// Ids matching every word of `query`, ordered by the first word's postings.
	pub fn search(&self, query: &str) -> Vec<String> {
		let lowered = query.to_lowercase();
		let words: Vec<&str> = lowered.unicode_words().collect();
		let Some((first, rest)) = words.split_first() else {
			return Vec::new();
		};
		let Some(candidates) = self.terms.get(*first) else {
			return Vec::new();
		};
		let mut filters = Vec::with_capacity(rest.len());

		for word in rest {
			let Some(postings) = self.terms.get(*word) else {
				return Vec::new();
			};

			filters.push(postings.iter().map(String::as_str).collect::<HashSet<_>>());
		}

		let mut seen = HashSet::new();

		candidates
			.iter()
			.filter(|id| filters.iter().all(|filter| filter.contains(id.as_str())))
			.filter(|id| seen.insert(*id))
			.cloned()
			.collect()
	}
}
