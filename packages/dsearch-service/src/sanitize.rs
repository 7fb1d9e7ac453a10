use std::fmt;

/// Query text that is safe to interpolate into a drive API URL segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedQuery(String);
impl SanitizedQuery {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl fmt::Display for SanitizedQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Replaces everything outside `[A-Za-z0-9]` with spaces, then percent-encodes the result.
///
/// A replaced char yields one space per UTF-16 code unit, so characters outside the Basic
/// Multilingual Plane become two spaces.
pub fn sanitize(raw: &str) -> SanitizedQuery {
	let mut spaced = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if ch.is_ascii_alphanumeric() {
			spaced.push(ch);
		} else {
			spaced.extend(std::iter::repeat_n(' ', ch.len_utf16()));
		}
	}

	SanitizedQuery(urlencoding::encode(&spaced).into_owned())
}
