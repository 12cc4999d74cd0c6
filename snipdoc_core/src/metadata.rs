use std::collections::BTreeMap;
use std::fmt;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

/// The line that opens and closes a metadata block.
pub const METADATA_MARKER: &str = "---";

/// A typed metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
	Text(String),
	Bool(bool),
	Int(i64),
	/// A comma separated value, trimmed, with empty items removed.
	List(Vec<String>),
}

impl MetaValue {
	/// Coerce a raw value string.
	///
	/// A comma makes a list. Otherwise `true`/`false` in any case become
	/// booleans, an all-digit value becomes an integer and anything else is
	/// text with one pair of matching quotes removed.
	pub fn coerce(raw: &str) -> Self {
		let raw = raw.trim();

		if raw.contains(',') {
			return Self::List(
				raw.split(',')
					.map(str::trim)
					.filter(|item| !item.is_empty())
					.map(String::from)
					.collect(),
			);
		}

		if raw.eq_ignore_ascii_case("true") {
			return Self::Bool(true);
		}

		if raw.eq_ignore_ascii_case("false") {
			return Self::Bool(false);
		}

		if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
			if let Ok(number) = raw.parse::<i64>() {
				return Self::Int(number);
			}
		}

		Self::Text(unquote(raw).to_string())
	}

	/// Whether the value counts as set in an `if` test.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Text(text) => !text.is_empty(),
			Self::Bool(value) => *value,
			Self::Int(_) => true,
			Self::List(items) => !items.is_empty(),
		}
	}
}

impl fmt::Display for MetaValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Bool(value) => write!(f, "{value}"),
			Self::Int(value) => write!(f, "{value}"),
			Self::List(items) => f.write_str(&items.join(", ")),
		}
	}
}

fn unquote(value: &str) -> &str {
	for quote in ['"', '\''] {
		if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
			return &value[1..value.len() - 1];
		}
	}

	value
}

/// A document's metadata keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
	pub fn new() -> Self {
		Self::default()
	}
}

impl FromIterator<(String, MetaValue)> for Metadata {
	fn from_iter<T: IntoIterator<Item = (String, MetaValue)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Split a leading metadata block off `source`.
///
/// The block opens with a `---` line that is the first non-blank line and
/// ends at the next `---` line. Returns the parsed metadata and the body that
/// follows the closing marker. Without a complete block the metadata is empty
/// and the body is the whole source.
pub fn extract_metadata(source: &str) -> (Metadata, String) {
	let lines: Vec<&str> = source.lines().collect();
	let Some(open) = lines.iter().position(|line| !line.trim().is_empty()) else {
		return (Metadata::new(), source.to_string());
	};

	if lines[open].trim() != METADATA_MARKER {
		return (Metadata::new(), source.to_string());
	}

	let Some(close) = lines[open + 1..]
		.iter()
		.position(|line| line.trim() == METADATA_MARKER)
		.map(|offset| open + 1 + offset)
	else {
		return (Metadata::new(), source.to_string());
	};

	let metadata = lines[open + 1..close]
		.iter()
		.filter_map(|line| parse_entry(line))
		.collect();
	let body = lines[close + 1..].join("\n");

	(metadata, body)
}

fn parse_entry(line: &str) -> Option<(String, MetaValue)> {
	let line = line.trim();
	if line.is_empty() || line.starts_with('#') {
		return None;
	}

	let (key, value) = line.split_once(':')?;
	let key = key.trim();
	if key.is_empty() {
		return None;
	}

	let value = match value.find('#') {
		Some(comment) => &value[..comment],
		None => value,
	};

	Some((key.to_string(), MetaValue::coerce(value)))
}
