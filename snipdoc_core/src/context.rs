use std::collections::BTreeMap;
use std::path::PathBuf;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

use crate::config::SnipConfig;
use crate::metadata::Metadata;
use crate::variables::PlaceholderSyntax;
use crate::variables::Variables;

/// Named line blocks. Registering a name again replaces the earlier block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct Registry(BTreeMap<String, Vec<String>>);

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, name: &str, lines: Vec<String>) {
		if self.0.insert(name.to_string(), lines).is_some() {
			tracing::debug!(name, "replaced earlier block with the same name");
		}
	}

	pub fn lines(&self, name: &str) -> Option<&[String]> {
		self.0.get(name).map(Vec::as_slice)
	}
}

/// A corpus document as seen by the index generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
	pub source: PathBuf,
	/// Path below the source root.
	pub relative: PathBuf,
	pub metadata: Metadata,
}

/// Everything shared across documents during one build. A fresh context is
/// created for every build.
#[derive(Debug, Clone)]
pub struct BuildContext {
	pub source_root: PathBuf,
	pub config: SnipConfig,
	pub snippets: Registry,
	pub templates: Registry,
	pub globals: Variables,
	/// Every loaded document in path order.
	pub corpus: Vec<CorpusEntry>,
	placeholder: PlaceholderSyntax,
}

impl BuildContext {
	pub fn new(source_root: impl Into<PathBuf>, config: SnipConfig) -> Self {
		let placeholder = config.placeholder_syntax();

		Self {
			source_root: source_root.into(),
			config,
			snippets: Registry::new(),
			templates: Registry::new(),
			globals: Variables::new(),
			corpus: Vec::new(),
			placeholder,
		}
	}

	pub fn placeholder(&self) -> &PlaceholderSyntax {
		&self.placeholder
	}
}
