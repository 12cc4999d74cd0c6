use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Deserialize;
use serde::Serialize;

use crate::SnipError;
use crate::SnipResult;
use crate::variables::DEFAULT_PLACEHOLDER;
use crate::variables::PlaceholderSyntax;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["snipdoc.toml", ".snipdoc.toml", ".config/snipdoc.toml"];

/// The token a template uses to mark where the document body goes.
pub const DEFAULT_CONTENT_PLACEHOLDER: &str = "{{content}}";

/// Extension written for converted markdown documents.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "html";

/// Minimum interval in milliseconds between accepted watch events.
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 200;

/// Configuration loaded from a `snipdoc.toml` file.
///
/// ```toml
/// placeholder = "§§"
/// content_placeholder = "{{content}}"
/// output_extension = "html"
/// default_shell = true
/// watch_interval_ms = 200
///
/// [markdown]
/// gfm = true
///
/// [exclude]
/// patterns = ["drafts/", "*.partial.html"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnipConfig {
	/// The two character marker around placeholder names.
	pub placeholder: String,
	/// The token replaced by the document body inside a template.
	pub content_placeholder: String,
	/// Extension given to markdown documents in the output tree.
	pub output_extension: String,
	/// Wrap documents without a template and without a root element in a
	/// minimal HTML shell.
	pub default_shell: bool,
	/// Minimum interval between rebuilds in watch mode.
	pub watch_interval_ms: u64,
	pub markdown: MarkdownConfig,
	/// Exclusion configuration using gitignore-style patterns.
	pub exclude: ExcludeConfig,
}

impl Default for SnipConfig {
	fn default() -> Self {
		Self {
			placeholder: DEFAULT_PLACEHOLDER.to_string(),
			content_placeholder: DEFAULT_CONTENT_PLACEHOLDER.to_string(),
			output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
			default_shell: true,
			watch_interval_ms: DEFAULT_WATCH_INTERVAL_MS,
			markdown: MarkdownConfig::default(),
			exclude: ExcludeConfig::default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkdownConfig {
	/// Enable GitHub flavored markdown extensions.
	pub gfm: bool,
}

impl Default for MarkdownConfig {
	fn default() -> Self {
		Self { gfm: true }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns for files left out of the corpus.
	pub patterns: Vec<String>,
}

impl SnipConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> SnipResult<Option<SnipConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to the defaults.
	pub fn load_or_default(root: &Path) -> SnipResult<SnipConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn parse(content: &str) -> SnipResult<SnipConfig> {
		toml::from_str(content).map_err(|e| SnipError::ConfigParse(e.to_string()))
	}

	pub fn placeholder_syntax(&self) -> PlaceholderSyntax {
		PlaceholderSyntax::new(self.placeholder.as_str())
	}

	pub fn watch_interval(&self) -> Duration {
		Duration::from_millis(self.watch_interval_ms)
	}

	/// Build a `Gitignore` matcher from the `[exclude]` patterns, rooted at
	/// `root`.
	pub fn exclude_matcher(&self, root: &Path) -> SnipResult<Gitignore> {
		let mut builder = GitignoreBuilder::new(root);
		for pattern in &self.exclude.patterns {
			builder.add_line(None, pattern).map_err(|e| {
				SnipError::InvalidExcludePattern {
					pattern: pattern.clone(),
					reason: e.to_string(),
				}
			})?;
		}

		builder.build().map_err(|e| {
			SnipError::InvalidExcludePattern {
				pattern: self.exclude.patterns.join(", "),
				reason: e.to_string(),
			}
		})
	}
}
