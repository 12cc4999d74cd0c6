use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use serde::Serialize;

/// The kind of a recoverable problem found during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum WarningKind {
	/// An identifier command carried a word outside the identifier grammar.
	InvalidIdentifier { command: String, identifier: String },
	/// An identifier command was written without its identifier.
	MissingIdentifier { command: String },
	/// An `include` target could not be read.
	MissingInclude { path: String },
	/// A `paste` named a snippet that exists in no scope.
	MissingSnippet { name: String },
	/// A snippet pastes itself, directly or through other snippets.
	SnippetCycle { name: String },
	/// An `index` directive without both a pattern and a template name.
	IncompleteIndex,
	UnknownIndexTemplate { name: String },
	InvalidIndexPattern { pattern: String, reason: String },
	/// A template pastes a snippet missing from the global registry.
	MissingTemplateSnippet { template: String, name: String },
	/// A block was still open at the end of its document.
	UnclosedBlock { command: String, name: Option<String> },
	/// A source file could not be read and was left out of the build.
	UnreadableFile { reason: String },
	/// A source file could not be converted and was left out of the build.
	ConversionFailed { reason: String },
}

impl WarningKind {
	/// Human-readable message for this warning.
	pub fn message(&self) -> String {
		match self {
			Self::InvalidIdentifier {
				command,
				identifier,
			} => {
				format!(
					"invalid identifier `{identifier}` for `{command}`; use only letters, numbers, \
					 hyphens, underscores and periods"
				)
			}
			Self::MissingIdentifier { command } => {
				format!("`{command}` requires an identifier")
			}
			Self::MissingInclude { path } => format!("unable to include `{path}`"),
			Self::MissingSnippet { name } => {
				format!("unable to paste `{name}` because the snippet doesn't exist")
			}
			Self::SnippetCycle { name } => format!("snippet `{name}` pastes itself"),
			Self::IncompleteIndex => {
				"`index` requires at least a pattern and a template: <!-- index pattern template \
				 [sort] -->"
					.to_string()
			}
			Self::UnknownIndexTemplate { name } => format!("index template `{name}` not found"),
			Self::InvalidIndexPattern { pattern, reason } => {
				format!("invalid index pattern `{pattern}`: {reason}")
			}
			Self::MissingTemplateSnippet { template, name } => {
				format!("template `{template}` references unknown snippet `{name}`")
			}
			Self::UnclosedBlock { command, name } => {
				match name {
					Some(name) => format!("missing `end` for `{command} {name}`"),
					None => format!("missing `end` for `{command}`"),
				}
			}
			Self::UnreadableFile { reason } => format!("unable to read file: {reason}"),
			Self::ConversionFailed { reason } => format!("unable to convert file: {reason}"),
		}
	}
}

/// A recoverable problem and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildWarning {
	/// The document, relative to the source root where possible.
	pub file: PathBuf,
	/// 1-indexed line number within the document as the reporting stage saw
	/// it.
	pub line: Option<usize>,
	#[serde(flatten)]
	pub kind: WarningKind,
}

impl BuildWarning {
	pub fn new(file: impl Into<PathBuf>, line: Option<usize>, kind: WarningKind) -> Self {
		Self {
			file: file.into(),
			line,
			kind,
		}
	}

	/// Attach a warning to the 0-indexed line `index` of `file`.
	pub fn at(file: &Path, index: usize, kind: WarningKind) -> Self {
		Self::new(file, Some(index + 1), kind)
	}

	pub fn message(&self) -> String {
		self.kind.message()
	}
}

impl fmt::Display for BuildWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.line {
			Some(line) => {
				write!(
					f,
					"{} in {}:{line}",
					self.message(),
					self.file.display()
				)
			}
			None => write!(f, "{} in {}", self.message(), self.file.display()),
		}
	}
}

/// Collected build warnings. Every pushed warning is also logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref)]
#[serde(transparent)]
pub struct Warnings(Vec<BuildWarning>);

impl Warnings {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, warning: BuildWarning) {
		tracing::warn!(
			file = %warning.file.display(),
			line = warning.line,
			"{}",
			warning.message()
		);
		self.0.push(warning);
	}

	pub fn into_inner(self) -> Vec<BuildWarning> {
		self.0
	}
}

impl Extend<BuildWarning> for Warnings {
	fn extend<T: IntoIterator<Item = BuildWarning>>(&mut self, iter: T) {
		for warning in iter {
			self.push(warning);
		}
	}
}
