use std::path::Path;
use std::path::PathBuf;

use crate::metadata::Metadata;
use crate::variables::Variables;

/// The family of a source document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
	/// `md`, `mdown`, `markdown`. Metadata is extracted, the body is converted
	/// and the extension is rewritten.
	Markdown,
	/// `html`, `htm`.
	Markup,
	/// `txt`.
	Text,
}

impl DocumentKind {
	/// The kind of the document at `path`, or `None` when the extension is not
	/// supported. Extensions match case-insensitively.
	pub fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?.to_ascii_lowercase();

		match ext.as_str() {
			"md" | "mdown" | "markdown" => Some(Self::Markdown),
			"html" | "htm" => Some(Self::Markup),
			"txt" => Some(Self::Text),
			_ => None,
		}
	}

	pub fn is_markdown(self) -> bool {
		self == Self::Markdown
	}
}

/// Check if a path has a supported document extension.
pub fn is_supported_file(path: &Path) -> bool {
	DocumentKind::from_path(path).is_some()
}

/// The path a document is written to, relative to the output root.
///
/// Markdown documents take `output_extension`; every other document keeps its
/// own extension.
pub fn output_path(relative: &Path, output_extension: &str) -> PathBuf {
	match DocumentKind::from_path(relative) {
		Some(DocumentKind::Markdown) => relative.with_extension(output_extension),
		_ => relative.to_path_buf(),
	}
}

/// Render a relative path with `/` separators.
pub fn web_path(path: &Path) -> String {
	path.components()
		.map(|component| component.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/")
}

/// One source document moving through the pipeline.
#[derive(Debug, Clone)]
pub struct Document {
	/// Where the document was read from.
	pub source: PathBuf,
	/// The source path relative to the source root.
	pub relative: PathBuf,
	/// The output path relative to the output root.
	pub output: PathBuf,
	pub kind: DocumentKind,
	/// The current content, one entry per line.
	pub lines: Vec<String>,
	/// Variables declared with `set`.
	pub locals: Variables,
	pub metadata: Metadata,
	/// The template applied by the compositor, once chosen.
	pub template: Option<String>,
}

impl Document {
	pub fn new(
		source: PathBuf,
		relative: PathBuf,
		kind: DocumentKind,
		content: &str,
		metadata: Metadata,
		output_extension: &str,
	) -> Self {
		let output = output_path(&relative, output_extension);

		Self {
			source,
			relative,
			output,
			kind,
			lines: split_lines(content),
			locals: Variables::new(),
			metadata,
			template: None,
		}
	}

	/// The directory containing the source file.
	pub fn directory(&self) -> &Path {
		self.source.parent().unwrap_or_else(|| Path::new(""))
	}

	pub fn text(&self) -> String {
		self.lines.join("\n")
	}
}

/// Split text into owned lines, accepting both `\n` and `\r\n`.
pub fn split_lines(text: &str) -> Vec<String> {
	text.lines().map(String::from).collect()
}
