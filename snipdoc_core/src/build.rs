use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::SnipError;
use crate::SnipResult;
use crate::collector;
use crate::config::SnipConfig;
use crate::context::BuildContext;
use crate::context::CorpusEntry;
use crate::convert::MarkdownConverter;
use crate::convert::MarkupConverter;
use crate::diagnostics::BuildWarning;
use crate::diagnostics::WarningKind;
use crate::diagnostics::Warnings;
use crate::document::Document;
use crate::document::DocumentKind;
use crate::evaluate::render_document;
use crate::fs::DiskFileSystem;
use crate::fs::FileSystem;
use crate::include::expand_includes;
use crate::index::expand_indexes;
use crate::metadata::Metadata;
use crate::metadata::extract_metadata;
use crate::snippets::resolve_snippets;

/// The corpus after loading, include expansion and block collection.
#[derive(Debug)]
pub struct Collection {
	pub context: BuildContext,
	pub documents: Vec<Document>,
	pub warnings: Warnings,
}

/// The outcome of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
	/// Every file written, in write order.
	pub written: Vec<PathBuf>,
	pub warnings: Warnings,
}

impl BuildReport {
	pub fn is_clean(&self) -> bool {
		self.warnings.is_empty()
	}
}

/// Runs the build pipeline over a source tree.
///
/// Every call starts from a fresh [`BuildContext`], so a builder can be reused
/// for any number of builds.
#[derive(Debug, Clone)]
pub struct Builder<F, C> {
	fs: F,
	converter: C,
	config: SnipConfig,
}

impl Builder<DiskFileSystem, MarkdownConverter> {
	/// A builder for the real file system with the markdown converter
	/// configured by `config`.
	pub fn disk(config: SnipConfig) -> Self {
		let converter = MarkdownConverter::new(config.markdown.gfm);
		Self::new(DiskFileSystem, converter, config)
	}
}

impl<F: FileSystem, C: MarkupConverter> Builder<F, C> {
	pub fn new(fs: F, converter: C, config: SnipConfig) -> Self {
		Self {
			fs,
			converter,
			config,
		}
	}

	pub fn fs(&self) -> &F {
		&self.fs
	}

	/// Load the corpus below `source_root`, expand includes and collect the
	/// corpus registries.
	pub fn collect(&self, source_root: &Path) -> SnipResult<Collection> {
		self.collect_excluding(source_root, None)
	}

	fn collect_excluding(
		&self,
		source_root: &Path,
		output_root: Option<&Path>,
	) -> SnipResult<Collection> {
		let mut warnings = Warnings::new();
		let mut context = BuildContext::new(source_root, self.config.clone());
		let mut documents = self.load(source_root, output_root, &mut warnings)?;

		context.corpus = documents
			.iter()
			.map(|document| {
				CorpusEntry {
					source: document.source.clone(),
					relative: document.relative.clone(),
					metadata: document.metadata.clone(),
				}
			})
			.collect();

		for document in &mut documents {
			expand_includes(document, &self.fs, &mut warnings);
		}

		collector::collect(&mut context, &documents, &mut warnings);

		Ok(Collection {
			context,
			documents,
			warnings,
		})
	}

	/// Build every document below `source_root` into `output_root`.
	///
	/// Each stage finishes for the whole corpus before the next one starts.
	/// Recoverable problems are returned as warnings in the report. The first
	/// output file that cannot be written ends the build with an error.
	pub fn build(&self, source_root: &Path, output_root: &Path) -> SnipResult<BuildReport> {
		let Collection {
			context,
			mut documents,
			mut warnings,
		} = self.collect_excluding(source_root, Some(output_root))?;

		for document in &mut documents {
			expand_indexes(document, &context, &mut warnings);
		}

		for document in &mut documents {
			resolve_snippets(document, &context, &mut warnings);
		}

		let mut written = Vec::with_capacity(documents.len());
		for mut document in documents {
			let text = render_document(&mut document, &context, &mut warnings);
			let path = output_root.join(&document.output);

			self.fs
				.write(&path, &text)
				.map_err(|source| {
					SnipError::WriteOutput {
						path: path.clone(),
						source,
					}
				})?;
			tracing::debug!(path = %path.display(), "wrote file");
			written.push(path);
		}

		tracing::info!(
			files = written.len(),
			warnings = warnings.len(),
			"build complete"
		);

		Ok(BuildReport { written, warnings })
	}

	fn load(
		&self,
		source_root: &Path,
		output_root: Option<&Path>,
		warnings: &mut Warnings,
	) -> SnipResult<Vec<Document>> {
		let exclude = self.config.exclude_matcher(source_root)?;
		let nested_output = output_root.and_then(|output| nested_root(source_root, output));
		let mut documents = Vec::new();

		for path in self.fs.list_files(source_root)? {
			let Some(kind) = DocumentKind::from_path(&path) else {
				continue;
			};

			let relative = path
				.strip_prefix(source_root)
				.map_or_else(|_| path.clone(), Path::to_path_buf);

			if nested_output
				.as_deref()
				.is_some_and(|output| relative.starts_with(output))
			{
				tracing::trace!(path = %path.display(), "inside output root");
				continue;
			}

			if path.starts_with(source_root)
				&& exclude.matched_path_or_any_parents(&path, false).is_ignore()
			{
				tracing::trace!(path = %path.display(), "excluded");
				continue;
			}

			if let Some(document) = self.load_document(path, relative, kind, warnings) {
				documents.push(document);
			}
		}

		tracing::debug!(documents = documents.len(), "loaded corpus");
		Ok(documents)
	}

	fn load_document(
		&self,
		path: PathBuf,
		relative: PathBuf,
		kind: DocumentKind,
		warnings: &mut Warnings,
	) -> Option<Document> {
		let content = match self.fs.read_to_string(&path) {
			Ok(content) => content,
			Err(e) => {
				warnings.push(BuildWarning::new(
					&relative,
					None,
					WarningKind::UnreadableFile {
						reason: e.to_string(),
					},
				));
				return None;
			}
		};

		let (metadata, content) = if kind.is_markdown() {
			let (metadata, body) = extract_metadata(&content);
			match self.converter.convert(&body) {
				Ok(html) => (metadata, html),
				Err(e) => {
					warnings.push(BuildWarning::new(
						&relative,
						None,
						WarningKind::ConversionFailed {
							reason: e.to_string(),
						},
					));
					return None;
				}
			}
		} else {
			(Metadata::new(), content)
		};

		Some(Document::new(
			path,
			relative,
			kind,
			&content,
			metadata,
			&self.config.output_extension,
		))
	}
}

/// The output root relative to the source root, when it lies strictly inside
/// it. Both roots are compared in absolute form, so `.` and `public` nest the
/// same way as `/site` and `/site/public`.
fn nested_root(source_root: &Path, output_root: &Path) -> Option<PathBuf> {
	let source = absolute_root(source_root);
	let output = absolute_root(output_root);
	output
		.strip_prefix(&source)
		.ok()
		.filter(|relative| !relative.as_os_str().is_empty())
		.map(Path::to_path_buf)
}

fn absolute_root(path: &Path) -> PathBuf {
	std::fs::canonicalize(path)
		.or_else(|_| std::path::absolute(path))
		.unwrap_or_else(|_| path.to_path_buf())
}

/// Build `source_root` into `output_root` on the real file system, using the
/// config discovered in `source_root`.
pub fn build(source_root: &Path, output_root: &Path) -> SnipResult<BuildReport> {
	let config = SnipConfig::load_or_default(source_root)?;
	Builder::disk(config).build(source_root, output_root)
}
