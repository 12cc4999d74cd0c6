use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::Builder;
use crate::SnipError;
use crate::SnipResult;
use crate::config::SnipConfig;
use crate::convert::MarkupConverter;
use crate::fs::FileSystem;

pub const SOURCE_ROOT: &str = "/site";
pub const OUTPUT_ROOT: &str = "/out";

/// An in-memory file system keyed by absolute path.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
	files: RefCell<BTreeMap<PathBuf, String>>,
	unreadable: BTreeSet<PathBuf>,
	read_only: bool,
}

impl MemoryFileSystem {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a file below [`SOURCE_ROOT`].
	pub fn with_source(self, relative: &str, content: &str) -> Self {
		self.insert(Path::new(SOURCE_ROOT).join(relative), content);
		self
	}

	/// Reject every write.
	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	/// Keep listing the source file at `relative` but fail every read of it.
	pub fn failing_read(mut self, relative: &str) -> Self {
		self.unreadable.insert(Path::new(SOURCE_ROOT).join(relative));
		self
	}

	pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
		self.files.borrow_mut().insert(path.into(), content.to_string());
	}

	/// The content written below [`OUTPUT_ROOT`] at `relative`.
	pub fn output(&self, relative: &str) -> Option<String> {
		self.files
			.borrow()
			.get(&Path::new(OUTPUT_ROOT).join(relative))
			.cloned()
	}
}

fn has_hidden_component(path: &Path) -> bool {
	path.components().any(|component| {
		matches!(component, Component::Normal(name) if name.to_string_lossy().starts_with('.'))
	})
}

impl FileSystem for MemoryFileSystem {
	fn list_files(&self, root: &Path) -> SnipResult<Vec<PathBuf>> {
		Ok(self
			.files
			.borrow()
			.keys()
			.filter(|path| {
				path.strip_prefix(root)
					.is_ok_and(|relative| !has_hidden_component(relative))
			})
			.cloned()
			.collect())
	}

	fn read_to_string(&self, path: &Path) -> io::Result<String> {
		if self.unreadable.contains(path) {
			return Err(io::Error::new(
				io::ErrorKind::PermissionDenied,
				format!("{} is not readable", path.display()),
			));
		}

		self.files.borrow().get(path).cloned().ok_or_else(|| {
			io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
		})
	}

	fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
		if self.read_only {
			return Err(io::Error::new(
				io::ErrorKind::PermissionDenied,
				"read-only file system",
			));
		}

		self.insert(path, contents);
		Ok(())
	}
}

/// Returns the source unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughConverter;

impl MarkupConverter for PassthroughConverter {
	fn convert(&self, source: &str) -> SnipResult<String> {
		Ok(source.to_string())
	}
}

/// Fails on any source containing `marker`.
#[derive(Debug, Clone, Copy)]
pub struct RejectingConverter {
	pub marker: &'static str,
}

impl MarkupConverter for RejectingConverter {
	fn convert(&self, source: &str) -> SnipResult<String> {
		if source.contains(self.marker) {
			Err(SnipError::Markdown(format!("rejected `{}`", self.marker)))
		} else {
			Ok(source.to_string())
		}
	}
}

/// Defaults without the HTML shell, so outputs compare exactly.
pub fn plain_config() -> SnipConfig {
	SnipConfig {
		default_shell: false,
		..SnipConfig::default()
	}
}

pub fn memory_builder(fs: MemoryFileSystem) -> Builder<MemoryFileSystem, PassthroughConverter> {
	Builder::new(fs, PassthroughConverter, plain_config())
}

pub fn source_root() -> &'static Path {
	Path::new(SOURCE_ROOT)
}

pub fn output_root() -> &'static Path {
	Path::new(OUTPUT_ROOT)
}

pub fn lines(text: &str) -> Vec<String> {
	text.lines().map(String::from).collect()
}
