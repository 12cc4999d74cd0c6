use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::SnipError;
use crate::SnipResult;

/// File access used by the build.
pub trait FileSystem {
	/// Every file below `root`, sorted by path. Hidden directories are
	/// skipped.
	fn list_files(&self, root: &Path) -> SnipResult<Vec<PathBuf>>;

	fn read_to_string(&self, path: &Path) -> io::Result<String>;

	/// Write `contents` to `path`, creating missing parent directories.
	fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
	fn list_files(&self, root: &Path) -> SnipResult<Vec<PathBuf>> {
		if let Err(source) = std::fs::read_dir(root) {
			return Err(SnipError::ReadSourceRoot {
				path: root.to_path_buf(),
				source,
			});
		}

		let mut files = Vec::new();
		let mut visited_dirs = HashSet::new();
		walk_dir(root, &mut files, &mut visited_dirs)?;
		// Sort for deterministic ordering.
		files.sort();

		Ok(files)
	}

	fn read_to_string(&self, path: &Path) -> io::Result<String> {
		std::fs::read_to_string(path)
	}

	fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}

		std::fs::write(path, contents)
	}
}

fn is_hidden_name(name: &str) -> bool {
	name.starts_with('.')
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> SnipResult<()> {
	// Detect symlink cycles by tracking canonical paths.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(SnipError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_hidden_name(name) {
				continue;
			}
		}

		if path.is_dir() {
			walk_dir(&path, files, visited_dirs)?;
		} else if path.is_file() {
			files.push(path);
		}
	}

	Ok(())
}
