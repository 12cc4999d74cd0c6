use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SnipError {
	#[error(transparent)]
	#[diagnostic(code(snipdoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("failure to convert markdown: {0}")]
	#[diagnostic(code(snipdoc::markdown))]
	Markdown(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(snipdoc::config_parse),
		help("check that snipdoc.toml is valid TOML; see `[exclude]` and `[markdown]` sections")
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(snipdoc::invalid_exclude_pattern),
		help("exclude patterns follow .gitignore syntax")
	)]
	InvalidExcludePattern { pattern: String, reason: String },

	#[error("cannot read source directory `{}`", path.display())]
	#[diagnostic(
		code(snipdoc::source_root),
		help("pass an existing directory with `--input`")
	)]
	ReadSourceRoot {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("cannot write file `{}`", path.display())]
	#[diagnostic(
		code(snipdoc::write_output),
		help("check that the output directory is writable")
	)]
	WriteOutput {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(snipdoc::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type SnipResult<T> = Result<T, SnipError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
