use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Build static pages from snippets, templates and variables embedded in HTML comments.",
	long_about = "snipdoc compiles a tree of markdown, HTML and text files into finished pages.\n\nDirectives \
	              are HTML comments on a line of their own: `copy`, `cut` and `paste` reuse \
	              snippets, `set` and `global` declare variables written as §§name§§, `template` \
	              wraps pages, `if` filters lines, `include` splices files and `index` lists \
	              documents.\n\nQuick start:\n  snipdoc build -i site -o public\n  snipdoc build -i \
	              site -o public --watch\n  snipdoc list -i site"
)]
pub struct SnipCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Build every document of the source tree into the output tree.
	///
	/// Markdown files are converted to HTML and written with the configured
	/// output extension. HTML and text files keep their names. Problems that
	/// do not stop the build are printed as warnings.
	Build {
		/// The source directory.
		#[arg(long, short, default_value = ".")]
		input: PathBuf,

		/// The output directory. Created when missing.
		#[arg(long, short)]
		output: PathBuf,

		/// Rebuild whenever a source file changes.
		#[arg(long, short, default_value_t = false)]
		watch: bool,

		/// Output format for the build report.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the snippets, templates and globals defined in the source tree.
	List {
		/// The source directory.
		#[arg(long, short, default_value = ".")]
		input: PathBuf,

		/// Output format for the listing.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
