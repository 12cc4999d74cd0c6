//! `snipdoc_core` is the core library for the `snipdoc` document compiler. It
//! turns a tree of markdown, HTML and text files annotated with directive
//! comments into finished pages by resolving includes, snippets, templates,
//! variables, conditionals and index listings.
//!
//! ## Directives
//!
//! Every directive is an HTML comment on a line of its own:
//!
//! ```text
//! <!-- include path/to/file.html -->
//! <!-- copy footer --> ... <!-- end -->
//! <!-- cut aside --> ... <!-- end -->
//! <!-- paste footer -->
//! <!-- set title Welcome -->
//! <!-- global site My Site -->
//! <!-- template page --> ... {{content}} ... <!-- end -->
//! <!-- if draft --> ... <!-- endif -->
//! <!-- index blog/*.md post date -->
//! ```
//!
//! Variables are written `§§name§§` and resolve against the document's `set`
//! variables, then the corpus globals, then the document's metadata block.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source tree
//!   → Load (metadata block, markdown conversion)
//!   → Include expansion (per document)
//!   → Block collection (snippets, templates, globals for the whole corpus)
//!   → Index expansion (per document)
//!   → Snippet resolution (local blocks, cut elision, paste)
//!   → Conditional filtering, template composition and substitution
//!   → Output tree
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `snipdoc.toml`.
//! - [`fs`]: The file system seam and its disk implementation.
//! - [`convert`]: The markup converter seam and the markdown converter.
//! - [`watch`]: The change gate and loop used for watch mode.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snipdoc_core::build;
//! use std::path::Path;
//!
//! let report = build(Path::new("site"), Path::new("public")).unwrap();
//! for warning in report.warnings.iter() {
//!     eprintln!("{warning}");
//! }
//! ```

pub use blocks::*;
pub use build::*;
pub use context::*;
pub use diagnostics::*;
pub use directive::*;
pub use document::*;
pub use error::*;
pub use evaluate::*;
pub use include::*;
pub use index::*;
pub use metadata::*;
pub use snippets::*;
pub use template::*;
pub use variables::*;

mod blocks;
mod build;
mod collector;
pub mod config;
mod context;
pub mod convert;
mod diagnostics;
mod directive;
mod document;
#[allow(unused_assignments)]
mod error;
mod evaluate;
pub mod fs;
mod include;
mod index;
pub(crate) mod lexer;
mod metadata;
mod snippets;
mod template;
mod variables;
pub mod watch;

#[cfg(test)]
mod __fixtures;
