use markdown::CompileOptions;
use markdown::Options;
use markdown::ParseOptions;

use crate::SnipError;
use crate::SnipResult;

/// Converts a document from its source markup to the output markup.
pub trait MarkupConverter {
	fn convert(&self, source: &str) -> SnipResult<String>;
}

/// Markdown to HTML. Raw HTML, including directive comments, is passed
/// through untouched.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownConverter {
	pub gfm: bool,
}

impl Default for MarkdownConverter {
	fn default() -> Self {
		Self { gfm: true }
	}
}

impl MarkdownConverter {
	pub fn new(gfm: bool) -> Self {
		Self { gfm }
	}

	fn options(&self) -> Options {
		let (parse, compile) = if self.gfm {
			(ParseOptions::gfm(), CompileOptions::gfm())
		} else {
			(ParseOptions::default(), CompileOptions::default())
		};

		Options {
			parse,
			compile: CompileOptions {
				allow_dangerous_html: true,
				allow_dangerous_protocol: true,
				..compile
			},
		}
	}
}

impl MarkupConverter for MarkdownConverter {
	fn convert(&self, source: &str) -> SnipResult<String> {
		markdown::to_html_with_options(source, &self.options())
			.map_err(|e| SnipError::Markdown(e.to_string()))
	}
}
