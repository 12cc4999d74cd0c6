use std::ops::RangeInclusive;

use crate::blocks::BlockKind;
use crate::blocks::BlockStack;
use crate::context::BuildContext;
use crate::context::Registry;
use crate::diagnostics::BuildWarning;
use crate::diagnostics::WarningKind;
use crate::diagnostics::Warnings;
use crate::directive::Command;
use crate::directive::parse_directive;
use crate::document::Document;

/// Why a `paste` line could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PasteFailure {
	Missing(String),
	Cycle(String),
}

/// Expands `paste` lines against a list of registries, searched in order.
///
/// Pasted content is expanded again with the same registries. A snippet that
/// pastes itself, directly or through another snippet, is reported as a cycle
/// and the inner `paste` line is dropped.
pub(crate) struct Paster<'a> {
	scopes: &'a [&'a Registry],
	keep_missing: bool,
}

impl<'a> Paster<'a> {
	/// With `keep_missing`, a `paste` whose snippet cannot be found stays in
	/// the output verbatim; otherwise it is dropped.
	pub(crate) fn new(scopes: &'a [&'a Registry], keep_missing: bool) -> Self {
		Self {
			scopes,
			keep_missing,
		}
	}

	fn lookup(&self, name: &str) -> Option<&'a [String]> {
		self.scopes.iter().find_map(|registry| registry.lines(name))
	}

	/// Expand one line into `output`, returning every failure met on the way.
	pub(crate) fn expand(&self, line: &str, output: &mut Vec<String>) -> Vec<PasteFailure> {
		let mut failures = Vec::new();
		let mut active = Vec::new();
		self.expand_line(line, output, &mut active, &mut failures);

		failures
	}

	/// Expand every line of `lines`.
	pub(crate) fn expand_all(
		&self,
		lines: &[String],
		output: &mut Vec<String>,
	) -> Vec<PasteFailure> {
		lines
			.iter()
			.flat_map(|line| self.expand(line, output))
			.collect()
	}

	fn expand_line(
		&self,
		line: &str,
		output: &mut Vec<String>,
		active: &mut Vec<String>,
		failures: &mut Vec<PasteFailure>,
	) {
		let name = parse_directive(line)
			.filter(|directive| directive.command == Command::Paste)
			.and_then(|directive| directive.name);

		let Some(name) = name else {
			output.push(line.to_string());
			return;
		};

		if active.contains(&name) {
			failures.push(PasteFailure::Cycle(name));
			return;
		}

		let Some(lines) = self.lookup(&name) else {
			if self.keep_missing {
				output.push(line.to_string());
			}
			failures.push(PasteFailure::Missing(name));
			return;
		};

		active.push(name);
		for line in lines {
			self.expand_line(line, output, active, failures);
		}
		active.pop();
	}
}

/// Snippets defined inside one document and the line ranges its `cut`
/// blocks occupy.
#[derive(Debug, Default)]
pub struct LocalBlocks {
	pub snippets: Registry,
	pub elided: Vec<RangeInclusive<usize>>,
}

impl LocalBlocks {
	pub fn is_elided(&self, index: usize) -> bool {
		self.elided.iter().any(|range| range.contains(&index))
	}
}

/// Find the snippets defined in `lines` and the inclusive range of each named
/// `cut` block, from its `cut` line to its `end` line.
///
/// Template and anonymous blocks take part in `end` pairing but are not
/// recorded. A resolver that paired `end` with `copy` and `cut` frames
/// only would elide a different range. In `cut a … template t … end … end`
/// the first `end` closes `t` here, so `a` runs to the second `end` instead
/// of stopping at the first.
pub fn discover_local_blocks(lines: &[String]) -> LocalBlocks {
	let mut local = LocalBlocks::default();
	let mut stack = BlockStack::new();

	for (index, line) in lines.iter().enumerate() {
		let directive = parse_directive(line);
		let Some(block) = stack.feed(index, line, directive.as_ref()) else {
			continue;
		};

		if !matches!(block.kind, BlockKind::Copy | BlockKind::Cut) {
			continue;
		}

		let Some(name) = block.name else {
			continue;
		};

		if block.kind == BlockKind::Cut {
			local.elided.push(block.open_index..=block.close_index);
		}
		local.snippets.register(&name, block.lines);
	}

	local
}

/// Resolve the snippets of one document.
///
/// Lines inside the document's own `cut` blocks are removed and each `paste`
/// is replaced by the local snippet of that name, or the global one when the
/// document defines none. A `paste` that resolves nowhere is dropped with a
/// warning.
pub fn resolve_snippets(document: &mut Document, context: &BuildContext, warnings: &mut Warnings) {
	let local = discover_local_blocks(&document.lines);
	let scopes = [&local.snippets, &context.snippets];
	let paster = Paster::new(&scopes, false);

	let lines = std::mem::take(&mut document.lines);
	let mut resolved = Vec::with_capacity(lines.len());

	for (index, line) in lines.iter().enumerate() {
		if local.is_elided(index) {
			continue;
		}

		for failure in paster.expand(line, &mut resolved) {
			let kind = match failure {
				PasteFailure::Missing(name) => WarningKind::MissingSnippet { name },
				PasteFailure::Cycle(name) => WarningKind::SnippetCycle { name },
			};
			warnings.push(BuildWarning::at(&document.relative, index, kind));
		}
	}

	tracing::trace!(
		file = %document.relative.display(),
		local = local.snippets.len(),
		elided = local.elided.len(),
		"resolved snippets"
	);
	document.lines = resolved;
}
