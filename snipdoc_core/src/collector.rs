use crate::blocks::BlockKind;
use crate::blocks::BlockStack;
use crate::blocks::ClosedBlock;
use crate::context::BuildContext;
use crate::diagnostics::BuildWarning;
use crate::diagnostics::WarningKind;
use crate::diagnostics::Warnings;
use crate::directive::Command;
use crate::directive::Directive;
use crate::directive::LineKind;
use crate::directive::parse_directive;
use crate::directive::parse_line;
use crate::document::Document;

/// Register every named block and every global variable of the corpus.
///
/// Documents are scanned in order, so a later block with a name already in a
/// registry replaces the earlier one. Blocks nested in other blocks are
/// registered on their own as well as folded into their parents. Globals are
/// collected in a second scan once all blocks are known.
pub fn collect(context: &mut BuildContext, documents: &[Document], warnings: &mut Warnings) {
	for document in documents {
		collect_blocks(context, document, warnings);
	}

	for document in documents {
		collect_globals(context, document);
	}

	tracing::debug!(
		snippets = context.snippets.len(),
		templates = context.templates.len(),
		globals = context.globals.len(),
		"collected corpus registries"
	);
}

fn collect_blocks(context: &mut BuildContext, document: &Document, warnings: &mut Warnings) {
	let mut stack = BlockStack::new();

	for (index, line) in document.lines.iter().enumerate() {
		let directive = match parse_line(line) {
			LineKind::Directive(directive) => Some(directive),
			LineKind::InvalidIdentifier {
				command,
				identifier,
			} => {
				warnings.push(BuildWarning::at(
					&document.relative,
					index,
					WarningKind::InvalidIdentifier {
						command: command.to_string(),
						identifier,
					},
				));
				None
			}
			LineKind::Content => None,
		};

		if let Some(directive) = &directive {
			if is_missing_identifier(directive) {
				warnings.push(BuildWarning::at(
					&document.relative,
					index,
					WarningKind::MissingIdentifier {
						command: directive.command.to_string(),
					},
				));
			}
		}

		if let Some(block) = stack.feed(index, line, directive.as_ref()) {
			register(context, block);
		}
	}

	for unclosed in stack.finish() {
		warnings.push(BuildWarning::at(
			&document.relative,
			unclosed.open_index,
			WarningKind::UnclosedBlock {
				command: unclosed.command.to_string(),
				name: unclosed.name,
			},
		));
	}
}

fn register(context: &mut BuildContext, block: ClosedBlock) {
	let Some(name) = block.name.as_deref() else {
		return;
	};

	tracing::trace!(name, depth = block.depth, kind = ?block.kind, "registered block");

	match block.kind {
		BlockKind::Template => context.templates.register(name, block.lines),
		BlockKind::Copy | BlockKind::Cut => context.snippets.register(name, block.lines),
		BlockKind::Anonymous => {}
	}
}

fn collect_globals(context: &mut BuildContext, document: &Document) {
	for line in &document.lines {
		if let Some(directive) = parse_directive(line) {
			if directive.command == Command::Global {
				context.globals.declare(&directive);
			}
		}
	}
}

/// Identifier commands other than the bare `cut` need an identifier, and `if`
/// needs a variable name.
fn is_missing_identifier(directive: &Directive) -> bool {
	match directive.command {
		Command::Cut => false,
		Command::If => directive.args.is_empty(),
		ref command => command.takes_identifier() && directive.name.is_none(),
	}
}
