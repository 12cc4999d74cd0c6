use crate::context::BuildContext;
use crate::diagnostics::Warnings;
use crate::directive::Command;
use crate::directive::Directive;
use crate::directive::parse_directive;
use crate::document::Document;
use crate::metadata::Metadata;
use crate::template::compose;
use crate::variables::PlaceholderSyntax;
use crate::variables::Scope;
use crate::variables::Variables;

/// Whether a `set` directive met during filtering is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
	/// Record into the local variables. Used for a document's own lines.
	Record,
	/// Consume without recording. Used when filtering a composed template.
	Skip,
}

/// Filter `lines` by their conditional directives, top to bottom.
///
/// `if [!]name` switches emission by the truthiness of `name` in `locals`,
/// then `globals`; `endif` switches it back on. A `cut` switches it off until
/// the next `end`. `set` lines are recorded according to `mode`. `set`, `if`,
/// `endif`, `cut` and `end` lines are never emitted; every other line,
/// including other directives, is emitted while emission is on.
///
/// A variable becomes visible to `if` only once its `set` line has been
/// passed.
pub fn filter_conditionals(
	lines: &[String],
	locals: &mut Variables,
	globals: &Variables,
	mode: SetMode,
) -> Vec<String> {
	let mut output = Vec::with_capacity(lines.len());
	let mut emit = true;
	let mut within_cut = false;

	for line in lines {
		let Some(directive) = parse_directive(line) else {
			if emit {
				output.push(line.clone());
			}
			continue;
		};

		match directive.command {
			Command::Set => {
				if mode == SetMode::Record {
					locals.declare(&directive);
				}
			}
			Command::If => emit = evaluate_condition(&directive, locals, globals),
			Command::Endif => emit = true,
			Command::Cut => {
				emit = false;
				within_cut = true;
			}
			Command::End => {
				if within_cut {
					emit = true;
					within_cut = false;
				}
			}
			_ => {
				if emit {
					output.push(line.clone());
				}
			}
		}
	}

	output
}

/// Evaluate `if name` or `if !name`. A missing name is false.
fn evaluate_condition(directive: &Directive, locals: &Variables, globals: &Variables) -> bool {
	let Some(argument) = directive.args.first() else {
		return false;
	};

	let (negated, name) = match argument.strip_prefix('!') {
		Some(name) => (true, name),
		None => (false, argument.as_str()),
	};

	let truthy = locals
		.is_truthy(name)
		.or_else(|| globals.is_truthy(name))
		.unwrap_or(false);

	truthy != negated
}

/// Replace every placeholder in `text` from the document scopes: local
/// variables, then globals, then metadata.
///
/// Runs once over the whole text, so a placeholder resolves no matter where
/// the `set` defining it appears.
pub fn substitute(
	text: &str,
	syntax: &PlaceholderSyntax,
	locals: &Variables,
	globals: &Variables,
	metadata: &Metadata,
) -> String {
	syntax.substitute(text, &Scope::document(locals, globals, metadata))
}

/// Produce the final text of `document`.
///
/// Conditionals are filtered first, recording the document's `set`
/// variables. The surviving lines are then composed into the selected
/// template, or the default shell, and substituted.
pub fn render_document(
	document: &mut Document,
	context: &BuildContext,
	warnings: &mut Warnings,
) -> String {
	let filtered = filter_conditionals(
		&document.lines,
		&mut document.locals,
		&context.globals,
		SetMode::Record,
	);
	document.lines = filtered;

	compose(document, context, warnings)
}
