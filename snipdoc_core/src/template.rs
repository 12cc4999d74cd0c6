use crate::context::BuildContext;
use crate::diagnostics::BuildWarning;
use crate::diagnostics::WarningKind;
use crate::diagnostics::Warnings;
use crate::document::Document;
use crate::document::split_lines;
use crate::evaluate::SetMode;
use crate::evaluate::filter_conditionals;
use crate::evaluate::substitute;
use crate::snippets::PasteFailure;
use crate::snippets::Paster;
use crate::variables::Scope;
use crate::variables::VariableSource;

/// The variable that selects a document's template.
pub const TEMPLATE_VARIABLE: &str = "template";

/// Markers that show a text already has a document root.
const ROOT_MARKERS: [&str; 3] = ["<html", "<!doctype", "<body"];

/// Wrap `body` in a minimal HTML document.
pub fn default_shell(body: &str) -> String {
	format!(
		"<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n</head>\n<body>\n{body}\n</body>\n</html>"
	)
}

/// Check if `text` contains a document root, ignoring case.
pub fn has_document_root(text: &str) -> bool {
	let lower = text.to_ascii_lowercase();
	ROOT_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// The template selected by `document`, if it names one that exists.
pub fn selected_template(document: &Document, context: &BuildContext) -> Option<String> {
	let scope = Scope::document(&document.locals, &context.globals, &document.metadata);
	let name = scope.lookup(TEMPLATE_VARIABLE)?;

	if context.templates.contains_key(&name) {
		Some(name)
	} else {
		tracing::debug!(file = %document.relative.display(), template = %name, "template not found");
		None
	}
}

/// Compose the filtered lines of `document` into its final text.
///
/// With a selected template, the template's `paste` lines are resolved
/// against the global snippets (an unresolved one stays in place with a
/// warning), the body replaces the content placeholder and the combined text
/// is filtered again, without recording `set`, then substituted. Without one,
/// the body is wrapped in the default shell when enabled and the text has no
/// document root, then substituted.
pub fn compose(document: &mut Document, context: &BuildContext, warnings: &mut Warnings) -> String {
	let config = &context.config;
	let body = document.text();
	document.template = selected_template(document, context);

	let text = match document.template.as_deref() {
		Some(name) => {
			let template = context.templates.lines(name).unwrap_or_default();
			let scopes = [&context.snippets];
			let mut template_lines = Vec::with_capacity(template.len());

			for failure in Paster::new(&scopes, true).expand_all(template, &mut template_lines) {
				let kind = match failure {
					PasteFailure::Missing(snippet) => {
						WarningKind::MissingTemplateSnippet {
							template: name.to_string(),
							name: snippet,
						}
					}
					PasteFailure::Cycle(snippet) => WarningKind::SnippetCycle { name: snippet },
				};
				warnings.push(BuildWarning::new(&document.relative, None, kind));
			}

			tracing::trace!(file = %document.relative.display(), template = name, "applied template");
			let combined = template_lines
				.join("\n")
				.replace(&config.content_placeholder, &body);
			filter_conditionals(
				&split_lines(&combined),
				&mut document.locals,
				&context.globals,
				SetMode::Skip,
			)
			.join("\n")
		}
		None if config.default_shell && !has_document_root(&body) => default_shell(&body),
		None => body,
	};

	substitute(
		&text,
		context.placeholder(),
		&document.locals,
		&context.globals,
		&document.metadata,
	)
}
