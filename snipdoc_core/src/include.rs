use std::path::Path;

use crate::diagnostics::BuildWarning;
use crate::diagnostics::WarningKind;
use crate::diagnostics::Warnings;
use crate::directive::Command;
use crate::directive::parse_directive;
use crate::document::Document;
use crate::document::split_lines;
use crate::fs::FileSystem;

/// Replace each `include <path>` line of `document` with the lines of the
/// referenced file.
///
/// The path is tried as given and then relative to the document's directory.
/// Included lines are not scanned for further includes. A target that cannot
/// be read leaves the directive line in place and produces a warning.
pub fn expand_includes<F: FileSystem + ?Sized>(
	document: &mut Document,
	fs: &F,
	warnings: &mut Warnings,
) {
	let lines = std::mem::take(&mut document.lines);
	let mut expanded = Vec::with_capacity(lines.len());

	for (index, line) in lines.into_iter().enumerate() {
		let Some(directive) = parse_directive(&line) else {
			expanded.push(line);
			continue;
		};

		if directive.command != Command::Include {
			expanded.push(line);
			continue;
		}

		let target = directive.args.join(" ");
		match read_include(fs, document.directory(), &target) {
			Some(content) => {
				tracing::trace!(file = %document.relative.display(), path = %target, "included file");
				expanded.extend(split_lines(&content));
			}
			None => {
				warnings.push(BuildWarning::at(
					&document.relative,
					index,
					WarningKind::MissingInclude { path: target },
				));
				expanded.push(line);
			}
		}
	}

	document.lines = expanded;
}

fn read_include<F: FileSystem + ?Sized>(fs: &F, directory: &Path, target: &str) -> Option<String> {
	if target.is_empty() {
		return None;
	}

	let given = Path::new(target);
	if let Ok(content) = fs.read_to_string(given) {
		return Some(content);
	}

	if given.is_absolute() {
		return None;
	}

	fs.read_to_string(&directory.join(given)).ok()
}
