use std::cmp::Ordering;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use globset::GlobBuilder;
use globset::GlobMatcher;

use crate::context::BuildContext;
use crate::context::CorpusEntry;
use crate::diagnostics::BuildWarning;
use crate::diagnostics::WarningKind;
use crate::diagnostics::Warnings;
use crate::directive::Command;
use crate::directive::Directive;
use crate::directive::parse_directive;
use crate::document::Document;
use crate::document::output_path;
use crate::document::split_lines;
use crate::document::web_path;
use crate::metadata::MetaValue;
use crate::metadata::Metadata;
use crate::snippets::PasteFailure;
use crate::snippets::Paster;
use crate::variables::Scope;

/// Field names whose values sort as dates, most recent first.
pub const DATE_FIELDS: [&str; 4] = ["date", "created", "modified", "published"];

/// Date formats tried in order when sorting by a date field.
pub const DATE_FORMATS: [&str; 10] = [
	"%Y-%m-%d",
	"%Y/%m/%d",
	"%m/%d/%Y",
	"%d/%m/%Y",
	"%b %d %Y",
	"%B %d %Y",
	"%b %d, %Y",
	"%B %d, %Y",
	"%d %b %Y",
	"%d %B %Y",
];

/// Date and time formats tried after [`DATE_FORMATS`].
pub const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// A parsed `index <pattern> <template> [sort]` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
	pub pattern: String,
	pub template: String,
	pub sort_field: Option<String>,
}

impl IndexSpec {
	/// Parse an `index` directive. `None` when the pattern or the
	/// template name is missing.
	pub fn from_directive(directive: &Directive) -> Option<Self> {
		let mut args = directive.args.iter();
		let pattern = args.next()?.clone();
		let template = args.next()?.clone();
		let sort_field = args.next().cloned();

		Some(Self {
			pattern,
			template,
			sort_field,
		})
	}

	/// Compile the pattern. `*` does not cross `/` and a leading `./` is
	/// ignored.
	pub fn matcher(&self) -> Result<GlobMatcher, globset::Error> {
		let pattern = self.pattern.strip_prefix("./").unwrap_or(&self.pattern);
		let glob = GlobBuilder::new(pattern).literal_separator(true).build()?;

		Ok(glob.compile_matcher())
	}
}

/// Expand every `index` directive of `document`.
///
/// Each directive is replaced by one rendering of its template per matching
/// corpus document. A directive without a pattern and a template name, with an
/// unknown template or with an invalid pattern stays in place and produces a
/// warning.
pub fn expand_indexes(document: &mut Document, context: &BuildContext, warnings: &mut Warnings) {
	let lines = std::mem::take(&mut document.lines);
	let mut expanded = Vec::with_capacity(lines.len());

	for (index, line) in lines.into_iter().enumerate() {
		let Some(directive) = parse_directive(&line).filter(|d| d.command == Command::Index) else {
			expanded.push(line);
			continue;
		};

		match render_index(&directive, context) {
			Ok((rendered, failures)) => {
				for kind in failures {
					warnings.push(BuildWarning::at(&document.relative, index, kind));
				}
				expanded.extend(rendered);
			}
			Err(kind) => {
				warnings.push(BuildWarning::at(&document.relative, index, kind));
				expanded.push(line);
			}
		}
	}

	document.lines = expanded;
}

fn render_index(
	directive: &Directive,
	context: &BuildContext,
) -> Result<(Vec<String>, Vec<WarningKind>), WarningKind> {
	let spec = IndexSpec::from_directive(directive).ok_or(WarningKind::IncompleteIndex)?;
	let template = context.templates.lines(&spec.template).ok_or_else(|| {
		WarningKind::UnknownIndexTemplate {
			name: spec.template.clone(),
		}
	})?;
	let matcher = spec.matcher().map_err(|e| {
		WarningKind::InvalidIndexPattern {
			pattern: spec.pattern.clone(),
			reason: e.to_string(),
		}
	})?;

	let mut records: Vec<Metadata> = context
		.corpus
		.iter()
		.filter(|entry| matcher.is_match(web_path(&entry.relative)))
		.map(|entry| index_record(entry, &context.config.output_extension))
		.collect();

	if let Some(field) = &spec.sort_field {
		sort_records(&mut records, field);
	}

	let scopes = [&context.snippets];
	let mut template_lines = Vec::with_capacity(template.len());
	let failures = Paster::new(&scopes, true)
		.expand_all(template, &mut template_lines)
		.into_iter()
		.map(|failure| {
			match failure {
				PasteFailure::Missing(name) => {
					WarningKind::MissingTemplateSnippet {
						template: spec.template.clone(),
						name,
					}
				}
				PasteFailure::Cycle(name) => WarningKind::SnippetCycle { name },
			}
		})
		.collect();
	let template_text = template_lines.join("\n");

	let mut rendered = Vec::new();
	for record in &records {
		let scope = Scope::new().with(record).with(&context.globals);
		let text = context.placeholder().substitute(&template_text, &scope);
		rendered.extend(split_lines(&text));
	}

	tracing::debug!(
		pattern = %spec.pattern,
		template = %spec.template,
		matches = records.len(),
		"expanded index"
	);

	Ok((rendered, failures))
}

/// The variables an index template sees for one corpus document: its
/// `filename`, `filepath` (the output path) and `sourcepath`, overlaid by the
/// document's own metadata.
pub fn index_record(entry: &CorpusEntry, output_extension: &str) -> Metadata {
	let filename = entry
		.relative
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default();

	let mut record = Metadata::new();
	record.insert("filename".to_string(), MetaValue::Text(filename));
	record.insert(
		"filepath".to_string(),
		MetaValue::Text(web_path(&output_path(&entry.relative, output_extension))),
	);
	record.insert(
		"sourcepath".to_string(),
		MetaValue::Text(entry.source.display().to_string()),
	);
	record.extend(entry.metadata.iter().map(|(k, v)| (k.clone(), v.clone())));

	record
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
	Date(NaiveDateTime),
	RawDate(String),
	Number(f64),
	Text(String),
}

impl SortKey {
	fn for_field(record: &Metadata, field: &str) -> Self {
		let value = record.get(field).map(ToString::to_string).unwrap_or_default();

		if is_date_field(field) {
			return parse_date(&value).map_or(Self::RawDate(value), Self::Date);
		}

		match value.trim().parse::<f64>() {
			Ok(number) => Self::Number(number),
			Err(_) => Self::Text(value.to_lowercase()),
		}
	}

	/// Dates sort most recent first with unparseable values after them. Numbers
	/// sort ascending before text, which sorts ascending.
	fn compare(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Self::Date(a), Self::Date(b)) => b.cmp(a),
			(Self::RawDate(a), Self::RawDate(b)) => b.cmp(a),
			(Self::Number(a), Self::Number(b)) => a.total_cmp(b),
			(Self::Text(a), Self::Text(b)) => a.cmp(b),
			_ => self.rank().cmp(&other.rank()),
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Self::Date(_) => 0,
			Self::RawDate(_) => 1,
			Self::Number(_) => 2,
			Self::Text(_) => 3,
		}
	}
}

/// Check if `field` names a date, ignoring case.
pub fn is_date_field(field: &str) -> bool {
	DATE_FIELDS
		.iter()
		.any(|date_field| date_field.eq_ignore_ascii_case(field))
}

/// Parse a date with the first matching format.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
	let value = value.trim();

	DATE_FORMATS
		.iter()
		.find_map(|format| NaiveDate::parse_from_str(value, format).ok())
		.and_then(|date| date.and_hms_opt(0, 0, 0))
		.or_else(|| {
			DATE_TIME_FORMATS
				.iter()
				.find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
		})
}

/// Sort index records by `field`. The sort is stable.
pub fn sort_records(records: &mut [Metadata], field: &str) {
	let mut keyed: Vec<(SortKey, Metadata)> = records
		.iter()
		.map(|record| (SortKey::for_field(record, field), record.clone()))
		.collect();
	keyed.sort_by(|(a, _), (b, _)| a.compare(b));

	for (slot, (_, record)) in records.iter_mut().zip(keyed) {
		*slot = record;
	}
}
