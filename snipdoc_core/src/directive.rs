use std::fmt;

use crate::lexer::directive_words;

/// The command word of a directive comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
	/// `copy <id>` opens a reusable block.
	Copy,
	/// `cut <id>` opens a reusable block that is removed from its own
	/// document. A bare `cut` opens an anonymous removal block.
	Cut,
	/// `paste <id>` inserts a snippet.
	Paste,
	/// `set <id> [value]` declares a document-local variable.
	Set,
	/// `global <id> [value]` declares a corpus-wide variable.
	Global,
	/// `template <id>` opens a page template.
	Template,
	Include,
	If,
	Endif,
	End,
	Index,
	/// Any command word not listed above.
	Other(String),
}

impl Command {
	fn from_word(word: &str) -> Self {
		match word {
			"copy" => Self::Copy,
			"cut" => Self::Cut,
			"paste" => Self::Paste,
			"set" => Self::Set,
			"global" => Self::Global,
			"template" => Self::Template,
			"include" => Self::Include,
			"if" => Self::If,
			"endif" => Self::Endif,
			"end" => Self::End,
			"index" => Self::Index,
			other => Self::Other(other.to_string()),
		}
	}

	/// Identifier commands take a standalone identifier as their second word.
	pub fn takes_identifier(&self) -> bool {
		matches!(
			self,
			Self::Copy | Self::Cut | Self::Paste | Self::Set | Self::Global | Self::Template
		)
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Copy => "copy",
			Self::Cut => "cut",
			Self::Paste => "paste",
			Self::Set => "set",
			Self::Global => "global",
			Self::Template => "template",
			Self::Include => "include",
			Self::If => "if",
			Self::Endif => "endif",
			Self::End => "end",
			Self::Index => "index",
			Self::Other(word) => word,
		}
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
	pub command: Command,
	/// The identifier of an identifier command. `None` when the command takes
	/// no identifier or the identifier was omitted.
	pub name: Option<String>,
	/// The remaining words. For identifier commands these follow the
	/// identifier; for every other command they follow the command word.
	pub args: Vec<String>,
}

impl Directive {
	/// The arguments joined with single spaces, or `None` when there are none.
	///
	/// This is the value of a `set` or `global` directive.
	pub fn value(&self) -> Option<String> {
		if self.args.is_empty() {
			None
		} else {
			Some(self.args.join(" "))
		}
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

/// The classification of a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
	/// Plain content.
	Content,
	Directive(Directive),
	/// An identifier command whose identifier breaks the identifier grammar.
	/// The line is treated as content.
	InvalidIdentifier { command: Command, identifier: String },
}

/// Check whether `word` satisfies the identifier grammar: one or more
/// letters, digits, `-`, `_` or `.`.
pub fn is_identifier(word: &str) -> bool {
	!word.is_empty()
		&& word
			.chars()
			.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Classify one raw line.
///
/// A line is a directive only when the whole trimmed line is a comment of the
/// form `<!-- body -->` with a non-empty body. The first body word selects the
/// command. Identifier commands read their second word as the identifier.
pub fn parse_line(line: &str) -> LineKind {
	let Some(words) = directive_words(line) else {
		return LineKind::Content;
	};

	let mut words = words.into_iter();
	let Some(first) = words.next() else {
		return LineKind::Content;
	};
	let command = Command::from_word(first);

	if !command.takes_identifier() {
		return LineKind::Directive(Directive {
			command,
			name: None,
			args: words.map(String::from).collect(),
		});
	}

	let name = match words.next() {
		Some(word) if is_identifier(word) => Some(word.to_string()),
		Some(word) => {
			return LineKind::InvalidIdentifier {
				command,
				identifier: word.to_string(),
			};
		}
		None => None,
	};

	LineKind::Directive(Directive {
		command,
		name,
		args: words.map(String::from).collect(),
	})
}

/// Parse a line, discarding anything that is not a valid directive.
pub fn parse_directive(line: &str) -> Option<Directive> {
	match parse_line(line) {
		LineKind::Directive(directive) => Some(directive),
		_ => None,
	}
}
