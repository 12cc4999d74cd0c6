use logos::Logos;

/// Raw tokens produced by logos for a single trimmed line.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
enum RawToken {
	#[token("<!--")]
	CommentOpen,
	#[token("-->")]
	CommentClose,
	#[regex(r"[ \t\r\n\f]+")]
	Whitespace,
	#[regex(r"[^ \t\r\n\f]+")]
	Word,
}

/// States of the line walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerContext {
	/// Nothing consumed yet; the line must open with `<!--`.
	Start,
	/// After `<!--`; whitespace is required before the body.
	Opened,
	/// Inside the body, expecting a word.
	Body,
	/// After a body word; whitespace or the end of the body.
	AfterWord,
	/// After whitespace following a body word; `-->` may close the comment.
	BodySpace,
	/// After `-->`; nothing but the end of the line may follow.
	Closed,
}

/// Split a line into the whitespace separated words of a directive comment
/// body.
///
/// Returns `None` unless the whole trimmed line is `<!--`, whitespace, one or
/// more words, whitespace and `-->`. A word glued to either delimiter (for
/// example `<!--set` or `x-->`) lexes as a plain word, so such lines are not
/// directives.
pub(crate) fn directive_words(line: &str) -> Option<Vec<&str>> {
	let source = line.trim();
	let mut context = LexerContext::Start;
	let mut words = Vec::new();

	for (result, span) in RawToken::lexer(source).spanned() {
		let Ok(raw) = result else {
			return None;
		};

		context = match (context, raw) {
			(LexerContext::Start, RawToken::CommentOpen) => LexerContext::Opened,
			(LexerContext::Opened, RawToken::Whitespace) => LexerContext::Body,
			(LexerContext::Body | LexerContext::BodySpace, RawToken::Word | RawToken::CommentOpen) => {
				words.push(&source[span]);
				LexerContext::AfterWord
			}
			(LexerContext::AfterWord, RawToken::Whitespace) => LexerContext::BodySpace,
			(LexerContext::BodySpace, RawToken::CommentClose) => LexerContext::Closed,
			_ => return None,
		};
	}

	if context == LexerContext::Closed && !words.is_empty() {
		Some(words)
	} else {
		None
	}
}
