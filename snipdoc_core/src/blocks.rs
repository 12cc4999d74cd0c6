use crate::directive::Command;
use crate::directive::Directive;

/// The kind of an open block frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
	Copy,
	Cut,
	Template,
	/// A `cut`, `copy` or `template` opened without an identifier. Tracked so
	/// that `end` pairing stays aligned but never registered.
	Anonymous,
}

#[derive(Debug, Clone)]
struct Frame {
	kind: BlockKind,
	command: Command,
	name: Option<String>,
	lines: Vec<String>,
	open_index: usize,
	open_line: String,
}

/// A block popped by its `end` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedBlock {
	pub kind: BlockKind,
	pub name: Option<String>,
	/// The body lines, excluding the block's own open and end lines. Nested
	/// blocks appear here verbatim, directives included.
	pub lines: Vec<String>,
	/// Index of the opening directive line.
	pub open_index: usize,
	/// Index of the `end` line.
	pub close_index: usize,
	/// Number of frames that were open around this one.
	pub depth: usize,
}

/// A block that was still open when the input ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnclosedBlock {
	pub kind: BlockKind,
	/// The directive that opened the block.
	pub command: Command,
	pub name: Option<String>,
	pub open_index: usize,
}

/// The nesting stack shared by the collector and the snippet resolver.
///
/// Feed it every line in order. Opening directives push a frame, `end` pops
/// the innermost one and every other line accumulates in the innermost frame.
/// When a frame pops, its open line, body and end line are appended to the
/// parent so the parent reproduces the nested block verbatim.
#[derive(Debug, Default)]
pub struct BlockStack {
	frames: Vec<Frame>,
}

impl BlockStack {
	pub fn new() -> Self {
		Self::default()
	}

	/// Feed one line. `directive` is the parsed form of `line`, if any.
	///
	/// Returns the block closed by this line. An `end` with no open frame is
	/// ignored.
	pub fn feed(
		&mut self,
		index: usize,
		line: &str,
		directive: Option<&Directive>,
	) -> Option<ClosedBlock> {
		if let Some(directive) = directive {
			if let Some(kind) = opening_kind(directive) {
				self.frames.push(Frame {
					kind,
					command: directive.command.clone(),
					name: directive.name.clone(),
					lines: Vec::new(),
					open_index: index,
					open_line: line.to_string(),
				});
				return None;
			}

			if directive.command == Command::End {
				return self.close(index, line);
			}
		}

		if let Some(frame) = self.frames.last_mut() {
			frame.lines.push(line.to_string());
		}

		None
	}

	fn close(&mut self, index: usize, line: &str) -> Option<ClosedBlock> {
		let frame = self.frames.pop()?;

		if let Some(parent) = self.frames.last_mut() {
			parent.lines.push(frame.open_line);
			parent.lines.extend(frame.lines.iter().cloned());
			parent.lines.push(line.to_string());
		}

		Some(ClosedBlock {
			kind: frame.kind,
			name: frame.name,
			lines: frame.lines,
			open_index: frame.open_index,
			close_index: index,
			depth: self.frames.len(),
		})
	}

	/// Consume the stack, returning the frames that were never closed from
	/// outermost to innermost.
	pub fn finish(self) -> Vec<UnclosedBlock> {
		self.frames
			.into_iter()
			.map(|frame| {
				UnclosedBlock {
					kind: frame.kind,
					command: frame.command,
					name: frame.name,
					open_index: frame.open_index,
				}
			})
			.collect()
	}
}

fn opening_kind(directive: &Directive) -> Option<BlockKind> {
	let named = directive.name.is_some();
	match directive.command {
		Command::Copy if named => Some(BlockKind::Copy),
		Command::Cut if named => Some(BlockKind::Cut),
		Command::Template if named => Some(BlockKind::Template),
		Command::Copy | Command::Cut | Command::Template => Some(BlockKind::Anonymous),
		_ => None,
	}
}
