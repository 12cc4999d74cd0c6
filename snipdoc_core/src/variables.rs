use std::collections::HashMap;
use std::fmt;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

use crate::directive::Directive;
use crate::directive::is_identifier;
use crate::metadata::Metadata;

/// The default two character placeholder marker.
pub const DEFAULT_PLACEHOLDER: &str = "§§";

/// The value of a `set` or `global` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VarValue {
	Text(String),
	/// Declared without a value.
	Flag,
}

impl VarValue {
	/// The value carried by a `set`/`global` directive.
	pub fn from_directive(directive: &Directive) -> Self {
		directive.value().map_or(Self::Flag, Self::Text)
	}

	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Text(text) => !text.is_empty(),
			Self::Flag => true,
		}
	}
}

impl fmt::Display for VarValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Flag => f.write_str("true"),
		}
	}
}

/// A variable map for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct Variables(HashMap<String, VarValue>);

impl Variables {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record the variable declared by `directive`. Directives without a name
	/// are ignored.
	pub fn declare(&mut self, directive: &Directive) {
		if let Some(name) = directive.name() {
			self.0
				.insert(name.to_string(), VarValue::from_directive(directive));
		}
	}

	pub fn is_truthy(&self, name: &str) -> Option<bool> {
		self.0.get(name).map(VarValue::is_truthy)
	}
}

/// Anything placeholders can be resolved against.
pub trait VariableSource {
	/// The rendered value of `name`, if defined.
	fn lookup(&self, name: &str) -> Option<String>;
}

impl VariableSource for Variables {
	fn lookup(&self, name: &str) -> Option<String> {
		self.0.get(name).map(ToString::to_string)
	}
}

impl VariableSource for Metadata {
	fn lookup(&self, name: &str) -> Option<String> {
		self.get(name).map(ToString::to_string)
	}
}

/// Ordered scopes searched from highest to lowest precedence.
pub struct Scope<'a> {
	layers: Vec<&'a dyn VariableSource>,
}

impl<'a> Scope<'a> {
	pub fn new() -> Self {
		Self { layers: Vec::new() }
	}

	/// Add a lower precedence layer.
	#[must_use]
	pub fn with(mut self, layer: &'a dyn VariableSource) -> Self {
		self.layers.push(layer);
		self
	}

	/// Scope for a document: local, then global, then metadata.
	pub fn document(locals: &'a Variables, globals: &'a Variables, metadata: &'a Metadata) -> Self {
		Self::new().with(locals).with(globals).with(metadata)
	}
}

impl Default for Scope<'_> {
	fn default() -> Self {
		Self::new()
	}
}

impl VariableSource for Scope<'_> {
	fn lookup(&self, name: &str) -> Option<String> {
		self.layers.iter().find_map(|layer| layer.lookup(name))
	}
}

/// The placeholder form `<marker>name<marker>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSyntax {
	marker: String,
}

impl Default for PlaceholderSyntax {
	fn default() -> Self {
		Self::new(DEFAULT_PLACEHOLDER)
	}
}

impl PlaceholderSyntax {
	pub fn new(marker: impl Into<String>) -> Self {
		Self {
			marker: marker.into(),
		}
	}

	/// Replace every placeholder in `text` in a single left to right pass.
	///
	/// Defined names take their value from `scope`; undefined names are
	/// removed. Substituted values are never scanned again.
	pub fn substitute(&self, text: &str, scope: &dyn VariableSource) -> String {
		if self.marker.is_empty() {
			return text.to_string();
		}

		let marker = self.marker.as_str();
		let mut output = String::with_capacity(text.len());
		let mut rest = text;

		while let Some(start) = rest.find(marker) {
			let after_open = &rest[start + marker.len()..];
			let Some(end) = after_open.find(marker) else {
				break;
			};

			let name = &after_open[..end];
			output.push_str(&rest[..start]);

			if is_identifier(name) {
				if let Some(value) = scope.lookup(name) {
					output.push_str(&value);
				}
				rest = &after_open[end + marker.len()..];
			} else {
				// Not a placeholder; keep one character and rescan after it.
				let step = rest[start..].chars().next().map_or(1, char::len_utf8);
				output.push_str(&rest[start..start + step]);
				rest = &rest[start + step..];
			}
		}

		output.push_str(rest);
		output
	}
}
