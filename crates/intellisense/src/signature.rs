//! Function signatures as served by a [`FunctionIndex`](crate::FunctionIndex).

use serde::{Deserialize, Serialize};

/// One declared parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalParameter {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<String>,
	#[serde(default)]
	pub is_variadic: bool,
}

impl FormalParameter {
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let is_variadic = name == "...";
		Self {
			name,
			default: None,
			is_variadic,
		}
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = Some(default.into());
		self
	}

	/// Returns true for the `...` sink.
	pub fn is_sink(&self) -> bool {
		self.is_variadic || self.name == "..."
	}

	/// `name` or `name = default`.
	pub fn label(&self) -> String {
		match &self.default {
			Some(default) => format!("{} = {default}", self.name),
			None => self.name.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
	pub name: String,
	#[serde(default)]
	pub parameters: Vec<FormalParameter>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub documentation: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub package: Option<String>,
}

impl FunctionSignature {
	pub fn new(name: impl Into<String>, parameters: impl IntoIterator<Item = FormalParameter>) -> Self {
		Self {
			name: name.into(),
			parameters: parameters.into_iter().collect(),
			documentation: None,
			package: None,
		}
	}

	pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
		self.documentation = Some(documentation.into());
		self
	}

	pub fn with_package(mut self, package: impl Into<String>) -> Self {
		self.package = Some(package.into());
		self
	}

	/// Index of the `...` sink, if declared.
	pub fn sink(&self) -> Option<usize> {
		self.parameters.iter().position(FormalParameter::is_sink)
	}

	/// Renders `name(a, b = default, ...)` and records where each parameter
	/// sits in the text, in characters.
	pub fn label(&self) -> SignatureLabel {
		let mut text = format!("{}(", self.name);
		let mut len = text.chars().count();
		let mut parameters = Vec::with_capacity(self.parameters.len());
		for (i, parameter) in self.parameters.iter().enumerate() {
			if i > 0 {
				text.push_str(", ");
				len += 2;
			}
			let label = parameter.label();
			let label_len = label.chars().count();
			parameters.push((len, len + label_len));
			text.push_str(&label);
			len += label_len;
		}
		text.push(')');
		SignatureLabel { text, parameters }
	}
}

/// Rendered signature text with per-parameter `[start, end)` char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureLabel {
	pub text: String,
	pub parameters: Vec<(usize, usize)>,
}
