//! Defensive parsing of LLM replies.
//!
//! Replies are untrusted text. They must be a JSON object, optionally wrapped in a single markdown
//! code fence, and every field a step relies on is looked up explicitly.

use serde_json::{Map, Value};
use tracing::error;

use crate::types::{PipelineError, Step};

/// A reply that parsed into a JSON object.
#[derive(Debug)]
pub struct Reply {
	step: Step,
	raw: String,
	fields: Map<String, Value>,
}

impl Reply {
	pub fn parse(step: Step, raw: &str) -> Result<Self, PipelineError> {
		let parse_error = |reason: String| {
			error!("Failed to parse {} reply: {}", step, reason);
			PipelineError::Parse { step, raw: raw.to_string(), reason }
		};

		match serde_json::from_str::<Value>(unfence(raw)) {
			Ok(Value::Object(fields)) => Ok(Self { step, raw: raw.to_string(), fields }),
			Ok(other) => Err(parse_error(format!("expected a JSON object, got {}", kind(&other)))),
			Err(e) => Err(parse_error(e.to_string())),
		}
	}

	/// Looks up a string field, `None` when the key is absent or null.
	pub fn optional(&self, field: &'static str) -> Result<Option<&str>, PipelineError> {
		match self.fields.get(field) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(value)) => Ok(Some(value.as_str())),
			Some(other) => {
				let reason = format!("\"{}\" should be a string, got {}", field, kind(other));
				error!("Failed to parse {} reply: {}", self.step, reason);
				Err(PipelineError::Parse { step: self.step, raw: self.raw.clone(), reason })
			},
		}
	}

	/// Looks up a string field which must be present.
	pub fn required(&self, field: &'static str) -> Result<&str, PipelineError> {
		self.optional(field)?.ok_or_else(|| self.missing(field))
	}

	/// Builds the error for a field that is absent or holds no usable value.
	pub fn missing(&self, field: &'static str) -> PipelineError {
		error!("{} reply has no value for \"{}\"", self.step, field);
		PipelineError::MissingField { step: self.step, field, raw: self.raw.clone() }
	}
}

/// Strips a single surrounding markdown code fence, if there is one.
pub fn unfence(raw: &str) -> &str {
	let trimmed = raw.trim();
	let Some(body) = trimmed.strip_prefix("```") else { return trimmed };
	let Some(body) = body.strip_suffix("```") else { return trimmed };

	// drop the info string, e.g. ```json
	match body.split_once('\n') {
		Some((info, rest)) if !info.trim_start().starts_with('{') => rest.trim(),
		_ => body.trim(),
	}
}

fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
