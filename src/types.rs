use std::fmt::Display;

use async_openai::{error::OpenAIError, types::Role};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Marker for a feature that could not be found in the user's text.
pub const NOT_AVAILABLE: &str = "not_available";

/// Gender assumed when the user's text does not mention one.
pub const DEFAULT_GENDER: &str = "male";

/// Upper bound on the number of words asked of the styling recommendation.
pub const MAX_STYLING_WORDS: usize = 30;

/// The steps of the pipeline that produce a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
	/// The user's original text.
	Input,
	FeatureExtraction,
	ColorRecommendation,
	ClothingRecommendation,
}

impl Display for Step {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Input => write!(f, "input"),
			Self::FeatureExtraction => write!(f, "feature extraction"),
			Self::ColorRecommendation => write!(f, "color recommendation"),
			Self::ClothingRecommendation => write!(f, "clothing recommendation"),
		}
	}
}

/// A single entry of a [`Conversation`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
	pub role: Role,
	pub step: Step,
	pub content: String,
	pub timestamp: String,
}

impl Message {
	pub fn new(role: Role, step: Step, content: String) -> Self {
		Self { role, step, content, timestamp: chrono::Utc::now().to_rfc3339() }
	}
}

/// Append-only log of every message produced while weaving a recommendation.
///
/// Messages can only be pushed to the back and are never handed out mutably, so a message keeps
/// its content for the rest of the run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
	messages: Vec<Message>,
}

impl Conversation {
	/// Starts a conversation with the user's text as its first message.
	pub fn new(input: impl Into<String>) -> Self {
		Self { messages: vec![Message::new(Role::User, Step::Input, input.into())] }
	}

	pub fn push(&mut self, msg: Message) {
		self.messages.push(msg);
	}

	pub fn messages(&self) -> &[Message] {
		&self.messages
	}

	pub fn last(&self) -> Option<&Message> {
		self.messages.last()
	}

}

/// A single fashion attribute pulled out of free text.
///
/// Serialized as the plain value, or as [`NOT_AVAILABLE`] when it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Attribute {
	Known(String),
	NotAvailable,
}

impl Attribute {
	pub fn is_available(&self) -> bool {
		matches!(self, Self::Known(_))
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Known(value) => value,
			Self::NotAvailable => NOT_AVAILABLE,
		}
	}
}

impl From<String> for Attribute {
	fn from(value: String) -> Self {
		let value = value.trim().to_lowercase();
		if value.is_empty() || value == NOT_AVAILABLE {
			Self::NotAvailable
		} else {
			Self::Known(value)
		}
	}
}

impl From<&str> for Attribute {
	fn from(value: &str) -> Self {
		Self::from(value.to_string())
	}
}

impl From<Attribute> for String {
	fn from(attribute: Attribute) -> Self {
		attribute.as_str().to_string()
	}
}

impl Display for Attribute {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Fashion relevant features extracted from the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
	pub gender: Attribute,
	pub color: Attribute,
	pub occasion: Attribute,
	pub season: Attribute,
	pub personal_fashion_taste: Attribute,
}

impl FeatureRecord {
	pub fn to_json(&self) -> String {
		json!({
			"gender": self.gender.as_str(),
			"color": self.color.as_str(),
			"occasion": self.occasion.as_str(),
			"season": self.season.as_str(),
			"personal_fashion_taste": self.personal_fashion_taste.as_str(),
		})
		.to_string()
	}
}

/// A color picked for the user when their text did not name one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRecommendation {
	pub color: String,
}

impl ColorRecommendation {
	pub fn to_json(&self) -> String {
		json!({ "color": self.color }).to_string()
	}
}

/// Final styling advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
	pub clothing: String,
}

impl Recommendation {
	pub fn to_json(&self) -> String {
		json!({ "clothing": self.clothing }).to_string()
	}

	pub fn word_count(&self) -> usize {
		self.clothing.split_whitespace().count()
	}
}

/// Outcome of the branch taken after feature extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
	ColorAvailable,
	ColorUnavailable,
}

impl Route {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::ColorAvailable => "color_available",
			Self::ColorUnavailable => "color_unavailable",
		}
	}
}

impl Display for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Features paired with the color the clothing step should work with.
///
/// Carries where the color came from so the clothing step never has to look it up in the
/// [`Conversation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Palette {
	/// The user named the color themselves.
	Stated { record: FeatureRecord, color: String },
	/// The color was recommended because the user did not name one.
	Recommended { record: FeatureRecord, color: String },
}

impl Palette {
	pub fn record(&self) -> &FeatureRecord {
		match self {
			Self::Stated { record, .. } | Self::Recommended { record, .. } => record,
		}
	}

	pub fn color(&self) -> &str {
		match self {
			Self::Stated { color, .. } | Self::Recommended { color, .. } => color,
		}
	}

	pub fn route(&self) -> Route {
		match self {
			Self::Stated { .. } => Route::ColorAvailable,
			Self::Recommended { .. } => Route::ColorUnavailable,
		}
	}
}

/// Everything produced by a successful run of the pipeline.
#[derive(Debug, Clone)]
pub struct Fitting {
	pub conversation: Conversation,
	pub features: FeatureRecord,
	pub palette: Palette,
	pub recommendation: Recommendation,
}

impl Fitting {
	pub fn route(&self) -> Route {
		self.palette.route()
	}
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
	/// Failed to prompt OpenAI.
	Prompt(#[from] OpenAIError),
	/// The response did not contain any content.
	EmptyResponse,
	/// The prompt leaves no room for the completion in the model's context window.
	PromptTooLong { tokens: u32, limit: u32 },
	/// Bad configuration
	BadConfig(String),
}

impl Display for LlmError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Prompt(e) => write!(f, "Failed to prompt OpenAI: {}", e),
			Self::EmptyResponse => write!(f, "Failed to get content from LLM response"),
			Self::PromptTooLong { tokens, limit } =>
				write!(f, "Prompt needs {} tokens but only {} are available", tokens, limit),
			Self::BadConfig(msg) => write!(f, "Bad configuration: {}", msg),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
	/// The LLM could not be prompted.
	Completion { step: Step, source: LlmError },
	/// The LLM replied with something that is not the expected JSON object.
	Parse { step: Step, raw: String, reason: String },
	/// The reply lacks a field, or holds [`NOT_AVAILABLE`] where a value is required.
	MissingField { step: Step, field: &'static str, raw: String },
}

impl PipelineError {
	/// The step that failed.
	pub fn step(&self) -> Step {
		match self {
			Self::Completion { step, .. } |
			Self::Parse { step, .. } |
			Self::MissingField { step, .. } => *step,
		}
	}

	/// The offending reply, when the LLM produced one.
	pub fn raw(&self) -> Option<&str> {
		match self {
			Self::Completion { .. } => None,
			Self::Parse { raw, .. } | Self::MissingField { raw, .. } => Some(raw),
		}
	}
}

impl Display for PipelineError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Completion { step, source } => write!(f, "{} failed: {}", step, source),
			Self::Parse { step, raw, reason } =>
				write!(f, "{} returned unparseable output ({}): {:?}", step, reason, raw),
			Self::MissingField { step, field, raw } =>
				write!(f, "{} did not return a value for \"{}\": {:?}", step, field, raw),
		}
	}
}
