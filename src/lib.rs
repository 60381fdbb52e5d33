//! Chains LLM prompts into a fashion recommendation.
//!
//! Given free-form text such as _"I am male looking for fashion ideas to attend my friend's
//! wedding in Fall. I love Yellow color."_, fashion-weaver asks an LLM to:
//!
//! 1. extract the key features (gender, color, occasion, season, personal fashion taste) into a
//!    [`FeatureRecord`],
//! 2. recommend a color when the text did not name one,
//! 3. recommend the clothing and styling for those features.
//!
//! Every reply is expected to be JSON and is parsed defensively. Failures name the step that
//! failed along with the raw reply, see [`PipelineError`].
//!
//! The LLM is anything implementing [`Llm`]. [`OpenAiLlm`] talks to any OpenAI compatible chat
//! completions endpoint and requires the `OPENAI_API_KEY` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use fashion_weaver::{models::Models, Atelier, OpenAiLlm, Parameters};
//!
//! # async fn run() -> Result<(), fashion_weaver::PipelineError> {
//! let atelier = Atelier::new(OpenAiLlm::new(Models::GPT4oMini, Parameters::default()));
//!
//! let styling = atelier.recommend("I'm a woman going to a summer beach party.").await?;
//! println!("{}", styling);
//! # Ok(())
//! # }
//! ```
use std::fmt::Debug;

use async_trait::async_trait;

pub mod architecture;
pub mod atelier;
pub mod models;
pub mod openai;
pub mod prompts;
pub mod reply;
pub mod types;

#[cfg(test)]
mod mock;

pub use atelier::Atelier;
pub use openai::{OpenAiLlm, Parameters};
pub use types::{
	Attribute, ColorRecommendation, Conversation, FeatureRecord, Fitting, LlmError, Message,
	Palette, PipelineError, Recommendation, Route, Step,
};

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Named values filled into a prompt, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFields(Vec<(&'static str, String)>);

impl PromptFields {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder style insertion.
	pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.0.push((name, value.into()));
		self
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
	}

	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.0.iter().map(|(n, _)| *n)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		self.0.iter().map(|(n, v)| (*n, v.as_str()))
	}

	/// Renders the fields as the user message of a prompt.
	pub fn render(&self) -> String {
		self.iter().fold("#Inputs".to_string(), |mut acc, (name, value)| {
			acc.push('\n');
			acc.push_str(name);
			acc.push_str(": ");
			acc.push_str(value);
			acc
		})
	}
}

/// A text generation backend.
///
/// Implementations receive the system `instructions` and the named `fields` the step wants to
/// fill in, and return the raw completion. The returned text is not trusted; callers parse it.
#[async_trait]
pub trait Llm: Debug + Send + Sync {
	/// Name of the underlying model, used for logging.
	fn name(&self) -> &str;

	/// Prompts the model once.
	async fn complete(
		&self,
		instructions: &str,
		fields: &PromptFields,
	) -> std::result::Result<String, LlmError>;
}

#[async_trait]
impl<L: Llm + ?Sized> Llm for Box<L> {
	fn name(&self) -> &str {
		(**self).name()
	}

	async fn complete(
		&self,
		instructions: &str,
		fields: &PromptFields,
	) -> std::result::Result<String, LlmError> {
		(**self).complete(instructions, fields).await
	}
}
