use async_openai::{
	config::OpenAIConfig,
	types::{
		ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
		ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
	},
	Client,
};
use async_trait::async_trait;
use tracing::{debug, error, instrument, trace};

use crate::{
	models::{count_tokens, Models, Tokens},
	types::LlmError,
	Llm, PromptFields,
};

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
	/// The sampling temperature, between 0 and 2. Lower values make the output more focused and
	/// deterministic, which keeps the JSON replies stable.
	///
	/// Defaults to `0.0`
	pub temperature: f32,
	/// Maximum number of tokens the model may generate per step.
	///
	/// Defaults to `256`
	pub max_tokens: Tokens,
}

impl Default for Parameters {
	fn default() -> Self {
		Self { temperature: 0.0, max_tokens: 256 }
	}
}

/// [`Llm`] implementation prompting any OpenAI compatible chat completions endpoint.
///
/// The API key is read from `OPENAI_API_KEY`. Rate limited requests are retried with exponential
/// backoff by the underlying client.
///
/// Endpoints serving models outside of [`Models`] are reached with
/// [`OpenAiLlm::with_model_name`]; the [`Models`] variant then only sizes the context window.
#[derive(Debug, Clone)]
pub struct OpenAiLlm {
	client: Client<OpenAIConfig>,
	model: Models,
	model_name: Option<String>,
	params: Parameters,
}

impl OpenAiLlm {
	pub fn new(model: Models, params: Parameters) -> Self {
		Self::with_config(OpenAIConfig::new(), model, params)
	}

	/// Points the client at a different OpenAI compatible endpoint.
	pub fn with_api_base(api_base: impl Into<String>, model: Models, params: Parameters) -> Self {
		Self::with_config(OpenAIConfig::new().with_api_base(api_base), model, params)
	}

	pub fn with_config(config: OpenAIConfig, model: Models, params: Parameters) -> Self {
		Self { client: Client::with_config(config), model, model_name: None, params }
	}

	/// Sends `name` as the model, e.g. `amazon.nova-micro-v1:0` behind a gateway.
	pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
		self.model_name = Some(name.into());
		self
	}

	fn build_messages(
		instructions: &str,
		fields: &PromptFields,
	) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
		Ok(vec![
			ChatCompletionRequestSystemMessageArgs::default()
				.content(instructions)
				.build()?
				.into(),
			ChatCompletionRequestUserMessageArgs::default().content(fields.render()).build()?.into(),
		])
	}

	/// Checks the prompt leaves room for [`Parameters::max_tokens`] in the context window.
	fn check_budget(&self, instructions: &str, fields: &PromptFields) -> Result<Tokens, LlmError> {
		let prompt_tokens =
			count_tokens(instructions)?.saturating_add(count_tokens(&fields.render())?);
		let limit = self.model.max_context_tokens().saturating_sub(self.params.max_tokens);

		trace!("Prompt tokens: {}, maximum allowed: {}", prompt_tokens, limit);

		if prompt_tokens > limit {
			error!("Prompt exceeds the context window of {}", self.name());
			return Err(LlmError::PromptTooLong { tokens: prompt_tokens, limit })
		}

		Ok(prompt_tokens)
	}
}

#[async_trait]
impl Llm for OpenAiLlm {
	fn name(&self) -> &str {
		self.model_name.as_deref().unwrap_or(self.model.name())
	}

	#[instrument(skip(self, instructions, fields), fields(model = self.name()))]
	async fn complete(&self, instructions: &str, fields: &PromptFields) -> Result<String, LlmError> {
		let prompt_tokens = self.check_budget(instructions, fields)?;

		let request = CreateChatCompletionRequestArgs::default()
			.model(self.name())
			.messages(Self::build_messages(instructions, fields)?)
			.max_tokens(self.params.max_tokens)
			.temperature(self.params.temperature)
			.build()?;

		let response = self.client.chat().create(request).await.map_err(|e| {
			error!("Failed to prompt OpenAI: {}", e);
			LlmError::Prompt(e)
		})?;

		if let Some(usage) = &response.usage {
			debug!(
				estimated_prompt_tokens = prompt_tokens,
				prompt_tokens = usage.prompt_tokens,
				completion_tokens = usage.completion_tokens,
				"OpenAI usage"
			);
		}

		response
			.choices
			.into_iter()
			.next()
			.and_then(|choice| choice.message.content)
			.ok_or_else(|| {
				error!("OpenAI response has no content");
				LlmError::EmptyResponse
			})
	}
}
