use std::sync::{Mutex, OnceLock};

use clap::{builder::PossibleValue, ValueEnum};
use tiktoken_rs::{cl100k_base, CoreBPE};

use crate::types::LlmError;

/// Tokens are an LLM concept which represent normally a third of a word (or 75%).
pub type Tokens = u32;

static ENCODER: OnceLock<Mutex<CoreBPE>> = OnceLock::new();

/// The cl100k encoder, built on first use.
fn encoder() -> Result<&'static Mutex<CoreBPE>, LlmError> {
	if let Some(bpe) = ENCODER.get() {
		return Ok(bpe)
	}

	let bpe = cl100k_base().map_err(|e| LlmError::BadConfig(e.to_string()))?;
	Ok(ENCODER.get_or_init(|| Mutex::new(bpe)))
}

/// Estimate the number of tokens in `content`.
///
/// Always uses the cl100k encoding. gpt-4o models tokenize with o200k, so for them the count is
/// approximate; it is only used to keep prompts clear of the context window.
pub fn count_tokens(content: &str) -> Result<Tokens, LlmError> {
	let tokens = encoder()?
		.lock()
		.map_err(|_| LlmError::BadConfig("token encoder lock poisoned".to_string()))?
		.encode_with_special_tokens(content);

	Tokens::try_from(tokens.len()).map_err(|_| {
		LlmError::BadConfig(format!("Number of tokens exceeds {}: {}", Tokens::MAX, tokens.len()))
	})
}

/// The OpenAI language models that are available to use.
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum Models {
	#[default]
	GPT4oMini,
	GPT4o,
	GPT35Turbo,
}

/// Clap value enum implementation for argument parsing.
impl ValueEnum for Models {
	fn value_variants<'a>() -> &'a [Self] {
		&[Self::GPT4oMini, Self::GPT4o, Self::GPT35Turbo]
	}

	fn to_possible_value(&self) -> Option<PossibleValue> {
		Some(PossibleValue::new(self.name()))
	}
}

impl Models {
	/// Get the model name.
	pub fn name(&self) -> &'static str {
		match self {
			Self::GPT4oMini => "gpt-4o-mini",
			Self::GPT4o => "gpt-4o",
			Self::GPT35Turbo => "gpt-3.5-turbo",
		}
	}

	/// Maximum number of tokens that can be processed at once by the model.
	pub fn max_context_tokens(&self) -> Tokens {
		match self {
			Self::GPT4oMini | Self::GPT4o => 128_000,
			Self::GPT35Turbo => 16_385,
		}
	}
}
