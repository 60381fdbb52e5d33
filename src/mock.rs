use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::*;

/// A call received by [`MockLlm`].
#[derive(Debug, Clone)]
pub struct MockCall {
	pub instructions: String,
	pub fields: PromptFields,
}

/// Replays scripted replies in order and records every call it receives.
#[derive(Debug, Default)]
pub struct MockLlm {
	replies: Mutex<VecDeque<std::result::Result<String, LlmError>>>,
	calls: Mutex<Vec<MockCall>>,
}

impl MockLlm {
	pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
		Self {
			replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
			calls: Mutex::default(),
		}
	}

	/// Fails the `n`th call (zero based) with `error`.
	pub fn failing_at(self, n: usize, error: LlmError) -> Self {
		self.replies.lock().unwrap().insert(n, Err(error));
		self
	}

	pub fn calls(&self) -> Vec<MockCall> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl Llm for MockLlm {
	fn name(&self) -> &str {
		"MockLlm"
	}

	async fn complete(
		&self,
		instructions: &str,
		fields: &PromptFields,
	) -> std::result::Result<String, LlmError> {
		self.calls
			.lock()
			.unwrap()
			.push(MockCall { instructions: instructions.to_string(), fields: fields.clone() });

		self.replies.lock().unwrap().pop_front().unwrap_or(Err(LlmError::EmptyResponse))
	}
}

pub const WEDDING_INPUT: &str = "I am male looking for fashion ideas to attend my friend's \
                                 wedding in Fall. I love Yellow color.";

pub const WEDDING_FEATURES: &str = r#"{"gender": "male", "color": "Yellow", "occasion": "wedding", "season": "fall", "personal_fashion_taste": "not_available"}"#;

pub const WEDDING_CLOTHING: &str = r#"{"clothing": "a tailored yellow blazer over a crisp white shirt, grey trousers and brown leather loafers suit an autumn wedding"}"#;

pub const BEACH_INPUT: &str = "I'm a woman going to a summer beach party.";

pub const BEACH_FEATURES: &str = r#"{"gender": "woman", "color": "not_available", "occasion": "beach party", "season": "summer", "personal_fashion_taste": "not_available"}"#;

pub const BEACH_COLOR: &str = r#"{"color": "coral"}"#;

pub const BEACH_CLOTHING: &str = r#"{"clothing": "a flowy coral sundress with flat sandals and a straw hat keeps you cool at a summer beach party"}"#;
