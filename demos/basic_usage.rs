use async_trait::async_trait;
use fashion_weaver::{prompts, Atelier, Llm, LlmError, PromptFields};
use serde_json::json;

// A rule based stand-in for a hosted model, answering each step by keyword.
#[derive(Debug, Default)]
struct KeywordLlm;

#[async_trait]
impl Llm for KeywordLlm {
	fn name(&self) -> &str {
		"KeywordLlm"
	}

	async fn complete(&self, instructions: &str, fields: &PromptFields) -> Result<String, LlmError> {
		let reply = match instructions {
			prompts::FEATURE_EXTRACTION => {
				let text = fields.get("input_text").unwrap_or_default().to_lowercase();
				let find = |words: &[&'static str]| {
					words.iter().find(|w| text.contains(*w)).copied().unwrap_or("not_available")
				};

				json!({
					"gender": find(&["woman", "female", "male"]),
					"color": find(&["red", "blue", "yellow", "green", "black"]),
					"occasion": find(&["wedding", "beach party", "interview"]),
					"season": find(&["spring", "summer", "fall", "winter"]),
					"personal_fashion_taste": "not_available",
				})
			},
			prompts::COLOR_RECOMMENDATION => match fields.get("season") {
				Some("summer") => json!({ "color": "coral" }),
				Some("winter") => json!({ "color": "burgundy" }),
				_ => json!({ "color": "navy" }),
			},
			prompts::CLOTHING_RECOMMENDATION => json!({
				"clothing": format!(
					"a {} outfit suited to a {} in {}",
					fields.get("color").unwrap_or_default(),
					fields.get("occasion").unwrap_or_default(),
					fields.get("season").unwrap_or_default(),
				)
			}),
			_ => return Err(LlmError::BadConfig("unknown instructions".to_string())),
		};

		Ok(reply.to_string())
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let atelier = Atelier::new(KeywordLlm);

	for input in [
		"I am male looking for fashion ideas to attend my friend's wedding in Fall. I love Yellow \
		 color.",
		"I'm a woman going to a summer beach party.",
	] {
		let fitting = atelier.weave(input).await?;

		println!("Input: {}", input);
		println!("Route: {}", fitting.route());
		println!("Color: {}", fitting.palette.color());
		println!("Styling: {}", fitting.recommendation.clothing);
		println!();
	}

	Ok(())
}
