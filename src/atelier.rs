use async_openai::types::Role;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::{
	prompts,
	reply::Reply,
	types::{
		Attribute, ColorRecommendation, Conversation, FeatureRecord, Fitting, Message, Palette,
		PipelineError, Recommendation, Route, Step, DEFAULT_GENDER, MAX_STYLING_WORDS,
	},
	Llm, PromptFields, Result,
};

/// The machine that turns free-form text into a styling recommendation.
///
/// Runs feature extraction, then color recommendation when the text names no color, then
/// clothing recommendation. Each step waits for its completion before the next one starts and
/// appends exactly one message to the [`Conversation`].
///
/// The [`Llm`] is injected so any backend, or a scripted one in tests, can drive the pipeline.
#[derive(Debug)]
pub struct Atelier<L: Llm> {
	llm: L,
}

impl<L: Llm> Atelier<L> {
	pub fn new(llm: L) -> Self {
		Self { llm }
	}

	pub fn llm(&self) -> &L {
		&self.llm
	}

	/// Weaves a styling recommendation for `input` and returns only the styling text.
	pub async fn recommend(&self, input: &str) -> Result<String> {
		Ok(self.weave(input).await?.recommendation.clothing)
	}

	/// Weaves a styling recommendation for `input`.
	///
	/// Returns every intermediate result along with the conversation. Any failing step aborts the
	/// run; nothing is returned for the steps that did succeed.
	#[instrument(skip(self, input), fields(llm = self.llm.name()))]
	pub async fn weave(&self, input: &str) -> Result<Fitting> {
		let mut conversation = Conversation::new(input);

		let features = self.extract_features(&mut conversation, input).await?;

		let route = Self::route(&features);
		debug!(route = %route, "Routing after feature extraction");

		let palette = match route {
			Route::ColorAvailable => Palette::Stated {
				color: features.color.as_str().to_string(),
				record: features.clone(),
			},
			Route::ColorUnavailable => {
				let ColorRecommendation { color } =
					self.recommend_color(&mut conversation, &features).await?;
				Palette::Recommended { record: features.clone(), color }
			},
		};

		let recommendation = self.recommend_clothing(&mut conversation, &palette).await?;

		info!(route = %route, color = palette.color(), "Recommendation woven");

		Ok(Fitting { conversation, features, palette, recommendation })
	}

	/// Extracts the fashion features mentioned in `input`.
	///
	/// Features which are not mentioned are [`Attribute::NotAvailable`], except for the gender
	/// which falls back to [`DEFAULT_GENDER`].
	pub async fn extract_features(
		&self,
		conversation: &mut Conversation,
		input: &str,
	) -> Result<FeatureRecord> {
		let step = Step::FeatureExtraction;
		let raw = self
			.prompt(step, prompts::FEATURE_EXTRACTION, PromptFields::new().with("input_text", input))
			.await?;

		let reply = Reply::parse(step, &raw)?;

		let gender = match reply.optional("gender")?.map(Attribute::from) {
			Some(gender @ Attribute::Known(_)) => gender,
			_ => Attribute::from(DEFAULT_GENDER),
		};

		let record = FeatureRecord {
			gender,
			color: reply.required("color")?.into(),
			occasion: reply.required("occasion")?.into(),
			season: reply.required("season")?.into(),
			personal_fashion_taste: reply.required("personal_fashion_taste")?.into(),
		};

		debug!("Extracted features: {:?}", record);

		conversation.push(Message::new(Role::Assistant, step, record.to_json()));

		Ok(record)
	}

	/// Decides whether a color has to be recommended before the clothing.
	pub fn route(features: &FeatureRecord) -> Route {
		if features.color.is_available() {
			Route::ColorAvailable
		} else {
			Route::ColorUnavailable
		}
	}

	/// Recommends a color from the gender, occasion and season of `features`.
	///
	/// A reply without a concrete color is a [`PipelineError::MissingField`].
	pub async fn recommend_color(
		&self,
		conversation: &mut Conversation,
		features: &FeatureRecord,
	) -> Result<ColorRecommendation> {
		let step = Step::ColorRecommendation;
		let fields = PromptFields::new()
			.with("gender", features.gender.as_str())
			.with("occasion", features.occasion.as_str())
			.with("season", features.season.as_str());

		let raw = self.prompt(step, prompts::COLOR_RECOMMENDATION, fields).await?;
		let reply = Reply::parse(step, &raw)?;

		let recommendation = match Attribute::from(reply.required("color")?) {
			Attribute::Known(color) => ColorRecommendation { color },
			Attribute::NotAvailable => return Err(reply.missing("color")),
		};

		debug!("Recommended color: {}", recommendation.color);

		conversation.push(Message::new(Role::Assistant, step, recommendation.to_json()));

		Ok(recommendation)
	}

	/// Recommends the clothing and styling for the features and color held by `palette`.
	pub async fn recommend_clothing(
		&self,
		conversation: &mut Conversation,
		palette: &Palette,
	) -> Result<Recommendation> {
		let step = Step::ClothingRecommendation;
		let record = palette.record();
		let fields = PromptFields::new()
			.with("gender", record.gender.as_str())
			.with("occasion", record.occasion.as_str())
			.with("season", record.season.as_str())
			.with("color", palette.color())
			.with("personal_fashion_taste", record.personal_fashion_taste.as_str());

		let raw = self.prompt(step, prompts::CLOTHING_RECOMMENDATION, fields).await?;
		let reply = Reply::parse(step, &raw)?;

		let clothing = reply.required("clothing")?.trim();
		if clothing.is_empty() {
			return Err(reply.missing("clothing"))
		}

		let recommendation = Recommendation { clothing: clothing.to_string() };

		if recommendation.word_count() > MAX_STYLING_WORDS {
			warn!(
				"Styling recommendation has {} words, asked for less than {}",
				recommendation.word_count(),
				MAX_STYLING_WORDS
			);
		}

		conversation.push(Message::new(Role::Assistant, step, recommendation.to_json()));

		Ok(recommendation)
	}

	async fn prompt(&self, step: Step, instructions: &str, fields: PromptFields) -> Result<String> {
		trace!("Prompting {} for {} with {:?}", self.llm.name(), step, fields);

		let raw = self.llm.complete(instructions, &fields).await.map_err(|source| {
			error!("Failed to prompt LLM during {}: {}", step, source);
			PipelineError::Completion { step, source }
		})?;

		trace!("{} replied: {}", step, raw);

		Ok(raw)
	}
}
