use std::error::Error;

use clap::Parser;
use fashion_weaver::{models::Models, Atelier, OpenAiLlm, Parameters};
use tracing::{info, Level};
use tracing_subscriber::fmt;

#[derive(Parser, Debug)]
#[command(about = "Weave a color, clothing and styling recommendation from free-form text")]
struct Args {
	/// Free-form text describing the person, the occasion and any preferences.
	#[arg(
		default_value = "I am male looking for fashion ideas to attend my friend's wedding in \
		                 Fall. I love Yellow color."
	)]
	input: String,
	/// OpenAI model to use, also sizing the context window when `--model-name` is set.
	#[arg(long, value_enum, default_value_t = Models::default())]
	model: Models,
	/// Model name sent to the endpoint instead of `--model`, e.g. `amazon.nova-micro-v1:0`.
	#[arg(long, env = "OPENAI_MODEL")]
	model_name: Option<String>,
	/// Sampling temperature.
	#[arg(long, default_value_t = Parameters::default().temperature)]
	temperature: f32,
	/// Maximum number of tokens generated per step.
	#[arg(long, default_value_t = Parameters::default().max_tokens)]
	max_tokens: u32,
	/// Base URL of an OpenAI compatible API.
	#[arg(long, env = "OPENAI_API_BASE")]
	api_base: Option<String>,
	/// Log level
	#[arg(long, default_value = "info")]
	log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv::dotenv().ok();

	let args = Args::parse();

	let subscriber = fmt::Subscriber::builder().with_max_level(args.log_level).finish();
	tracing::subscriber::set_global_default(subscriber)?;

	info!(task = "tracing_setup", result = "success", "tracing successfully set up");

	let params = Parameters { temperature: args.temperature, max_tokens: args.max_tokens };
	let mut llm = match args.api_base {
		Some(api_base) => OpenAiLlm::with_api_base(api_base, args.model, params),
		None => OpenAiLlm::new(args.model, params),
	};
	if let Some(model_name) = args.model_name {
		llm = llm.with_model_name(model_name);
	}

	let atelier = Atelier::new(llm);
	let styling = atelier.recommend(&args.input).await?;

	println!("Input user text: {}", args.input);
	println!("Agentic Response: {}", styling);

	Ok(())
}
