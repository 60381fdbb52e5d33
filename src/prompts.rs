//! Instructions sent as the system message of each step.

/// Pulls the key features out of the user's text.
pub const FEATURE_EXTRACTION: &str = r#"# Instruction
You are tasked with extracting value for key features from the input text. Key features include: gender, color, occasion, season or personal fashion taste. If no value is found for respective categories, use "not_available"

# Output
Use the following JSON format for output in all lowercase. Do not add any additional explanations, punctuations or reasonings.
## JSON Format
{"gender": "gender mentioned in the text, else assume male",
"color": "color mentioned in the text for clothes or footwear",
"occasion": "occasion that the clothes or footwear is intended for",
"season": "season that is mentioned or occasion that usually occurs in particular season",
"personal_fashion_taste": "any additional fashion taste or clues in the inputs"}"#;

/// Picks a color when the user did not name one.
pub const COLOR_RECOMMENDATION: &str = r#"# Instruction
You are tasked with recommending the best color for clothes and footwear based on the gender, season and occasion. Always name a concrete color.

# Output
Use the following JSON format for output in all lowercase. Do not add any additional explanations, punctuations or reasonings.
## JSON Format
{"color": ""}"#;

/// Writes the final styling summary.
pub const CLOTHING_RECOMMENDATION: &str = r#"# Instruction
You are tasked with recommending the clothing and styling summary based on the available key features: gender, color, occasion, season or personal fashion taste.

# Output
Use the following JSON format for output in all lowercase. Do not add any additional explanations, punctuations or reasonings.
## JSON Format
{"clothing": "recommend and explain the styling in less than 30 words"}"#;
