/// The following diagram shows the steps run by [`Atelier::weave`](crate::Atelier::weave) and the
/// branch taken after feature extraction.
///
/// Every step prompts the injected [`Llm`](crate::Llm) once and appends its parsed reply to the
/// [`Conversation`](crate::Conversation).
#[cfg_attr(doc, aquamarine::aquamarine)]
/// ```mermaid
/// graph TB
///     start((input text))
///     start --> extract
///     subgraph Atelier
///         extract[extract_features]
///         route{route}
///         color[recommend_color]
///         clothing[recommend_clothing]
///         extract -- FeatureRecord --> route
///         route -- color_available / Palette::Stated --> clothing
///         route -- color_unavailable --> color
///         color -- Palette::Recommended --> clothing
///     end
///     extract-. prompt .- llm
///     color-. prompt .- llm
///     clothing-. prompt .- llm
///     llm>Llm]
///     openai[OpenAiLlm]-. impl .- llm
///     clothing --> done((Recommendation))
/// ```
///
/// Routing is a pure function of the [`FeatureRecord`](crate::FeatureRecord) and never prompts
/// the LLM. The clothing step receives the color through the [`Palette`](crate::Palette) rather
/// than reading it back from the conversation.
pub struct Diagram;
