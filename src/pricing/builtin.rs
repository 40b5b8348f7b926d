//! Catalog compiled into the binary. Costs are USD per million tokens.

use crate::core::{Model, Provider, Tier};

#[allow(clippy::too_many_arguments)]
fn model(
    id: &str,
    provider: Provider,
    tier: Tier,
    input_cost: f64,
    output_cost: f64,
    cache_cost: Option<f64>,
    tags: &[&str],
    max_token: u64,
    license: &str,
) -> Model {
    Model {
        id: id.to_string(),
        provider,
        tier,
        input_cost,
        output_cost,
        cache_cost,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        max_token,
        license: license.to_string(),
    }
}

#[rustfmt::skip]
pub(super) fn builtin_models() -> Vec<Model> {
    use Provider::*;
    use Tier::*;

    const PROPRIETARY: &str = "proprietary";

    vec![
        // Anthropic
        model("claude-3-5-haiku", Anthropic, Small, 0.8, 4.0, Some(0.08),
            &["vision", "multilingual", "tools"], 200_000, PROPRIETARY),
        model("claude-sonnet-4", Anthropic, Medium, 3.0, 15.0, Some(0.3),
            &["vision", "multilingual", "tools", "reasoning", "pdf"], 200_000, PROPRIETARY),
        model("claude-opus-4", Anthropic, Big, 15.0, 75.0, Some(1.5),
            &["vision", "multilingual", "tools", "reasoning", "pdf"], 200_000, PROPRIETARY),
        // OpenAI
        model("gpt-4o-mini", OpenAi, Small, 0.15, 0.6, Some(0.075),
            &["vision", "multilingual", "tools"], 128_000, PROPRIETARY),
        model("gpt-4.1-mini", OpenAi, Small, 0.4, 1.6, Some(0.1),
            &["vision", "multilingual", "tools"], 1_047_576, PROPRIETARY),
        model("gpt-4o", OpenAi, Medium, 2.5, 10.0, Some(1.25),
            &["vision", "multilingual", "tools"], 128_000, PROPRIETARY),
        model("gpt-4.1", OpenAi, Big, 2.0, 8.0, Some(0.5),
            &["vision", "multilingual", "tools", "pdf"], 1_047_576, PROPRIETARY),
        model("o3", OpenAi, Big, 2.0, 8.0, Some(0.5),
            &["vision", "tools", "reasoning"], 200_000, PROPRIETARY),
        // Google
        model("gemini-2.0-flash-lite", Google, Small, 0.075, 0.3, None,
            &["vision", "multilingual"], 1_048_576, PROPRIETARY),
        model("gemini-2.0-flash", Google, Small, 0.1, 0.4, Some(0.025),
            &["vision", "multilingual", "tools", "pdf"], 1_048_576, PROPRIETARY),
        model("gemini-2.5-pro", Google, Big, 1.25, 10.0, Some(0.31),
            &["vision", "multilingual", "tools", "reasoning", "pdf"], 1_048_576, PROPRIETARY),
        // Mistral
        model("mistral-small", Mistral, Small, 0.1, 0.3, None,
            &["multilingual", "tools"], 128_000, "apache-2.0"),
        model("mistral-medium", Mistral, Medium, 0.4, 2.0, None,
            &["vision", "multilingual", "tools"], 128_000, PROPRIETARY),
        model("pixtral-large", Mistral, Big, 2.0, 6.0, None,
            &["vision", "multilingual", "pdf"], 128_000, "mistral-research"),
        model("mistral-large", Mistral, Big, 2.0, 6.0, None,
            &["multilingual", "tools"], 128_000, "mistral-research"),
        // Meta (hosted open weights)
        model("llama-3.1-8b", Meta, Small, 0.05, 0.08, None,
            &["multilingual"], 128_000, "llama3.1"),
        model("llama-3.3-70b", Meta, Medium, 0.6, 0.6, None,
            &["multilingual", "tools"], 128_000, "llama3.3"),
        model("llama-3.1-405b", Meta, Big, 3.0, 3.0, None,
            &["multilingual", "tools"], 128_000, "llama3.1"),
        // DeepSeek
        model("deepseek-chat", DeepSeek, Medium, 0.27, 1.1, Some(0.07),
            &["multilingual", "tools"], 64_000, "mit"),
        model("deepseek-reasoner", DeepSeek, Big, 0.55, 2.19, Some(0.14),
            &["multilingual", "reasoning"], 64_000, "mit"),
    ]
}
