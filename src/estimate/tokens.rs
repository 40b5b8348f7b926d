use crate::core::{Configuration, DataType, InputTokens, Model, Provider, TokenResult};
use crate::error::EstimateError;
use crate::pricing::policy_for;

use super::image::estimate_image;
use super::tokenizer::Tokenizer;

/// Conventions assumed when no model is given
pub(crate) const DEFAULT_PROVIDER: Provider = Provider::OpenAi;

/// Token counts for one item of the workload
pub(crate) fn estimate_tokens(
    config: &Configuration,
    model: Option<&Model>,
    tokenizer: &dyn Tokenizer,
) -> Result<TokenResult, EstimateError> {
    let provider = model.map_or(DEFAULT_PROVIDER, |m| m.provider);

    let text = tokenizer.count(&config.prompt);
    let document = match config.data_type {
        DataType::Pdfs => {
            let per_page = policy_for(provider).tokens_per_page(config.pdf_data.token_per_page);
            u64::from(config.pdf_data.pages).saturating_mul(u64::from(per_page))
        }
        _ => 0,
    };
    let image = match config.data_type {
        DataType::Images => estimate_image(provider, config.image_size)?.tokens,
        _ => 0,
    };
    let output = tokenizer.count(&config.example);

    let input_total = text.saturating_add(document).saturating_add(image);
    Ok(TokenResult {
        input: InputTokens {
            text,
            document,
            image,
            total: input_total,
        },
        output,
        total: input_total.saturating_add(output),
    })
}
