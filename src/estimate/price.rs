use crate::core::{Configuration, DataType, InputCost, Model, PricingResult, TokenResult};
use crate::error::EstimateError;
use crate::pricing::ProviderPolicy;

use super::image::estimate_image;

const TOKENS_PER_RATE_UNIT: f64 = 1_000_000.0;

fn per_token(rate_per_million: f64) -> f64 {
    rate_per_million / TOKENS_PER_RATE_UNIT
}

/// Keep NaN and infinities out of results
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Sum of finite parts, saturated instead of overflowing to infinity
fn saturating_sum(parts: &[f64]) -> f64 {
    parts.iter().sum::<f64>().clamp(f64::MIN, f64::MAX)
}

/// Cost of the whole workload (all `data_count` items) on one model
pub(crate) fn calculate_price(
    config: &Configuration,
    model: &Model,
    tokens: &TokenResult,
    policy: &ProviderPolicy,
) -> Result<PricingResult, EstimateError> {
    let items = config.data_count as f64;
    let batch = policy.batch_multiplier(config.batch_enabled);
    let scale = items * batch;

    let text = finite_or_zero(tokens.input.text as f64 * per_token(model.input_cost) * scale);
    let output_cost = finite_or_zero(tokens.output as f64 * per_token(model.output_cost) * scale);

    // Items 2..N reuse the first item's prompt prefix at the cache rate
    let cached_cost = model.cache_cost.map(|rate| {
        let repeats = config.data_count.saturating_sub(1) as f64;
        finite_or_zero(repeats * tokens.input.text as f64 * per_token(rate) * batch)
    });

    let document = match config.data_type {
        DataType::Pdfs => match policy.pdf_price_per_k_pages {
            Some(per_k_pages) => f64::from(config.pdf_data.pages) / 1000.0 * per_k_pages * scale,
            None => tokens.input.document as f64 * per_token(model.input_cost) * scale,
        },
        _ => 0.0,
    };
    let document = finite_or_zero(document);

    let image = match config.data_type {
        DataType::Images => {
            let estimate = estimate_image(model.provider, config.image_size)?;
            match estimate.direct_cost {
                Some(per_image) => per_image * scale,
                None => per_token(model.input_cost) * tokens.input.image as f64 * scale,
            }
        }
        _ => 0.0,
    };
    let image = finite_or_zero(image);

    let input_cost = InputCost {
        text,
        document,
        image,
        total: saturating_sum(&[text, document, image, cached_cost.unwrap_or(0.0)]),
    };

    Ok(PricingResult {
        tokens: *tokens,
        total_tokens: tokens.total.saturating_mul(config.data_count),
        input_cost,
        cached_cost,
        output_cost,
        total_cost: saturating_sum(&[text, output_cost, document, image]),
    })
}
