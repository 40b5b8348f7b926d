//! Token and price estimation
//!
//! Everything here is a pure function of its inputs: the same
//! (Configuration, Model) pair always produces the same result.

mod image;
mod price;
mod tokenizer;
mod tokens;

pub(crate) use image::formula_for;
#[cfg(test)]
pub(crate) use tokenizer::Heuristic;
pub(crate) use tokenizer::{Tokenizer, TokenizerSlot};
pub(crate) use tokens::DEFAULT_PROVIDER;

use price::calculate_price;
use tokens::estimate_tokens;

use crate::core::{Configuration, Model, PricingResult};
use crate::error::EstimateError;
use crate::pricing::policy_for;

/// Token estimate followed by the price calculation, using the model
/// provider's policy
pub(crate) fn estimate(
    config: &Configuration,
    model: &Model,
    tokenizer: &dyn Tokenizer,
) -> Result<PricingResult, EstimateError> {
    let tokens = estimate_tokens(config, Some(model), tokenizer)?;
    calculate_price(config, model, &tokens, &policy_for(model.provider))
}
