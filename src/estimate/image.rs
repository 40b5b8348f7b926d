//! Per-provider image token formulas

use crate::core::{ImageSize, Provider};
use crate::error::EstimateError;

/// Pixels per token for the priced area formula
const AREA_PRICED_DIVISOR: u64 = 750;
/// USD per million image tokens for the priced area formula
const AREA_PRICED_USD_PER_MTOK: f64 = 3.0;
/// Pixels per token for the unpriced area formula (28x28 patches)
const AREA_DIVISOR: u64 = 784;

const TILE_MAX_SIDE: u64 = 1024;
const TILE_SIDE: u64 = 512;
const TILE_BASE_TOKENS: u64 = 85;
const TILE_TOKENS: u64 = 170;
const TILE_USD_PER_TOKEN: f64 = 0.00765 / 765.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageFormula {
    /// `w*h/750` tokens with a published per-token price
    AreaPriced,
    /// `w*h/784` tokens, billed at the model's input rate
    Area,
    /// Resize to fit 1024, then `85 + 170` per 512px tile
    Tiles,
}

impl ImageFormula {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ImageFormula::AreaPriced => "area/750",
            ImageFormula::Area => "area/784",
            ImageFormula::Tiles => "tiles",
        }
    }
}

pub(crate) fn formula_for(provider: Provider) -> Option<ImageFormula> {
    match provider {
        Provider::Anthropic => Some(ImageFormula::AreaPriced),
        Provider::Google | Provider::Mistral => Some(ImageFormula::Area),
        Provider::OpenAi => Some(ImageFormula::Tiles),
        Provider::Meta | Provider::DeepSeek => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ImageEstimate {
    pub(crate) tokens: u64,
    /// Price of one image when the provider publishes one
    pub(crate) direct_cost: Option<f64>,
}

/// Tokens (and direct price, if any) for one image
pub(crate) fn estimate_image(
    provider: Provider,
    size: ImageSize,
) -> Result<ImageEstimate, EstimateError> {
    let formula =
        formula_for(provider).ok_or(EstimateError::UnsupportedImageProvider { provider })?;
    let (w, h) = (u64::from(size.width), u64::from(size.height));

    let estimate = match formula {
        ImageFormula::AreaPriced => {
            let tokens = (w * h).div_ceil(AREA_PRICED_DIVISOR);
            ImageEstimate {
                tokens,
                direct_cost: Some(tokens as f64 / 1_000_000.0 * AREA_PRICED_USD_PER_MTOK),
            }
        }
        ImageFormula::Area => ImageEstimate {
            tokens: (w * h).div_ceil(AREA_DIVISOR),
            direct_cost: None,
        },
        ImageFormula::Tiles => {
            let tokens = tile_tokens(w, h);
            ImageEstimate {
                tokens,
                direct_cost: Some(tokens as f64 * TILE_USD_PER_TOKEN),
            }
        }
    };
    Ok(estimate)
}

/// Scale so the longer side fits `TILE_MAX_SIDE`, keeping the aspect ratio
fn fit_within(w: u64, h: u64) -> (u64, u64) {
    let longer = w.max(h);
    if longer <= TILE_MAX_SIDE {
        return (w, h);
    }
    let scale = |side: u64| (side * TILE_MAX_SIDE / longer).max(1);
    (scale(w), scale(h))
}

fn tile_tokens(w: u64, h: u64) -> u64 {
    if w == 0 || h == 0 {
        return 0;
    }
    let (w, h) = fit_within(w, h);
    let tiles = w.div_ceil(TILE_SIDE) * h.div_ceil(TILE_SIDE);
    TILE_BASE_TOKENS + TILE_TOKENS * tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> ImageSize {
        ImageSize { width, height }
    }

    #[test]
    fn tiles_1024_square() {
        let est = estimate_image(Provider::OpenAi, size(1024, 1024)).unwrap();
        // 2x2 tiles: 85 + 170*4
        assert_eq!(est.tokens, 765);
        assert!((est.direct_cost.unwrap() - 0.00765).abs() < 1e-12);
    }

    #[test]
    fn tiles_resize_long_side() {
        // 2048x1024 -> 1024x512 -> 2x1 tiles
        assert_eq!(tile_tokens(2048, 1024), 85 + 170 * 2);
        // 4000x100 -> 1024x25 -> 2x1 tiles
        assert_eq!(tile_tokens(4000, 100), 85 + 170 * 2);
    }

    #[test]
    fn tiles_small_image_is_one_tile() {
        assert_eq!(tile_tokens(100, 100), 85 + 170);
    }

    #[test]
    fn fit_within_never_collapses_to_zero() {
        assert_eq!(fit_within(100_000, 1), (1024, 1));
    }

    #[test]
    fn area_priced_formula() {
        let est = estimate_image(Provider::Anthropic, size(1000, 750)).unwrap();
        assert_eq!(est.tokens, 1000);
        assert!((est.direct_cost.unwrap() - 0.003).abs() < 1e-12);
    }

    #[test]
    fn area_formula_has_no_price() {
        let est = estimate_image(Provider::Google, size(784, 100)).unwrap();
        assert_eq!(est.tokens, 100);
        assert_eq!(est.direct_cost, None);
    }

    #[test]
    fn area_rounds_up() {
        let est = estimate_image(Provider::Mistral, size(1, 1)).unwrap();
        assert_eq!(est.tokens, 1);
    }

    #[test]
    fn zero_dimensions_yield_zero() {
        for provider in [Provider::Anthropic, Provider::Google, Provider::OpenAi] {
            let est = estimate_image(provider, size(0, 512)).unwrap();
            assert_eq!(est.tokens, 0, "{provider}");
            assert!(est.direct_cost.unwrap_or(0.0) == 0.0);
        }
    }

    #[test]
    fn unsupported_provider_is_an_error() {
        assert_eq!(
            estimate_image(Provider::DeepSeek, size(512, 512)),
            Err(EstimateError::UnsupportedImageProvider {
                provider: Provider::DeepSeek
            })
        );
        assert!(estimate_image(Provider::Meta, size(0, 0)).is_err());
    }
}
