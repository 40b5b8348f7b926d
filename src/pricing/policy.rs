//! Provider-level pricing rules that apply on top of a model's rates

use crate::core::Provider;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ProviderPolicy {
    /// Cost multiplier for batch/offline processing, in (0, 1]
    pub(crate) batch_discount: Option<f64>,
    /// Fixed tokens-per-page billed for PDFs, overriding the user's value
    pub(crate) pdf_tokens_per_page: Option<u32>,
    /// Flat PDF price per thousand pages, replacing token billing
    pub(crate) pdf_price_per_k_pages: Option<f64>,
}

impl ProviderPolicy {
    /// Multiplier applied to every cost component. Out-of-range discounts
    /// are treated as "no discount" so batching never raises a price.
    pub(crate) fn batch_multiplier(&self, batch_enabled: bool) -> f64 {
        if !batch_enabled {
            return 1.0;
        }
        match self.batch_discount {
            Some(d) if d.is_finite() && d > 0.0 && d <= 1.0 => d,
            _ => 1.0,
        }
    }

    /// Tokens billed per PDF page: the provider override, else the user's value
    pub(crate) fn tokens_per_page(&self, user_value: u32) -> u32 {
        self.pdf_tokens_per_page.unwrap_or(user_value)
    }
}

/// Static policy table
pub(crate) fn policy_for(provider: Provider) -> ProviderPolicy {
    match provider {
        Provider::Anthropic | Provider::OpenAi => ProviderPolicy {
            batch_discount: Some(0.5),
            ..ProviderPolicy::default()
        },
        Provider::Google => ProviderPolicy {
            batch_discount: Some(0.5),
            pdf_tokens_per_page: Some(258),
            pdf_price_per_k_pages: None,
        },
        Provider::Mistral => ProviderPolicy {
            batch_discount: Some(0.5),
            pdf_tokens_per_page: None,
            pdf_price_per_k_pages: Some(1.0),
        },
        Provider::Meta | Provider::DeepSeek => ProviderPolicy::default(),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn batch_multiplier_disabled_is_one() {
        assert_eq!(policy_for(Provider::Anthropic).batch_multiplier(false), 1.0);
    }

    #[test]
    fn batch_multiplier_uses_discount() {
        assert_eq!(policy_for(Provider::OpenAi).batch_multiplier(true), 0.5);
    }

    #[test]
    fn batch_multiplier_defaults_to_one_without_discount() {
        assert_eq!(policy_for(Provider::Meta).batch_multiplier(true), 1.0);
    }

    #[test]
    fn batch_multiplier_ignores_out_of_range_discount() {
        for bad in [0.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let policy = ProviderPolicy {
                batch_discount: Some(bad),
                ..ProviderPolicy::default()
            };
            assert_eq!(policy.batch_multiplier(true), 1.0, "discount {bad}");
        }
    }

    #[test]
    fn tokens_per_page_override() {
        assert_eq!(policy_for(Provider::Google).tokens_per_page(1500), 258);
        assert_eq!(policy_for(Provider::Anthropic).tokens_per_page(1500), 1500);
    }
}
