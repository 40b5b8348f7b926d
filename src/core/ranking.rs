//! Ranking and selection over priced models
//!
//! Prices every model that passes the filter, then offers sorted, grouped
//! and min/max views over the results.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::cli::SortOrder;
use crate::core::types::{Configuration, Model, ModelSize, PricingResult, Provider, Tier};
use crate::error::EstimateError;
use crate::estimate::{TokenizerSlot, estimate};

/// Which catalog models take part in a comparison
#[derive(Debug, Clone, Default)]
pub(crate) struct RankingFilter<'a> {
    tiers: &'a [Tier],
    model_size: ModelSize,
    providers: &'a [Provider],
    tags: &'a [String],
    search: Option<String>,
}

impl<'a> RankingFilter<'a> {
    pub(crate) fn from_config(config: &'a Configuration, search: Option<&str>) -> Self {
        Self {
            tiers: &config.selected_tiers,
            model_size: config.model_size,
            providers: &config.selected_providers,
            tags: &config.model_capabilities,
            search: search
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Lets every model through
    pub(crate) fn unfiltered() -> Self {
        Self::default()
    }

    pub(crate) fn matches(&self, model: &Model) -> bool {
        if !self.tiers.is_empty() && !self.tiers.contains(&model.tier) {
            return false;
        }
        if let Some(tier) = self.model_size.tier()
            && model.tier != tier
        {
            return false;
        }
        if !self.providers.is_empty() && !self.providers.contains(&model.provider) {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| model.has_tag(t)) {
            return false;
        }
        if let Some(search) = &self.search
            && !model.id.to_lowercase().contains(search)
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RankedModel<'a> {
    pub(crate) model: &'a Model,
    pub(crate) result: PricingResult,
}

/// A model that could not be priced for this workload
#[derive(Debug, Clone)]
pub(crate) struct SkippedModel<'a> {
    pub(crate) model: &'a Model,
    pub(crate) error: EstimateError,
}

#[derive(Debug, Clone)]
pub(crate) struct ProviderGroup<'r, 'a> {
    pub(crate) provider: Provider,
    /// Ascending by total cost; the first entry is the cheapest
    pub(crate) entries: Vec<&'r RankedModel<'a>>,
}

impl<'r, 'a> ProviderGroup<'r, 'a> {
    pub(crate) fn cheapest(&self) -> Option<&'r RankedModel<'a>> {
        self.entries.first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CostBounds {
    pub(crate) min: f64,
    pub(crate) max: f64,
    /// Render as a single value rather than a range
    pub(crate) min_is_max: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Ranking<'a> {
    pub(crate) entries: Vec<RankedModel<'a>>,
    pub(crate) skipped: Vec<SkippedModel<'a>>,
}

/// NaN sorts last
pub(crate) fn compare_cost(a: f64, b: f64) -> Ordering {
    if a.is_nan() && b.is_nan() {
        Ordering::Equal
    } else if a.is_nan() {
        Ordering::Greater
    } else if b.is_nan() {
        Ordering::Less
    } else {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}

/// Price every model that passes `filter`. Entries keep catalog order.
pub(crate) fn rank<'a>(
    config: &Configuration,
    models: &'a [Model],
    filter: &RankingFilter<'_>,
    tokenizers: &TokenizerSlot,
) -> Ranking<'a> {
    let priced: Vec<(&'a Model, Result<PricingResult, EstimateError>)> = models
        .par_iter()
        .filter(|m| filter.matches(m))
        .map(|model| {
            let tokenizer = tokenizers.current(model.provider);
            (model, estimate(config, model, tokenizer.as_ref()))
        })
        .collect();

    let mut ranking = Ranking::default();
    for (model, result) in priced {
        match result {
            Ok(result) => ranking.entries.push(RankedModel { model, result }),
            Err(error) => {
                tracing::debug!(model = %model.id, "skipping: {error}");
                ranking.skipped.push(SkippedModel { model, error });
            }
        }
    }
    ranking
}

impl<'a> Ranking<'a> {
    /// Stable sort by total cost; ties keep their previous order
    pub(crate) fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::Asc => self
                .entries
                .sort_by(|a, b| compare_cost(a.result.total_cost, b.result.total_cost)),
            SortOrder::Desc => self
                .entries
                .sort_by(|a, b| compare_cost(b.result.total_cost, a.result.total_cost)),
        }
    }

    pub(crate) fn by_provider(&self) -> Vec<ProviderGroup<'_, 'a>> {
        let mut groups: BTreeMap<Provider, Vec<&RankedModel<'a>>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.model.provider).or_default().push(entry);
        }
        groups
            .into_iter()
            .map(|(provider, mut entries)| {
                entries.sort_by(|a, b| compare_cost(a.result.total_cost, b.result.total_cost));
                ProviderGroup { provider, entries }
            })
            .collect()
    }

    pub(crate) fn bounds(&self) -> Option<CostBounds> {
        let mut costs = self.entries.iter().map(|e| e.result.total_cost);
        let first = costs.next()?;
        let (min, max) = costs.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));
        Some(CostBounds {
            min,
            max,
            min_is_max: min == max,
        })
    }

    /// Cheapest entry; the earliest one wins a tie
    pub(crate) fn best_value(&self) -> Option<&RankedModel<'a>> {
        self.entries.iter().reduce(|best, e| {
            if compare_cost(e.result.total_cost, best.result.total_cost) == Ordering::Less {
                e
            } else {
                best
            }
        })
    }
}

/// Percent above the cheapest cost, if that is meaningful
pub(crate) fn premium_over(cost: f64, min: f64) -> Option<f64> {
    if min.is_nan() || min <= 0.0 || !cost.is_finite() {
        return None;
    }
    let pct = (cost - min) / min * 100.0;
    pct.is_finite().then_some(pct)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::estimate::Heuristic;
    use crate::pricing::Catalog;
    use std::sync::Arc;

    fn heuristic_slot() -> TokenizerSlot {
        TokenizerSlot::with_loader(|_| None::<Arc<dyn crate::estimate::Tokenizer>>)
    }

    fn workload() -> Configuration {
        Configuration {
            data_count: 1000,
            prompt: "Summarize the following support ticket in one sentence.".into(),
            example: "Customer cannot log in after password reset.".into(),
            ..Configuration::default()
        }
    }

    fn model(id: &str, provider: Provider, tier: Tier, input: f64, tags: &[&str]) -> Model {
        Model {
            id: id.into(),
            provider,
            tier,
            input_cost: input,
            output_cost: input,
            cache_cost: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            max_token: 1000,
            license: String::new(),
        }
    }

    #[test]
    fn empty_filter_admits_everything() {
        let catalog = Catalog::builtin();
        let config = Configuration::default();
        let filter = RankingFilter::from_config(&config, None);
        assert!(catalog.models().iter().all(|m| filter.matches(m)));
    }

    #[test]
    fn filter_by_tier_provider_tag_and_search() {
        let m = model("Claude-Test", Provider::Anthropic, Tier::Small, 1.0, &["vision"]);

        let config = Configuration {
            selected_tiers: vec![Tier::Big],
            ..Configuration::default()
        };
        assert!(!RankingFilter::from_config(&config, None).matches(&m));

        let config = Configuration {
            selected_tiers: vec![Tier::Small, Tier::Big],
            selected_providers: vec![Provider::OpenAi],
            ..Configuration::default()
        };
        assert!(!RankingFilter::from_config(&config, None).matches(&m));

        let config = Configuration {
            selected_providers: vec![Provider::Anthropic],
            model_capabilities: vec!["audio".into(), "VISION".into()],
            ..Configuration::default()
        };
        assert!(RankingFilter::from_config(&config, None).matches(&m));
        assert!(RankingFilter::from_config(&config, Some("claude-t")).matches(&m));
        assert!(!RankingFilter::from_config(&config, Some("gpt")).matches(&m));
        assert!(RankingFilter::from_config(&config, Some("   ")).matches(&m));
    }

    #[test]
    fn model_size_narrows_tier() {
        let m = model("x", Provider::Meta, Tier::Medium, 1.0, &[]);
        let config = Configuration {
            model_size: ModelSize::Big,
            ..Configuration::default()
        };
        assert!(!RankingFilter::from_config(&config, None).matches(&m));
        let config = Configuration {
            model_size: ModelSize::Medium,
            ..Configuration::default()
        };
        assert!(RankingFilter::from_config(&config, None).matches(&m));
    }

    #[test]
    fn sort_ascending_and_descending() {
        let models = vec![
            model("mid", Provider::OpenAi, Tier::Medium, 2.0, &[]),
            model("cheap", Provider::Google, Tier::Small, 1.0, &[]),
            model("pricey", Provider::Anthropic, Tier::Big, 5.0, &[]),
        ];
        let config = workload();
        let mut ranking = rank(&config, &models, &RankingFilter::unfiltered(), &heuristic_slot());
        ranking.sort(SortOrder::Asc);
        let ids: Vec<&str> = ranking.entries.iter().map(|e| e.model.id.as_str()).collect();
        assert_eq!(ids, ["cheap", "mid", "pricey"]);
        ranking.sort(SortOrder::Desc);
        let ids: Vec<&str> = ranking.entries.iter().map(|e| e.model.id.as_str()).collect();
        assert_eq!(ids, ["pricey", "mid", "cheap"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let models = vec![
            model("first", Provider::OpenAi, Tier::Small, 1.0, &[]),
            model("second", Provider::Google, Tier::Small, 1.0, &[]),
        ];
        let mut ranking = rank(&workload(), &models, &RankingFilter::unfiltered(), &heuristic_slot());
        ranking.sort(SortOrder::Asc);
        assert_eq!(ranking.entries[0].model.id, "first");
        ranking.sort(SortOrder::Desc);
        assert_eq!(ranking.entries[0].model.id, "first");
        assert_eq!(ranking.best_value().unwrap().model.id, "first");
    }

    #[test]
    fn groups_mark_cheapest_per_provider() {
        let models = vec![
            model("o-big", Provider::OpenAi, Tier::Big, 4.0, &[]),
            model("a-only", Provider::Anthropic, Tier::Big, 9.0, &[]),
            model("o-small", Provider::OpenAi, Tier::Small, 0.5, &[]),
        ];
        let ranking = rank(&workload(), &models, &RankingFilter::unfiltered(), &heuristic_slot());
        let groups = ranking.by_provider();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].provider, Provider::Anthropic);
        assert_eq!(groups[0].cheapest().unwrap().model.id, "a-only");
        assert_eq!(groups[1].provider, Provider::OpenAi);
        assert_eq!(groups[1].cheapest().unwrap().model.id, "o-small");
        assert_eq!(groups[1].entries.len(), 2);
    }

    #[test]
    fn bounds_and_min_is_max() {
        let models = vec![
            model("a", Provider::OpenAi, Tier::Small, 1.0, &[]),
            model("b", Provider::OpenAi, Tier::Small, 3.0, &[]),
        ];
        let ranking = rank(&workload(), &models, &RankingFilter::unfiltered(), &heuristic_slot());
        let bounds = ranking.bounds().unwrap();
        assert!(bounds.min < bounds.max);
        assert!(!bounds.min_is_max);

        let single = rank(&workload(), &models[..1], &RankingFilter::unfiltered(), &heuristic_slot());
        let bounds = single.bounds().unwrap();
        assert!(bounds.min_is_max);
        assert_eq!(bounds.min, bounds.max);

        assert!(Ranking::default().bounds().is_none());
        assert!(Ranking::default().best_value().is_none());
    }

    #[test]
    fn unsupported_image_models_are_skipped() {
        let catalog = Catalog::builtin();
        let config = Configuration {
            data_type: DataType::Images,
            ..workload()
        };
        let ranking = rank(&config, catalog.models(), &RankingFilter::unfiltered(), &heuristic_slot());
        assert!(!ranking.skipped.is_empty());
        assert!(ranking
            .skipped
            .iter()
            .all(|s| matches!(s.model.provider, Provider::Meta | Provider::DeepSeek)));
        assert_eq!(
            ranking.entries.len() + ranking.skipped.len(),
            catalog.models().len()
        );
    }

    #[test]
    fn ranking_matches_direct_estimate() {
        let catalog = Catalog::builtin();
        let config = workload();
        let ranking = rank(&config, catalog.models(), &RankingFilter::unfiltered(), &heuristic_slot());
        for entry in &ranking.entries {
            let direct = estimate(&config, entry.model, &Heuristic).unwrap();
            assert_eq!(direct, entry.result);
        }
    }

    #[test]
    fn premium_over_guards_zero_min() {
        assert_eq!(premium_over(2.0, 1.0), Some(100.0));
        assert_eq!(premium_over(1.0, 0.0), None);
        assert_eq!(premium_over(f64::NAN, 1.0), None);
    }

    #[test]
    fn compare_cost_nan_handling() {
        assert_eq!(compare_cost(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(compare_cost(f64::NAN, 1.0), Ordering::Greater);
        assert_eq!(compare_cost(1.0, f64::NAN), Ordering::Less);
        assert_eq!(compare_cost(1.0, 2.0), Ordering::Less);
    }
}
