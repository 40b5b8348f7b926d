use serde_json::{Value, json};

use crate::core::{Configuration, Model, PricingResult, RankedModel, Ranking, premium_over};
use crate::estimate::formula_for;
use crate::output::format::cost_json_value;

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize JSON output: {e}");
        "{}".to_string()
    })
}

fn result_json(result: &PricingResult) -> Value {
    let tokens = &result.tokens;
    json!({
        "tokens_per_item": {
            "input": {
                "text": tokens.input.text,
                "document": tokens.input.document,
                "image": tokens.input.image,
                "total": tokens.input.total,
            },
            "output": tokens.output,
            "total": tokens.total,
        },
        "total_tokens": result.total_tokens,
        "cost": {
            "input": {
                "text": cost_json_value(result.input_cost.text),
                "document": cost_json_value(result.input_cost.document),
                "image": cost_json_value(result.input_cost.image),
                "total": cost_json_value(result.input_cost.total),
            },
            "cached": result.cached_cost.map(cost_json_value),
            "output": cost_json_value(result.output_cost),
            "total": cost_json_value(result.total_cost),
        },
    })
}

pub(crate) fn output_estimate_json(
    config: &Configuration,
    model: &Model,
    result: &PricingResult,
    tokenizer: &str,
) -> String {
    let mut obj = json!({
        "model": model.id,
        "provider": model.provider.as_str(),
        "tier": model.tier.as_str(),
        "data_count": config.data_count,
        "data_type": config.data_type.as_str(),
        "batch": config.batch_enabled,
        "tokenizer": tokenizer,
    });
    if let (Value::Object(map), Value::Object(extra)) = (&mut obj, result_json(result)) {
        map.extend(extra);
    }
    to_pretty(&obj)
}

fn ranked_json(entry: &RankedModel<'_>, min_cost: Option<f64>) -> Value {
    let mut obj = json!({
        "model": entry.model.id,
        "provider": entry.model.provider.as_str(),
        "tier": entry.model.tier.as_str(),
        "premium_pct": min_cost.and_then(|min| premium_over(entry.result.total_cost, min)),
    });
    if let (Value::Object(map), Value::Object(extra)) = (&mut obj, result_json(&entry.result)) {
        map.extend(extra);
    }
    obj
}

pub(crate) fn output_compare_json(
    ranking: &Ranking<'_>,
    best_overall: Option<&RankedModel<'_>>,
    group: bool,
) -> String {
    let bounds = ranking.bounds();
    let min_cost = bounds.map(|b| b.min);

    let mut obj = json!({
        "models": ranking
            .entries
            .iter()
            .map(|e| ranked_json(e, min_cost))
            .collect::<Vec<_>>(),
        "bounds": bounds.map(|b| json!({
            "min": cost_json_value(b.min),
            "max": cost_json_value(b.max),
            "min_is_max": b.min_is_max,
        })),
        "best_value": best_overall.map(|best| json!({
            "model": best.model.id,
            "provider": best.model.provider.as_str(),
            "total_cost": cost_json_value(best.result.total_cost),
        })),
        "skipped": ranking
            .skipped
            .iter()
            .map(|s| json!({ "model": s.model.id, "reason": s.error.to_string() }))
            .collect::<Vec<_>>(),
    });

    if group {
        let groups: Vec<Value> = ranking
            .by_provider()
            .iter()
            .map(|g| {
                json!({
                    "provider": g.provider.as_str(),
                    "cheapest": g.cheapest().map(|c| c.model.id.as_str()),
                    "models": g.entries.iter().map(|e| e.model.id.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        obj["groups"] = json!(groups);
    }

    to_pretty(&obj)
}

pub(crate) fn output_models_json(models: &[Model]) -> String {
    let output: Vec<Value> = models
        .iter()
        .map(|m| {
            let mut obj = serde_json::to_value(m).unwrap_or(Value::Null);
            obj["image_formula"] = json!(formula_for(m.provider).map(|f| f.label()));
            obj
        })
        .collect();
    to_pretty(&json!(output))
}

pub(crate) fn output_share_json(encoded: &str, link: &str, config: &Configuration) -> String {
    to_pretty(&json!({
        "encoded": encoded,
        "link": link,
        "config": config,
    }))
}

pub(crate) fn output_config_json(config: &Configuration) -> String {
    to_pretty(&json!(config))
}
