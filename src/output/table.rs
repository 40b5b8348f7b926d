use comfy_table::{Cell, Color, Table};

use crate::cli::SortOrder;
use crate::consts::NOT_APPLICABLE;
use crate::core::{
    Column, Configuration, DataType, Model, PricingResult, RankedModel, Ranking, premium_over,
};
use crate::estimate::formula_for;
use crate::output::format::{
    NumberFormat, create_styled_table, format_compact, format_cost, format_number, format_percent,
    header_cell, right_cell, styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
}

impl TableOptions {
    fn color(&self, color: Color) -> Option<Color> {
        self.use_color.then_some(color)
    }
}

fn title(config: &Configuration, fallback: &str) -> String {
    if config.config_name.is_empty() {
        fallback.to_string()
    } else {
        format!("{fallback}: {}", config.config_name)
    }
}

/// Token and cost breakdown of the workload on one model
pub(crate) fn print_estimate_table(
    config: &Configuration,
    model: &Model,
    result: &PricingResult,
    tokenizer: &str,
    opts: TableOptions,
) {
    let nf = opts.number_format;
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Component", c),
        header_cell("Tokens / item", c),
        header_cell("Cost", c),
    ]);

    let cost_color = opts.color(Color::Green);
    let add = |table: &mut Table, label: &str, tokens: Option<u64>, cost: f64| {
        table.add_row(vec![
            Cell::new(label),
            right_cell(
                &tokens.map_or(NOT_APPLICABLE.to_string(), |t| format_number(t, nf)),
                None,
                false,
            ),
            right_cell(&format_cost(cost, nf), cost_color, false),
        ]);
    };

    let tokens = &result.tokens;
    add(&mut table, "Text", Some(tokens.input.text), result.input_cost.text);
    match config.data_type {
        DataType::Pdfs => add(
            &mut table,
            "Document",
            Some(tokens.input.document),
            result.input_cost.document,
        ),
        DataType::Images => add(
            &mut table,
            "Image",
            Some(tokens.input.image),
            result.input_cost.image,
        ),
        DataType::Prompts => {}
    }
    if let Some(cached) = result.cached_cost {
        add(&mut table, "Cached prefix", None, cached);
    }
    add(&mut table, "Output", Some(tokens.output), result.output_cost);

    let cyan = opts.color(Color::Cyan);
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&format_number(tokens.total, nf), cyan, true),
        right_cell(&format_cost(result.total_cost, nf), opts.color(Color::Green), true),
    ]);

    let heading = format!("{} {}", model.provider.display_name(), model.id);
    println!("\n  {}\n", title(config, &heading));
    println!("{table}");
    println!(
        "\n  {} items | {} tokens | batch {} | {} tokenizer",
        format_number(config.data_count, nf),
        format_number(result.total_tokens, nf),
        if config.batch_enabled { "on" } else { "off" },
        tokenizer,
    );
    if result.cached_cost.is_some() {
        println!("  Cached prefix cost is listed separately and not part of the total");
    }
    println!();
}

fn column_cell(column: Column, entry: &RankedModel<'_>, items: u64, opts: &TableOptions) -> Cell {
    let nf = opts.number_format;
    let model = entry.model;
    let result = &entry.result;
    match column {
        Column::Provider => Cell::new(model.provider.display_name()),
        Column::Tier => Cell::new(model.tier.as_str()),
        Column::InputTokens => right_cell(
            &format_number(result.tokens.input.total.saturating_mul(items), nf),
            None,
            false,
        ),
        Column::OutputTokens => right_cell(
            &format_number(result.tokens.output.saturating_mul(items), nf),
            None,
            false,
        ),
        Column::InputCost => right_cell(&format_cost(result.input_cost.total, nf), None, false),
        Column::OutputCost => right_cell(&format_cost(result.output_cost, nf), None, false),
        Column::CachedCost => right_cell(
            &result
                .cached_cost
                .map_or(NOT_APPLICABLE.to_string(), |c| format_cost(c, nf)),
            None,
            false,
        ),
        Column::TotalCost => right_cell(
            &format_cost(result.total_cost, nf),
            opts.color(Color::Green),
            false,
        ),
    }
}

fn compare_row(
    entry: &RankedModel<'_>,
    config: &Configuration,
    min_cost: Option<f64>,
    cheapest: bool,
    opts: &TableOptions,
) -> Vec<Cell> {
    let label = if cheapest {
        format!("{} *", entry.model.id)
    } else {
        entry.model.id.clone()
    };
    let name_color = if cheapest { opts.color(Color::Green) } else { None };
    let mut row = vec![styled_cell(&label, name_color, cheapest)];
    row.extend(
        Column::ALL
            .into_iter()
            .filter(|&col| config.show_columns.is_visible(col))
            .map(|col| column_cell(col, entry, config.data_count, opts)),
    );
    let premium = min_cost
        .and_then(|min| premium_over(entry.result.total_cost, min))
        .map_or(NOT_APPLICABLE.to_string(), |pct| {
            format_percent(pct, opts.number_format)
        });
    row.push(right_cell(&premium, None, false));
    row
}

/// Ranked models for the workload, optionally grouped by provider
pub(crate) fn print_compare_table(
    config: &Configuration,
    ranking: &Ranking<'_>,
    best_overall: Option<&RankedModel<'_>>,
    group: bool,
    opts: TableOptions,
) {
    let nf = opts.number_format;
    let bounds = ranking.bounds();
    let min_cost = bounds.map(|b| b.min);

    if ranking.entries.is_empty() {
        println!("No models match the current filters.");
    } else {
        let c = opts.use_color;
        let mut table = create_styled_table();
        let mut header = vec![header_cell("Model", c)];
        header.extend(
            Column::ALL
                .into_iter()
                .filter(|&col| config.show_columns.is_visible(col))
                .map(|col| header_cell(col.header(), c)),
        );
        header.push(header_cell("vs Min", c));
        table.set_header(header);

        if group {
            for provider_group in ranking.by_provider() {
                let mut entries = provider_group.entries.clone();
                if opts.order == SortOrder::Desc {
                    entries.reverse();
                }
                let cheapest = provider_group.cheapest();
                for entry in entries {
                    let is_cheapest = cheapest.is_some_and(|cheap| std::ptr::eq(cheap, entry));
                    table.add_row(compare_row(entry, config, min_cost, is_cheapest, &opts));
                }
            }
        } else {
            for entry in &ranking.entries {
                table.add_row(compare_row(entry, config, min_cost, false, &opts));
            }
        }

        println!("\n  {}\n", title(config, "Cost Comparison"));
        println!("{table}");
        println!();
        if group {
            println!("  * cheapest model of its provider");
        }
    }

    if let Some(bounds) = bounds {
        if bounds.min_is_max {
            println!("  Cost: {}", format_cost(bounds.min, nf));
        } else {
            println!(
                "  Range: {} - {}",
                format_cost(bounds.min, nf),
                format_cost(bounds.max, nf)
            );
        }
    }
    if let Some(best) = best_overall {
        println!(
            "  Best value overall: {} ({}) {}",
            best.model.id,
            best.model.provider.display_name(),
            format_cost(best.result.total_cost, nf)
        );
    }
    if !ranking.skipped.is_empty() {
        let skipped: Vec<String> = ranking
            .skipped
            .iter()
            .map(|s| format!("{} ({})", s.model.id, s.error))
            .collect();
        println!("  Skipped {}: {}", ranking.skipped.len(), skipped.join(", "));
    }
    println!();
}

pub(crate) fn print_models_table(models: &[Model], opts: TableOptions) {
    let nf = opts.number_format;
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Model", c),
        header_cell("Provider", c),
        header_cell("Tier", c),
        header_cell("Input $/M", c),
        header_cell("Output $/M", c),
        header_cell("Cache $/M", c),
        header_cell("Context", c),
        header_cell("Images", c),
        header_cell("Tags", c),
    ]);

    for model in models {
        table.add_row(vec![
            Cell::new(&model.id),
            Cell::new(model.provider.display_name()),
            Cell::new(model.tier.as_str()),
            right_cell(&format_cost(model.input_cost, nf), None, false),
            right_cell(&format_cost(model.output_cost, nf), None, false),
            right_cell(
                &model
                    .cache_cost
                    .map_or(NOT_APPLICABLE.to_string(), |c| format_cost(c, nf)),
                None,
                false,
            ),
            right_cell(&format_compact(model.max_token, nf), None, false),
            Cell::new(formula_for(model.provider).map_or(NOT_APPLICABLE, |f| f.label())),
            Cell::new(model.tags.join(", ")),
        ]);
    }

    println!("\n  Model Catalog\n");
    println!("{table}");
    println!("\n  {} models\n", format_number(models.len() as u64, nf));
}
