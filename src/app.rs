use std::sync::Arc;

use crate::cli::{Cli, Command, parse_command};
use crate::codec::{self, LinkFormat};
use crate::config::Config;
use crate::consts::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::{Configuration, RankingFilter, rank};
use crate::error::AppError;
use crate::estimate::{DEFAULT_PROVIDER, TokenizerSlot, estimate};
use crate::output::{
    NumberFormat, TableOptions, output_compare_json, output_config_json, output_estimate_json,
    output_models_json, output_share_json, print_compare_table, print_estimate_table,
    print_models_table,
};
use crate::pricing::Catalog;

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
    pub(crate) number_format: NumberFormat,
    pub(crate) tokenizers: Arc<TokenizerSlot>,
}

impl CommandContext<'_> {
    fn table_options(&self) -> TableOptions {
        TableOptions {
            order: self.cli.order,
            use_color: self.cli.use_color(),
            number_format: self.number_format,
        }
    }

    fn catalog(&self) -> Catalog {
        Catalog::load(self.cli.catalog.as_deref())
    }
}

fn handle_estimate(
    ctx: &CommandContext<'_>,
    workload: &Configuration,
    model_id: &str,
) -> Result<(), AppError> {
    let catalog = ctx.catalog();
    let model = catalog.find(model_id)?;
    if ctx.cli.exact {
        ctx.tokenizers.load_blocking(model.provider);
    }
    let tokenizer = ctx.tokenizers.current(model.provider);
    let result = estimate(workload, model, tokenizer.as_ref())?;

    if ctx.cli.json {
        println!(
            "{}",
            output_estimate_json(workload, model, &result, tokenizer.name())
        );
    } else {
        print_estimate_table(workload, model, &result, tokenizer.name(), ctx.table_options());
    }
    Ok(())
}

fn handle_compare(
    ctx: &CommandContext<'_>,
    workload: &Configuration,
    search: Option<&str>,
    group: bool,
) -> Result<(), AppError> {
    let catalog = ctx.catalog();
    if ctx.cli.exact && ctx.tokenizers.request(DEFAULT_PROVIDER).join().is_err() {
        tracing::warn!("tokenizer load failed, using heuristic counts");
    }

    let filter = RankingFilter::from_config(workload, search);
    let mut ranking = rank(workload, catalog.models(), &filter, &ctx.tokenizers);
    ranking.sort(ctx.cli.order);

    // Best value ignores the filters
    let overall = rank(
        workload,
        catalog.models(),
        &RankingFilter::unfiltered(),
        &ctx.tokenizers,
    );
    let best = overall.best_value();

    if ctx.cli.json {
        println!("{}", output_compare_json(&ranking, best, group));
    } else {
        print_compare_table(workload, &ranking, best, group, ctx.table_options());
    }
    Ok(())
}

fn handle_share(
    ctx: &CommandContext<'_>,
    workload: &Configuration,
    format: Option<LinkFormat>,
    base_url: Option<&str>,
) -> Result<(), AppError> {
    let format = format.or(ctx.config.link_format).unwrap_or_default();
    let base_url = base_url
        .or(ctx.config.base_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL);

    let encoded = codec::encode_as(workload, format);
    let link = codec::share_link(base_url, &encoded)
        .map_err(|e| AppError::InvalidArgument(format!("base URL \"{base_url}\": {e}")))?;

    if ctx.cli.json {
        println!("{}", output_share_json(&encoded, link.as_str(), workload));
    } else {
        println!("{link}");
    }
    Ok(())
}

fn handle_decode(input: &str) {
    let config = codec::config_from_link(input);
    println!("{}", output_config_json(&config));
}

fn handle_models(ctx: &CommandContext<'_>) {
    let catalog = ctx.catalog();
    if ctx.cli.json {
        println!("{}", output_models_json(catalog.models()));
    } else {
        print_models_table(catalog.models(), ctx.table_options());
    }
}

pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let ctx = CommandContext {
        cli,
        config,
        number_format: NumberFormat::from_locale(cli.locale.as_deref())?,
        tokenizers: Arc::new(TokenizerSlot::default()),
    };

    let command = parse_command(&cli.command);
    let workload = if command.uses_workload() {
        cli.workload.build()?
    } else {
        Configuration::default()
    };
    tracing::debug!(?command, data_count = workload.data_count, "running");

    match command {
        Command::Estimate { model } => {
            handle_estimate(&ctx, &workload, model.as_deref().unwrap_or(DEFAULT_MODEL))
        }
        Command::Compare { search, group } => {
            handle_compare(&ctx, &workload, search.as_deref(), group)
        }
        Command::Share { format, base_url } => {
            handle_share(&ctx, &workload, format, base_url.as_deref())
        }
        Command::Decode { input } => {
            handle_decode(&input);
            Ok(())
        }
        Command::Models => {
            handle_models(&ctx);
            Ok(())
        }
    }
}
