mod format;
mod json;
mod table;

pub(crate) use format::NumberFormat;
pub(crate) use json::{
    output_compare_json, output_config_json, output_estimate_json, output_models_json,
    output_share_json,
};
pub(crate) use table::{
    TableOptions, print_compare_table, print_estimate_table, print_models_table,
};
