use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormat {
    group_sep: char,
    decimal_sep: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_sep: ',',
            decimal_sep: '.',
        }
    }
}

impl NumberFormat {
    pub(crate) fn from_locale(locale: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = locale else {
            return Ok(NumberFormat::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(NumberFormat::default());
        }
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        let format = match base.as_str() {
            "de" => NumberFormat {
                group_sep: '.',
                decimal_sep: ',',
            },
            "fr" | "ru" => NumberFormat {
                group_sep: ' ',
                decimal_sep: ',',
            },
            "en" | "zh" => NumberFormat::default(),
            _ => {
                return Err(AppError::UnsupportedLocale {
                    input: trimmed.to_string(),
                });
            }
        };

        Ok(format)
    }
}

/// Insert group separators into a run of ASCII digits
fn group_digits(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

pub(super) fn format_number(n: u64, format: NumberFormat) -> String {
    group_digits(&n.to_string(), format.group_sep)
}

/// Format number in compact form (K, M, B suffixes)
pub(super) fn format_compact(n: u64, format: NumberFormat) -> String {
    let (scaled, suffix) = if n >= 1_000_000_000 {
        (n as f64 / 1_000_000_000.0, "B")
    } else if n >= 1_000_000 {
        (n as f64 / 1_000_000.0, "M")
    } else if n >= 1_000 {
        (n as f64 / 1_000.0, "K")
    } else {
        return n.to_string();
    };
    let mut s = format!("{scaled:.1}");
    if format.decimal_sep != '.' {
        s = s.replace('.', &format.decimal_sep.to_string());
    }
    format!("{s}{suffix}")
}

fn format_decimal(value: f64, decimals: usize, format: NumberFormat) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let sign = if value < 0.0 { "-" } else { "" };
    let mut out = format!("{sign}{}", group_digits(int_part, format.group_sep));
    if !frac.is_empty() {
        out.push(format.decimal_sep);
        out.push_str(frac);
    }
    out
}

/// Dollar amount; small amounts keep more decimals so they don't print as $0.00
pub(super) fn format_cost(cost: f64, format: NumberFormat) -> String {
    if !cost.is_finite() {
        return "N/A".to_string();
    }
    let magnitude = cost.abs();
    let decimals = if magnitude == 0.0 || magnitude >= 1.0 {
        2
    } else if magnitude >= 0.01 {
        4
    } else {
        6
    };
    format!("${}", format_decimal(cost, decimals, format))
}

pub(super) fn format_percent(pct: f64, format: NumberFormat) -> String {
    format!("+{}%", format_decimal(pct, 1, format))
}

pub(super) fn cost_json_value(cost: f64) -> serde_json::Value {
    if cost.is_finite() {
        serde_json::json!(cost)
    } else {
        serde_json::Value::Null
    }
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    styled_cell(text, color, bold).set_alignment(CellAlignment::Right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_with_commas() {
        let fmt = NumberFormat::default();
        assert_eq!(format_number(0, fmt), "0");
        assert_eq!(format_number(999, fmt), "999");
        assert_eq!(format_number(1000, fmt), "1,000");
        assert_eq!(format_number(1_234_567, fmt), "1,234,567");
    }

    #[test]
    fn format_compact_units() {
        let fmt = NumberFormat::default();
        assert_eq!(format_compact(0, fmt), "0");
        assert_eq!(format_compact(999, fmt), "999");
        assert_eq!(format_compact(1_500, fmt), "1.5K");
        assert_eq!(format_compact(128_000, fmt), "128.0K");
        assert_eq!(format_compact(1_000_000, fmt), "1.0M");
        assert_eq!(format_compact(1_000_000_000, fmt), "1.0B");
    }

    #[test]
    fn format_cost_precision_scales_with_size() {
        let fmt = NumberFormat::default();
        assert_eq!(format_cost(0.0, fmt), "$0.00");
        assert_eq!(format_cost(1.234, fmt), "$1.23");
        assert_eq!(format_cost(1234.5, fmt), "$1,234.50");
        assert_eq!(format_cost(0.0765, fmt), "$0.0765");
        assert_eq!(format_cost(0.000045, fmt), "$0.000045");
    }

    #[test]
    fn format_cost_handles_non_finite() {
        let fmt = NumberFormat::default();
        assert_eq!(format_cost(f64::NAN, fmt), "N/A");
        assert_eq!(format_cost(f64::INFINITY, fmt), "N/A");
    }

    #[test]
    fn format_cost_with_de_locale() {
        let fmt = NumberFormat::from_locale(Some("de")).unwrap();
        assert_eq!(format_cost(1234.5, fmt), "$1.234,50");
    }

    #[test]
    fn format_percent_rounds_to_one_decimal() {
        let fmt = NumberFormat::default();
        assert_eq!(format_percent(0.0, fmt), "+0.0%");
        assert_eq!(format_percent(1250.04, fmt), "+1,250.0%");
    }

    #[test]
    fn cost_json_value_non_finite_is_null() {
        assert_eq!(cost_json_value(f64::NAN), serde_json::Value::Null);
        assert_eq!(cost_json_value(1.5).as_f64(), Some(1.5));
    }

    #[test]
    fn from_locale_none_returns_default() {
        let fmt = NumberFormat::from_locale(None).unwrap();
        assert_eq!(format_number(1000, fmt), "1,000");
    }

    #[test]
    fn from_locale_empty_returns_default() {
        let fmt = NumberFormat::from_locale(Some("")).unwrap();
        assert_eq!(format_number(1000, fmt), "1,000");
    }

    #[test]
    fn from_locale_de_uses_dot_separator() {
        let fmt = NumberFormat::from_locale(Some("de")).unwrap();
        assert_eq!(format_number(1000, fmt), "1.000");
    }

    #[test]
    fn from_locale_fr_uses_space_separator() {
        let fmt = NumberFormat::from_locale(Some("fr")).unwrap();
        assert_eq!(format_number(1000, fmt), "1 000");
    }

    #[test]
    fn from_locale_with_region_suffix() {
        let fmt = NumberFormat::from_locale(Some("de-DE")).unwrap();
        assert_eq!(format_number(1000, fmt), "1.000");
    }

    #[test]
    fn from_locale_unsupported_returns_error() {
        assert!(NumberFormat::from_locale(Some("ja")).is_err());
    }

    #[test]
    fn format_compact_with_de_locale() {
        let fmt = NumberFormat::from_locale(Some("de")).unwrap();
        assert_eq!(format_compact(1500, fmt), "1,5K");
    }
}
