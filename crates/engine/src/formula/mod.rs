//! Formula evaluation.
//!
//! `evaluate` takes a cell's raw formula text plus a snapshot of the cell
//! map and produces a display string. Evaluation is eager: it runs once, at
//! write time, against whatever values are in the map at that moment.
//! Dependent cells are not recomputed when their inputs later change.
//!
//! Dispatch is by recognized function-name prefix, checked in a fixed
//! order; anything else falls through to general expression evaluation
//! with cell references substituted in. All failures surface as the
//! `"#ERROR!"` display token, never as an `Err`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::snapshot::CellMap;

pub mod expr;

/// Display token for any formula parse or evaluation failure.
pub const ERROR_TOKEN: &str = "#ERROR!";

static CELL_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]+[0-9]+").unwrap());
static RANGE_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([A-Z]+[0-9]+):([A-Z]+[0-9]+)\)").unwrap());
static SINGLE_REF_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([A-Z]+[0-9]+)\)").unwrap());
static FULL_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]+[0-9]+$").unwrap());
// Non-greedy three-way split; argument values containing commas break this.
static IF_ARGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"IF\((.*?),(.*?),(.*)\)").unwrap());
static CONCAT_ARGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"CONCATENATE\((.*)\)").unwrap());

/// Evaluate raw cell input against a cell snapshot.
///
/// Input not starting with `=` passes through unchanged.
pub fn evaluate(formula: &str, cells: &CellMap) -> String {
    if !formula.starts_with('=') {
        return formula.to_string();
    }

    let clean = formula[1..].trim();

    if clean.starts_with("SUM(") {
        sum(clean, cells)
    } else if clean.starts_with("AVERAGE(") {
        average(clean, cells)
    } else if clean.starts_with("MAX(") {
        max(clean, cells)
    } else if clean.starts_with("MIN(") {
        min(clean, cells)
    } else if clean.starts_with("COUNT(") {
        count(clean, cells)
    } else if clean.starts_with("CONCATENATE(") {
        concatenate(clean, cells)
    } else if clean.starts_with("IF(") {
        if_function(clean, cells)
    } else if clean.starts_with("UPPER(") {
        text_function(clean, cells, |v| v.to_uppercase())
    } else if clean.starts_with("LOWER(") {
        text_function(clean, cells, |v| v.to_lowercase())
    } else if clean.starts_with("TRIM(") {
        text_function(clean, cells, |v| v.trim().to_string())
    } else if clean.starts_with("PROPER(") {
        text_function(clean, cells, proper_case)
    } else if clean.starts_with("LEN(") {
        text_function(clean, cells, |v| v.chars().count().to_string())
    } else {
        general_expression(clean, cells)
    }
}

/// Format a number the way the display layer expects: integers without a
/// decimal point, everything else via shortest display.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn cell_value<'a>(cells: &'a CellMap, id: &str) -> &'a str {
    cells.get(id).map(|c| c.value.as_str()).unwrap_or("")
}

/// Loose numeric parse: empty/whitespace counts as 0, like the display
/// layer's coercion. Keyword forms ("inf", "NaN") don't count as numbers.
fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Expand a `(REF1:REF2)` range argument into cell identifiers.
///
/// Column letters iterate by the first character's code and rows
/// numerically, forward only. A reversed or diagonal range therefore
/// produces an empty set, and multi-letter columns collapse to their first
/// letter. Both are long-standing display-layer behavior, kept as is.
fn expand_range(expression: &str) -> Vec<String> {
    let caps = match RANGE_ARG.captures(expression) {
        Some(caps) => caps,
        None => return Vec::new(),
    };

    let (start, end) = (&caps[1], &caps[2]);
    let split = |r: &str| -> (u8, usize) {
        let pos = r.bytes().position(|b| b.is_ascii_digit()).unwrap_or(0);
        let col_code = r.as_bytes()[0];
        let row: usize = r[pos..].parse().unwrap_or(0);
        (col_code, row)
    };
    let (start_col, start_row) = split(start);
    let (end_col, end_row) = split(end);

    let mut ids = Vec::new();
    for col_code in start_col..=end_col {
        for row in start_row..=end_row {
            ids.push(format!("{}{}", col_code as char, row));
        }
    }
    ids
}

fn sum(expression: &str, cells: &CellMap) -> String {
    let range = expand_range(expression);
    if range.is_empty() {
        return ERROR_TOKEN.to_string();
    }

    // Missing and non-numeric cells contribute 0.
    let total: f64 = range
        .iter()
        .map(|id| parse_number(cell_value(cells, id)).unwrap_or(0.0))
        .sum();
    format_number(total)
}

/// Values of the cells in a range that qualify as numbers: the cell must be
/// present and its value must parse.
fn numeric_values(range: &[String], cells: &CellMap) -> Vec<f64> {
    range
        .iter()
        .filter_map(|id| cells.get(id))
        .filter_map(|cell| parse_number(&cell.value))
        .collect()
}

fn average(expression: &str, cells: &CellMap) -> String {
    let range = expand_range(expression);
    if range.is_empty() {
        return ERROR_TOKEN.to_string();
    }

    let values = numeric_values(&range, cells);
    if values.is_empty() {
        return "0".to_string();
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    format!("{:.2}", mean)
}

fn max(expression: &str, cells: &CellMap) -> String {
    let range = expand_range(expression);
    if range.is_empty() {
        return ERROR_TOKEN.to_string();
    }

    let values = numeric_values(&range, cells);
    if values.is_empty() {
        return "0".to_string();
    }
    format_number(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn min(expression: &str, cells: &CellMap) -> String {
    let range = expand_range(expression);
    if range.is_empty() {
        return ERROR_TOKEN.to_string();
    }

    let values = numeric_values(&range, cells);
    if values.is_empty() {
        return "0".to_string();
    }
    format_number(values.iter().copied().fold(f64::INFINITY, f64::min))
}

fn count(expression: &str, cells: &CellMap) -> String {
    let range = expand_range(expression);
    if range.is_empty() {
        return ERROR_TOKEN.to_string();
    }

    let counted = range
        .iter()
        .filter_map(|id| cells.get(id))
        .filter(|cell| !cell.value.is_empty() && parse_number(&cell.value).is_some())
        .count();
    counted.to_string()
}

/// Resolve a single argument token: a cell reference yields the referenced
/// value (empty if the cell is absent), a double-quoted literal is
/// unquoted, anything else is taken verbatim (trimmed).
fn resolve_param(param: &str, cells: &CellMap) -> String {
    let param = param.trim();

    if FULL_REF.is_match(param) {
        return cell_value(cells, param).to_string();
    }
    if param.len() >= 2 && param.starts_with('"') && param.ends_with('"') {
        return param[1..param.len() - 1].to_string();
    }
    param.to_string()
}

fn concatenate(expression: &str, cells: &CellMap) -> String {
    let caps = match CONCAT_ARGS.captures(expression) {
        Some(caps) => caps,
        None => return ERROR_TOKEN.to_string(),
    };

    // Split on every comma; nested calls are not understood.
    caps[1]
        .split(',')
        .map(|part| resolve_param(part, cells))
        .collect()
}

/// Substitute every `[A-Z]+[0-9]+` occurrence with the referenced cell's
/// value: missing or empty cells become `0`, numeric values go in bare,
/// anything else is double-quoted. Quoted text in the source is not
/// exempted from substitution.
fn substitute_refs(expression: &str, cells: &CellMap) -> String {
    CELL_REF
        .replace_all(expression, |caps: &regex::Captures| {
            let raw = cell_value(cells, &caps[0]);
            let value = if raw.is_empty() { "0" } else { raw };
            if parse_number(value).is_some() {
                value.to_string()
            } else {
                format!("\"{}\"", value)
            }
        })
        .into_owned()
}

fn if_function(expression: &str, cells: &CellMap) -> String {
    let caps = match IF_ARGS.captures(expression) {
        Some(caps) => caps,
        None => return ERROR_TOKEN.to_string(),
    };
    let condition = caps[1].trim().to_string();
    let true_value = caps[2].trim().to_string();
    let false_value = caps[3].trim().to_string();

    let substituted = substitute_refs(&condition, cells);
    match expr::evaluate(&substituted) {
        Ok(result) => {
            if result.is_truthy() {
                resolve_param(&true_value, cells)
            } else {
                resolve_param(&false_value, cells)
            }
        }
        Err(_) => ERROR_TOKEN.to_string(),
    }
}

fn text_function(
    expression: &str,
    cells: &CellMap,
    transform: impl Fn(&str) -> String,
) -> String {
    let caps = match SINGLE_REF_ARG.captures(expression) {
        Some(caps) => caps,
        None => return ERROR_TOKEN.to_string(),
    };
    transform(cell_value(cells, &caps[1]))
}

/// First character of each space-separated word uppercased, the rest
/// lowercased.
fn proper_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn general_expression(expression: &str, cells: &CellMap) -> String {
    let substituted = substitute_refs(expression, cells);
    match expr::evaluate(&substituted) {
        Ok(value) => value.render(),
        Err(_) => ERROR_TOKEN.to_string(),
    }
}
