//! # CSV and Currency Rendering
//!
//! Two views of the same ledger:
//! - raw: numeric `prediction` column, mirrored to the sink
//! - export: `prediction` rendered as `Rs. 42,350.75`, offered for download

use super::record::PredictionRecord;

/// Header row shared by both views
pub const CSV_HEADER: [&str; 3] = ["timestamp", "experience", "prediction"];

/// Currency prefix for exported salaries
pub const CURRENCY_PREFIX: &str = "Rs. ";

/// Shortest round-trip decimal, always with a fractional part for integers
///
/// `5.0 -> "5.0"`, `42350.75 -> "42350.75"`, `1e16 -> "10000000000000000.0"`.
/// Plain positional notation at every magnitude; never an exponent.
pub fn format_number(value: f64) -> String {
    let plain = value.to_string();
    if value.is_finite() && !plain.contains('.') {
        format!("{}.0", plain)
    } else {
        plain
    }
}

/// Two decimals with `,` thousands grouping, e.g. `1234567.891 -> "1,234,567.89"`
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// `Rs. ` followed by the grouped two-decimal amount
pub fn format_currency(value: f64) -> String {
    format!("{}{}", CURRENCY_PREFIX, format_grouped(value))
}

/// Quote a field when it holds a delimiter, quote or line break
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_csv_field(field));
    }
    out.push('\n');
}

fn render(records: &[PredictionRecord], render_output: impl Fn(f64) -> String) -> String {
    let mut out = String::with_capacity(32 * (records.len() + 1));
    write_row(&mut out, &CSV_HEADER);
    for record in records {
        let timestamp = record.timestamp.to_string();
        let input = format_number(record.input);
        let output = render_output(record.output);
        write_row(&mut out, &[&timestamp, &input, &output]);
    }
    out
}

/// Raw view: numeric prediction column
pub fn render_raw_csv(records: &[PredictionRecord]) -> String {
    render(records, format_number)
}

/// Export view: currency-formatted prediction column
pub fn render_export_csv(records: &[PredictionRecord]) -> String {
    render(records, format_currency)
}
