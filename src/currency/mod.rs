//! Display formatting for monetary amounts. No conversion between currencies happens here.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatOptions {
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub negative_style: NegativeStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
            negative_style: NegativeStyle::Sign,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => format!("{code} "),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `amount` with the currency symbol, digit grouping, and the configured
/// negative style, e.g. `$1,234.50` or `€(12,00)`.
pub fn format_amount(amount: Decimal, code: &CurrencyCode, options: &FormatOptions) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(amount.abs(), precision, options);
    let symbol = symbol_for(code.as_str());
    let negative = amount.is_sign_negative()
        && !amount
            .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
            .is_zero();
    match (negative, options.negative_style) {
        (false, _) => format!("{symbol}{body}"),
        (true, NegativeStyle::Sign) => format!("-{symbol}{body}"),
        (true, NegativeStyle::Parentheses) => format!("{symbol}({body})"),
    }
}

/// Formats a non-negative value with grouping and the locale decimal separator.
pub fn format_number(value: Decimal, precision: u32, options: &FormatOptions) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", precision as usize, rounded);
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };
    let mut body = group_digits(int_part, options.grouping_separator);
    if let Some(frac) = frac_part {
        body.push(options.decimal_separator);
        body.push_str(frac);
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
