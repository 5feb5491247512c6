use riyada_core::calculations::common::{MAX_AMOUNT, within_range};
use rust_decimal::Decimal;
use thiserror::Error;

/// A form value that cannot be used as a worksheet amount.
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("'{input}' is not a number: {source}")]
    NotANumber {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("'{input}' is out of range; amounts are limited to ±{}", format_amount(MAX_AMOUNT))]
    OutOfRange { input: String },
}

/// Reads a worksheet field the way a learner types it.
///
/// Blank input is 0, matching an empty cell on the course sheets. Commas
/// are thousands separators (`"1,234.56"`) and a trailing `%` is ignored so
/// rates can be written as `"20%"`. Values beyond [`MAX_AMOUNT`] are
/// refused so no worksheet total can overflow.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let cleaned: String = s
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let value: Decimal = cleaned.parse().map_err(|source| {
        tracing::warn!(input = %s, "rejected non-numeric input");
        ParseDecimalError::NotANumber {
            input: s.to_string(),
            source,
        }
    })?;
    if !within_range(value) {
        tracing::warn!(input = %s, "rejected out-of-range input");
        return Err(ParseDecimalError::OutOfRange {
            input: s.to_string(),
        });
    }
    Ok(value)
}

/// Formats an amount for a table cell, e.g. `12,350.5`.
pub fn format_amount(value: Decimal) -> String {
    let text = value.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Ledger cells leave the unused side blank; shown as "—".
pub fn opt_amount_display(d: Option<Decimal>) -> String {
    d.map_or_else(|| "—".to_string(), format_amount)
}
