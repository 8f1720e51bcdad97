//! Arithmetic on textual amounts for composite fields.
//!
//! Resolved values stay text. Composites parse their components as decimal
//! numbers; components that do not parse are left out of the result. Results
//! are rounded to the most decimal places found among the components.

const MAX_DECIMALS: i32 = 10;

/// Parses a reported amount such as `-1200000` or `1,200.50`.
#[must_use]
pub fn parse_amount(text: &str) -> Option<f64> {
    let value = text.trim().replace(',', "").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Renders an amount, without a fractional part when it is integral.
#[must_use]
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Digits after the decimal point, shifted by any exponent.
fn decimal_places(text: &str) -> i32 {
    let text = text.trim();
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], text[at + 1..].parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let fraction = mantissa.split_once('.').map_or(0, |(_, f)| f.len() as i32);
    (fraction - exponent).clamp(0, MAX_DECIMALS)
}

/// Largest number of decimal places among the components that parse.
fn precision<'a>(components: impl IntoIterator<Item = &'a str>) -> i32 {
    components
        .into_iter()
        .filter(|c| parse_amount(c).is_some())
        .map(decimal_places)
        .max()
        .unwrap_or(0)
}

/// Renders `value` rounded to `decimals` places.
fn format_rounded(value: f64, decimals: i32) -> String {
    let scale = 10f64.powi(decimals);
    format_amount((value * scale).round() / scale)
}

/// Sums the components that parse. `None` if none do.
#[must_use]
pub fn sum_amounts<'a>(components: impl IntoIterator<Item = &'a str>) -> Option<f64> {
    components
        .into_iter()
        .filter_map(parse_amount)
        .fold(None, |total, value| Some(total.unwrap_or(0.0) + value))
}

/// Combines present components: one passes through verbatim, several are summed.
#[must_use]
pub fn combine(components: &[String]) -> Option<String> {
    match components {
        [] => None,
        [only] => Some(only.clone()),
        many => {
            let total = sum_amounts(many.iter().map(String::as_str))?;
            Some(format_rounded(
                total,
                precision(many.iter().map(String::as_str)),
            ))
        }
    }
}

/// Gross profit less operating expenses plus the depreciation addback.
#[must_use]
pub fn ebitda(gross_profit: &str, operating_expenses: &str, addback: &str) -> Option<String> {
    let value =
        parse_amount(gross_profit)? - parse_amount(operating_expenses)? + parse_amount(addback)?;
    Some(format_rounded(
        value,
        precision([gross_profit, operating_expenses, addback]),
    ))
}

/// Operating + investing + financing cash flow, less the exchange-rate effect.
#[must_use]
pub fn cash_change(
    operating: &str,
    investing: &str,
    financing: &str,
    exchange_effect: Option<&str>,
) -> Option<String> {
    let total = sum_amounts([operating, investing, financing])?;
    let effect = exchange_effect.and_then(parse_amount).unwrap_or(0.0);
    let decimals = precision(
        [operating, investing, financing]
            .into_iter()
            .chain(exchange_effect),
    );
    Some(format_rounded(total - effect, decimals))
}
