//! Display formatting helpers.
//!
//! Mirrors the `ru-RU` currency rendering used by the original views:
//! no fraction digits, non-breaking-space thousands grouping, trailing
//! ruble sign.

/// Non-breaking space used by ru-RU number grouping.
const NBSP: char = '\u{a0}';

/// Groups a digit string into ru-RU thousands, e.g. `15247` -> `15 247`.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        grouped.push(c);
        let remaining = digits.len() - i - 1;
        if remaining > 0 && remaining % 3 == 0 {
            grouped.push(NBSP);
        }
    }
    grouped
}

/// Formats an amount as a ru-RU ruble string, e.g. `127 500 ₽`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let grouped = group_thousands(&rounded.unsigned_abs().to_string());

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    out.push(NBSP);
    out.push('₽');
    out
}

/// Formats a whole count with ru-RU thousands grouping, e.g. `15 247`.
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Formats a percentage with the given number of fraction digits, e.g. `87.5%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Formats a signed percentage impact, e.g. `+23%` / `-8%`.
pub fn format_signed_percent(value: f64, decimals: usize) -> String {
    if value >= 0.0 {
        format!("+{:.*}%", decimals, value)
    } else {
        format!("{:.*}%", decimals, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands_with_nbsp() {
        assert_eq!(format_currency(127_500.0), "127\u{a0}500\u{a0}₽");
        assert_eq!(format_currency(1_234_567.0), "1\u{a0}234\u{a0}567\u{a0}₽");
        assert_eq!(format_currency(500.0), "500\u{a0}₽");
        assert_eq!(format_currency(0.0), "0\u{a0}₽");
    }

    #[test]
    fn currency_rounds_fractions_away() {
        assert_eq!(format_currency(85_430.4), "85\u{a0}430\u{a0}₽");
        assert_eq!(format_currency(85_430.5), "85\u{a0}431\u{a0}₽");
    }

    #[test]
    fn currency_handles_negative_amounts() {
        assert_eq!(format_currency(-1_000.0), "-1\u{a0}000\u{a0}₽");
    }

    #[test]
    fn count_groups_thousands_with_nbsp() {
        assert_eq!(format_count(15_247), "15\u{a0}247");
        assert_eq!(format_count(1_543), "1\u{a0}543");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(0), "0");
    }

    #[test]
    fn percent_formatting_matches_views() {
        assert_eq!(format_percent(87.5, 1), "87.5%");
        assert_eq!(format_percent(85.0, 0), "85%");
        assert_eq!(format_signed_percent(23.0, 0), "+23%");
        assert_eq!(format_signed_percent(-8.0, 0), "-8%");
    }
}
