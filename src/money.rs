use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// Parse a register currency token such as `$6,847.50` or `$-1,234.00`.
///
/// An empty string parses to zero: rows whose amount never appeared are still
/// emitted rather than dropped, with the zero flagged upstream.
pub fn parse_currency(raw: &str) -> Result<Decimal> {
    let cleaned = raw.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    cleaned
        .parse::<Decimal>()
        .with_context(|| format!("invalid currency amount: {raw}"))
}

/// Render an amount with exactly two decimal places, as the CSV output and
/// hover labels expect.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_amount() {
        assert_eq!(
            parse_currency("$6,847.50").unwrap(),
            Decimal::new(684750, 2)
        );
    }

    #[test]
    fn parses_negative_amount() {
        assert_eq!(
            parse_currency("$-1,234.00").unwrap(),
            Decimal::new(-123400, 2)
        );
    }

    #[test]
    fn empty_amount_is_zero() {
        assert_eq!(parse_currency("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_currency("  ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_currency("$12.3.4").is_err());
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_amount(Decimal::new(684750, 2)), "6847.50");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(Decimal::new(-123400, 2)), "-1234.00");
    }
}
