use rust_decimal::Decimal;
use std::str::FromStr;

use crate::entity::BotError;

/// Decimals of the native currency
pub const ETHER_DECIMALS: u32 = 18;

/// Parse a decimal ether amount into wei without going through floating point
pub fn parse_ether(amount: &str) -> Result<u128, BotError> {
    let value = parse_amount(amount)?;

    if value.scale() > ETHER_DECIMALS {
        return Err(BotError::InvalidAmount(format!(
            "at most {} decimal places are supported",
            ETHER_DECIMALS
        )));
    }

    let mantissa = value.mantissa();
    let factor = 10u128.pow(ETHER_DECIMALS - value.scale());

    u128::try_from(mantissa)
        .ok()
        .and_then(|m| m.checked_mul(factor))
        .ok_or_else(|| BotError::InvalidAmount("amount is too large".to_string()))
}

/// Parse a positive decimal amount as typed by the user
pub fn parse_amount(amount: &str) -> Result<Decimal, BotError> {
    let value = Decimal::from_str(amount.trim())
        .map_err(|_| BotError::InvalidAmount(format!("'{}' is not a number", amount.trim())))?;

    if value <= Decimal::ZERO {
        return Err(BotError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }

    Ok(value)
}

/// Render wei as a decimal ether string, trailing zeros dropped
pub fn format_ether(wei: u128) -> String {
    let whole = wei / 10u128.pow(ETHER_DECIMALS);
    let fraction = wei % 10u128.pow(ETHER_DECIMALS);

    if fraction == 0 {
        return format!("{}.0", whole);
    }

    let fraction = format!("{:0width$}", fraction, width = ETHER_DECIMALS as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
