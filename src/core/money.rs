use rust_decimal::Decimal;

/// Decimal places used for USD presentation
pub const USD_SCALE: u32 = 2;

/// Round an amount to USD presentation scale.
///
/// Accumulation throughout the service stays at full Decimal precision;
/// rounding happens only here, at the presentation boundary.
pub fn round_usd(amount: Decimal) -> Decimal {
    amount.round_dp(USD_SCALE)
}

/// Format an amount with exactly two decimal places (e.g. "20.00")
pub fn format_usd(amount: Decimal) -> String {
    format!("{:.2}", round_usd(amount))
}

/// Validate that an amount is usable as a payout/order value
pub fn validate_non_negative(amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("Amount cannot be negative, got {}", amount));
    }
    Ok(())
}
