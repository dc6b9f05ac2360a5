use rust_decimal::Decimal;

use super::tax::round_half_up;

/// Two-decimal display form of an amount ("13.50").
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_half_up(amount, 2))
}

/// Rate as shown next to a tax line ("15%", "7.5%").
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}
