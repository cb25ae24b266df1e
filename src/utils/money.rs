use rust_decimal::Decimal;

/// Prices are stored and summed as integer pence; this renders them as the
/// two-fractional-digit decimals every API boundary uses.
pub fn pence_to_decimal(pence: i64) -> Decimal {
    Decimal::new(pence, 2)
}
