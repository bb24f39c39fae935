pub mod aggregate;
pub mod ledger;
pub mod store;

/// Round to two decimals, the precision every average and total is reported
/// at. Halves round away from zero, not to even: an exact 0.125 becomes 0.13,
/// never 0.12.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(22.5), 22.5);
        assert_eq!(round2(8.866), 8.87);
        assert_eq!(round2(177.504), 177.5);
        assert_eq!(round2(-3.006), -3.01);
    }

    #[test]
    fn round2_rounds_exact_halves_away_from_zero() {
        // 0.125 and 22.625 are exact in binary, so no representation error hides the tie
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(22.625), 22.63);
        assert_eq!(round2(-0.125), -0.13);
    }
}
