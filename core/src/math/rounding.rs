pub struct RoundingHelper;

impl RoundingHelper {
    /// Rounds to a fixed number of decimal places, half away from zero.
    pub fn round_to(value: f64, decimals: u32) -> f64 {
        let scale = 10f64.powi(decimals as i32);
        (value * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_requested_precision() {
        assert_eq!(RoundingHelper::round_to(31.2345678, 6), 31.234568);
        assert_eq!(RoundingHelper::round_to(12.345, 1), 12.3);
        assert_eq!(RoundingHelper::round_to(-0.006, 2), -0.01);
    }

    #[test]
    fn zero_decimals_rounds_to_integer() {
        assert_eq!(RoundingHelper::round_to(2.5, 0), 3.0);
    }
}
