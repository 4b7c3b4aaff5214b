pub struct AngleHelper;

impl AngleHelper {
    /// Wraps an angle in degrees into `[0, 360)`.
    pub fn wrap_deg(angle: f64) -> f64 {
        let wrapped = angle.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
        if wrapped >= 360.0 {
            0.0
        } else {
            wrapped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_in_range_values() {
        assert_eq!(AngleHelper::wrap_deg(12.5), 12.5);
        assert_eq!(AngleHelper::wrap_deg(0.0), 0.0);
    }

    #[test]
    fn wrap_folds_overflow_and_negatives() {
        assert_eq!(AngleHelper::wrap_deg(365.0), 5.0);
        assert_eq!(AngleHelper::wrap_deg(-90.0), 270.0);
        assert!(AngleHelper::wrap_deg(-1e-20) < 360.0);
    }
}
