//! Sample statistics shared by the estimators

/// Relative tolerance below which a standard deviation counts as zero
pub const ZERO_STD_TOLERANCE: f64 = 1e-12;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator)
pub fn sample_variance(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

pub fn sample_std(values: &[f64], mean: f64) -> f64 {
    sample_variance(values, mean).sqrt()
}

/// True when `std` is zero up to rounding noise relative to the data's level
pub fn is_zero_std(std: f64, mean: f64) -> bool {
    !(std > ZERO_STD_TOLERANCE * mean.abs().max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_relative_eq!(m, 5.0);
        // Sample variance: 32 / 7
        assert_relative_eq!(sample_variance(&values, m), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_inputs() {
        assert!(mean(&[]).is_nan());
        assert!(sample_std(&[1.0], 1.0).is_nan());
    }

    #[test]
    fn test_zero_std_detection() {
        assert!(is_zero_std(0.0, 0.0));
        assert!(is_zero_std(1e-17, 0.1));
        assert!(is_zero_std(f64::NAN, 1.0));
        assert!(!is_zero_std(1e-3, 100.0));
    }
}
