/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Round `value` to `places` decimal places (half away from zero).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn rounds_to_zero_places() {
        assert_eq!(round_to(2699.6, 0), 2700.0);
    }
}
