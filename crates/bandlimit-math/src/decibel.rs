//! Decibel conversion functions.

/// Converts decibels to a normalized amplitude factor.
#[inline]
pub fn db_to_normalized(db: f64) -> f64 {
    10.0_f64.powf(0.05 * db)
}

/// Converts a normalized amplitude factor to decibels.
#[inline]
pub fn normalized_to_db(amplitude: f64) -> f64 {
    20.0 * amplitude.log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_points() {
        assert!((db_to_normalized(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_normalized(20.0) - 10.0).abs() < 1e-12);
        assert!((db_to_normalized(-6.0) - 0.501187).abs() < 1e-6);
        assert!((normalized_to_db(1.0)).abs() < 1e-12);
        assert!((normalized_to_db(0.5) + 6.0206).abs() < 1e-4);
    }

    #[test]
    fn test_round_trip() {
        for db in [-60.0, -12.0, 0.0, 3.0, 24.0] {
            assert!((normalized_to_db(db_to_normalized(db)) - db).abs() < 1e-9);
        }
    }
}
