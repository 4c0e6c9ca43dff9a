//! Byte/GB conversions and rounding shared across the pipeline.
//!
//! All storage math is binary: 1 GB here means 1 GiB (1024³ bytes).
//! Internal accumulation keeps full `f64` precision; rounding happens
//! only where a figure leaves the pipeline.

/// 1 GiB in bytes.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// GiB per TiB.
pub const GB_PER_TB: f64 = 1024.0;

/// Convert raw bytes to (binary) gigabytes, unrounded.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ceiling division of a fractional excess by a per-unit capacity.
///
/// Returns 0 for non-positive excess or a degenerate divisor -- the
/// pipeline never reports a negative unit count.
pub fn units_needed(excess: f64, per_unit: f64) -> u64 {
    if excess <= 0.0 || per_unit <= 0.0 {
        return 0;
    }
    let units = (excess / per_unit).ceil();
    if units < 0.0 { 0 } else { units as u64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_gb_is_binary() {
        assert_eq!(bytes_to_gb(1_073_741_824), 1.0);
        assert_eq!(bytes_to_gb(0), 0.0);
    }

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(2.456), 2.46);
        assert_eq!(round2(-1.006), -1.01);
        assert_eq!(round2(14.399_999_999), 14.4);
    }

    #[test]
    fn units_needed_floors_at_zero() {
        assert_eq!(units_needed(-5.0, 50.0), 0);
        assert_eq!(units_needed(0.0, 50.0), 0);
        assert_eq!(units_needed(1000.0, 50.0), 20);
        assert_eq!(units_needed(1001.0, 50.0), 21);
        assert_eq!(units_needed(30.0, 0.0), 0);
    }
}
