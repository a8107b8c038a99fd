/// Number of decimal places every displayed result is rounded to.
pub const DISPLAY_PRECISION: i32 = 10;

/// Rounds a value to [`DISPLAY_PRECISION`] decimal places.
///
/// Floating point noise such as `0.1 + 0.2 = 0.30000000000000004` is removed
/// by scaling, rounding to the nearest integer and scaling back. Ties round
/// toward positive infinity, so `-0.5` scaled becomes `-0` rather than `-1`.
///
/// # Arguments
/// * `value` - The raw arithmetic result
///
/// # Returns
/// * `f64` - The rounded value, or `value` itself if scaling would overflow
///
/// # Examples
/// ```
/// use blockcalc::numeric::round_to_precision;
///
/// assert_eq!(round_to_precision(0.1 + 0.2), 0.3);
/// assert_eq!(round_to_precision(135.0 * 0.07), 9.45);
/// ```
pub fn round_to_precision(value: f64) -> f64 {
    let factor = 10f64.powi(DISPLAY_PRECISION);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = if scaled < 0.0 && scaled - scaled.trunc() == -0.5 {
        scaled.ceil()
    } else {
        scaled.round()
    };
    rounded / factor
}

/// Formats a number the way results are shown to the user.
///
/// Integral values print without a fractional part and negative zero prints
/// as `0`.
///
/// # Examples
/// ```
/// use blockcalc::numeric::format_number;
///
/// assert_eq!(format_number(20.0), "20");
/// assert_eq!(format_number(9.45), "9.45");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_removes_float_noise() {
        assert_eq!(round_to_precision(0.1 + 0.2), 0.3);
        assert_eq!(round_to_precision(1.0 / 3.0), 0.3333333333);
        assert_eq!(round_to_precision(2.0 / 3.0), 0.6666666667);
    }

    #[test]
    fn rounding_negative_values() {
        assert_eq!(round_to_precision(-1.0 / 3.0), -0.3333333333);
        assert_eq!(round_to_precision(-92.0), -92.0);
    }

    #[test]
    fn rounding_leaves_huge_values_alone() {
        assert_eq!(round_to_precision(1e300), 1e300);
        assert_eq!(round_to_precision(-1e300), -1e300);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_number(135.0), "135");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-92.25), "-92.25");
        assert_eq!(format_number(-0.0), "0");
    }
}
