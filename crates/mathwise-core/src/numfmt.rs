//! Number rendering shared by the engine printer and the strategies.

/// Render `value` with a fixed number of significant digits, the way a CAS
/// prints a float evaluated to `digits` places (`2` at 5 digits is `2.0000`).
/// Falls back to `1.2346e+6` notation when the magnitude exceeds the requested
/// precision or is below `1e-5`.
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".into();
    }
    let digits = digits.max(1) as i32;

    let mut exp = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - exp);
    let rounded = (value * factor).round() / factor;
    if rounded.abs() >= 10f64.powi(exp + 1) {
        exp += 1;
    }

    if exp >= digits || exp < -5 {
        let raw = format!("{:.*e}", (digits - 1) as usize, value);
        return match raw.split_once('e') {
            Some((mantissa, e)) => {
                let e: i32 = e.parse().unwrap_or(0);
                let sign = if e < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{}", e.abs())
            }
            None => raw,
        };
    }

    let decimals = (digits - 1 - exp).max(0) as usize;
    let s = format!("{value:.decimals$}");
    if decimals == 0 {
        format!("{s}.")
    } else {
        s
    }
}

/// Compact rendering: integral values print without a fractional part,
/// everything else uses the shortest round-trip representation.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format!("{value}")
}

/// `value` as `p/q` with `1 < q <= 100`, when it is one to within rounding.
pub fn small_fraction(value: f64) -> Option<(i64, i64)> {
    if !value.is_finite() || value.fract() == 0.0 || value.abs() > 1e9 {
        return None;
    }
    (2..=100i64).find_map(|q| {
        let p = (value * q as f64).round();
        ((value * q as f64 - p).abs() < 1e-9).then_some((p as i64, q))
    })
}

/// Snap values within `1e-9` of an integer onto that integer.
pub fn snap(value: f64) -> f64 {
    let r = value.round();
    if (value - r).abs() < 1e-9 {
        if r == 0.0 {
            0.0
        } else {
            r
        }
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_like_cas_output() {
        assert_eq!(format_significant(20.0, 15), "20.0000000000000");
        assert_eq!(format_significant(2.0, 5), "2.0000");
        assert_eq!(format_significant(-2.0, 5), "-2.0000");
        assert_eq!(format_significant(0.25, 5), "0.25000");
        assert_eq!(format_significant(1.0 / 3.0, 5), "0.33333");
        assert_eq!(format_significant(12345.6, 5), "12346.");
    }

    #[test]
    fn test_significant_switches_to_exponent() {
        assert_eq!(format_significant(1234567.0, 5), "1.2346e+6");
        assert_eq!(format_significant(99999.5, 5), "1.0000e+5");
        assert_eq!(format_significant(0.0000012, 3), "1.20e-6");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(65.0), "65");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-4.0), "-4");
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(1.9999999999), 2.0);
        assert_eq!(snap(-1e-12), 0.0);
        assert_eq!(snap(0.5), 0.5);
    }
}
