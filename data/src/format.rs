//! Legend and axis formatting.

use crate::time::{DAY_MS, ms_to_datetime};

pub const NOT_AVAILABLE: &str = "N/A";

const SI_SIGNIFICANT: i32 = 2;

const SI_PREFIXES: [(f64, &str); 5] = [
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
];

/// Groups the integer part in thousands, e.g. `1234567.5` -> `"1,234,567.5"`.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let raw = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    };

    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(raw.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Modeled values are shown as whole numbers.
pub fn rounded_thousands(value: f64) -> String {
    thousands(value.round())
}

/// Two significant digits with an SI prefix, for axis ticks.
pub fn si(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value == 0.0 {
        return "0.0".to_string();
    }

    let abs = value.abs();
    let (scale, prefix) = SI_PREFIXES
        .iter()
        .copied()
        .find(|(scale, _)| abs >= *scale)
        .unwrap_or((1.0, ""));

    let scaled = value / scale;
    let magnitude = scaled.abs().log10().floor() as i32;
    let decimals = (SI_SIGNIFICANT - 1 - magnitude).max(0) as usize;
    let text = format!("{scaled:.decimals$}");

    // rounding may carry into the next prefix, e.g. 999.6 -> "1000"
    if let Ok(rounded) = text.parse::<f64>()
        && rounded.abs() >= 1000.0
        && scale < SI_PREFIXES[0].0
    {
        return si(rounded * scale);
    }

    format!("{text}{prefix}")
}

pub fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// Formats a default (no-cursor) value; absent and NaN both become `"N/A"`.
pub fn display(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => thousands(v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn time_label(time_ms: i64, step_ms: i64) -> String {
    let Some(dt) = ms_to_datetime(time_ms) else {
        return String::new();
    };

    if step_ms < 28 * DAY_MS {
        dt.format("%b %d").to_string()
    } else if step_ms < 365 * DAY_MS {
        dt.format("%Y-%m").to_string()
    } else {
        dt.format("%Y").to_string()
    }
}

pub fn crosshair_label(time_ms: i64) -> String {
    ms_to_datetime(time_ms)
        .map(|dt| dt.format("%a %b %-d %Y").to_string())
        .unwrap_or_else(|| time_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_integer_part() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(-0.0), "0");
        assert_eq!(thousands(7.0), "7");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(1234567.0), "1,234,567");
        assert_eq!(thousands(1234.5), "1,234.5");
        assert_eq!(thousands(-45210.0), "-45,210");
        assert_eq!(thousands(f64::NAN), NOT_AVAILABLE);
    }

    #[test]
    fn modeled_values_round() {
        assert_eq!(rounded_thousands(1234.4), "1,234");
        assert_eq!(rounded_thousands(1234.6), "1,235");
        assert_eq!(rounded_thousands(0.3), "0");
    }

    #[test]
    fn si_uses_two_significant_digits() {
        assert_eq!(si(0.0), "0.0");
        assert_eq!(si(5.0), "5.0");
        assert_eq!(si(50.0), "50");
        assert_eq!(si(100.0), "100");
        assert_eq!(si(1500.0), "1.5k");
        assert_eq!(si(25_000.0), "25k");
        assert_eq!(si(1_200_000.0), "1.2M");
        assert_eq!(si(999_600.0), "1.0M");
    }

    #[test]
    fn absent_and_nan_display_as_na() {
        assert_eq!(display(None), "N/A");
        assert_eq!(display(Some(f64::NAN)), "N/A");
        assert_eq!(display(Some(0.0)), "0");
        assert_eq!(display(Some(12_000.0)), "12,000");
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("3")), "3");
    }

    #[test]
    fn time_labels_follow_step() {
        // 2020-04-15T00:00:00Z
        let t = 1_586_908_800_000;
        assert_eq!(time_label(t, DAY_MS), "Apr 15");
        assert_eq!(time_label(t, 30 * DAY_MS), "2020-04");
        assert_eq!(time_label(t, 365 * DAY_MS), "2020");
        assert_eq!(crosshair_label(t), "Wed Apr 15 2020");
    }
}
