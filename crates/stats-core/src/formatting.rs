use chrono::NaiveDate;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge exact binary midpoints (1.005) up before rounding.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // "0.50" -> ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an amount in euros with two decimals, as used in the reports.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_euro;
///
/// assert_eq!(format_euro(12.5), "12.50 €");
/// assert_eq!(format_euro(-3.0), "-3.00 €");
/// ```
pub fn format_euro(amount: f64) -> String {
    format!("{:.2} €", amount)
}

/// Format a squared-euro quantity such as a variance.
pub fn format_euro_squared(amount: f64) -> String {
    format!("{:.2} €^2", amount)
}

/// Compact euro label for chart bars and axes: `"1,234.50 €"`.
pub fn format_euro_grouped(amount: f64) -> String {
    format!("{} €", format_number(amount, 2))
}

/// Format a purchase date as `dd.mm.yyyy`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use stats_core::formatting::format_date;
///
/// let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
/// assert_eq!(format_date(date), "07.03.2021");
/// ```
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_000.0, 0), "1,000");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_number_rounds_up() {
        assert_eq!(format_number(1.005, 2), "1.01");
    }

    // ── euro helpers ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(0.0), "0.00 €");
        assert_eq!(format_euro(1234.567), "1234.57 €");
    }

    #[test]
    fn test_format_euro_squared() {
        assert_eq!(format_euro_squared(10_000.0), "10000.00 €^2");
    }

    #[test]
    fn test_format_euro_grouped() {
        assert_eq!(format_euro_grouped(1_234.5), "1,234.50 €");
    }

    // ── format_date ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_date_pads() {
        let date = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
        assert_eq!(format_date(date), "01.12.2020");
    }
}
