//! Number formatting for the dashboard.

/// Rounds half-up, the way browsers round for display.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Formats the rounded value with South Asian digit grouping: the last three
/// digits form one group and every two digits before that form another.
///
/// `1234567` becomes `"12,34,567"`.
pub fn group_digits(value: f64) -> String {
    let rounded = round_half_up(value) as i64;
    let digits = rounded.unsigned_abs().to_string();
    let sign = if rounded < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (rest, last3) = digits.split_at(digits.len() - 3);
    let lead = rest.len() % 2;
    let mut groups: Vec<&str> = Vec::with_capacity(rest.len() / 2 + 2);
    if lead > 0 {
        groups.push(&rest[..lead]);
    }
    groups.extend((lead..rest.len()).step_by(2).map(|start| &rest[start..start + 2]));
    groups.push(last3);

    format!("{sign}{}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_numbers_are_unchanged() {
        assert_eq!(group_digits(0.0), "0");
        assert_eq!(group_digits(7.0), "7");
        assert_eq!(group_digits(999.0), "999");
    }

    #[test]
    fn groups_thousands_then_pairs() {
        assert_eq!(group_digits(1000.0), "1,000");
        assert_eq!(group_digits(12_345.0), "12,345");
        assert_eq!(group_digits(123_456.0), "1,23,456");
        assert_eq!(group_digits(1_234_567.0), "12,34,567");
        assert_eq!(group_digits(123_456_789.0), "12,34,56,789");
    }

    #[test]
    fn rounds_before_grouping() {
        assert_eq!(group_digits(999.5), "1,000");
        assert_eq!(group_digits(58_400.4), "58,400");
        assert_eq!(group_digits(2.5), "3");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(group_digits(-1_234_567.0), "-12,34,567");
    }

    #[test]
    fn round_half_up_matches_display_rounding() {
        assert_eq!(round_half_up(182.5), 183.0);
        assert_eq!(round_half_up(27.88), 28.0);
        assert_eq!(round_half_up(0.49), 0.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.51), -3.0);
    }

    #[test]
    fn round_half_up_is_exact_near_boundaries() {
        assert_eq!(round_half_up(0.499_999_999_999_999_94), 0.0);
        let large = 2f64.powi(52) + 1.0;
        assert_eq!(round_half_up(large), large);
        assert_eq!(round_half_up(2f64.powi(53)), 2f64.powi(53));
    }
}
