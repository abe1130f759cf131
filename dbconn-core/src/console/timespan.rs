//! Human-readable elapsed time and count formatting.

use std::time::Duration;

const MILLIS_PER_MIN: u128 = 60_000;
const MILLIS_PER_HOUR: u128 = MILLIS_PER_MIN * 60;
const MILLIS_PER_DAY: u128 = MILLIS_PER_HOUR * 24;
const MILLIS_PER_WEEK: u128 = MILLIS_PER_DAY * 7;

/// Formats a duration as weeks, days, hours, minutes and seconds.
///
/// Only non-zero units appear. Seconds keep up to three decimals with
/// trailing zeros dropped.
///
/// # Example
/// ```rust
/// use dbconn_core::console::timespan::format_elapsed;
/// use std::time::Duration;
///
/// assert_eq!(format_elapsed(Duration::from_millis(62_500)), "1 min, 2.5 secs");
/// assert_eq!(format_elapsed(Duration::ZERO), "0 seconds");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let mut millis = elapsed.as_millis();
    if millis == 0 {
        return "0 seconds".to_string();
    }

    let mut parts = Vec::new();
    for (unit, size) in [
        ("week", MILLIS_PER_WEEK),
        ("day", MILLIS_PER_DAY),
        ("hr", MILLIS_PER_HOUR),
        ("min", MILLIS_PER_MIN),
    ] {
        let count = millis / size;
        millis %= size;
        if count > 0 {
            parts.push(format!("{} {}{}", count, unit, plural(count != 1)));
        }
    }

    if millis > 0 {
        let seconds = format!("{}.{:03}", millis / 1000, millis % 1000);
        let seconds = seconds.trim_end_matches('0').trim_end_matches('.');
        parts.push(format!("{} sec{}", seconds, plural(millis != 1000)));
    }

    parts.join(", ")
}

fn plural(many: bool) -> &'static str {
    if many { "s" } else { "" }
}

/// Formats a count with comma thousands separators.
///
/// # Example
/// ```rust
/// use dbconn_core::console::timespan::format_count;
///
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(-1), "-1");
/// ```
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        let test_cases = [
            (0, "0 seconds"),
            (1, "0.001 secs"),
            (10, "0.01 secs"),
            (100, "0.1 secs"),
            (1000, "1 sec"),
            (1001, "1.001 secs"),
            (60_000, "1 min"),
            (120_000, "2 mins"),
            (3_600_000, "1 hr"),
            (86_400_000 * 2 + 120_000, "2 days, 2 mins"),
            (411_239_847, "4 days, 18 hrs, 13 mins, 59.847 secs"),
            (2_411_239_847, "3 weeks, 6 days, 21 hrs, 47 mins, 19.847 secs"),
        ];

        for (millis, expected) in test_cases {
            assert_eq!(
                format_elapsed(Duration::from_millis(millis)),
                expected,
                "Failed for {} ms",
                millis
            );
        }
    }

    #[test]
    fn test_sub_millisecond_is_zero() {
        assert_eq!(format_elapsed(Duration::from_micros(900)), "0 seconds");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(123_456), "123,456");
        assert_eq!(format_count(-1_234), "-1,234");
    }
}
