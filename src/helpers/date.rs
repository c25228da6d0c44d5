//! Date formatting helpers

use chrono::NaiveDate;

/// The format posts store their dates in.
const POST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a post date with a chrono pattern
///
/// Returns the input unchanged when it is not a valid `YYYY-MM-DD` date,
/// so a stray value degrades to plain text instead of breaking a page.
///
/// # Examples
/// ```ignore
/// format_date("2024-01-14", "%b %e, %Y") // -> "Jan 14, 2024"
/// ```
pub fn format_date(date_str: &str, pattern: &str) -> String {
    match NaiveDate::parse_from_str(date_str, POST_DATE_FORMAT) {
        Ok(date) => date.format(pattern).to_string(),
        Err(_) => date_str.to_string(),
    }
}

/// Format a post date for display, without zero padding
///
/// # Examples
/// ```ignore
/// display_date("2024-01-14") // -> "2024年1月14日"
/// ```
pub fn display_date(date_str: &str) -> String {
    format_date(date_str, "%Y年%-m月%-d日")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-14", "%Y/%m/%d"), "2024/01/14");
        assert_eq!(format_date("2024-01-14", "%Y-%m-%d"), "2024-01-14");
    }

    #[test]
    fn test_format_date_invalid_passthrough() {
        assert_eq!(format_date("not a date", "%Y/%m/%d"), "not a date");
        assert_eq!(format_date("2024-13-40", "%Y/%m/%d"), "2024-13-40");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-01-14"), "2024年1月14日");
        assert_eq!(display_date("2023-12-05"), "2023年12月5日");
    }
}
