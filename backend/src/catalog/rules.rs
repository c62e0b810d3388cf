//! Free-text rule parsing
//!
//! The post catalog stores years-required, feeder lists and quotas as free
//! text. Every parser here is total: malformed input falls back to a value
//! that makes the post inert for that rule instead of failing the run.
//!
//! | Field | Fallback |
//! |-------|----------|
//! | years required | 0 |
//! | feeder list | unparsable tokens dropped |
//! | quota | 0 (post never promotes) |
//! | track | GENERAL |

use crate::models::employee::Track;

/// Upper bound of a promotion quota, in percent
pub const MAX_QUOTA_PERCENT: u32 = 100;

/// Parse the minimum years required in the feeder post
///
/// Only the leading run of digits and spaces is considered, and the digits
/// inside it are concatenated. Values beyond `i32::MAX` read as 0.
///
/// # Example
/// ```
/// use promotion_projection_core::catalog::rules::parse_years_required;
///
/// assert_eq!(parse_years_required("3 years"), 3);
/// assert_eq!(parse_years_required("N/A"), 0);
/// ```
pub fn parse_years_required(raw: &str) -> u32 {
    if raw.trim().is_empty() {
        return 0;
    }
    let digits: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ' ')
        .filter(char::is_ascii_digit)
        .collect();
    digits
        .parse::<i32>()
        .map_or(0, |years| u32::try_from(years).unwrap_or(0))
}

/// Parse the list of feeder post sequence numbers
///
/// Separators are `,` and the word `and` surrounded by spaces. Tokens that
/// are not integers are dropped; repeated numbers are kept once.
///
/// # Example
/// ```
/// use promotion_projection_core::catalog::rules::parse_feeder_posts;
///
/// assert_eq!(parse_feeder_posts("12, 14 and 15"), vec![12, 14, 15]);
/// assert!(parse_feeder_posts("N/A").is_empty());
/// ```
pub fn parse_feeder_posts(raw: &str) -> Vec<u32> {
    if raw.trim().is_empty() || raw == "N/A" {
        return Vec::new();
    }
    let cleaned = raw.replace(" and ", ";").replace(',', ";");
    let mut feeders = Vec::new();
    for token in cleaned.split(';') {
        if let Ok(seq_no) = token.trim().parse::<u32>() {
            if !feeders.contains(&seq_no) {
                feeders.push(seq_no);
            }
        }
    }
    feeders
}

/// Parse a promotion quota percentage, capped at 100
///
/// # Example
/// ```
/// use promotion_projection_core::catalog::rules::parse_promotion_quota;
///
/// assert_eq!(parse_promotion_quota("50%"), 50);
/// assert_eq!(parse_promotion_quota("150"), 100);
/// assert_eq!(parse_promotion_quota("direct"), 0);
/// ```
pub fn parse_promotion_quota(raw: &str) -> u32 {
    let cleaned = raw.replace('%', "");
    match cleaned.trim().parse::<i64>() {
        Ok(value) if value > 0 => value.min(MAX_QUOTA_PERCENT as i64) as u32,
        _ => 0,
    }
}

/// Parse a post track; anything other than `IT` is the general track
///
/// Case is ignored, surrounding whitespace is not.
pub fn parse_track(raw: Option<&str>) -> Track {
    match raw {
        Some(value) if value.eq_ignore_ascii_case("IT") => Track::It,
        _ => Track::General,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_concatenates_spaced_digits() {
        assert_eq!(parse_years_required("1 0"), 10);
        assert_eq!(parse_years_required(" 5 yrs"), 5);
    }

    #[test]
    fn test_years_stops_at_first_other_character() {
        assert_eq!(parse_years_required("3-5 years"), 3);
        assert_eq!(parse_years_required("about 3"), 0);
    }

    #[test]
    fn test_years_overflow_defaults_to_zero() {
        assert_eq!(parse_years_required("99999999999999"), 0);
        assert_eq!(parse_years_required("3000000000"), 0);
        assert_eq!(parse_years_required("2147483647"), 2_147_483_647);
    }

    #[test]
    fn test_feeders_require_spaced_and() {
        // "and" glued to digits is not a separator, so the token is dropped
        assert_eq!(parse_feeder_posts("12and14"), Vec::<u32>::new());
        assert_eq!(parse_feeder_posts("12 and 14"), vec![12, 14]);
    }

    #[test]
    fn test_feeders_drop_text_tokens() {
        assert_eq!(parse_feeder_posts("7, direct recruitment, 9"), vec![7, 9]);
        assert_eq!(parse_feeder_posts("7,7, 8"), vec![7, 8]);
    }

    #[test]
    fn test_quota_edge_cases() {
        assert_eq!(parse_promotion_quota(""), 0);
        assert_eq!(parse_promotion_quota(" 100 % "), 100);
        assert_eq!(parse_promotion_quota("-20%"), 0);
        assert_eq!(parse_promotion_quota("33.3%"), 0);
    }

    #[test]
    fn test_track_is_case_insensitive() {
        assert_eq!(parse_track(Some("it")), Track::It);
        assert_eq!(parse_track(Some(" IT ")), Track::General);
        assert_eq!(parse_track(Some("General")), Track::General);
        assert_eq!(parse_track(None), Track::General);
    }
}
