//! Top/bottom-N filter expressions for per-year entry queries.
//!
//! Accepted form is `<word><digits>` (case-insensitive, surrounding
//! whitespace ignored) where `word` is `top` or `bottom`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static FILTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)(\d+)$").expect("valid filter regex"));

/// Ordering applied to entry values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Parsed filter: sort entries by value and keep the first `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearFilter {
    pub direction: SortDirection,
    pub limit: u32,
}

impl YearFilter {
    /// Parses filter text such as `top5` or `Bottom10`.
    ///
    /// After trimming and lowercasing, the whole text must be a word
    /// followed by digits; trailing text such as `top5x` is rejected.
    /// Returns `None` for any other word, a missing digit suffix, a zero
    /// limit or a limit that does not fit in `u32`.
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().to_ascii_lowercase();
        let captures = FILTER_RE.captures(&normalized)?;

        let direction = match &captures[1] {
            "top" => SortDirection::Descending,
            "bottom" => SortDirection::Ascending,
            _ => return None,
        };
        let limit = captures[2].parse::<u32>().ok().filter(|limit| *limit > 0)?;

        Some(Self { direction, limit })
    }
}

impl Display for YearFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            SortDirection::Descending => write!(f, "top{}", self.limit),
            SortDirection::Ascending => write!(f, "bottom{}", self.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, YearFilter};

    #[test]
    fn parses_top_and_bottom() {
        assert_eq!(
            YearFilter::parse("top5"),
            Some(YearFilter {
                direction: SortDirection::Descending,
                limit: 5,
            })
        );
        assert_eq!(
            YearFilter::parse("bottom10"),
            Some(YearFilter {
                direction: SortDirection::Ascending,
                limit: 10,
            })
        );
    }

    #[test]
    fn parsing_is_case_insensitive_and_trims() {
        let filter = YearFilter::parse(" ToP3 ").expect("mixed case should parse");
        assert_eq!(filter.direction, SortDirection::Descending);
        assert_eq!(filter.limit, 3);
    }

    #[test]
    fn rejects_unknown_words_and_missing_digits() {
        assert_eq!(YearFilter::parse("middle3"), None);
        assert_eq!(YearFilter::parse("top"), None);
        assert_eq!(YearFilter::parse("5"), None);
        assert_eq!(YearFilter::parse(""), None);
        assert_eq!(YearFilter::parse("top5x"), None);
    }

    #[test]
    fn rejects_zero_and_overflowing_limits() {
        assert_eq!(YearFilter::parse("top0"), None);
        assert_eq!(YearFilter::parse("bottom99999999999"), None);
    }

    #[test]
    fn display_round_trips_canonical_form() {
        let filter = YearFilter::parse("BOTTOM7").expect("upper-case bottom filter should parse");
        assert_eq!(filter.to_string(), "bottom7");
    }
}
