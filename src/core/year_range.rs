use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::types::{ParseError, HISTORICAL_CUTOFF_YEAR};

/// An inclusive span of years, serialized as `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct YearSpan {
    pub start: i32,
    pub end: i32,
}

impl YearSpan {
    #[must_use]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Historical spans are observations; everything else is a projection
    #[must_use]
    pub fn is_historical(self) -> bool {
        self.start < HISTORICAL_CUTOFF_YEAR
    }
}

impl From<(i32, i32)> for YearSpan {
    fn from((start, end): (i32, i32)) -> Self {
        Self { start, end }
    }
}

impl From<YearSpan> for (i32, i32) {
    fn from(span: YearSpan) -> Self {
        (span.start, span.end)
    }
}

impl std::fmt::Display for YearSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for YearSpan {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidYearRange(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start = start.trim().parse::<i32>().map_err(|_| invalid())?;
        let end = end.trim().parse::<i32>().map_err(|_| invalid())?;
        Ok(Self { start, end })
    }
}

/// The two historical baselines presented to users as a single option
pub const MERGED_HISTORICAL_PRIMARY: YearSpan = YearSpan::new(1970, 2000);
pub const MERGED_HISTORICAL_ALIAS: YearSpan = YearSpan::new(1961, 1990);

/// A selectable year-range facet value.
///
/// `additional_values` lists catalog spans that are presented under the same
/// option; matching treats them exactly like `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub value: YearSpan,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_values: Vec<YearSpan>,
}

impl YearRange {
    #[must_use]
    pub fn new(value: YearSpan) -> Self {
        Self {
            value,
            label: value.to_string(),
            additional_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = YearSpan>) -> Self {
        self.additional_values.extend(aliases);
        self
    }

    /// True if `span` is the primary value or one of the aliases
    #[must_use]
    pub fn matches(&self, span: YearSpan) -> bool {
        self.value == span || self.additional_values.contains(&span)
    }

    /// True if any span of `other` is covered by this range
    #[must_use]
    pub fn overlaps(&self, other: &YearRange) -> bool {
        self.matches(other.value) || other.additional_values.iter().any(|s| self.matches(*s))
    }

    #[must_use]
    pub fn is_historical(&self) -> bool {
        self.value.is_historical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_historical_threshold() {
        assert!(YearSpan::new(1961, 1990).is_historical());
        assert!(YearSpan::new(1999, 2020).is_historical());
        assert!(!YearSpan::new(2000, 2020).is_historical());
        assert!(!YearSpan::new(2081, 2100).is_historical());
    }

    #[test]
    fn test_parse_and_display() {
        let span: YearSpan = "2021-2040".parse().unwrap();
        assert_eq!(span, YearSpan::new(2021, 2040));
        assert_eq!(span.to_string(), "2021-2040");
        assert!("2021".parse::<YearSpan>().is_err());
        assert!("abc-2040".parse::<YearSpan>().is_err());
        assert!("".parse::<YearSpan>().is_err());
    }

    #[test]
    fn test_serde_as_pair() {
        let span: YearSpan = serde_json::from_str("[1970, 2000]").unwrap();
        assert_eq!(span, MERGED_HISTORICAL_PRIMARY);
        assert_eq!(serde_json::to_string(&span).unwrap(), "[1970,2000]");
    }

    #[test]
    fn test_alias_matching() {
        let merged =
            YearRange::new(MERGED_HISTORICAL_PRIMARY).with_aliases([MERGED_HISTORICAL_ALIAS]);
        assert_eq!(merged.label, "1970-2000");
        assert!(merged.matches(YearSpan::new(1970, 2000)));
        assert!(merged.matches(YearSpan::new(1961, 1990)));
        assert!(!merged.matches(YearSpan::new(2021, 2040)));

        let plain = YearRange::new(MERGED_HISTORICAL_ALIAS);
        assert!(merged.overlaps(&plain));
        assert!(!plain.matches(MERGED_HISTORICAL_PRIMARY));
    }
}
