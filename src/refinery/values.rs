// * Value Normalizer
// * Turns raw cell text ("1.5B", "12.3%", "1,234,567", "N/A") into numbers.
// * Magnitudes share one unit (millions) across K/M/B/T and bare counts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::constants::NOT_AVAILABLE;

// * Number with an optional order-of-magnitude suffix, after separators are gone
static PATTERN_MAGNITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+]?(?:\d+\.?\d*|\.\d+))\s*([KMBTkmbt])?$").expect("Invalid magnitude regex")
});

// * Placeholders the source renders instead of a number
const SENTINELS: &[&str] = &[NOT_AVAILABLE, "-", ""];

/// How a field's text is interpreted numerically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Ratios and percentages; symbols stripped, no scaling
    Ratio,
    /// Market cap, sales, volume; scaled to millions
    Magnitude,
}

/// A cell value before or after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    Text(String),
    Number(f64),
    Missing,
}

impl Field {
    /// Normalizes text into a number or `Missing`.
    /// Numbers and `Missing` pass through untouched, so applying this twice is safe.
    pub fn normalize(self, kind: ValueKind) -> Field {
        match self {
            Field::Text(raw) => match normalize(&raw, kind) {
                Some(value) => Field::Number(value),
                None => Field::Missing,
            },
            other => other,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

/// True when the text is a placeholder rather than a value
pub fn is_sentinel(raw: &str) -> bool {
    let trimmed = raw.trim();
    SENTINELS.iter().any(|s| trimmed.eq_ignore_ascii_case(s))
}

/// Strips thousands separators and percent signs
pub fn clean(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != ',' && *c != '%')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Converts raw cell text into a number for the given kind.
/// Placeholders and unparseable text yield `None`, never zero.
pub fn normalize(raw: &str, kind: ValueKind) -> Option<f64> {
    if is_sentinel(raw) {
        return None;
    }

    let cleaned = clean(raw);
    if is_sentinel(&cleaned) {
        return None;
    }

    let value = match kind {
        ValueKind::Ratio => cleaned.parse::<f64>().ok()?,
        ValueKind::Magnitude => parse_magnitude(&cleaned)?,
    };

    value.is_finite().then_some(value)
}

// * Result unit is millions: T=1e6, B=1e3, M=1, K=1e-3, bare count=1e-6
fn parse_magnitude(cleaned: &str) -> Option<f64> {
    let caps = PATTERN_MAGNITUDE.captures(cleaned)?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;

    let factor = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(suffix) => match suffix.as_str() {
            "T" => 1_000_000.0,
            "B" => 1_000.0,
            "M" => 1.0,
            "K" => 0.001,
            _ => return None,
        },
        None => 0.000_001,
    };

    Some(number * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_magnitude_suffixes_share_unit() {
        let b = normalize("1B", ValueKind::Magnitude).unwrap();
        let m = normalize("1M", ValueKind::Magnitude).unwrap();
        let k = normalize("1000K", ValueKind::Magnitude).unwrap();
        assert!(approx(b, 1000.0 * m));
        assert!(approx(k, m));
    }

    #[test]
    fn test_bare_count_is_divided_to_millions() {
        let value = normalize("2,500,000", ValueKind::Magnitude).unwrap();
        assert!(approx(value, 2.5));
    }

    #[test]
    fn test_trillion_suffix() {
        let value = normalize("1.2T", ValueKind::Magnitude).unwrap();
        assert!(approx(value, 1_200_000.0));
    }

    #[test]
    fn test_lowercase_suffix_accepted() {
        assert_eq!(normalize("3m", ValueKind::Magnitude), Some(3.0));
    }

    #[test]
    fn test_ratio_strips_symbols_without_scaling() {
        assert_eq!(normalize("12.3%", ValueKind::Ratio), Some(12.3));
        assert_eq!(normalize("1,020.5", ValueKind::Ratio), Some(1020.5));
        assert_eq!(normalize("-4.1%", ValueKind::Ratio), Some(-4.1));
    }

    #[test]
    fn test_sentinels_are_missing_not_zero() {
        for raw in ["N/A", "-", "", "  ", "n/a", "-%"] {
            assert_eq!(normalize(raw, ValueKind::Ratio), None, "ratio {raw:?}");
            assert_eq!(normalize(raw, ValueKind::Magnitude), None, "magnitude {raw:?}");
        }
    }

    #[test]
    fn test_garbage_is_missing() {
        assert_eq!(normalize("abc", ValueKind::Ratio), None);
        assert_eq!(normalize("12X", ValueKind::Magnitude), None);
        assert_eq!(normalize("1.5B", ValueKind::Ratio), None);
        assert_eq!(normalize("inf", ValueKind::Ratio), None);
    }

    #[test]
    fn test_field_normalize_is_idempotent() {
        let once = Field::Text("500B".to_string()).normalize(ValueKind::Magnitude);
        assert_eq!(once, Field::Number(500_000.0));
        let twice = once.clone().normalize(ValueKind::Magnitude);
        assert_eq!(once, twice);

        let missing = Field::Text("N/A".to_string()).normalize(ValueKind::Ratio);
        assert!(missing.is_missing());
        assert!(missing.normalize(ValueKind::Ratio).is_missing());
    }
}
