//! Keyword classification of a command line into an intent

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::units::UNITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Calculate,
    Convert,
    Stats,
    GenerateCsv,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Calculate => "calculate",
            Intent::Convert => "convert",
            Intent::Stats => "stats",
            Intent::GenerateCsv => "generate_csv",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A unit counts only when it ends the word and is not part of a file name,
// so `to m.csv` is a CSV target and `to m.` is still a conversion.
static CONVERT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let units = UNITS.iter().map(|u| u.symbol).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"\b(?:convert|to\s+(?:{})(?:$|[^\w.]|\.(?:\s|$)))", units))
        .expect("convert pattern is valid")
});

static STATS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:mean|median|average|stats|statistics|summary)").expect("stats pattern is valid")
});

static CSV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:csv|spreadsheet|save)").expect("csv pattern is valid"));

static BARE_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s.()+\-*/^%]+$").expect("expression pattern is valid"));

const CALCULATE_TOKENS: &[&str] = &["+", "-", "*", "/", "^", "sqrt"];

/// First match wins, in the order convert, stats, csv, calculate.
pub fn classify(text: &str) -> Intent {
    let text = text.trim().to_lowercase();

    let intent = if CONVERT_PATTERN.is_match(&text) {
        Intent::Convert
    } else if STATS_PATTERN.is_match(&text) {
        Intent::Stats
    } else if CSV_PATTERN.is_match(&text) {
        Intent::GenerateCsv
    } else if text.starts_with("calculate")
        || CALCULATE_TOKENS.iter().any(|tok| text.contains(tok))
        || (!text.is_empty() && BARE_EXPRESSION.is_match(&text))
    {
        Intent::Calculate
    } else {
        Intent::Unknown
    };

    log::debug!("classified '{}' as {}", text, intent);
    intent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_calculate() {
        assert_eq!(classify("calculate 2 + 3 * 4"), Intent::Calculate);
        assert_eq!(classify("2*3"), Intent::Calculate);
        assert_eq!(classify("sqrt(16)"), Intent::Calculate);
        assert_eq!(classify("42"), Intent::Calculate);
        assert_eq!(classify("What is 7 / 2?"), Intent::Calculate);
    }

    #[test]
    fn test_classify_convert() {
        assert_eq!(classify("10 kg to lb"), Intent::Convert);
        assert_eq!(classify("Convert 5 m into cm"), Intent::Convert);
        assert_eq!(classify("250 cm to m"), Intent::Convert);
        assert_eq!(classify("5 cm to m."), Intent::Convert);
        assert_eq!(classify("what is 3 kg to lb?"), Intent::Convert);
    }

    #[test]
    fn test_classify_stats() {
        assert_eq!(classify("mean of 5, 10, 15"), Intent::Stats);
        assert_eq!(classify("median 1 2 3"), Intent::Stats);
        assert_eq!(classify("summary of 1 2 3"), Intent::Stats);
    }

    #[test]
    fn test_classify_csv() {
        assert_eq!(classify("generate csv 1 2 3 4 5"), Intent::GenerateCsv);
        assert_eq!(classify("save 1 2 to my.csv"), Intent::GenerateCsv);
        assert_eq!(classify("save 1 2 to m.csv"), Intent::GenerateCsv);
        assert_eq!(classify("save 1 2 to cm.csv"), Intent::GenerateCsv);
        assert_eq!(classify("make a spreadsheet"), Intent::GenerateCsv);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("hello there"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
    }

    #[test]
    fn test_intent_names() {
        assert_eq!(Intent::GenerateCsv.to_string(), "generate_csv");
        assert_eq!(serde_json::to_string(&Intent::GenerateCsv).unwrap(), "\"generate_csv\"");
    }
}
