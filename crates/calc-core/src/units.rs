//! Fixed-factor unit conversion between units of the same dimension

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::CalcError;
use crate::number::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Mass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub symbol: &'static str,
    pub dimension: Dimension,
    /// How many base units (mm for length, g for mass) one of this unit is
    pub to_base: f64,
}

pub const UNITS: &[Unit] = &[
    Unit { symbol: "mm", dimension: Dimension::Length, to_base: 1.0 },
    Unit { symbol: "cm", dimension: Dimension::Length, to_base: 10.0 },
    Unit { symbol: "m", dimension: Dimension::Length, to_base: 1000.0 },
    Unit { symbol: "km", dimension: Dimension::Length, to_base: 1_000_000.0 },
    Unit { symbol: "g", dimension: Dimension::Mass, to_base: 1.0 },
    Unit { symbol: "kg", dimension: Dimension::Mass, to_base: 1000.0 },
    Unit { symbol: "lb", dimension: Dimension::Mass, to_base: 453.592_37 },
];

static CONVERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?\d+\.?\d*)\s*([a-zA-Z]+)\s*(?:to|in)\s*([a-zA-Z]+)").expect("conversion pattern is valid")
});

pub fn lookup(symbol: &str) -> Option<&'static Unit> {
    let symbol = symbol.to_ascii_lowercase();
    UNITS.iter().find(|u| u.symbol == symbol)
}

/// A parsed `<value> <from> to <to>` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub value: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn parse(text: &str) -> Result<Self, CalcError> {
        let caps = CONVERSION_PATTERN
            .captures(text)
            .ok_or_else(|| CalcError::Conversion("Invalid conversion format".to_string()))?;
        let value = caps[1]
            .parse::<f64>()
            .map_err(|_| CalcError::InvalidNumber(caps[1].to_string()))?;
        Ok(Self {
            value,
            from: caps[2].to_string(),
            to: caps[3].to_string(),
        })
    }
}

pub fn convert(value: f64, from: &str, to: &str) -> Result<Number, CalcError> {
    let no_converter = || CalcError::Conversion(format!("No converter registered for {} -> {}", from, to));
    let source = lookup(from).ok_or_else(no_converter)?;
    let target = lookup(to).ok_or_else(no_converter)?;
    if source.dimension != target.dimension {
        return Err(no_converter());
    }
    Number::float(value * source.to_base / target.to_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Number, expected: f64) {
        let actual = actual.as_f64();
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_metric_and_imperial_pairs() {
        approx(convert(2.0, "m", "cm").unwrap(), 200.0);
        approx(convert(250.0, "cm", "m").unwrap(), 2.5);
        approx(convert(10.0, "kg", "lb").unwrap(), 10.0 / 0.453_592_37);
        approx(convert(1.0, "lb", "kg").unwrap(), 0.453_592_37);
    }

    #[test]
    fn test_case_insensitive_units() {
        approx(convert(1.0, "KM", "M").unwrap(), 1000.0);
    }

    #[test]
    fn test_cross_dimension_is_rejected() {
        let err = convert(5.0, "kg", "m").unwrap_err();
        assert_eq!(err.to_string(), "No converter registered for kg -> m");
        assert!(convert(1.0, "parsec", "m").is_err());
    }

    #[test]
    fn test_parse_request() {
        let req = ConversionRequest::parse("convert 10 kg to lb").unwrap();
        assert_eq!(req, ConversionRequest { value: 10.0, from: "kg".into(), to: "lb".into() });
        let req = ConversionRequest::parse("-3.5cm in mm").unwrap();
        assert_eq!(req.value, -3.5);
        assert!(ConversionRequest::parse("convert kg to lb").is_err());
    }
}
