//! Descriptive statistics over numbers pulled out of free text

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::CalcError;

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+\.?\d*").expect("number pattern is valid"));

/// Every integer or decimal in `text`, in order of appearance.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_PATTERN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatOperation {
    Mean,
    Median,
    Summary,
}

impl StatOperation {
    pub fn name(&self) -> &'static str {
        match self {
            StatOperation::Mean => "mean",
            StatOperation::Median => "median",
            StatOperation::Summary => "summary",
        }
    }

    /// Picks the operation named in the text, preferring mean over median
    /// over the full summary when several keywords appear.
    pub fn detect(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        if text.contains("mean") || text.contains("average") {
            Some(StatOperation::Mean)
        } else if text.contains("median") {
            Some(StatOperation::Median)
        } else if text.contains("stats") || text.contains("statistics") || text.contains("summary") {
            Some(StatOperation::Summary)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

fn require_values(values: &[f64]) -> Result<(), CalcError> {
    if values.is_empty() {
        Err(CalcError::Statistics("No numbers found".to_string()))
    } else {
        Ok(())
    }
}

pub fn mean(values: &[f64]) -> Result<f64, CalcError> {
    require_values(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Result<f64, CalcError> {
    require_values(values)?;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

pub fn summarize(values: &[f64]) -> Result<Summary, CalcError> {
    let mean = mean(values)?;
    let median = median(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(Summary {
        count: values.len(),
        sum: values.iter().sum(),
        mean,
        median,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        std_dev: variance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_numbers() {
        assert_eq!(extract_numbers("mean of 5, 10, 15"), vec![5.0, 10.0, 15.0]);
        assert_eq!(extract_numbers("values -2 and 3.5"), vec![-2.0, 3.5]);
        assert!(extract_numbers("no digits here").is_empty());
    }

    #[test]
    fn test_mean_of_one_to_five() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_empty_input() {
        assert!(mean(&[]).is_err());
        assert!(median(&[]).is_err());
        assert!(summarize(&[]).is_err());
    }

    #[test]
    fn test_summary() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.sum, 40.0);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.median, 4.5);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.std_dev, 2.0);
    }

    #[test]
    fn test_detect_operation() {
        assert_eq!(StatOperation::detect("Average of 1 2"), Some(StatOperation::Mean));
        assert_eq!(StatOperation::detect("median 1 2"), Some(StatOperation::Median));
        assert_eq!(StatOperation::detect("stats for 1 2"), Some(StatOperation::Summary));
        assert_eq!(StatOperation::detect("1 2 3"), None);
    }
}
