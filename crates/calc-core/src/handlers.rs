//! Intent handlers and the registry the agent dispatches through
//!
//! Each handler owns one intent. It receives the raw command line and returns
//! the payload of a successful response, or the error the user should see.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::agent::{ResponseBody, StatValue};
use crate::config::CalcConfig;
use crate::csv_export::{CsvExporter, CsvRequest};
use crate::errors::CalcError;
use crate::eval::Evaluator;
use crate::intent::Intent;
use crate::stats::{self, StatOperation};
use crate::units::{self, ConversionRequest};

pub trait IntentHandler: Send + Sync {
    fn intent(&self) -> Intent;
    fn handle(&self, text: &str) -> Result<ResponseBody, CalcError>;
}

pub struct HandlerRegistry {
    handlers: HashMap<Intent, Box<dyn IntentHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Replaces any handler already registered for the same intent.
    pub fn register_handler(&mut self, handler: Box<dyn IntentHandler>) {
        self.handlers.insert(handler.intent(), handler);
    }

    pub fn get_handler(&self, intent: Intent) -> Option<&dyn IntentHandler> {
        self.handlers.get(&intent).map(|h| h.as_ref())
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HandlerFactory;

impl HandlerFactory {
    pub fn create_default_registry(config: &CalcConfig) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register_handler(Box::new(CalculateHandler::new(Evaluator::new(
            config.evaluator.grammar(),
        ))));
        registry.register_handler(Box::new(ConvertHandler));
        registry.register_handler(Box::new(StatsHandler));
        registry.register_handler(Box::new(CsvHandler::new(CsvExporter::new(&config.csv))));
        registry
    }
}

static CALCULATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:calculate|what\s+is|evaluate)\s*").expect("prefix pattern is valid")
});

pub struct CalculateHandler {
    evaluator: Evaluator,
}

impl CalculateHandler {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    /// Strips the leading trigger phrase and a trailing question mark.
    pub fn expression_text(text: &str) -> String {
        let stripped = CALCULATE_PREFIX.replace(text.trim(), "");
        stripped.trim().trim_end_matches('?').trim().to_string()
    }
}

impl IntentHandler for CalculateHandler {
    fn intent(&self) -> Intent {
        Intent::Calculate
    }

    fn handle(&self, text: &str) -> Result<ResponseBody, CalcError> {
        let expression = Self::expression_text(text);
        let result = self.evaluator.evaluate(&expression)?;
        Ok(ResponseBody::Calculation { result })
    }
}

pub struct ConvertHandler;

impl IntentHandler for ConvertHandler {
    fn intent(&self) -> Intent {
        Intent::Convert
    }

    fn handle(&self, text: &str) -> Result<ResponseBody, CalcError> {
        let request = ConversionRequest::parse(text)?;
        let result = units::convert(request.value, &request.from, &request.to)?;
        Ok(ResponseBody::Conversion {
            value: request.value,
            result,
            from: request.from,
            to: request.to,
        })
    }
}

pub struct StatsHandler;

impl IntentHandler for StatsHandler {
    fn intent(&self) -> Intent {
        Intent::Stats
    }

    fn handle(&self, text: &str) -> Result<ResponseBody, CalcError> {
        let values = stats::extract_numbers(text);
        if values.is_empty() {
            return Err(CalcError::Statistics("No numbers found".to_string()));
        }
        let operation = StatOperation::detect(text)
            .ok_or_else(|| CalcError::Statistics("No valid operation found".to_string()))?;
        let result = match operation {
            StatOperation::Mean => StatValue::Scalar(stats::mean(&values)?),
            StatOperation::Median => StatValue::Scalar(stats::median(&values)?),
            StatOperation::Summary => StatValue::Summary(stats::summarize(&values)?),
        };
        Ok(ResponseBody::Statistic { operation, result })
    }
}

pub struct CsvHandler {
    exporter: CsvExporter,
}

impl CsvHandler {
    pub fn new(exporter: CsvExporter) -> Self {
        Self { exporter }
    }
}

impl IntentHandler for CsvHandler {
    fn intent(&self) -> Intent {
        Intent::GenerateCsv
    }

    fn handle(&self, text: &str) -> Result<ResponseBody, CalcError> {
        let request = CsvRequest::parse(text)?;
        let output = self.exporter.export(&request)?;
        Ok(ResponseBody::Csv {
            csv: output.csv,
            path: output.path,
            rows: output.rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::Number;

    #[test]
    fn test_default_registry_covers_known_intents() {
        let registry = HandlerFactory::create_default_registry(&CalcConfig::default());
        assert_eq!(registry.handler_count(), 4);
        for intent in [Intent::Calculate, Intent::Convert, Intent::Stats, Intent::GenerateCsv] {
            assert_eq!(registry.get_handler(intent).map(|h| h.intent()), Some(intent));
        }
        assert!(registry.get_handler(Intent::Unknown).is_none());
    }

    #[test]
    fn test_expression_text() {
        assert_eq!(CalculateHandler::expression_text("calculate 2 + 3"), "2 + 3");
        assert_eq!(CalculateHandler::expression_text("What is 7 / 2?"), "7 / 2");
        assert_eq!(CalculateHandler::expression_text("evaluate(1+1)"), "(1+1)");
        assert_eq!(CalculateHandler::expression_text("1 + 1"), "1 + 1");
    }

    #[test]
    fn test_calculate_handler() {
        let handler = CalculateHandler::new(Evaluator::strict());
        assert_eq!(
            handler.handle("calculate 2 + 3 * 4").unwrap(),
            ResponseBody::Calculation { result: Number::Int(14) }
        );
        assert!(handler.handle("calculate os.system(1)").is_err());
    }

    #[test]
    fn test_stats_handler_without_operation() {
        let err = StatsHandler.handle("1 2 3").unwrap_err();
        assert_eq!(err.to_string(), "No valid operation found");
        let err = StatsHandler.handle("mean of nothing").unwrap_err();
        assert_eq!(err.to_string(), "No numbers found");
    }

    #[test]
    fn test_replacing_a_handler() {
        struct Fixed;
        impl IntentHandler for Fixed {
            fn intent(&self) -> Intent {
                Intent::Calculate
            }
            fn handle(&self, _text: &str) -> Result<ResponseBody, CalcError> {
                Ok(ResponseBody::Calculation { result: Number::Int(0) })
            }
        }

        let mut registry = HandlerFactory::create_default_registry(&CalcConfig::default());
        registry.register_handler(Box::new(Fixed));
        assert_eq!(registry.handler_count(), 4);
        let handler = registry.get_handler(Intent::Calculate).unwrap();
        assert_eq!(handler.handle("1 + 1").unwrap(), ResponseBody::Calculation { result: Number::Int(0) });
    }
}
