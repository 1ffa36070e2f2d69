//! The calculator agent: classify a command line, dispatch it, report back
//!
//! Every line is handled on its own. Failures never escape [`CalculatorAgent::process`];
//! they come back as an `error` response for the intent that was attempted, so the
//! console loop can print them and read the next line.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::CalcConfig;
use crate::errors::CalcError;
use crate::handlers::{HandlerFactory, HandlerRegistry};
use crate::intent::{classify, Intent};
use crate::number::Number;
use crate::stats::{StatOperation, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Scalar(f64),
    Summary(Summary),
}

/// Intent-specific part of a response, flattened next to `status` and `intent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Calculation {
        result: Number,
    },
    Conversion {
        value: f64,
        result: Number,
        from: String,
        to: String,
    },
    Statistic {
        operation: StatOperation,
        result: StatValue,
    },
    Csv {
        csv: String,
        path: PathBuf,
        rows: usize,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResponse {
    pub status: Status,
    pub intent: Intent,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl AgentResponse {
    pub fn ok(intent: Intent, body: ResponseBody) -> Self {
        Self {
            status: Status::Ok,
            intent,
            body,
        }
    }

    pub fn error(intent: Intent, err: &CalcError) -> Self {
        Self {
            status: Status::Error,
            intent,
            body: ResponseBody::Error {
                error: err.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Human-readable form for the console.
    pub fn render(&self) -> String {
        match &self.body {
            ResponseBody::Calculation { result } => format!("Result: {}", result),
            ResponseBody::Conversion {
                value,
                result,
                from,
                to,
            } => format!("{} {} = {} {}", Number::Float(*value), from, result, to),
            ResponseBody::Statistic {
                operation,
                result: StatValue::Scalar(value),
            } => format!("{}: {}", operation.name(), Number::Float(*value)),
            ResponseBody::Statistic {
                result: StatValue::Summary(s),
                ..
            } => format!(
                "count: {}\nsum: {}\nmean: {}\nmedian: {}\nmin: {}\nmax: {}\nstd_dev: {}",
                s.count,
                Number::Float(s.sum),
                Number::Float(s.mean),
                Number::Float(s.median),
                Number::Float(s.min),
                Number::Float(s.max),
                Number::Float(s.std_dev),
            ),
            ResponseBody::Csv { csv, path, .. } => {
                format!("Generated CSV:\n{}Saved to {}", csv, path.display())
            }
            ResponseBody::Error { error } if self.intent == Intent::Unknown => error.clone(),
            ResponseBody::Error { error } => format!("Error: {}", error),
        }
    }
}

pub struct CalculatorAgent {
    registry: HandlerRegistry,
}

impl CalculatorAgent {
    pub fn new(config: &CalcConfig) -> Self {
        Self::with_registry(HandlerFactory::create_default_registry(config))
    }

    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn process(&self, text: &str) -> AgentResponse {
        let intent = classify(text);
        let Some(handler) = self.registry.get_handler(intent) else {
            return AgentResponse::error(Intent::Unknown, &CalcError::UnknownCommand);
        };

        match handler.handle(text) {
            Ok(body) => AgentResponse::ok(intent, body),
            Err(err) => {
                log::warn!("{} failed for '{}': {}", intent, text.trim(), err);
                AgentResponse::error(intent, &err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent() -> CalculatorAgent {
        CalculatorAgent::new(&CalcConfig::default())
    }

    #[test]
    fn test_calculate_response() {
        let response = agent().process("calculate 2 + 3 * 4");
        assert!(response.is_ok());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "ok", "intent": "calculate", "result": 14})
        );
        assert_eq!(response.render(), "Result: 14");
    }

    #[test]
    fn test_rejected_expression_is_error_response() {
        let response = agent().process("calculate __import__('os')");
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.intent, Intent::Calculate);
        assert!(response.render().starts_with("Error: Invalid expression"));
    }

    #[test]
    fn test_convert_response() {
        let response = agent().process("250 cm to m");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "ok", "intent": "convert", "value": 250.0, "result": 2.5, "from": "cm", "to": "m"})
        );
        assert_eq!(response.render(), "250.0 cm = 2.5 m");
    }

    #[test]
    fn test_stats_response() {
        let response = agent().process("mean of 1, 2, 3, 4, 5");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "ok", "intent": "stats", "operation": "mean", "result": 3.0})
        );
        assert_eq!(response.render(), "mean: 3.0");
    }

    #[test]
    fn test_summary_response() {
        let response = agent().process("stats 1 2 3");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["operation"], "summary");
        assert_eq!(value["result"]["count"], 3);
        assert_eq!(value["result"]["median"], 2.0);
    }

    #[test]
    fn test_unknown_response() {
        let response = agent().process("tell me a joke");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "error", "intent": "unknown", "error": "Sorry, I couldn't understand your request."})
        );
        assert_eq!(response.render(), "Sorry, I couldn't understand your request.");
    }

    #[test]
    fn test_conversion_error() {
        let response = agent().process("convert 5 kg to m");
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.render(), "Error: No converter registered for kg -> m");
    }
}
