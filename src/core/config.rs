//! Declarative logger configuration
//!
//! `LoggerConfig` is plain data that can be deserialized from any serde
//! format and turned into a [`LoggerBuilder`] once validated.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::{Logger, LoggerBuilder};
use super::timestamp::TimestampFormat;
use crate::formatters::{Formatter, JsonFormatter, TextFormatter};
use serde::{Deserialize, Serialize};

/// Serializable description of a logger.
///
/// # Example
///
/// ```
/// use rust_field_logger::{LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::from_json(
///     r#"{"level": "debug", "format": "json", "output": "stdout"}"#,
/// )
/// .unwrap();
///
/// let logger = config.build().unwrap();
/// assert_eq!(logger.level(), LogLevel::Debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Threshold name, parsed like [`LogLevel::from_str`](std::str::FromStr)
    pub level: String,
    /// `text` or `json`
    pub format: String,
    /// `stdout` or `stderr`
    pub output: String,
    pub report_caller: bool,
    /// Overrides the timestamp format of whichever formatter is selected
    pub timestamp_format: Option<TimestampFormat>,
    pub text: TextFormatter,
    pub json: JsonFormatter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info.to_str().to_string(),
            format: "text".to_string(),
            output: "stderr".to_string(),
            report_caller: false,
            timestamp_format: None,
            text: TextFormatter::default(),
            json: JsonFormatter::default(),
        }
    }
}

impl LoggerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate the configuration and prepare a builder from it.
    ///
    /// The builder can still be customized (hooks, exit function) before
    /// `build()`.
    pub fn builder(&self) -> Result<LoggerBuilder> {
        let level: LogLevel = self.level.parse()?;
        let formatter = self.formatter()?;

        let builder = Logger::builder()
            .level(level)
            .formatter(formatter)
            .report_caller(self.report_caller);

        match self.output.to_lowercase().as_str() {
            "stdout" => Ok(builder.output(std::io::stdout())),
            "stderr" => Ok(builder.output(std::io::stderr())),
            other => Err(LoggerError::config(
                "output",
                format!("unknown output target {:?}, expected stdout or stderr", other),
            )),
        }
    }

    pub fn build(&self) -> Result<Logger> {
        Ok(self.builder()?.build())
    }

    fn formatter(&self) -> Result<Formatter> {
        match self.format.to_lowercase().as_str() {
            "text" => {
                let mut text = self.text.clone();
                if let Some(format) = &self.timestamp_format {
                    text.timestamp_format = format.clone();
                }
                validate_timestamp(&text.timestamp_format)?;
                Ok(Formatter::Text(text))
            }
            "json" => {
                let mut json = self.json.clone();
                if let Some(format) = &self.timestamp_format {
                    json.timestamp_format = format.clone();
                }
                validate_timestamp(&json.timestamp_format)?;
                Ok(Formatter::Json(json))
            }
            other => Err(LoggerError::config(
                "format",
                format!("unknown format {:?}, expected text or json", other),
            )),
        }
    }
}

fn validate_timestamp(format: &TimestampFormat) -> Result<()> {
    format
        .validate()
        .map_err(|err| LoggerError::config("timestamp_format", err.to_string()))
}
