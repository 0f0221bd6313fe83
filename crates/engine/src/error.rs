use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty region list, duplicate brand, etc.).
    ConfigValidation(String),
    /// Missing required column in an input file.
    MissingColumn { input: String, column: String },
    /// CSV decode error.
    Csv { input: String, message: String },
    /// Quantity parse error in the sales relation.
    QuantityParse { input: String, record_id: String, value: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { input, column } => {
                write!(f, "input '{input}': missing column '{column}'")
            }
            Self::Csv { input, message } => write!(f, "input '{input}': {message}"),
            Self::QuantityParse { input, record_id, value } => {
                write!(f, "input '{input}', record '{record_id}': cannot parse quantity '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}
