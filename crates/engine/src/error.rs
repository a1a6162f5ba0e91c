use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (oversized rule, zero bound, empty keyword).
    ConfigValidation(String),
    /// Inventory feed has no header row.
    EmptyFeed,
    /// Required column missing from the inventory header.
    MissingColumn { column: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::EmptyFeed => write!(f, "inventory feed has no header row"),
            Self::MissingColumn { column } => {
                write!(f, "inventory feed: missing column '{column}'")
            }
        }
    }
}

impl std::error::Error for EngineError {}
