use thiserror::Error;

/// Errors that can occur when parsing filter and filter set expressions.
///
/// Every variant carries the zero-based offset of the offending input so
/// callers can point the user at it.
#[derive(Debug, Error)]
pub enum FilterParseError {
    #[error("{message} at position {position}")]
    Lexical { position: usize, message: String },

    #[error("expected {expected} at position {position}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("expected {expected} at position {position}, found end of expression")]
    UnexpectedEnd {
        position: usize,
        expected: &'static str,
    },

    #[error("invalid regular expression /{pattern}/ at position {position}: {source}")]
    InvalidRegex {
        position: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("expression nested too deeply at position {position}")]
    TooDeep { position: usize },
}

impl FilterParseError {
    /// Offset in the input expression where parsing failed.
    pub fn position(&self) -> usize {
        match self {
            FilterParseError::Lexical { position, .. }
            | FilterParseError::UnexpectedToken { position, .. }
            | FilterParseError::UnexpectedEnd { position, .. }
            | FilterParseError::InvalidRegex { position, .. }
            | FilterParseError::TooDeep { position } => *position,
        }
    }
}
