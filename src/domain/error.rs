//! Domain error types.

/// A parse error with position information for rule parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for ticksim.
#[derive(Debug, thiserror::Error)]
pub enum TicksimError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("rule evaluation failed at index {index}: {reason}")]
    RuleEvaluation { index: usize, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    RuleParse(#[from] ParseError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TicksimError> for std::process::ExitCode {
    fn from(err: &TicksimError) -> Self {
        let code: u8 = match err {
            TicksimError::Io(_) => 1,
            TicksimError::ConfigParse { .. }
            | TicksimError::ConfigMissing { .. }
            | TicksimError::ConfigInvalid { .. } => 2,
            TicksimError::Data { .. } => 3,
            TicksimError::RuleParse(_) | TicksimError::RuleEvaluation { .. } => 4,
            TicksimError::InvalidInput { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
