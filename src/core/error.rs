use thiserror::Error;

/// Errors raised while assembling a transaction request.
///
/// Failures from the client collaborator are never wrapped in this type;
/// submission returns the client's own error unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransactionError {
    /// A line-scoped operation was called before any line was added.
    #[error("{operation}: no line has been added yet; add a line first")]
    IllegalState {
        /// Name of the operation that needed a line (e.g. "WithLineParameter").
        operation: &'static str,
    },

    /// The request violates a caller-side contract.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl TransactionError {
    /// The operation named by an `IllegalState` error.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::IllegalState { operation } => Some(*operation),
            _ => None,
        }
    }
}

/// A single validation finding with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "lines[0].tax_override.tax_date").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Short rule identifier if applicable (e.g. "TX-03").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.rule {
            Some(rule) => write!(f, "[{}] {}: {}", rule, self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

impl From<Vec<ValidationError>> for TransactionError {
    fn from(errors: Vec<ValidationError>) -> Self {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(msg)
    }
}
