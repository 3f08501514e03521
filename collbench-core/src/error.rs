//! Harness Errors

/// Boxed error returned by a measured operation.
pub type OperationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from timing operations
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Repeat or batch count was zero
    #[error("invalid harness config: {0}")]
    InvalidConfig(String),

    /// An operation with this name is already registered
    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),

    /// No operation with this name was timed or registered
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// The measured operation itself failed; no duration was produced
    #[error("operation '{name}' failed")]
    Operation {
        /// Name of the failing operation
        name: String,
        /// Error raised by the operation
        #[source]
        source: OperationError,
    },
}

impl HarnessError {
    /// Name of the operation this error concerns, if any.
    pub fn operation_name(&self) -> Option<&str> {
        match self {
            HarnessError::InvalidConfig(_) => None,
            HarnessError::DuplicateOperation(name)
            | HarnessError::UnknownOperation(name)
            | HarnessError::Operation { name, .. } => Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_keeps_source() {
        let err = HarnessError::Operation {
            name: "max".to_string(),
            source: "empty collection".into(),
        };
        assert_eq!(err.to_string(), "operation 'max' failed");
        assert_eq!(err.operation_name(), Some("max"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "empty collection");
    }

    #[test]
    fn test_config_error_has_no_operation() {
        let err = HarnessError::InvalidConfig("repeat must be at least 1".into());
        assert_eq!(err.operation_name(), None);
    }
}
