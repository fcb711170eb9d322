use thiserror::Error;

/// Errors raised while turning a transition event into a stored record.
///
/// The `Display` text of each variant is what ends up as the `error` field of
/// the Step Functions failure report, so it is kept short and free of stack
/// detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    #[error("{0}")]
    SecretRetrieval(String),
    #[error("no route for case reference {case_reference}: {reason}")]
    Routing {
        case_reference: String,
        reason: &'static str,
    },
    #[error("{0}")]
    UnrecognizedTransition(String),
    #[error("missing field {field} for transition {transition}")]
    FieldExtraction {
        field: &'static str,
        transition: &'static str,
    },
    #[error("{0}")]
    UpstreamFetch(String),
    #[error("{0}")]
    StorageWrite(String),
    #[error("invalid transition event: {0}")]
    InvalidEvent(String),
    #[error("failed serializing record - {0}")]
    Serialization(String),
}

impl CaseError {
    pub fn routing(case_reference: &str, reason: &'static str) -> Self {
        CaseError::Routing {
            case_reference: case_reference.to_string(),
            reason,
        }
    }
}

impl From<serde_json::Error> for CaseError {
    fn from(error: serde_json::Error) -> Self {
        CaseError::Serialization(error.to_string())
    }
}

/// A stage failure ready to be reported: a human readable cause and the
/// underlying error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub cause: String,
    pub error: CaseError,
}

impl Failure {
    pub fn new(cause: impl Into<String>, error: CaseError) -> Self {
        Failure {
            cause: cause.into(),
            error,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_serialization_error_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{\"action\":").unwrap_err();
        let detail = serde_error.to_string();

        let error = CaseError::from(serde_error);
        assert_eq!(error, CaseError::Serialization(detail.clone()));
        assert_eq!(
            error.to_string(),
            format!("failed serializing record - {}", detail)
        );
        assert!(!matches!(error, CaseError::StorageWrite(_)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CaseError::routing("XYZ1", "unknown region").to_string(),
            "no route for case reference XYZ1: unknown region"
        );
        assert_eq!(
            CaseError::FieldExtraction {
                field: "userEmail",
                transition: "close-case"
            }
            .to_string(),
            "missing field userEmail for transition close-case"
        );
    }
}
