use thiserror::Error;

/// Failures surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Empty or oversized text. The user can correct and resubmit.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The classifier artifacts could not be loaded; predictions are disabled.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The bundled metrics artifacts are missing or malformed.
    #[error("metrics unavailable: {0}")]
    MetricsUnavailable(String),

    /// The loaded model failed on this request.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ServiceError {
    /// Stable machine-readable identifier used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::MetricsUnavailable(_) => "metrics_unavailable",
            Self::Inference(_) => "inference",
        }
    }

    /// Rebuild an error from its [`kind`](Self::kind) and message.
    pub fn from_kind(kind: &str, message: String) -> Option<Self> {
        match kind {
            "invalid_input" => Some(Self::InvalidInput(message)),
            "model_unavailable" => Some(Self::ModelUnavailable(message)),
            "metrics_unavailable" => Some(Self::MetricsUnavailable(message)),
            "inference" => Some(Self::Inference(message)),
            _ => None,
        }
    }

    /// Message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m)
            | Self::ModelUnavailable(m)
            | Self::MetricsUnavailable(m)
            | Self::Inference(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        let errors = [
            ServiceError::InvalidInput("empty".into()),
            ServiceError::ModelUnavailable("missing model.onnx".into()),
            ServiceError::MetricsUnavailable("no csv".into()),
            ServiceError::Inference("shape".into()),
        ];
        for err in errors {
            let rebuilt = ServiceError::from_kind(err.kind(), err.message().to_string());
            assert_eq!(rebuilt, Some(err));
        }
        assert_eq!(ServiceError::from_kind("teapot", String::new()), None);
    }

    #[test]
    fn display_includes_message() {
        let err = ServiceError::InvalidInput("abstract is empty".into());
        assert_eq!(err.to_string(), "invalid input: abstract is empty");
    }
}
