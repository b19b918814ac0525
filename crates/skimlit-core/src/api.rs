//! JSON request/response bodies shared by the HTTP server and client.

use serde::{Deserialize, Serialize};

use crate::document::{ClassifiedAbstract, Prediction};
use crate::error::ServiceError;

/// Where the submitted text came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// The bundled demo abstract, possibly edited.
    Demo,
    /// Text typed or pasted by the user.
    #[default]
    FreeText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
    #[serde(default)]
    pub mode: InputMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
    /// `CATEGORY: line` blocks, ready for display.
    pub rendered: String,
}

impl From<ClassifiedAbstract> for PredictResponse {
    fn from(classified: ClassifiedAbstract) -> Self {
        let rendered = classified.render();
        Self {
            predictions: classified.predictions,
            rendered,
        }
    }
}

impl From<PredictResponse> for ClassifiedAbstract {
    fn from(resp: PredictResponse) -> Self {
        Self {
            predictions: resp.predictions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoResponse {
    pub text: String,
}

/// A metrics table flattened to display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub model: MetricsTable,
    pub baseline: MetricsTable,
    /// Path of the evaluation plot, relative to the server root.
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub model: bool,
    pub metrics: bool,
}

/// Body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn predict_request_defaults_to_free_text() {
        let req: PredictRequest = serde_json::from_str(r#"{"text": "Hello."}"#).unwrap();
        assert_eq!(req.mode, InputMode::FreeText);

        let req: PredictRequest =
            serde_json::from_str(r#"{"text": "Hello.", "mode": "demo"}"#).unwrap();
        assert_eq!(req.mode, InputMode::Demo);
    }

    #[test]
    fn predict_response_carries_rendered_text() {
        let classified = ClassifiedAbstract {
            predictions: vec![Prediction {
                line_number: 0,
                total_lines: 1,
                category: Category::Objective,
                confidence: 0.91,
                line: "To evaluate a dressing.".into(),
            }],
        };
        let resp = PredictResponse::from(classified);
        assert_eq!(resp.rendered, "OBJECTIVE: To evaluate a dressing.");

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["predictions"][0]["category"], "OBJECTIVE");
        assert_eq!(json["predictions"][0]["line"], "To evaluate a dressing.");
    }

    #[test]
    fn error_body_from_service_error() {
        let body = ErrorBody::from(&ServiceError::MetricsUnavailable("gone".into()));
        assert_eq!(body.kind, "metrics_unavailable");
        assert_eq!(body.message, "gone");
    }
}
