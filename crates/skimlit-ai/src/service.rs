//! Process-wide classification service: normalizer + pipeline behind a lock.

use std::sync::Mutex;

use skimlit_core::api::InputMode;
use skimlit_core::{
    Abstract, ClassifiedAbstract, ServiceError, contains_numbers, replace_numbers,
};
use tracing::{debug, info};

use crate::classifier::LineClassifier;
use crate::pipeline::Pipeline;

type SharedPipeline = Mutex<Pipeline<Box<dyn LineClassifier>>>;

/// Loaded once at startup and shared for the life of the process.
///
/// If the model could not be loaded the service still exists, and every
/// prediction fails with `ModelUnavailable` carrying the load error.
pub struct AbstractService {
    pipeline: Result<SharedPipeline, String>,
    normalize_demo: bool,
}

impl AbstractService {
    pub fn new(classifier: Box<dyn LineClassifier>) -> Self {
        Self {
            pipeline: Ok(Mutex::new(Pipeline::new(classifier))),
            normalize_demo: true,
        }
    }

    /// A service whose model failed to load.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            pipeline: Err(reason.into()),
            normalize_demo: true,
        }
    }

    /// Whether demo text is number-normalized like free text (default: yes).
    pub fn with_normalize_demo(mut self, normalize_demo: bool) -> Self {
        self.normalize_demo = normalize_demo;
        self
    }

    pub fn is_available(&self) -> bool {
        self.pipeline.is_ok()
    }

    /// Text as it will be handed to the model for the given input mode.
    pub fn prepare(&self, text: &str, mode: InputMode) -> String {
        let normalize = match mode {
            InputMode::FreeText => true,
            InputMode::Demo => self.normalize_demo,
        };
        if normalize && contains_numbers(text) {
            debug!(?mode, "replacing numbers before inference");
            replace_numbers(text)
        } else {
            text.to_string()
        }
    }

    /// Normalize (per mode) and classify. Blocks until the model returns.
    pub fn classify(
        &self,
        text: &str,
        mode: InputMode,
    ) -> Result<ClassifiedAbstract, ServiceError> {
        let pipeline = self
            .pipeline
            .as_ref()
            .map_err(|reason| ServiceError::ModelUnavailable(reason.clone()))?;
        // Limits apply to what the user sent; normalization shortens digit runs.
        Abstract::new(text)?;
        let prepared = self.prepare(text, mode);

        let mut pipeline = pipeline
            .lock()
            .map_err(|_| ServiceError::Inference("classifier lock poisoned".into()))?;
        let classified = pipeline.predict(&prepared)?;
        info!(lines = classified.len(), ?mode, "classified abstract");
        Ok(classified)
    }
}

/// Load the ONNX classifier from `model_dir`; on failure, log and return an
/// unavailable service instead of aborting.
#[cfg(feature = "onnx")]
pub fn load_service(model_dir: &std::path::Path) -> AbstractService {
    match crate::onnx::OnnxClassifier::load(model_dir) {
        Ok(classifier) => AbstractService::new(Box::new(classifier)),
        Err(e) => {
            tracing::error!(model_dir = %model_dir.display(), error = %format!("{e:#}"), "model unavailable");
            AbstractService::unavailable(format!("{e:#}"))
        }
    }
}
