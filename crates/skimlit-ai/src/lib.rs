//! Inference layer: segment an abstract, derive positional features, classify each line.

mod classifier;
mod features;
mod pipeline;
mod service;

pub use classifier::LineClassifier;
pub use features::{ModelSpec, OutputKind, argmax, one_hot, softmax};
pub use pipeline::Pipeline;
pub use service::AbstractService;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
#[cfg(feature = "onnx")]
pub use service::load_service;
