//! Core SkimLit types shared by the inference pipeline, server, client, and CLI.

pub mod api;
pub mod category;
pub mod demo;
pub mod document;
pub mod error;
pub mod normalize;
pub mod schema;
pub mod segment;

pub use category::Category;
pub use demo::DEMO_ABSTRACT;
pub use document::{Abstract, ClassifiedAbstract, Line, MAX_ABSTRACT_CHARS, Prediction};
pub use error::ServiceError;
pub use normalize::{NUMBER_PLACEHOLDER, contains_numbers, replace_numbers};
pub use segment::split_lines;
