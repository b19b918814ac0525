//! Abstract, line, and prediction types.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::ServiceError;
use crate::segment::split_lines;

/// Maximum accepted abstract length, in characters.
pub const MAX_ABSTRACT_CHARS: usize = 10_000;

/// Validated abstract text: non-blank and at most [`MAX_ABSTRACT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abstract(String);

impl Abstract {
    pub fn new(text: impl Into<String>) -> Result<Self, ServiceError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidInput("abstract is empty".into()));
        }
        let chars = text.chars().count();
        if chars > MAX_ABSTRACT_CHARS {
            return Err(ServiceError::InvalidInput(format!(
                "abstract is {chars} characters, maximum is {MAX_ABSTRACT_CHARS}"
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment into ordered lines with positional metadata.
    pub fn lines(&self) -> Vec<Line> {
        let pieces = split_lines(&self.0);
        let total_lines = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(line_number, text)| Line {
                line_number,
                total_lines,
                text,
            })
            .collect()
    }
}

/// One sentence-like unit of an abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Zero-based position within the abstract.
    pub line_number: usize,
    pub total_lines: usize,
    pub text: String,
}

/// A line with its predicted category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub line_number: usize,
    pub total_lines: usize,
    pub category: Category,
    /// Model probability for `category`, in `[0, 1]`.
    pub confidence: f32,
    pub line: String,
}

/// Index-aligned classification of every line of an abstract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedAbstract {
    pub predictions: Vec<Prediction>,
}

impl ClassifiedAbstract {
    /// Pair lines with labels. Fails unless both sequences have the same length.
    pub fn from_parts(
        lines: Vec<Line>,
        labels: Vec<(Category, f32)>,
    ) -> Result<Self, ServiceError> {
        if lines.len() != labels.len() {
            return Err(ServiceError::Inference(format!(
                "classifier returned {} labels for {} lines",
                labels.len(),
                lines.len()
            )));
        }
        let predictions = lines
            .into_iter()
            .zip(labels)
            .map(|(line, (category, confidence))| Prediction {
                line_number: line.line_number,
                total_lines: line.total_lines,
                category,
                confidence,
                line: line.text,
            })
            .collect();
        Ok(Self { predictions })
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.predictions.iter().map(|p| p.line.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = Category> + '_ {
        self.predictions.iter().map(|p| p.category)
    }

    /// `CATEGORY: line` blocks separated by blank lines.
    pub fn render(&self) -> String {
        self.predictions
            .iter()
            .map(|p| format!("{}: {}", p.category, p.line))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
