use skimlit_core::{Category, Line};

/// A trained model that assigns a category to each line of an abstract.
///
/// Implementations receive all lines of one abstract in a single batch and
/// must return exactly one `(category, confidence)` per line, in input order.
pub trait LineClassifier: Send {
    fn classify(&mut self, lines: &[Line]) -> anyhow::Result<Vec<(Category, f32)>>;

    /// Short identifier for logs.
    fn name(&self) -> &str {
        "classifier"
    }
}

impl<T: LineClassifier + ?Sized> LineClassifier for Box<T> {
    fn classify(&mut self, lines: &[Line]) -> anyhow::Result<Vec<(Category, f32)>> {
        (**self).classify(lines)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
