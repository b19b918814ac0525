use skimlit_core::{Abstract, ClassifiedAbstract, ServiceError};
use tracing::debug;

use crate::classifier::LineClassifier;

/// Validate → segment → classify, for one abstract at a time.
pub struct Pipeline<C> {
    classifier: C,
}

impl<C: LineClassifier> Pipeline<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Classify every line of `text`.
    ///
    /// Normalization is the caller's job. Fails with `InvalidInput` for
    /// blank or oversized text and with `Inference` if the model errors or
    /// returns a label count that does not match the line count.
    pub fn predict(&mut self, text: &str) -> Result<ClassifiedAbstract, ServiceError> {
        let abs = Abstract::new(text)?;
        let lines = abs.lines();
        debug!(lines = lines.len(), model = self.classifier.name(), "classifying abstract");

        let labels = self
            .classifier
            .classify(&lines)
            .map_err(|e| ServiceError::Inference(format!("{e:#}")))?;

        ClassifiedAbstract::from_parts(lines, labels)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use skimlit_core::{Category, DEMO_ABSTRACT, Line, MAX_ABSTRACT_CHARS};

    /// Labels lines by position: first is OBJECTIVE, last is CONCLUSION,
    /// lines mentioning "patients" are METHOD, everything else RESULT.
    pub(crate) struct PositionalClassifier;

    impl LineClassifier for PositionalClassifier {
        fn classify(&mut self, lines: &[Line]) -> anyhow::Result<Vec<(Category, f32)>> {
            Ok(lines
                .iter()
                .map(|l| {
                    let cat = if l.line_number == 0 {
                        Category::Objective
                    } else if l.line_number + 1 == l.total_lines {
                        Category::Conclusion
                    } else if l.text.contains("atients") {
                        Category::Method
                    } else {
                        Category::Result
                    };
                    (cat, 0.75)
                })
                .collect())
        }

        fn name(&self) -> &str {
            "positional"
        }
    }

    /// Drops the last label to simulate a broken model.
    struct TruncatingClassifier;

    impl LineClassifier for TruncatingClassifier {
        fn classify(&mut self, lines: &[Line]) -> anyhow::Result<Vec<(Category, f32)>> {
            Ok(lines
                .iter()
                .skip(1)
                .map(|_| (Category::Background, 0.5))
                .collect())
        }
    }

    struct FailingClassifier;

    impl LineClassifier for FailingClassifier {
        fn classify(&mut self, _lines: &[Line]) -> anyhow::Result<Vec<(Category, f32)>> {
            anyhow::bail!("session run failed")
        }
    }

    #[test]
    fn empty_text_is_invalid_input() {
        let mut p = Pipeline::new(PositionalClassifier);
        assert!(matches!(p.predict(""), Err(ServiceError::InvalidInput(_))));
        assert!(matches!(p.predict("  \n"), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn oversized_text_is_invalid_input() {
        let mut p = Pipeline::new(PositionalClassifier);
        let text = "a".repeat(MAX_ABSTRACT_CHARS + 1);
        assert!(matches!(p.predict(&text), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn demo_abstract_is_classified_in_order() {
        let mut p = Pipeline::new(PositionalClassifier);
        let out = p.predict(DEMO_ABSTRACT).unwrap();

        assert_eq!(out.len(), 9);
        assert_eq!(out.lines().count(), out.labels().count());
        for (i, pred) in out.predictions.iter().enumerate() {
            assert_eq!(pred.line_number, i);
            assert!(Category::ALL.contains(&pred.category));
        }
        assert_eq!(out.predictions[0].category, Category::Objective);
        assert_eq!(out.predictions[8].category, Category::Conclusion);
        assert_eq!(out.predictions[2].category, Category::Method);
    }

    #[test]
    fn misaligned_model_output_is_rejected() {
        let mut p = Pipeline::new(TruncatingClassifier);
        let err = p.predict("One line. Two lines.").unwrap_err();
        assert!(matches!(err, ServiceError::Inference(_)));
    }

    #[test]
    fn model_failure_is_inference_error() {
        let mut p = Pipeline::new(FailingClassifier);
        let err = p.predict("Some text.").unwrap_err();
        assert_eq!(err, ServiceError::Inference("session run failed".into()));
    }

    #[test]
    fn boxed_classifier_delegates() {
        let boxed: Box<dyn LineClassifier> = Box::new(PositionalClassifier);
        let p = Pipeline::new(boxed);
        assert_eq!(p.classifier().name(), "positional");
    }
}
