//! Arrow schema for exporting classified abstracts.

use std::sync::Arc;

use arrow::array::{Float32Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::document::ClassifiedAbstract;

/// Schema for one row per classified line.
pub fn predictions_schema() -> Schema {
    Schema::new(vec![
        Field::new("line_number", DataType::UInt32, false),
        Field::new("total_lines", DataType::UInt32, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("confidence", DataType::Float32, false),
        Field::new("line", DataType::Utf8, false),
    ])
}

impl ClassifiedAbstract {
    /// Convert to a single RecordBatch matching [`predictions_schema`].
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let p = &self.predictions;
        let line_numbers = UInt32Array::from_iter_values(p.iter().map(|x| x.line_number as u32));
        let totals = UInt32Array::from_iter_values(p.iter().map(|x| x.total_lines as u32));
        let categories = StringArray::from_iter_values(p.iter().map(|x| x.category.as_str()));
        let confidences = Float32Array::from_iter_values(p.iter().map(|x| x.confidence));
        let lines = StringArray::from_iter_values(p.iter().map(|x| x.line.as_str()));

        RecordBatch::try_new(
            Arc::new(predictions_schema()),
            vec![
                Arc::new(line_numbers),
                Arc::new(totals),
                Arc::new(categories),
                Arc::new(confidences),
                Arc::new(lines),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::document::Prediction;
    use arrow::array::Array;

    #[test]
    fn predictions_schema_has_expected_fields() {
        let schema = predictions_schema();
        assert_eq!(schema.fields().len(), 5);
        assert!(schema.field_with_name("category").is_ok());
        assert!(schema.field_with_name("confidence").is_ok());
    }

    #[test]
    fn record_batch_preserves_order() {
        let classified = ClassifiedAbstract {
            predictions: vec![
                Prediction {
                    line_number: 0,
                    total_lines: 2,
                    category: Category::Background,
                    confidence: 0.6,
                    line: "Ulcers are common.".into(),
                },
                Prediction {
                    line_number: 1,
                    total_lines: 2,
                    category: Category::Conclusion,
                    confidence: 0.8,
                    line: "The dressing works.".into(),
                },
            ],
        };
        let batch = classified.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);

        let cats = batch
            .column_by_name("category")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(cats.value(0), "BACKGROUND");
        assert_eq!(cats.value(1), "CONCLUSION");
        assert!(!cats.is_null(1));
    }

    #[test]
    fn empty_abstract_gives_empty_batch() {
        let batch = ClassifiedAbstract::default().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 5);
    }
}
