//! Artifact store: precomputed evaluation tables and plots bundled with the model.

mod error;
mod metrics;

pub use error::StoreError;
pub use metrics::{
    BASELINE_METRICS_FILE, MODEL_METRICS_FILE, MetricsReport, MetricsStore, PREFERRED_IMAGE_FILE,
    table_from_batch,
};
