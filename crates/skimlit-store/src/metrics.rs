//! Metrics provider: model vs. baseline evaluation tables plus one plot.
//!
//! The metrics directory is read once at startup:
//!
//! - `model_metrics.csv` and `baseline_metrics.csv`, header row required,
//!   column types inferred by the Arrow CSV reader;
//! - `confusion_matrix.png`, or else the first `.png`/`.jpg`/`.jpeg`/`.svg`
//!   file by name.
//!
//! Both tables must have at least one row, at least two columns, and the
//! same column names in the same order.

use std::fs::File;
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use skimlit_core::ServiceError;
use skimlit_core::api::{MetricsResponse, MetricsTable};
use tracing::{info, warn};

use crate::error::StoreError;

pub const MODEL_METRICS_FILE: &str = "model_metrics.csv";
pub const BASELINE_METRICS_FILE: &str = "baseline_metrics.csv";
pub const PREFERRED_IMAGE_FILE: &str = "confusion_matrix.png";

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("svg", "image/svg+xml"),
];

/// Validated evaluation artifacts.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub model: RecordBatch,
    pub baseline: RecordBatch,
    pub image: Vec<u8>,
    pub image_mime: &'static str,
}

impl MetricsReport {
    /// Read and validate all artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let model = read_table(&dir.join(MODEL_METRICS_FILE), "model")?;
        let baseline = read_table(&dir.join(BASELINE_METRICS_FILE), "baseline")?;

        let model_cols = column_names(&model);
        let baseline_cols = column_names(&baseline);
        if model_cols != baseline_cols {
            return Err(StoreError::SchemaMismatch {
                model: model_cols,
                baseline: baseline_cols,
            });
        }

        let (image_path, image_mime) = find_image(dir)?;
        let image = std::fs::read(&image_path)?;
        if image.is_empty() {
            return Err(StoreError::Malformed {
                table: "image",
                reason: format!("{} is empty", image_path.display()),
            });
        }

        info!(
            columns = model_cols.len(),
            model_rows = model.num_rows(),
            baseline_rows = baseline.num_rows(),
            image = %image_path.display(),
            "loaded metrics artifacts"
        );
        Ok(Self {
            model,
            baseline,
            image,
            image_mime,
        })
    }

    /// Both tables flattened to display strings.
    pub fn tables(&self) -> Result<(MetricsTable, MetricsTable), StoreError> {
        Ok((table_from_batch(&self.model)?, table_from_batch(&self.baseline)?))
    }

    pub fn to_response(&self, image_url: &str) -> Result<MetricsResponse, StoreError> {
        let (model, baseline) = self.tables()?;
        Ok(MetricsResponse {
            model,
            baseline,
            image_url: image_url.to_string(),
        })
    }
}

/// Metrics loaded once per process. Load failures are kept and reported on
/// every request so the rest of the service keeps working.
pub struct MetricsStore {
    report: Result<MetricsReport, StoreError>,
}

impl MetricsStore {
    pub fn open(dir: &Path) -> Self {
        let report = MetricsReport::load(dir);
        if let Err(e) = &report {
            warn!(dir = %dir.display(), error = %e, "metrics unavailable");
        }
        Self { report }
    }

    pub fn from_report(report: MetricsReport) -> Self {
        Self { report: Ok(report) }
    }

    pub fn is_available(&self) -> bool {
        self.report.is_ok()
    }

    pub fn get_metrics(&self) -> Result<&MetricsReport, ServiceError> {
        self.report.as_ref().map_err(ServiceError::from)
    }
}

fn read_table(path: &Path, table: &'static str) -> Result<RecordBatch, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let mut file = File::open(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(1000))?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    let batch = arrow::compute::concat_batches(&schema, &batches)?;

    if batch.num_columns() < 2 {
        return Err(StoreError::Malformed {
            table,
            reason: format!("expected at least 2 columns, found {}", batch.num_columns()),
        });
    }
    if batch.num_rows() == 0 {
        return Err(StoreError::Malformed {
            table,
            reason: "no rows".into(),
        });
    }
    Ok(batch)
}

fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

fn find_image(dir: &Path) -> Result<(PathBuf, &'static str), StoreError> {
    let preferred = dir.join(PREFERRED_IMAGE_FILE);
    if preferred.is_file() {
        return Ok((preferred, "image/png"));
    }

    let mut candidates: Vec<(PathBuf, &'static str)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter_map(|p| image_mime(&p).map(|mime| (p, mime)))
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NoImage(dir.to_path_buf()))
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Render every cell of `batch` with Arrow's display formatting.
pub fn table_from_batch(batch: &RecordBatch) -> Result<MetricsTable, StoreError> {
    let options = FormatOptions::default();
    let formatters = batch
        .columns()
        .iter()
        .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = (0..batch.num_rows())
        .map(|row| formatters.iter().map(|f| f.value(row).to_string()).collect())
        .collect();

    Ok(MetricsTable {
        columns: column_names(batch),
        rows,
    })
}
