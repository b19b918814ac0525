//! Model description and per-line feature encoding.
//!
//! The tribrid PubMed RCT models take, besides the tokens of a line, its
//! position as two one-hot vectors: `line_number` (zero-based index) and
//! `total_lines` (index of the abstract's last line, i.e. count − 1). Depths
//! come from `model.json` next to the model; positions beyond the depth are
//! clipped into the last bucket.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use skimlit_core::{Category, Line};

/// Whether output 0 of the model holds raw logits or probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    #[default]
    Logits,
    Probabilities,
}

/// Contents of the optional `model.json` shipped beside `model.onnx`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    /// Category for each output column, in column order.
    pub labels: Vec<Category>,
    pub line_number_depth: usize,
    pub total_lines_depth: usize,
    /// Token truncation length.
    pub max_length: usize,
    pub output: OutputKind,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            labels: Category::ENCODER_ORDER.to_vec(),
            line_number_depth: 15,
            total_lines_depth: 20,
            max_length: 55,
            output: OutputKind::Logits,
        }
    }
}

impl ModelSpec {
    /// Read `model.json` from `model_dir`, falling back to defaults when absent.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let path = model_dir.join("model.json");
        let spec = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str::<Self>(&raw)
                .with_context(|| format!("parse {}", path.display()))?
        } else {
            Self::default()
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.labels.is_empty(), "model.json: labels must not be empty");
        for (i, label) in self.labels.iter().enumerate() {
            anyhow::ensure!(
                !self.labels[..i].contains(label),
                "model.json: duplicate label {label}"
            );
        }
        anyhow::ensure!(
            self.line_number_depth > 0 && self.total_lines_depth > 0,
            "model.json: one-hot depths must be positive"
        );
        anyhow::ensure!(self.max_length > 0, "model.json: max_length must be positive");
        Ok(())
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// One-hot `(line_number, total_lines)` features for a line.
    pub fn encode_position(&self, line: &Line) -> (Vec<f32>, Vec<f32>) {
        (
            one_hot(line.line_number, self.line_number_depth),
            one_hot(line.total_lines.saturating_sub(1), self.total_lines_depth),
        )
    }

    /// Turn one output row into the winning category and its probability.
    pub fn decode(&self, row: &[f32]) -> anyhow::Result<(Category, f32)> {
        anyhow::ensure!(
            row.len() == self.labels.len(),
            "model produced {} scores, expected {}",
            row.len(),
            self.labels.len()
        );
        let probs = match self.output {
            OutputKind::Logits => softmax(row),
            OutputKind::Probabilities => row.to_vec(),
        };
        let (idx, p) =
            argmax(&probs).ok_or_else(|| anyhow::anyhow!("model produced non-finite scores"))?;
        Ok((self.labels[idx], p))
    }
}

/// One-hot vector of length `depth` with `index` clipped to `depth - 1`.
pub fn one_hot(index: usize, depth: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; depth];
    if depth > 0 {
        v[index.min(depth - 1)] = 1.0;
    }
    v
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        exps
    }
}

/// Index and value of the largest finite element.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}
