//! ONNX Runtime sentence classifier for PubMed RCT models.
//!
//! The model directory must contain `model.onnx` and `tokenizer.json`, and
//! may contain `model.json` (see [`ModelSpec`]). The graph takes four inputs:
//! `input_ids` and `attention_mask` (`i64 [batch, seq]`) plus the one-hot
//! position features `line_number` and `total_lines` (`f32 [batch, depth]`),
//! and produces `f32 [batch, classes]` scores as its first output.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use skimlit_core::{Category, Line};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::classifier::LineClassifier;
use crate::features::ModelSpec;

/// Line classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    session: Session,
    tokenizer: Tokenizer,
    spec: ModelSpec,
}

impl OnnxClassifier {
    /// Load a classifier from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let spec = ModelSpec::load(model_dir)?;
        let session = Session::builder()?.commit_from_file(&model_path)?;

        // Output width must agree with the label list when the graph declares it.
        if let Some(classes) = infer_classes(session.outputs()[0].dtype()) {
            anyhow::ensure!(
                classes == spec.num_classes(),
                "model outputs {classes} classes but model.json lists {} labels",
                spec.num_classes()
            );
        }

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: spec.max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        // Pad every line in a batch to the longest one.
        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            ..Default::default()
        }));

        info!(
            classes = spec.num_classes(),
            max_length = spec.max_length,
            model = %model_path.display(),
            "loaded sentence classifier"
        );
        Ok(Self {
            session,
            tokenizer,
            spec,
        })
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }
}

impl LineClassifier for OnnxClassifier {
    fn classify(&mut self, lines: &[Line]) -> anyhow::Result<Vec<(Category, f32)>> {
        if lines.is_empty() {
            return Ok(vec![]);
        }

        let batch_size = lines.len();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        let encodings = self
            .tokenizer
            .encode_batch(texts, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Flat token tensors: [batch_size, seq_len].
        let mut input_ids = vec![0i64; batch_size * seq_len];
        let mut attention_mask = vec![0i64; batch_size * seq_len];
        for (i, encoding) in encodings.iter().enumerate() {
            let offset = i * seq_len;
            for (j, &id) in encoding.get_ids().iter().enumerate() {
                input_ids[offset + j] = id as i64;
            }
            for (j, &mask) in encoding.get_attention_mask().iter().enumerate() {
                attention_mask[offset + j] = mask as i64;
            }
        }

        // Flat position tensors: [batch_size, depth].
        let ln_depth = self.spec.line_number_depth;
        let tl_depth = self.spec.total_lines_depth;
        let mut line_number = Vec::with_capacity(batch_size * ln_depth);
        let mut total_lines = Vec::with_capacity(batch_size * tl_depth);
        for line in lines {
            let (ln, tl) = self.spec.encode_position(line);
            line_number.extend(ln);
            total_lines.extend(tl);
        }

        let token_shape = [batch_size as i64, seq_len as i64];
        let ids_tensor = Tensor::from_array((token_shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((token_shape, attention_mask.into_boxed_slice()))?;
        let ln_tensor = Tensor::from_array((
            [batch_size as i64, ln_depth as i64],
            line_number.into_boxed_slice(),
        ))?;
        let tl_tensor = Tensor::from_array((
            [batch_size as i64, tl_depth as i64],
            total_lines.into_boxed_slice(),
        ))?;

        debug!(batch_size, seq_len, "running sentence classifier");
        let outputs = self.session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "line_number" => ln_tensor,
            "total_lines" => tl_tensor,
        ])?;

        // Scores: [batch_size, classes].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        let classes = self.spec.num_classes();
        anyhow::ensure!(
            dims.len() == 2 && dims[0] as usize == batch_size && dims[1] as usize == classes,
            "unexpected output shape: {dims:?}, expected [{batch_size}, {classes}]"
        );

        output_data
            .chunks(classes)
            .map(|row| self.spec.decode(row))
            .collect()
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Try to read the class count from the model's declared output shape.
fn infer_classes(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
