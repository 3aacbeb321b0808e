use std::path::PathBuf;

use image::{DynamicImage, RgbaImage};

use crate::error::Result;
use crate::result::OcrResult;
use crate::DetectionOptions;

/// Construction contract for an engine adapter: where the model assets live
/// and which files to load.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub asset_dir: PathBuf,
    pub num_threads: usize,
    pub det_model: String,
    pub cls_model: String,
    pub rec_model: String,
    pub keys_file: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("models"),
            num_threads: 4,
            det_model: "ch_PP-OCRv3_det_infer.onnx".to_string(),
            cls_model: "ch_ppocr_mobile_v2.0_cls_infer.onnx".to_string(),
            rec_model: "ch_PP-OCRv3_rec_infer.onnx".to_string(),
            keys_file: "ppocr_keys_v1.txt".to_string(),
        }
    }
}

/// The external OCR engine behind a narrow seam. Adapters wrap the real
/// inference stack; tests substitute a fake.
pub trait OcrEngine: Sized {
    /// Loads models and vocabulary. Failure here is unrecoverable for the
    /// caller and no detect call may follow.
    fn init(config: &EngineConfig) -> Result<Self>;

    /// Runs detection, classification and recognition over `input`.
    ///
    /// `output` is a caller-allocated buffer with the same pixel dimensions
    /// as `input` that the engine may draw its annotation overlay into. The
    /// conversion pipeline never reads it. `options.max_side_len` arrives
    /// already resolved, never zero.
    ///
    /// A detect call is total in the steady state: it returns a result,
    /// possibly with no text blocks, and is never retried by this layer.
    fn detect(
        &self,
        input: &DynamicImage,
        output: &mut RgbaImage,
        options: &DetectionOptions,
    ) -> Result<OcrResult>;

    /// Average detect latency in milliseconds over `loop_count` runs.
    fn benchmark(&self, input: &DynamicImage, loop_count: u32) -> Result<f64>;
}
