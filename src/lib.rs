//! Client orchestration around an external OCR engine.
//!
//! The engine (text detection, angle classification, recognition) lives
//! behind the [`OcrEngine`] trait. This crate owns everything between the
//! raw engine output and the application: the pre-detection scaling bound,
//! the conversion of per-character geometry into the response schema, and
//! the confidence policy that suppresses low-quality blocks.

use std::path::PathBuf;
use std::time::Instant;

use image::{DynamicImage, RgbaImage};
use tracing::instrument;

mod convert;
mod engine;
mod error;
pub mod filter;
mod response;
mod result;
pub mod util;

pub use engine::{EngineConfig, OcrEngine};
pub use error::{EngineError, Error, Result};
pub use filter::{DropSink, FilterPolicy, LogDropSink};
pub use response::{BoundingBox, CharBoundingInfo, ImageOcrResponse, OcrRecognize};
pub use result::{OcrResult, Point, TextBlock};
pub use util::ScalePolicy;

/// Per-call engine parameters, fixed at the invocation boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionOptions {
    /// Border inset/outset in pixels applied before detection.
    pub padding: u32,
    /// Upper bound for the longer image side. `0` defers to the scaling
    /// heuristic of [`util::max_side_len`].
    pub max_side_len: u32,
    pub box_score_threshold: f32,
    pub box_threshold: f32,
    pub unclip_ratio: f32,
    /// Whether to run angle classification at all.
    pub do_angle: bool,
    /// Whether to force the dominant orientation across all blocks.
    pub most_angle: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            padding: 50,
            max_side_len: 0,
            box_score_threshold: 0.5,
            box_threshold: 0.3,
            unclip_ratio: 1.6,
            do_angle: true,
            most_angle: true,
        }
    }
}

impl DetectionOptions {
    /// Fixed parameters of the one-shot [`OcrClient::recognize`] path.
    pub const QUICK: Self = Self {
        padding: 0,
        max_side_len: 0,
        box_score_threshold: 0.35,
        box_threshold: 0.85,
        unclip_ratio: 1.5,
        do_angle: true,
        most_angle: true,
    };
}

/// Pairing of the two knobs observed to vary between client builds: how
/// aggressively large images are shrunk and whether weak blocks are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineProfile {
    pub scale: ScalePolicy,
    pub filter: FilterPolicy,
}

impl PipelineProfile {
    /// Clamped scaling plus strong-character filtering.
    pub const FILTERED: Self = Self {
        scale: ScalePolicy::Clamped,
        filter: FilterPolicy::StrongChar,
    };
    /// Shrink-only scaling, every non-blank block kept.
    pub const UNFILTERED: Self = Self {
        scale: ScalePolicy::ShrinkOnly,
        filter: FilterPolicy::KeepAll,
    };
}

pub struct OcrClientBuilder {
    config: EngineConfig,
    profile: PipelineProfile,
    sink: Box<dyn DropSink + Send + Sync>,
}

impl OcrClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.asset_dir = dir.into();
        self
    }

    pub fn det_model(mut self, name: impl Into<String>) -> Self {
        self.config.det_model = name.into();
        self
    }

    pub fn cls_model(mut self, name: impl Into<String>) -> Self {
        self.config.cls_model = name.into();
        self
    }

    pub fn rec_model(mut self, model: impl Into<String>, keys: impl Into<String>) -> Self {
        self.config.rec_model = model.into();
        self.config.keys_file = keys.into();
        self
    }

    pub fn profile(mut self, profile: PipelineProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn drop_sink(mut self, sink: impl DropSink + Send + Sync + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Initializes the engine from the configured assets. A failure here is
    /// fatal: no client is handed out.
    #[instrument(skip(self))]
    pub fn build<E: OcrEngine>(self) -> Result<OcrClient<E>> {
        let engine = E::init(&self.config)?;
        Ok(OcrClient {
            engine,
            profile: self.profile,
            sink: self.sink,
        })
    }

    /// Wraps an engine constructed elsewhere.
    pub fn build_with<E: OcrEngine>(self, engine: E) -> OcrClient<E> {
        OcrClient {
            engine,
            profile: self.profile,
            sink: self.sink,
        }
    }
}

impl Default for OcrClientBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            profile: PipelineProfile::default(),
            sink: Box::new(LogDropSink),
        }
    }
}

/// Synchronous recognition client. Holds the engine and an immutable
/// pipeline profile; everything that varies per call travels in a
/// [`DetectionOptions`] value.
pub struct OcrClient<E> {
    engine: E,
    profile: PipelineProfile,
    sink: Box<dyn DropSink + Send + Sync>,
}

impl<E: OcrEngine> OcrClient<E> {
    pub fn profile(&self) -> PipelineProfile {
        self.profile
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// One-shot recognition with the fixed [`DetectionOptions::QUICK`]
    /// parameters and an internally allocated overlay buffer.
    #[instrument(skip(self, image))]
    pub fn recognize(&self, image: &DynamicImage, request_id: &str) -> Result<ImageOcrResponse> {
        let mut overlay = RgbaImage::new(image.width(), image.height());
        self.recognize_with(image, &mut overlay, request_id, &DetectionOptions::QUICK)
    }

    /// Recognition with caller-supplied parameters and overlay buffer. The
    /// response always carries the unscaled source dimensions, regardless of
    /// the bound the engine detected at.
    #[instrument(skip(self, image, output))]
    pub fn recognize_with(
        &self,
        image: &DynamicImage,
        output: &mut RgbaImage,
        request_id: &str,
        options: &DetectionOptions,
    ) -> Result<ImageOcrResponse> {
        let raw = self.detect_raw(image, output, options)?;
        Ok(convert::to_response(
            &raw,
            image.width(),
            image.height(),
            request_id,
            self.profile.filter,
            self.sink.as_ref(),
        ))
    }

    /// Raw engine output, before filtering and conversion. Inspection
    /// consumers read this; applications want [`Self::recognize`].
    #[instrument(skip(self, image, output))]
    pub fn detect_raw(
        &self,
        image: &DynamicImage,
        output: &mut RgbaImage,
        options: &DetectionOptions,
    ) -> Result<OcrResult> {
        let mut options = *options;
        if options.max_side_len == 0 {
            options.max_side_len =
                util::max_side_len(image.width(), image.height(), self.profile.scale);
        }
        let start = Instant::now();
        let result = self.engine.detect(image, output, &options)?;
        log::debug!(
            "engine returned {} block(s) in {:?}",
            result.text_blocks.len(),
            start.elapsed()
        );
        Ok(result)
    }

    /// Average engine latency in milliseconds over `loop_count` runs.
    pub fn benchmark(&self, image: &DynamicImage, loop_count: u32) -> Result<f64> {
        self.engine.benchmark(image, loop_count)
    }
}
