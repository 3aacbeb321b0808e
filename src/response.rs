use serde::{Deserialize, Serialize};

/// Axis-aligned box derived from a detection's four corner points. For a
/// rotated detection this only approximates the true extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One recognized character paired with its four corner points, interleaved
/// as eight floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharBoundingInfo {
    pub points: Vec<f32>,
    #[serde(rename = "char")]
    pub character: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRecognize {
    pub text: String,
    pub bounding_box: BoundingBox,
    /// Flattened detection polygon, interleaved coordinates.
    pub text_box: Vec<f32>,
    pub char_info: Vec<CharBoundingInfo>,
}

/// The application-facing result of one recognition request. `img_width`
/// and `img_height` are the unscaled source dimensions, not the bound the
/// engine detected at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOcrResponse {
    pub ocr_res: Vec<OcrRecognize>,
    pub request_id: String,
    pub img_width: u32,
    pub img_height: u32,
}
