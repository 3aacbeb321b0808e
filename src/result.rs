/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One detected and recognized text region as reported by the engine.
///
/// `bounding_point` holds exactly four corners in top-left, top-right,
/// bottom-right, bottom-left order. `char_point` holds four corners per
/// recognized character, parallel to `text` and `char_scores`.
#[derive(Debug, Clone, Default)]
pub struct TextBlock {
    pub text: String,
    pub box_point: Vec<Point>,
    pub bounding_point: Vec<Point>,
    pub char_point: Vec<Point>,
    pub char_scores: Vec<f32>,
    pub box_score: f32,
    pub angle_index: i32,
    pub angle_score: f32,
    pub angle_time: f64,
    pub crnn_time: f64,
    pub block_time: f64,
}

#[derive(Debug, Clone, Default)]
pub struct OcrResult {
    pub text_blocks: Vec<TextBlock>,
    /// Detection stage latency in milliseconds.
    pub db_net_time: f64,
    /// Wall clock of the whole detect call in milliseconds.
    pub detect_time: f64,
    /// All recognized block texts joined, as emitted by the engine.
    pub str_res: String,
}
