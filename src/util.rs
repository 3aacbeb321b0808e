use crate::result::Point;

/// Images whose longer side stays below this are handed to the engine
/// unscaled.
pub const MAX_SIDE_LIMIT: u32 = 960;

const SHRINK_FACTOR: f32 = 0.6;

/// How the pre-detection size bound treats large images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalePolicy {
    /// Shrink by the fixed factor, then clamp to [`MAX_SIDE_LIMIT`].
    #[default]
    Clamped,
    /// Shrink by the fixed factor without the final clamp.
    ShrinkOnly,
}

/// Upper bound for the longer image dimension handed to the engine.
pub fn max_side_len(width: u32, height: u32, policy: ScalePolicy) -> u32 {
    let long_side = width.max(height);
    if long_side < MAX_SIDE_LIMIT {
        return long_side;
    }
    let shrunk = (long_side as f32 * SHRINK_FACTOR) as u32;
    match policy {
        ScalePolicy::Clamped => shrunk.min(MAX_SIDE_LIMIT),
        ScalePolicy::ShrinkOnly => shrunk,
    }
}

/// Flattens a polygon into interleaved `(x0, y0, x1, y1, ..)` coordinates,
/// preserving vertex order.
pub fn flatten_points(points: &[Point]) -> Vec<f32> {
    points
        .iter()
        .flat_map(|point| [point.x as f32, point.y as f32])
        .collect()
}
