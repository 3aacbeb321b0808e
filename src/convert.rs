//! Turns one raw engine result into the application-facing response.
//!
//! Failures are block-local: a malformed block is skipped with a warning
//! and its siblings still convert.

use crate::filter::{self, DropSink, FilterPolicy};
use crate::response::{BoundingBox, CharBoundingInfo, ImageOcrResponse, OcrRecognize};
use crate::result::{OcrResult, Point, TextBlock};
use crate::util::flatten_points;

pub(crate) fn to_response(
    result: &OcrResult,
    width: u32,
    height: u32,
    request_id: &str,
    policy: FilterPolicy,
    sink: &dyn DropSink,
) -> ImageOcrResponse {
    let ocr_res = result
        .text_blocks
        .iter()
        .filter(|block| !block.text.trim().is_empty())
        .filter(|block| {
            let keep = filter::retains(policy, &block.char_scores);
            if !keep {
                sink.on_dropped(&block.text);
            }
            keep
        })
        .filter_map(convert_block)
        .collect();

    ImageOcrResponse {
        ocr_res,
        request_id: request_id.to_string(),
        img_width: width,
        img_height: height,
    }
}

fn convert_block(block: &TextBlock) -> Option<OcrRecognize> {
    let chars = block.text.chars().collect::<Vec<_>>();
    if block.bounding_point.len() != 4 {
        log::warn!(
            "skipping block {:?}: expected 4 bounding points, got {}",
            block.text,
            block.bounding_point.len()
        );
        return None;
    }
    if block.char_point.len() != chars.len() * 4 || block.char_scores.len() != chars.len() {
        log::warn!(
            "skipping block {:?}: character geometry out of step with text ({} points, {} scores)",
            block.text,
            block.char_point.len(),
            block.char_scores.len()
        );
        return None;
    }

    let char_info = block
        .char_point
        .chunks_exact(4)
        .zip(&chars)
        .map(|(corners, character)| CharBoundingInfo {
            points: flatten_points(corners),
            character: character.to_string(),
        })
        .collect();

    Some(OcrRecognize {
        text: block.text.clone(),
        bounding_box: derive_bounding_box(&block.bounding_point),
        text_box: flatten_points(&block.box_point),
        char_info,
    })
}

/// Corners arrive in top-left, top-right, bottom-right, bottom-left order;
/// no re-sorting happens here, so a rotated detection yields an approximate
/// extent only.
fn derive_bounding_box(corners: &[Point]) -> BoundingBox {
    BoundingBox {
        left: corners[0].x as f32,
        top: corners[0].y as f32,
        width: (corners[1].x - corners[0].x) as f32,
        height: (corners[3].y - corners[0].y) as f32,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::filter::LogDropSink;

    struct RecordingSink(Mutex<Vec<String>>);

    impl DropSink for RecordingSink {
        fn on_dropped(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    fn block(text: &str, char_scores: Vec<f32>) -> TextBlock {
        let chars = text.chars().count() as i32;
        let char_point = (0..chars)
            .flat_map(|i| {
                let x = i * 20;
                [
                    Point::new(x, 0),
                    Point::new(x + 20, 0),
                    Point::new(x + 20, 20),
                    Point::new(x, 20),
                ]
            })
            .collect();
        TextBlock {
            text: text.to_string(),
            box_point: vec![
                Point::new(0, 0),
                Point::new(chars * 20, 0),
                Point::new(chars * 20, 20),
                Point::new(0, 20),
            ],
            bounding_point: vec![
                Point::new(0, 0),
                Point::new(chars * 20, 0),
                Point::new(chars * 20, 20),
                Point::new(0, 20),
            ],
            char_point,
            char_scores,
            ..TextBlock::default()
        }
    }

    fn convert(result: &OcrResult, policy: FilterPolicy) -> ImageOcrResponse {
        to_response(result, 640, 480, "req", policy, &LogDropSink)
    }

    #[test]
    fn emits_one_char_info_per_character() {
        let result = OcrResult {
            text_blocks: vec![block("abc", vec![0.9, 0.9, 0.9])],
            ..OcrResult::default()
        };
        let response = convert(&result, FilterPolicy::StrongChar);
        let recognize = &response.ocr_res[0];
        assert_eq!(recognize.char_info.len(), 3);
        for info in &recognize.char_info {
            assert_eq!(info.points.len(), 8);
        }
        assert_eq!(recognize.char_info[0].character, "a");
        assert_eq!(recognize.char_info[2].character, "c");
        // group i belongs to character i
        assert_eq!(recognize.char_info[2].points[0], 40.0);
    }

    #[test]
    fn bounding_box_follows_fixed_corner_order() {
        let mut b = block("x", vec![0.9]);
        b.bounding_point = vec![
            Point::new(10, 10),
            Point::new(50, 10),
            Point::new(50, 30),
            Point::new(10, 30),
        ];
        let result = OcrResult {
            text_blocks: vec![b],
            ..OcrResult::default()
        };
        let response = convert(&result, FilterPolicy::StrongChar);
        assert_eq!(
            response.ocr_res[0].bounding_box,
            BoundingBox {
                left: 10.0,
                top: 10.0,
                width: 40.0,
                height: 20.0,
            }
        );
    }

    #[test]
    fn text_box_flattens_the_full_polygon() {
        // detection polygons are not limited to four vertices
        let mut b = block("x", vec![0.9]);
        b.box_point = vec![
            Point::new(0, 0),
            Point::new(10, 2),
            Point::new(20, 0),
            Point::new(20, 20),
            Point::new(0, 20),
        ];
        let result = OcrResult {
            text_blocks: vec![b],
            ..OcrResult::default()
        };
        let response = convert(&result, FilterPolicy::StrongChar);
        assert_eq!(
            response.ocr_res[0].text_box,
            vec![0.0, 0.0, 10.0, 2.0, 20.0, 0.0, 20.0, 20.0, 0.0, 20.0]
        );
    }

    #[test]
    fn blank_blocks_never_reach_the_filter() {
        let sink = RecordingSink(Mutex::new(Vec::new()));
        let result = OcrResult {
            text_blocks: vec![
                TextBlock::default(),
                block("  ", vec![0.1, 0.1]),
                block("kept", vec![0.9, 0.9, 0.9, 0.9]),
            ],
            ..OcrResult::default()
        };
        let response = to_response(&result, 640, 480, "req", FilterPolicy::StrongChar, &sink);
        assert_eq!(response.ocr_res.len(), 1);
        assert_eq!(response.ocr_res[0].text, "kept");
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn dropped_blocks_are_reported_to_the_sink() {
        let sink = RecordingSink(Mutex::new(Vec::new()));
        let result = OcrResult {
            text_blocks: vec![block("no", vec![0.1, 0.2]), block("ok", vec![0.95, 0.3])],
            ..OcrResult::default()
        };
        let response = to_response(&result, 640, 480, "req", FilterPolicy::StrongChar, &sink);
        assert_eq!(response.ocr_res.len(), 1);
        assert_eq!(response.ocr_res[0].text, "ok");
        assert_eq!(*sink.0.lock().unwrap(), vec!["no".to_string()]);
    }

    #[test]
    fn keep_all_policy_emits_weak_blocks() {
        let result = OcrResult {
            text_blocks: vec![block("no", vec![0.1, 0.2])],
            ..OcrResult::default()
        };
        let response = convert(&result, FilterPolicy::KeepAll);
        assert_eq!(response.ocr_res.len(), 1);
    }

    #[test]
    fn malformed_geometry_skips_only_the_offending_block() {
        let mut broken = block("bad", vec![0.9, 0.9, 0.9]);
        broken.bounding_point.pop();
        let mut ragged = block("odd", vec![0.9, 0.9, 0.9]);
        ragged.char_point.pop();
        let result = OcrResult {
            text_blocks: vec![broken, block("good", vec![0.9, 0.9, 0.9, 0.9]), ragged],
            ..OcrResult::default()
        };
        let response = convert(&result, FilterPolicy::StrongChar);
        assert_eq!(response.ocr_res.len(), 1);
        assert_eq!(response.ocr_res[0].text, "good");
    }

    #[test]
    fn detection_order_is_preserved() {
        let result = OcrResult {
            text_blocks: vec![
                block("first", vec![0.9; 5]),
                block("second", vec![0.9; 6]),
                block("third", vec![0.9; 5]),
            ],
            ..OcrResult::default()
        };
        let response = convert(&result, FilterPolicy::StrongChar);
        let texts = response
            .ocr_res
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn response_carries_source_dimensions_and_request_id() {
        let response = convert(&OcrResult::default(), FilterPolicy::StrongChar);
        assert_eq!(response.img_width, 640);
        assert_eq!(response.img_height, 480);
        assert_eq!(response.request_id, "req");
        assert!(response.ocr_res.is_empty());
    }

    #[test]
    fn multibyte_text_pairs_characters_by_scalar_value() {
        let result = OcrResult {
            text_blocks: vec![block("你好", vec![0.9, 0.9])],
            ..OcrResult::default()
        };
        let response = convert(&result, FilterPolicy::StrongChar);
        let recognize = &response.ocr_res[0];
        assert_eq!(recognize.char_info.len(), 2);
        assert_eq!(recognize.char_info[0].character, "你");
        assert_eq!(recognize.char_info[1].character, "好");
    }
}
