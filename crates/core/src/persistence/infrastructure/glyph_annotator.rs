//! Box and label drawing with `imageproc`, text rendered through `ab_glyph`.
use std::path::Path;

use ab_glyph::{FontArc, InvalidFont, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};

use crate::detection::domain::detection::Detection;
use crate::persistence::domain::frame_annotator::FrameAnnotator;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_FONT_SIZE: f32 = 18.0;
/// Gap between the label baseline and the top edge of the box.
const LABEL_OFFSET: i32 = 10;

/// DejaVu Sans, bundled so labels render without any font configuration.
static DEFAULT_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSans.ttf");

/// The bundled label font.
pub fn default_font() -> Result<FontArc, InvalidFont> {
    FontArc::try_from_slice(DEFAULT_FONT)
}

/// Load a TrueType/OpenType font for label text.
pub fn load_font(path: &Path) -> Result<FontArc, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let font = FontArc::try_from_vec(bytes)
        .map_err(|e| format!("Invalid font {}: {e}", path.display()))?;
    Ok(font)
}

/// Draws green boxes and, for recognised faces, the name above the box.
pub struct GlyphAnnotator {
    font: FontArc,
    scale: PxScale,
}

impl GlyphAnnotator {
    pub fn new(font: FontArc) -> Self {
        Self {
            font,
            scale: PxScale::from(LABEL_FONT_SIZE),
        }
    }
}

impl FrameAnnotator for GlyphAnnotator {
    fn annotate(&self, frame: &mut Frame, detections: &[Detection]) {
        if detections.is_empty() {
            return;
        }
        let Some(mut canvas) =
            RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        else {
            log::warn!("Frame buffer does not match its dimensions, skipping annotation");
            return;
        };

        for detection in detections {
            let Some(bbox) = detection.bbox else {
                continue;
            };
            draw_box(&mut canvas, &bbox);

            if let Some(text) = detection.label.display_text() {
                let y = bbox.top() - LABEL_OFFSET - LABEL_FONT_SIZE as i32;
                draw_text_mut(&mut canvas, BOX_COLOR, bbox.left(), y, self.scale, &self.font, text);
            }
        }

        frame.data_mut().copy_from_slice(canvas.as_raw());
    }
}

/// Rectangle outline grown inwards, one line per pixel of thickness.
fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox) {
    for t in 0..BOX_THICKNESS {
        let x1 = (bbox.x1 + t) as f32;
        let y1 = (bbox.y1 + t) as f32;
        let x2 = (bbox.x2 - t) as f32;
        let y2 = (bbox.y2 - t) as f32;
        draw_line_segment_mut(canvas, (x1, y1), (x2, y1), BOX_COLOR);
        draw_line_segment_mut(canvas, (x1, y2), (x2, y2), BOX_COLOR);
        draw_line_segment_mut(canvas, (x1, y1), (x1, y2), BOX_COLOR);
        draw_line_segment_mut(canvas, (x2, y1), (x2, y2), BOX_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::DetectionLabel;

    fn detection(x1: i32, y1: i32, x2: i32, y2: i32) -> Detection {
        Detection::new(
            BoundingBox::new(x1, y1, x2, y2),
            DetectionLabel::Identity("alice".into()),
        )
    }

    fn annotate(frame: &mut Frame, detections: &[Detection]) {
        GlyphAnnotator::new(default_font().unwrap()).annotate(frame, detections);
    }

    fn lit_pixels_in_rows(frame: &Frame, rows: std::ops::Range<u32>) -> usize {
        rows.flat_map(|y| (0..frame.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) != Some([0, 0, 0]))
            .count()
    }

    #[test]
    fn test_box_edges_are_green_two_pixels_thick() {
        let mut frame = Frame::filled(40, 40, [0, 0, 0]);
        annotate(&mut frame, &[detection(10, 10, 30, 30)]);

        assert_eq!(frame.pixel(20, 10), Some([0, 255, 0]));
        assert_eq!(frame.pixel(20, 11), Some([0, 255, 0]));
        assert_eq!(frame.pixel(20, 12), Some([0, 0, 0]));
        assert_eq!(frame.pixel(10, 20), Some([0, 255, 0]));
        assert_eq!(frame.pixel(30, 20), Some([0, 255, 0]));
        assert_eq!(frame.pixel(20, 30), Some([0, 255, 0]));
        assert_eq!(frame.pixel(20, 20), Some([0, 0, 0]));
    }

    #[test]
    fn test_box_partly_off_frame_is_clipped() {
        let mut frame = Frame::filled(20, 20, [0, 0, 0]);
        annotate(&mut frame, &[detection(-10, 5, 10, 40)]);
        assert_eq!(frame.pixel(5, 5), Some([0, 255, 0]));
        assert_eq!(frame.pixel(10, 15), Some([0, 255, 0]));
    }

    #[test]
    fn test_box_entirely_off_frame_leaves_frame_untouched() {
        let mut frame = Frame::filled(20, 20, [7, 7, 7]);
        annotate(&mut frame, &[detection(100, 100, 150, 150)]);
        assert_eq!(frame, Frame::filled(20, 20, [7, 7, 7]));
    }

    #[test]
    fn test_degenerate_box_does_not_panic() {
        let mut frame = Frame::filled(20, 20, [0, 0, 0]);
        annotate(&mut frame, &[detection(5, 5, 5, 5), detection(12, 12, 8, 8)]);
        assert_eq!(frame.pixel(5, 5), Some([0, 255, 0]));
    }

    #[test]
    fn test_detection_without_box_is_skipped() {
        let mut frame = Frame::filled(10, 10, [1, 2, 3]);
        let unboxed = Detection {
            bbox: None,
            label: DetectionLabel::Unknown,
        };
        annotate(&mut frame, &[unboxed]);
        assert_eq!(frame, Frame::filled(10, 10, [1, 2, 3]));
    }

    #[test]
    fn test_identity_label_drawn_above_box() {
        let mut frame = Frame::filled(200, 200, [0, 0, 0]);
        annotate(&mut frame, &[detection(60, 100, 140, 180)]);
        assert!(lit_pixels_in_rows(&frame, 0..98) > 0);
    }

    #[test]
    fn test_unnamed_detection_has_no_label() {
        let mut frame = Frame::filled(200, 200, [0, 0, 0]);
        let person = Detection::new(BoundingBox::new(60, 100, 140, 180), DetectionLabel::Person);
        annotate(&mut frame, &[person]);
        assert_eq!(lit_pixels_in_rows(&frame, 0..98), 0);
        assert_eq!(frame.pixel(100, 100), Some([0, 255, 0]));
    }

    #[test]
    fn test_load_font_rejects_non_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(load_font(&path).is_err());
        assert!(load_font(&dir.path().join("missing.ttf")).is_err());
    }
}
