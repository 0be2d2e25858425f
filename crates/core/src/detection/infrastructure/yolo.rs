//! Pre- and post-processing shared by the YOLO-family ONNX models.
//!
//! Both the face model and the COCO object model take a letterboxed
//! NCHW float tensor and emit rows of `[cx, cy, w, h, scores...]`, either
//! as `[1, features, anchors]` or `[1, anchors, features]`.

use std::path::Path;

use crate::shared::frame::Frame;

use super::execution_provider::preferred_execution_providers;

/// Fallback input resolution when the model shape is dynamic.
pub const DEFAULT_INPUT_SIZE: u32 = 640;

/// Gray used by YOLO for letterbox padding.
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Open an ONNX model with the platform's preferred execution providers.
pub fn open_session(model_path: &Path) -> Result<ort::session::Session, Box<dyn std::error::Error>> {
    let session = ort::session::Session::builder()?
        .with_execution_providers(preferred_execution_providers())?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Square input size from the model's NCHW input shape, if static.
pub fn input_size(session: &ort::session::Session) -> u32 {
    session
        .inputs()
        .first()
        .and_then(|input| {
            if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                if shape.len() >= 4 && shape[2] > 0 {
                    Some(shape[2] as u32)
                } else {
                    None
                }
            } else {
                None
            }
        })
        .unwrap_or(DEFAULT_INPUT_SIZE)
}

/// Run a letterboxed frame through `session` and decode the first output.
///
/// Returned boxes are in original frame coordinates.
pub fn infer(
    session: &mut ort::session::Session,
    frame: &Frame,
    input_size: u32,
    num_classes: usize,
    confidence: f64,
) -> Result<Vec<Candidate>, Box<dyn std::error::Error>> {
    let (tensor, geometry) = letterbox(frame, input_size);
    let input_value = ort::value::Tensor::from_array(tensor)?;
    let outputs = session.run(ort::inputs![input_value])?;
    if outputs.len() == 0 {
        return Err("model produced no outputs".into());
    }
    let output = outputs[0].try_extract_array::<f32>()?;
    let data = output.as_slice().ok_or("Cannot get tensor slice")?;
    let candidates = decode_output(data, output.shape(), num_classes, confidence)?;
    Ok(candidates
        .into_iter()
        .map(|c| Candidate {
            bbox: geometry.to_frame(c.bbox),
            ..c
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Letterbox
// ---------------------------------------------------------------------------

/// Scale and padding applied by [`letterbox`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LetterboxGeometry {
    pub scale: f64,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl LetterboxGeometry {
    /// Map an `[x1, y1, x2, y2]` box from model input space back to the frame.
    pub fn to_frame(&self, bbox: [f64; 4]) -> [f64; 4] {
        let px = self.pad_x as f64;
        let py = self.pad_y as f64;
        [
            (bbox[0] - px) / self.scale,
            (bbox[1] - py) / self.scale,
            (bbox[2] - px) / self.scale,
            (bbox[3] - py) / self.scale,
        ]
    }
}

/// Aspect-preserving resize into a `target_size` square, NCHW in `[0, 1]`.
pub fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, LetterboxGeometry) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let size = target_size as usize;
    let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, size, size), PAD_VALUE);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded window.
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        LetterboxGeometry {
            scale,
            pad_x,
            pad_y,
        },
    )
}

// ---------------------------------------------------------------------------
// Output decoding
// ---------------------------------------------------------------------------

/// One scored box, `[x1, y1, x2, y2]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub bbox: [f64; 4],
    pub class_id: usize,
    pub confidence: f64,
}

/// Decode a raw YOLO output tensor into candidates above `confidence`.
///
/// Each row is `[cx, cy, w, h, score_0 .. score_{num_classes-1}, extra...]`;
/// the best-scoring class is kept. Extra values (e.g. keypoints) are ignored.
pub fn decode_output(
    data: &[f32],
    shape: &[usize],
    num_classes: usize,
    confidence: f64,
) -> Result<Vec<Candidate>, Box<dyn std::error::Error>> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }
    // The feature axis is whichever one can hold box plus class scores. When
    // both can, anchors outnumber features.
    let need = 4 + num_classes;
    let transposed = match (shape[1] >= need, shape[2] >= need) {
        (true, true) => shape[1] < shape[2],
        (true, false) => true,
        (false, true) => false,
        (false, false) => {
            return Err(format!(
                "YOLO output shape {shape:?} has no axis with the {need} features needed"
            )
            .into())
        }
    };
    let (num_rows, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if data.len() < num_rows * num_feats {
        return Err("YOLO output shorter than its shape".into());
    }

    let value = |row: usize, feat: usize| -> f32 {
        if transposed {
            data[feat * num_rows + row]
        } else {
            data[row * num_feats + feat]
        }
    };

    let mut candidates = Vec::new();
    for row in 0..num_rows {
        let (class_id, score) = (0..num_classes)
            .map(|c| (c, value(row, 4 + c) as f64))
            .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });
        if score < confidence {
            continue;
        }
        let cx = value(row, 0) as f64;
        let cy = value(row, 1) as f64;
        let w = value(row, 2) as f64;
        let h = value(row, 3) as f64;
        candidates.push(Candidate {
            bbox: [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0],
            class_id,
            confidence: score,
        });
    }
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

/// Per-class greedy NMS. Output is sorted by confidence, highest first.
pub fn nms(candidates: &mut [Candidate], iou_thresh: f64) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(candidates[i].clone());
        for j in (i + 1)..candidates.len() {
            if suppressed[j] || candidates[j].class_id != candidates[i].class_id {
                continue;
            }
            if bbox_iou(&candidates[i].bbox, &candidates[j].bbox) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

/// IoU between two boxes represented as `[x1, y1, x2, y2]`.
pub fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}
