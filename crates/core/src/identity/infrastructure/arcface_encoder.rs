//! ArcFace identity embeddings via ONNX Runtime.
//!
//! Faces are cropped from the frame, resized to 112x112 and embedded into
//! an L2-normalized vector. Two faces are the same person when the cosine
//! similarity of their embeddings reaches the threshold.
use std::path::Path;
use std::sync::Mutex;

use crate::detection::infrastructure::execution_provider::preferred_execution_providers;
use crate::identity::domain::face_encoder::FaceEncoder;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Cosine similarity at or above which two embeddings are the same person.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct ArcFaceEncoder {
    session: Mutex<ort::session::Session>,
    threshold: f64,
}

impl ArcFaceEncoder {
    pub fn new(model_path: &Path, threshold: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_inter_threads(1)?
            .with_intra_threads(intra_threads)?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        Ok(Self {
            session: Mutex::new(session),
            threshold,
        })
    }
}

impl FaceEncoder for ArcFaceEncoder {
    fn encode(
        &self,
        frame: &Frame,
        face: &BoundingBox,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let region = face
            .visible_region(frame.width(), frame.height())
            .ok_or_else(|| format!("Face box {face:?} lies outside the frame"))?;

        let tensor = preprocess(frame, region);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;

        let mut embedding = embedding_slice.to_vec();
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn is_match(&self, known: &[f32], candidate: &[f32]) -> bool {
        cosine_similarity(known, candidate) >= self.threshold
    }
}

/// Resize the `(x, y, w, h)` region to 112x112, normalize, NCHW layout.
fn preprocess(frame: &Frame, region: (u32, u32, u32, u32)) -> ndarray::Array4<f32> {
    let (rx, ry, rw, rh) = region;
    let src = frame.as_ndarray();
    let src_w = rw as usize;
    let src_h = rh as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                let value = src[[ry as usize + src_y, rx as usize + src_x, c]];
                tensor[[0, c, y, x]] = (value as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }

    tensor
}

pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Dot product of L2-normalized vectors equals cosine similarity.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_l2_normalize_unit_vector() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert_relative_eq!(v[0], 0.6, epsilon = 1e-6);
        assert_relative_eq!(v[1], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let mut v = vec![1.0, 2.0, 3.0];
        l2_normalize(&mut v);
        assert_relative_eq!(cosine_similarity(&v, &v), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        assert_relative_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_preprocess_shape() {
        let frame = Frame::filled(64, 48, [10, 20, 30]);
        let tensor = preprocess(&frame, (0, 0, 64, 48));
        assert_eq!(tensor.shape(), &[1, 3, 112, 112]);
    }

    #[test]
    fn test_preprocess_normalization() {
        let frame = Frame::filled(20, 20, [127, 255, 0]);
        let tensor = preprocess(&frame, (5, 5, 10, 10));
        assert_relative_eq!(tensor[[0, 0, 0, 0]], (127.0 - 127.5) / 127.5, epsilon = 1e-6);
        assert_relative_eq!(tensor[[0, 1, 50, 50]], 1.0, epsilon = 1e-6);
        assert_relative_eq!(tensor[[0, 2, 111, 111]], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_preprocess_reads_only_the_region() {
        // Left half black, right half white; crop the right half.
        let mut frame = Frame::filled(20, 10, [0, 0, 0]);
        for y in 0..10usize {
            for x in 10..20usize {
                let offset = (y * 20 + x) * 3;
                frame.data_mut()[offset..offset + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        let tensor = preprocess(&frame, (10, 0, 10, 10));
        assert!(tensor.iter().all(|v| (*v - 1.0).abs() < 1e-6));
    }
}
