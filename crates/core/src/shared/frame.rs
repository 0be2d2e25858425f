use ndarray::ArrayView3;

const RGB_CHANNELS: usize = 3;

/// A decoded still image: contiguous 8-bit RGB bytes in row-major order.
///
/// Channel order is RGB everywhere in the crate. Decoders convert to RGB on
/// the way in; the annotator draws RGB colors; the model adapters feed the
/// channels to the networks in this order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * RGB_CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A frame filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * RGB_CHANNELS)
            .collect();
        Self::new(data, width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB triple at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * RGB_CHANNELS;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, RGB_CHANNELS)
    }
}

impl From<image::RgbImage> for Frame {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2);
    }

    #[test]
    fn test_filled_repeats_color() {
        let frame = Frame::filled(3, 2, [10, 20, 30]);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.pixel(2, 1), Some([10, 20, 30]));
    }

    #[test]
    fn test_pixel_outside_frame_is_none() {
        let frame = Frame::filled(2, 2, [0, 0, 0]);
        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.pixel(0, 2), None);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let frame = Frame::new(vec![0u8; 24], 4, 2);
        assert_eq!(frame.as_ndarray().shape(), &[2, 4, 3]);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let frame = Frame::new(data, 2, 2);
        let arr = frame.as_ndarray();
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_rgb_image_conversion_keeps_pixels() {
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(1, 1, image::Rgb([1, 2, 3]));
        let frame = Frame::from(img);
        assert_eq!(frame.pixel(1, 1), Some([1, 2, 3]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
    }
}
