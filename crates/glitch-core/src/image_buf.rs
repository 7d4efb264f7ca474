use crate::error::{Error, Result};

/// Channel counts an image may carry: grayscale, RGB or RGBA.
pub const SUPPORTED_CHANNELS: [u8; 3] = [1, 3, 4];

fn sample_len(width: u32, height: u32, channels: u8) -> Result<usize> {
    if !SUPPORTED_CHANNELS.contains(&channels) {
        return Err(Error::invalid(format!(
            "unsupported channel count {channels}, expected 1, 3 or 4"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels as usize))
        .ok_or_else(|| Error::processing(format!("{width}x{height}x{channels} overflows")))
}

/// Working-precision image.
///
/// Interleaved, row-major f32 samples on the 0..255 scale. Values may leave
/// that range between filter stages; they are only clamped by [`quantize`].
///
/// [`quantize`]: ImageBuf::quantize
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuf {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<f32>,
}

impl ImageBuf {
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self> {
        Self::filled(width, height, channels, 0.0)
    }

    pub fn filled(width: u32, height: u32, channels: u8, value: f32) -> Result<Self> {
        let len = sample_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![value; len],
        })
    }

    pub fn from_data(width: u32, height: u32, channels: u8, data: Vec<f32>) -> Result<Self> {
        let expected = sample_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::invalid(format!(
                "expected {expected} samples for {width}x{height}x{channels}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Same dimensions and channel count, zeroed samples.
    pub fn zeros_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: vec![0.0; self.data.len()],
        }
    }

    pub fn dims(&self) -> (u32, u32, u8) {
        (self.width, self.height, self.channels)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32, c: u8) -> usize {
        ((y as usize * self.width as usize + x as usize) * self.channels as usize) + c as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32, c: u8) -> f32 {
        self.data[self.index(x, y, c)]
    }

    /// Clamp every sample to [0, 255], round, and narrow to 8 bits.
    ///
    /// This is the single exit point from working precision.
    pub fn quantize(&self) -> Image8 {
        Image8 {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self
                .data
                .iter()
                .map(|&v| v.clamp(0.0, 255.0).round() as u8)
                .collect(),
        }
    }
}

/// Display/storage image: interleaved 8-bit samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image8 {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl Image8 {
    pub fn from_data(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = sample_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::invalid(format!(
                "expected {expected} bytes for {width}x{height}x{channels}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Result<Self> {
        let len = sample_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![value; len],
        })
    }

    pub fn dims(&self) -> (u32, u32, u8) {
        (self.width, self.height, self.channels)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32, c: u8) -> u8 {
        let idx =
            ((y as usize * self.width as usize + x as usize) * self.channels as usize) + c as usize;
        self.data[idx]
    }

    /// Widen to working precision. Exact for every byte value.
    pub fn to_working(&self) -> ImageBuf {
        ImageBuf {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self.data.iter().map(|&v| f32::from(v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_buf_dimensions() {
        let buf = ImageBuf::new(100, 50, 3).unwrap();
        assert_eq!(buf.sample_count(), 100 * 50 * 3);
        assert_eq!(buf.pixel_count(), 5000);
        assert_eq!(buf.dims(), (100, 50, 3));
    }

    #[test]
    fn image8_dimensions() {
        let img = Image8::filled(7, 5, 4, 0).unwrap();
        assert_eq!(img.sample_count(), 7 * 5 * 4);
        assert_eq!(img.pixel_count(), 35);
        assert_eq!(img.to_working().sample_count(), img.sample_count());
    }

    #[test]
    fn from_data_validates_length() {
        assert!(ImageBuf::from_data(2, 2, 3, vec![0.0; 12]).is_ok());
        assert!(matches!(
            ImageBuf::from_data(2, 2, 3, vec![0.0; 10]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_two_channel_images() {
        assert!(ImageBuf::new(2, 2, 2).is_err());
        assert!(Image8::from_data(1, 1, 2, vec![0, 0]).is_err());
    }

    #[test]
    fn quantize_clamps_and_rounds() {
        let buf = ImageBuf::from_data(4, 1, 1, vec![-20.0, 12.4, 12.6, 300.0]).unwrap();
        let out = buf.quantize();
        assert_eq!(out.data, vec![0, 12, 13, 255]);
    }

    #[test]
    fn widen_then_quantize_is_lossless() {
        let bytes: Vec<u8> = (0..=255).collect();
        let img = Image8::from_data(16, 16, 1, bytes.clone()).unwrap();
        assert_eq!(img.to_working().quantize().data, bytes);
    }

    #[test]
    fn get_reads_interleaved_samples() {
        let img = Image8::from_data(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.get(1, 0, 0), 4);
        assert_eq!(img.get(1, 0, 2), 6);
        let buf = img.to_working();
        assert_eq!(buf.get(0, 0, 1), 2.0);
    }

    #[test]
    fn zero_dimensions_are_representable() {
        let buf = ImageBuf::from_data(0, 0, 3, vec![]).unwrap();
        assert_eq!(buf.pixel_count(), 0);
    }
}
