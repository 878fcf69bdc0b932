//! Brightness sources: green-channel extraction from RGBA pixel rows and
//! image files.

use std::path::Path;

use image::RgbaImage;

use crate::{Result, SonarError};

const CHANNELS: usize = 4;
const GREEN: usize = 1;

/// Extracts the green channel from tightly packed RGBA pixels. A trailing
/// partial pixel is ignored.
pub fn green_channel(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(CHANNELS)
        .map(|pixel| pixel[GREEN])
        .collect()
}

/// Decoded image whose rows can be read back as brightness scanlines.
#[derive(Debug, Clone)]
pub struct ScanlineImage {
    pixels: RgbaImage,
}

impl ScanlineImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let pixels = image::open(path.as_ref())?.to_rgba8();
        tracing::debug!(
            path = %path.as_ref().display(),
            width = pixels.width(),
            height = pixels.height(),
            "decoded scanline source"
        );
        Ok(Self { pixels })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn center_row(&self) -> u32 {
        self.height() / 2
    }

    /// Green channel of row `y`, one sample per pixel.
    pub fn row(&self, y: u32) -> Result<Vec<u8>> {
        if y >= self.height() {
            return Err(SonarError::InvalidInput("scanline row lies outside the image"));
        }
        Ok(green_channel(self.row_bytes(y)))
    }

    /// Iterates over every row from top to bottom. Zero-width images yield
    /// one empty scanline per row.
    pub fn rows(&self) -> impl Iterator<Item = Vec<u8>> + '_ {
        (0..self.height()).map(|y| green_channel(self.row_bytes(y)))
    }

    fn row_bytes(&self, y: u32) -> &[u8] {
        let stride = self.width() as usize * CHANNELS;
        let start = y as usize * stride;
        &self.pixels.as_raw()[start..start + stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn striped(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let green = if x >= width / 2 { 255 } else { (y * 10) as u8 };
            Rgba([17, green, 99, 255])
        })
    }

    #[test]
    fn extracts_second_byte_of_each_pixel() {
        let rgba = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        assert_eq!(green_channel(&rgba), vec![2, 6]);
        assert!(green_channel(&[]).is_empty());
    }

    #[test]
    fn reads_rows_as_green_scanlines() {
        let image = ScanlineImage::from_rgba(striped(8, 4));
        assert_eq!(image.center_row(), 2);
        assert_eq!(image.row(3).unwrap(), vec![30, 30, 30, 30, 255, 255, 255, 255]);
        assert_eq!(image.rows().count(), 4);
    }

    #[test]
    fn rejects_rows_outside_image() {
        let image = ScanlineImage::from_rgba(striped(8, 4));
        let err = image.row(4).unwrap_err();
        assert!(matches!(err, SonarError::InvalidInput(_)));
    }

    #[test]
    fn zero_width_image_yields_empty_rows() {
        let image = ScanlineImage::from_rgba(RgbaImage::new(0, 3));
        let rows: Vec<Vec<u8>> = image.rows().collect();
        assert_eq!(rows, vec![Vec::<u8>::new(); 3]);
        assert!(image.row(2).unwrap().is_empty());

        let sonifier = crate::Sonifier::new(crate::PipelineConfig::default(), 8_000).unwrap();
        for row in rows {
            let buffer = sonifier.process(&row);
            assert_eq!(buffer.len(), 800);
            assert!(buffer.is_silent());
        }
    }

    #[test]
    fn opens_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        striped(6, 3).save(&path).unwrap();

        let image = ScanlineImage::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (6, 3));
        assert_eq!(image.row(0).unwrap(), vec![0, 0, 0, 255, 255, 255]);
    }
}
