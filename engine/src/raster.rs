//! Pixel loops that turn a noise source into an RGBA buffer.

use std::ops::Range;
use std::path::Path;

use tracing::debug;

use crate::api::{NoiseError, NoiseSource};

/// Row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0; width as usize * height as usize * 4] }
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba.iter().copied().cycle().take(width as usize * height as usize * 4).collect();
        Self { width, height, data }
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, NoiseError> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(NoiseError::RasterSize { width, height, len: data.len() });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Pixel or transparent black when `(x, y)` lies outside the image.
    pub fn pixel_or_clear(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return [0; 4];
        }
        self.pixel(x as u32, y as u32)
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), NoiseError> {
        let path = path.as_ref();
        image::save_buffer(path, &self.data, self.width, self.height, image::ColorType::Rgba8)?;
        debug!(path = %path.display(), width = self.width, height = self.height, "saved raster");
        Ok(())
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, NoiseError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self { width, height, data: img.into_raw() })
    }
}

/// `floor(value * 255)`, with the value clamped to `[0, 1]` first.
#[inline]
pub fn to_gray(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).floor() as u8
}

#[inline]
pub fn gray_pixel(value: f64) -> [u8; 4] {
    let g = to_gray(value);
    [g, g, g, 255]
}

/// Samples `source` once per pixel at integer pixel coordinates.
pub fn render<S: NoiseSource + ?Sized>(source: &S, width: u32, height: u32) -> Raster {
    debug!(width, height, "rendering noise raster");
    let mut raster = Raster::new(width, height);
    render_rows_into(source, &mut raster, 0..height);
    raster
}

/// Renders only the band `rows` into an image of the full size, leaving the
/// other rows transparent. Lets callers spread a large image over frames.
pub fn render_rows<S: NoiseSource + ?Sized>(source: &S, width: u32, height: u32, rows: Range<u32>) -> Raster {
    let mut raster = Raster::new(width, height);
    render_rows_into(source, &mut raster, rows);
    raster
}

pub fn render_rows_into<S: NoiseSource + ?Sized>(source: &S, raster: &mut Raster, rows: Range<u32>) {
    let end = rows.end.min(raster.height);
    for y in rows.start..end {
        for x in 0..raster.width {
            let value = source.sample(x as f64, y as f64);
            raster.put_pixel(x, y, gray_pixel(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ramp;

    impl NoiseSource for Ramp {
        fn sample(&self, x: f64, _y: f64) -> f64 {
            x / 3.0
        }
    }

    #[test]
    fn gray_mapping_floors() {
        assert_eq!(to_gray(0.0), 0);
        assert_eq!(to_gray(1.0), 255);
        assert_eq!(to_gray(0.5), 127);
        assert_eq!(to_gray(-0.2), 0);
        assert_eq!(to_gray(1.7), 255);
    }

    #[test]
    fn render_writes_opaque_gray() {
        let raster = render(&Ramp, 4, 2);
        assert_eq!(raster.as_bytes().len(), 4 * 2 * 4);
        assert_eq!(raster.pixel(0, 1), [0, 0, 0, 255]);
        assert_eq!(raster.pixel(3, 0), [255, 255, 255, 255]);
        let p = raster.pixel(1, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn banded_render_matches_full_render() {
        let full = render(&Ramp, 5, 6);
        let mut banded = Raster::new(5, 6);
        render_rows_into(&Ramp, &mut banded, 0..2);
        assert_eq!(banded.pixel(2, 3), [0, 0, 0, 0]);
        render_rows_into(&Ramp, &mut banded, 2..10);
        assert_eq!(banded, full);
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Raster::from_rgba(2, 2, vec![0; 15]),
            Err(NoiseError::RasterSize { width: 2, height: 2, len: 15 })
        ));
    }

    #[test]
    fn png_round_trip_through_disk() {
        let raster = render(&Ramp, 8, 8);
        let path = std::env::temp_dir().join(format!("noise_gallery_raster_{}.png", std::process::id()));
        raster.save_png(&path).unwrap();
        let loaded = Raster::open(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, raster);
    }
}
