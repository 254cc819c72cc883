//! CPU stand-ins for the SVG filter pages.
//!
//! The browser evaluates feTurbulence and friends natively; the desktop editor
//! approximates them here so every page has a live image. These are visual
//! approximations, not a conformant filter implementation.

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::api::NoiseSource;
use crate::color::Rgb;
use crate::filter::{BaseFrequency, BlendMode, Channel, DistantLight, Primitive, TurbulenceKind};
use crate::raster::{to_gray, Raster};

/// Nearest byte for a blended colour channel.
#[inline]
fn channel_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// feTurbulence look-alike with Perlin octaves from `fastnoise-lite`.
pub struct TurbulencePreview {
    kind: TurbulenceKind,
    base_frequency: BaseFrequency,
    num_octaves: u32,
    noise: FastNoiseLite,
}

impl TurbulencePreview {
    pub fn new(kind: TurbulenceKind, base_frequency: BaseFrequency, num_octaves: u32, seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));
        Self { kind, base_frequency, num_octaves: num_octaves.max(1), noise }
    }

    /// Builds a preview from a `Primitive::Turbulence`, `None` for anything else.
    pub fn from_primitive(primitive: &Primitive) -> Option<Self> {
        match primitive {
            Primitive::Turbulence { kind, base_frequency, num_octaves, seed, .. } => {
                let seed = seed.unwrap_or(0.0).floor() as i32;
                Some(Self::new(*kind, *base_frequency, *num_octaves, seed))
            }
            _ => None,
        }
    }
}

impl NoiseSource for TurbulencePreview {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let mut fx = self.base_frequency.x();
        let mut fy = self.base_frequency.y();
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut amplitude_sum = 0.0;
        for _ in 0..self.num_octaves {
            let n = self.noise.get_noise_2d((x * fx) as f32, (y * fy) as f32) as f64;
            total += match self.kind {
                TurbulenceKind::FractalNoise => n,
                TurbulenceKind::Turbulence => n.abs(),
            } * amplitude;
            amplitude_sum += amplitude;
            amplitude *= 0.5;
            fx *= 2.0;
            fy *= 2.0;
        }
        let v = total / amplitude_sum;
        let v = match self.kind {
            TurbulenceKind::FractalNoise => v * 0.5 + 0.5,
            TurbulenceKind::Turbulence => v,
        };
        v.clamp(0.0, 1.0)
    }
}

/// Row-major grid of scalar samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMap {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f64>,
}

impl ScalarMap {
    pub fn sample<S: NoiseSource + ?Sized>(source: &S, width: u32, height: u32) -> Self {
        let mut values = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                values.push(source.sample(x as f64, y as f64));
            }
        }
        Self { width, height, values }
    }

    /// Value at `(x, y)` with coordinates clamped to the edge.
    pub fn get(&self, x: i64, y: i64) -> f64 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.values[y * self.width as usize + x]
    }
}

/// Four independent noise channels, as feTurbulence fills R, G, B and A.
pub fn turbulence_channels(kind: TurbulenceKind, base_frequency: BaseFrequency, num_octaves: u32, seed: i32, width: u32, height: u32) -> Raster {
    let channels: Vec<TurbulencePreview> = (0..4)
        .map(|c| TurbulencePreview::new(kind, base_frequency, num_octaves, seed.wrapping_add(c)))
        .collect();
    let mut raster = Raster::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut rgba = [0u8; 4];
            for (c, channel) in channels.iter().enumerate() {
                rgba[c] = to_gray(channel.sample(x as f64, y as f64));
            }
            raster.put_pixel(x, y, rgba);
        }
    }
    raster
}

/// Gray `noise` drawn over a solid background with the given opacity and blend.
pub fn composite_over(background: Rgb, noise: &ScalarMap, opacity: f64, blend: BlendMode) -> Raster {
    let opacity = opacity.clamp(0.0, 1.0);
    let mut raster = Raster::new(noise.width, noise.height);
    for y in 0..noise.height {
        for x in 0..noise.width {
            let g = noise.get(x as i64, y as i64);
            let mut rgba = [0u8, 0, 0, 255];
            for c in 0..3 {
                let b = background.0[c] as f64 / 255.0;
                let mixed = blend.apply(b, g);
                rgba[c] = channel_byte(b * (1.0 - opacity) + mixed * opacity);
            }
            raster.put_pixel(x, y, rgba);
        }
    }
    raster
}

/// Lambertian shading of a height field lit by a distant light, in `[0, 1]`.
pub fn diffuse_light(height: &ScalarMap, surface_scale: f64, diffuse_constant: f64, light: DistantLight) -> ScalarMap {
    let az = light.azimuth.to_radians();
    let el = light.elevation.to_radians();
    let l = [az.cos() * el.cos(), az.sin() * el.cos(), el.sin()];
    let mut values = Vec::with_capacity(height.values.len());
    for y in 0..height.height as i64 {
        for x in 0..height.width as i64 {
            let dx = (height.get(x + 1, y) - height.get(x - 1, y)) * 0.5;
            let dy = (height.get(x, y + 1) - height.get(x, y - 1)) * 0.5;
            let n = [-surface_scale * dx, -surface_scale * dy, 1.0];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            let dot = (n[0] * l[0] + n[1] * l[1] + n[2] * l[2]) / len;
            values.push((diffuse_constant * dot).clamp(0.0, 1.0));
        }
    }
    ScalarMap { width: height.width, height: height.height, values }
}

/// Multiplies a background colour by a lit intensity map.
pub fn shade(background: Rgb, light: &ScalarMap, lighting_color: Rgb) -> Raster {
    let mut raster = Raster::new(light.width, light.height);
    for y in 0..light.height {
        for x in 0..light.width {
            let i = light.get(x as i64, y as i64);
            let mut rgba = [0u8, 0, 0, 255];
            for c in 0..3 {
                let lit = i * lighting_color.0[c] as f64 / 255.0;
                rgba[c] = channel_byte(BlendMode::Multiply.apply(background.0[c] as f64 / 255.0, lit));
            }
            raster.put_pixel(x, y, rgba);
        }
    }
    raster
}

/// feDisplacementMap: `P'(x, y) = P(x + s * (X(x, y) - 0.5), y + s * (Y(x, y) - 0.5))`.
pub fn displace(source: &Raster, map: &Raster, scale: f64, x_channel: Channel, y_channel: Channel) -> Raster {
    let mut out = Raster::new(source.width(), source.height());
    for y in 0..source.height() {
        for x in 0..source.width() {
            let m = map.pixel_or_clear(x as i64, y as i64);
            let dx = scale * (m[x_channel.index()] as f64 / 255.0 - 0.5);
            let dy = scale * (m[y_channel.index()] as f64 / 255.0 - 0.5);
            let sx = (x as f64 + dx).round() as i64;
            let sy = (y as f64 + dy).round() as i64;
            out.put_pixel(x, y, source.pixel_or_clear(sx, sy));
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// A `line_width` thick line through the centre of a transparent square.
pub fn line_source(size: u32, line_width: f64, color: Rgb, direction: LineDirection) -> Raster {
    let mut raster = Raster::new(size, size);
    let center = size as f64 / 2.0;
    let lo = center - line_width / 2.0;
    let hi = center + line_width / 2.0;
    for y in 0..size {
        for x in 0..size {
            let across = match direction {
                LineDirection::Horizontal => y as f64 + 0.5,
                LineDirection::Vertical => x as f64 + 0.5,
            };
            if across >= lo && across < hi {
                raster.put_pixel(x, y, color.to_rgba());
            }
        }
    }
    raster
}

/// Stand-in photo for the frosted-glass page when no image is loaded.
pub fn checkerboard(width: u32, height: u32, cell: u32, a: Rgb, b: Rgb) -> Raster {
    let cell = cell.max(1);
    let mut raster = Raster::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let color = if (x / cell + y / cell) % 2 == 0 { a } else { b };
            raster.put_pixel(x, y, color.to_rgba());
        }
    }
    raster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turbulence_preview_stays_in_unit_range() {
        for kind in TurbulenceKind::ALL {
            let preview = TurbulencePreview::new(kind, BaseFrequency::Pair(0.05, 0.01), 5, 42);
            for i in 0..500 {
                let v = preview.sample(i as f64 * 1.7, i as f64 * 0.9);
                assert!((0.0..=1.0).contains(&v), "{kind:?} {v}");
            }
        }
    }

    #[test]
    fn flat_height_field_faces_the_light() {
        let flat = ScalarMap { width: 3, height: 3, values: vec![0.5; 9] };
        let lit = diffuse_light(&flat, 10.0, 1.0, DistantLight { azimuth: 0.0, elevation: 90.0 });
        assert!(lit.values.iter().all(|v| (v - 1.0).abs() < 1e-9));
        let grazing = diffuse_light(&flat, 10.0, 1.0, DistantLight { azimuth: 0.0, elevation: 0.0 });
        assert!(grazing.values.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn neutral_displacement_map_is_identity() {
        let source = checkerboard(8, 8, 2, Rgb::BLACK, Rgb::WHITE);
        // 128/255 is just above 0.5; with a small scale the offset rounds away
        let map = Raster::filled(8, 8, [128, 128, 128, 128]);
        assert_eq!(displace(&source, &map, 10.0, Channel::R, Channel::G), source);
    }

    #[test]
    fn full_displacement_reads_outside_as_transparent() {
        let source = Raster::filled(4, 4, [255, 0, 0, 255]);
        let map = Raster::filled(4, 4, [255, 255, 0, 0]);
        let out = displace(&source, &map, 20.0, Channel::R, Channel::R);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn line_source_draws_a_centered_band() {
        let line = line_source(10, 2.0, Rgb::BLACK, LineDirection::Horizontal);
        assert_eq!(line.pixel(3, 4), [0, 0, 0, 255]);
        assert_eq!(line.pixel(3, 5), [0, 0, 0, 255]);
        assert_eq!(line.pixel(3, 3)[3], 0);
        assert_eq!(line.pixel(3, 6)[3], 0);
        let vertical = line_source(10, 2.0, Rgb::BLACK, LineDirection::Vertical);
        assert_eq!(vertical.pixel(4, 0)[3], 255);
        assert_eq!(vertical.pixel(6, 0)[3], 0);
    }

    #[test]
    fn opaque_normal_composite_is_the_noise() {
        let noise = ScalarMap { width: 1, height: 1, values: vec![1.0] };
        let out = composite_over(Rgb::BLACK, &noise, 1.0, BlendMode::Normal);
        assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
        let hidden = composite_over(Rgb::BLACK, &noise, 0.0, BlendMode::Normal);
        assert_eq!(hidden.pixel(0, 0), [0, 0, 0, 255]);
    }
}
