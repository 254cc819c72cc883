//! Classic 2D gradient noise over a 256-periodic lattice.

use rand::Rng;

use crate::api::{NoiseSource, Seed};
use crate::fractal::{fractal_sample, FractalSettings};
use crate::permutation::{PermutationTable, PERIOD};

/// Quintic ease `6t^5 - 15t^4 + 10t^3`.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of `(x, y)` with one of the gradients selected by the low
/// four bits of `hash`.
#[inline]
pub fn grad(hash: usize, x: f64, y: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Lattice cell index, floor-mod 256 so negative coordinates stay in range.
#[inline]
fn cell(floor: f64) -> usize {
    (floor as i64).rem_euclid(PERIOD as i64) as usize
}

/// Borrowed view of a permutation table that evaluates noise.
#[derive(Debug, Clone, Copy)]
pub struct NoiseField<'a> {
    table: &'a PermutationTable,
}

impl<'a> NoiseField<'a> {
    pub fn new(table: &'a PermutationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a PermutationTable {
        self.table
    }

    /// Noise at `(x, y)` mapped from `[-1, 1]` into `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let fx0 = x.floor();
        let fy0 = y.floor();
        let xi = cell(fx0);
        let yi = cell(fy0);

        let xf = x - fx0;
        let yf = y - fy0;
        let u = fade(xf);
        let v = fade(yf);

        let p = self.table;
        let a = p.get(xi) + yi;
        let b = p.get(xi + 1) + yi;

        let raw = lerp(
            v,
            lerp(u, grad(p.get(a), xf, yf), grad(p.get(b), xf - 1.0, yf)),
            lerp(
                u,
                grad(p.get(a + 1), xf, yf - 1.0),
                grad(p.get(b + 1), xf - 1.0, yf - 1.0),
            ),
        );
        raw * 0.5 + 0.5
    }

    pub fn fractal_sample(&self, x: f64, y: f64, settings: &FractalSettings) -> f64 {
        fractal_sample(self, x, y, settings)
    }
}

impl NoiseSource for NoiseField<'_> {
    fn sample(&self, x: f64, y: f64) -> f64 {
        NoiseField::sample(self, x, y)
    }
}

/// Owns the table for one generation pass; regenerate by building a new one.
#[derive(Debug, Clone)]
pub struct PerlinGenerator {
    table: PermutationTable,
}

impl PerlinGenerator {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { table: PermutationTable::new(rng) }
    }

    pub fn from_seed(seed: Seed) -> Self {
        Self { table: PermutationTable::from_seed(seed) }
    }

    pub fn with_table(table: PermutationTable) -> Self {
        Self { table }
    }

    pub fn field(&self) -> NoiseField<'_> {
        NoiseField::new(&self.table)
    }

    pub fn table(&self) -> &PermutationTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_has_flat_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn grad_bit_mapping() {
        // h < 4: +-x +-y
        assert_eq!(grad(0, 0.25, 0.5), 0.75);
        assert_eq!(grad(1, 0.25, 0.5), 0.25);
        assert_eq!(grad(2, 0.25, 0.5), -0.25);
        assert_eq!(grad(3, 0.25, 0.5), -0.75);
        // 4..8: x only
        assert_eq!(grad(5, 0.25, 0.5), -0.25);
        // 8..16 without 12/14: y only
        assert_eq!(grad(9, 0.25, 0.5), -0.5);
        assert_eq!(grad(13, 0.25, 0.5), -0.5);
        // 12 and 14: y plus x
        assert_eq!(grad(12, 0.25, 0.5), 0.75);
        assert_eq!(grad(14, 0.25, 0.5), 0.25);
        // only the low four bits matter
        assert_eq!(grad(16 + 12, 0.25, 0.5), grad(12, 0.25, 0.5));
    }

    #[test]
    fn negative_cells_wrap_like_a_floor_mod() {
        assert_eq!(cell(-1.0), 255);
        assert_eq!(cell(-256.0), 0);
        assert_eq!(cell(257.0), 1);
    }

    #[test]
    fn identity_table_origin_is_mid_gray() {
        let table = PermutationTable::identity();
        let field = NoiseField::new(&table);
        let expected = grad(table.get(table.get(0)), 0.0, 0.0) * 0.5 + 0.5;
        assert_eq!(field.sample(0.0, 0.0), expected);
        assert_eq!(field.sample(0.0, 0.0), 0.5);
    }

    #[test]
    fn identity_table_interior_point_matches_hand_computation() {
        let table = PermutationTable::identity();
        let field = NoiseField::new(&table);
        let (x, y) = (0.25, 0.75);
        // identity table: A = 0, B = 1, perm[A] = 0, perm[B] = 1, perm[A+1] = 1, perm[B+1] = 2
        let u = fade(x);
        let v = fade(y);
        let n00 = grad(0, x, y);
        let n10 = grad(1, x - 1.0, y);
        let n01 = grad(1, x, y - 1.0);
        let n11 = grad(2, x - 1.0, y - 1.0);
        let raw = lerp(v, lerp(u, n00, n10), lerp(u, n01, n11));
        assert_eq!(field.sample(x, y), raw * 0.5 + 0.5);
    }

    #[test]
    fn generator_field_is_deterministic() {
        let gen = PerlinGenerator::from_seed(Seed(3));
        let a = gen.field().sample(12.34, -5.6);
        let b = gen.field().sample(12.34, -5.6);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
