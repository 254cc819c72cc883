//! Shuffled lattice hash table used to pick gradients.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::api::{NoiseError, Seed};

pub const PERIOD: usize = 256;

/// 256 shuffled values followed by a copy of themselves, so `table[i + 1]`
/// never needs wrapping for `i < 511`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    table: Box<[u8; PERIOD * 2]>,
}

impl PermutationTable {
    /// Fisher-Yates shuffle of `0..=255` driven by the supplied random source.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut p: [u8; PERIOD] = std::array::from_fn(|i| i as u8);
        for i in (1..PERIOD).rev() {
            let j = rng.gen_range(0..=i);
            p.swap(i, j);
        }
        debug!(first = p[0], "built permutation table");
        Self::doubled(&p)
    }

    pub fn from_seed(seed: Seed) -> Self {
        let mut rng = StdRng::seed_from_u64(seed.0);
        Self::new(&mut rng)
    }

    /// Unshuffled `[0, 1, ..., 255, 0, 1, ..., 255]`, for reproducible tests.
    pub fn identity() -> Self {
        let p: [u8; PERIOD] = std::array::from_fn(|i| i as u8);
        Self::doubled(&p)
    }

    /// Builds a table from an explicit ordering of `0..=255`.
    pub fn from_permutation(values: &[u8]) -> Result<Self, NoiseError> {
        if values.len() != PERIOD {
            return Err(NoiseError::InvalidPermutation(format!(
                "expected {PERIOD} entries, got {}",
                values.len()
            )));
        }
        let mut seen = [false; PERIOD];
        for &v in values {
            if std::mem::replace(&mut seen[v as usize], true) {
                return Err(NoiseError::InvalidPermutation(format!("value {v} appears twice")));
            }
        }
        let mut p = [0u8; PERIOD];
        p.copy_from_slice(values);
        Ok(Self::doubled(&p))
    }

    fn doubled(p: &[u8; PERIOD]) -> Self {
        let table = Box::new(std::array::from_fn(|i| p[i % PERIOD]));
        Self { table }
    }

    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.table[index] as usize
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.table[..]
    }

    /// Checks both halves: the first is a permutation, the second mirrors it.
    pub fn is_valid(&self) -> bool {
        let mut seen = [false; PERIOD];
        for &v in &self.table[..PERIOD] {
            if std::mem::replace(&mut seen[v as usize], true) {
                return false;
            }
        }
        (0..PERIOD).all(|i| self.table[i] == self.table[i + PERIOD])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffled_table_is_a_doubled_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = PermutationTable::new(&mut rng);
        assert_eq!(table.as_slice().len(), 512);
        assert!(table.is_valid());
    }

    #[test]
    fn same_seed_same_table() {
        assert_eq!(PermutationTable::from_seed(Seed(99)), PermutationTable::from_seed(Seed(99)));
        assert_ne!(PermutationTable::from_seed(Seed(1)), PermutationTable::from_seed(Seed(2)));
    }

    #[test]
    fn identity_table_layout() {
        let table = PermutationTable::identity();
        assert_eq!(table.get(0), 0);
        assert_eq!(table.get(255), 255);
        assert_eq!(table.get(256), 0);
        assert_eq!(table.get(511), 255);
    }

    #[test]
    fn from_permutation_rejects_duplicates_and_bad_length() {
        let mut values: Vec<u8> = (0..=255).collect();
        values[10] = 11;
        assert!(matches!(
            PermutationTable::from_permutation(&values),
            Err(NoiseError::InvalidPermutation(_))
        ));
        assert!(PermutationTable::from_permutation(&[0, 1, 2]).is_err());

        let reversed: Vec<u8> = (0..=255).rev().collect();
        let table = PermutationTable::from_permutation(&reversed).unwrap();
        assert_eq!(table.get(0), 255);
        assert_eq!(table.get(256), 255);
    }
}
