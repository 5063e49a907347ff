//! Seeded fractal value noise
//!
//! A `NoiseField` is built once from a seed and then sampled as a pure
//! function of `(x, y)`. It holds no mutable state, so a single field can be
//! shared by every worker generating rows in parallel.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::NoiseConfig;
use crate::core::types::WorldSeed;

const TABLE_SIZE: usize = 256;
const TABLE_MASK: i64 = TABLE_SIZE as i64 - 1;

/// Shift applied to each octave so lattice points of different octaves don't line up
const OCTAVE_OFFSET: f64 = 71.37;

/// Lattice lookup tables derived from the seed
#[derive(Debug, Clone)]
struct LatticeTable {
    perm: [u8; TABLE_SIZE],
    values: [f64; TABLE_SIZE],
}

impl LatticeTable {
    fn new(seed: WorldSeed) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());

        let mut perm = [0u8; TABLE_SIZE];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = i as u8;
        }
        perm.shuffle(&mut rng);

        let mut values = [0.0f64; TABLE_SIZE];
        for v in values.iter_mut() {
            *v = rng.gen::<f64>();
        }

        Self { perm, values }
    }

    #[inline]
    fn hash(&self, ix: i64, iy: i64) -> usize {
        let a = self.perm[(ix & TABLE_MASK) as usize] as i64;
        self.perm[((a + iy) & TABLE_MASK) as usize] as usize
    }

    #[inline]
    fn value_at(&self, ix: i64, iy: i64) -> f64 {
        self.values[self.hash(ix, iy)]
    }
}

/// Deterministic fractal noise sampler producing values in `[0, 1]`
#[derive(Debug, Clone)]
pub struct NoiseField {
    seed: WorldSeed,
    table: LatticeTable,
    config: NoiseConfig,
}

impl NoiseField {
    pub fn new(seed: WorldSeed, config: NoiseConfig) -> Self {
        Self {
            seed,
            table: LatticeTable::new(seed),
            config,
        }
    }

    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Single octave of smoothed value noise at lattice-space coordinates
    pub fn value_noise(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let ix = x0 as i64;
        let iy = y0 as i64;

        let tx = smoothstep(x - x0);
        let ty = smoothstep(y - y0);

        let v00 = self.table.value_at(ix, iy);
        let v10 = self.table.value_at(ix + 1, iy);
        let v01 = self.table.value_at(ix, iy + 1);
        let v11 = self.table.value_at(ix + 1, iy + 1);

        let top = lerp(v00, v10, tx);
        let bottom = lerp(v01, v11, tx);
        lerp(top, bottom, ty)
    }

    /// Fractal sample at tile coordinates, normalised to `[0, 1]`
    ///
    /// Each octave contributes `amplitude * noise(x * frequency, y * frequency)`,
    /// amplitude scaled by `persistence` and frequency by `lacunarity` per octave.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = self.config.scale;
        let mut total = 0.0;
        let mut max_amplitude = 0.0;

        for octave in 0..self.config.octaves {
            let offset = octave as f64 * OCTAVE_OFFSET;
            total += amplitude * self.value_noise(x * frequency + offset, y * frequency + offset);
            max_amplitude += amplitude;
            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        if max_amplitude <= 0.0 {
            return 0.0;
        }
        (total / max_amplitude).clamp(0.0, 1.0)
    }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64) -> NoiseField {
        NoiseField::new(WorldSeed(seed), NoiseConfig::default())
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = field(42);
        let b = field(42);
        for i in 0..50 {
            let x = i as f64 * 3.7;
            let y = i as f64 * 1.3;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = field(1);
        let b = field(2);
        let differing = (0..50)
            .filter(|&i| {
                let x = i as f64 * 5.1;
                a.sample(x, x * 0.5) != b.sample(x, x * 0.5)
            })
            .count();
        assert!(differing > 40);
    }

    #[test]
    fn test_samples_in_unit_range() {
        let f = field(7);
        for y in -20..20 {
            for x in -20..20 {
                let v = f.sample(x as f64 * 2.5, y as f64 * 2.5);
                assert!((0.0..=1.0).contains(&v), "sample {} out of range", v);
            }
        }
    }

    #[test]
    fn test_value_noise_matches_lattice_at_integers() {
        let f = field(9);
        let at_lattice = f.value_noise(3.0, 4.0);
        assert_eq!(at_lattice, f.table.value_at(3, 4));
    }

    #[test]
    fn test_field_is_continuous() {
        let f = field(11);
        let a = f.sample(10.0, 10.0);
        let b = f.sample(10.01, 10.0);
        assert!((a - b).abs() < 0.01);
    }
}
