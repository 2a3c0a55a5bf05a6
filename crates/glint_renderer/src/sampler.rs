//! Pseudo-random sampling for the path tracer.
//!
//! `HashRng` is a tiny hash-based generator with two 32-bit lanes of state.
//! Every other sampling routine in the renderer draws through
//! `&mut dyn RngCore`, so tests can pass `StdRng` instead.

use glint_math::Vec3;
use rand::{Error, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Odd multiplier of the hash recurrence.
const HASH_MULTIPLIER: u32 = 1_103_515_245;

/// 2^-24, maps the top 24 bits of a draw onto [0, 1).
const UNIT_SCALE: f32 = 1.0 / 16_777_216.0;

/// Frame-varying seed pair, refreshed every frame to decorrelate noise
/// between successive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameSeed(pub [u32; 2]);

impl FrameSeed {
    /// Create a seed pair.
    pub fn new(a: u32, b: u32) -> Self {
        Self([a, b])
    }

    /// Draw a fresh seed pair from the thread-local generator.
    pub fn random() -> Self {
        Self([rand::random(), rand::random()])
    }
}

/// Two-lane hash generator.
///
/// Each draw increments both lanes by one and hashes them:
/// `q = K * ((state >> 1) ^ state.yx)`, `n = K * (q.x ^ (q.y >> 3))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRng {
    state: [u32; 2],
}

impl HashRng {
    /// Create a generator from raw lane values.
    pub fn new(state: [u32; 2]) -> Self {
        Self { state }
    }

    /// Derive the generator for one pixel of one frame.
    ///
    /// Coordinates are offset by one so row 0 and column 0 still mix in the
    /// seed. Every seed bit reaches the state: for a fixed pixel, distinct
    /// seeds give distinct states.
    pub fn for_pixel(x: u32, y: u32, seed: FrameSeed) -> Self {
        let [s0, s1] = seed.0;
        let px = x.wrapping_add(1);
        let py = y.wrapping_add(1);

        let lane0 = avalanche(px.wrapping_mul(0x9E37_79B9) ^ py.wrapping_mul(0x85EB_CA6B) ^ s0);
        let lane1 = avalanche(py.wrapping_mul(0xC2B2_AE35) ^ px.wrapping_mul(0x27D4_EB2F) ^ s1)
            .wrapping_add(lane0);
        Self::new([lane0, lane1])
    }

    /// Current lane values.
    pub fn state(&self) -> [u32; 2] {
        self.state
    }
}

impl RngCore for HashRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state[0] = self.state[0].wrapping_add(1);
        self.state[1] = self.state[1].wrapping_add(1);

        let [sx, sy] = self.state;
        let qx = HASH_MULTIPLIER.wrapping_mul((sx >> 1) ^ sy);
        let qy = HASH_MULTIPLIER.wrapping_mul((sy >> 1) ^ sx);
        HASH_MULTIPLIER.wrapping_mul(qx ^ (qy >> 3))
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for HashRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        let lane0 = u32::from_le_bytes([seed[0], seed[1], seed[2], seed[3]]);
        let lane1 = u32::from_le_bytes([seed[4], seed[5], seed[6], seed[7]]);
        Self::new([lane0, lane1])
    }
}

/// Invertible 32-bit mixing round (xorshift-multiply).
#[inline]
fn avalanche(mut v: u32) -> u32 {
    v ^= v >> 16;
    v = v.wrapping_mul(0x7FEB_352D);
    v ^= v >> 15;
    v
}

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * UNIT_SCALE
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_sphere_direction(rng: &mut dyn RngCore) -> Vec3 {
    let up = gen_f32(rng) * 2.0 - 1.0;
    let over = (1.0 - up * up).max(0.0).sqrt();
    let around = gen_f32(rng) * TAU;
    Vec3::new(around.cos() * over, up, around.sin() * over).normalize()
}

/// Approximately cosine-weighted direction in the hemisphere around `normal`.
///
/// Offsets the normal by a unit-sphere point and renormalizes. Falls back to
/// the normal itself when the offset cancels it out.
pub fn random_cos_weighted_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let z = gen_f32(rng) * 2.0 - 1.0;
    let phi = gen_f32(rng) * TAU;
    let r = (1.0 - z * z).max(0.0).sqrt();
    (normal + Vec3::new(r * phi.cos(), r * phi.sin(), z))
        .try_normalize()
        .unwrap_or(normal)
}

/// Remap a uniform sample in [0, 1) to a tent distribution on (-1, 1).
#[inline]
pub fn tent_filter(x: f32) -> f32 {
    if x < 0.5 {
        (2.0 * x).sqrt() - 1.0
    } else {
        1.0 - (2.0 - 2.0 * x).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn test_hash_rng_known_sequence() {
        let mut rng = HashRng::new([0, 0]);
        assert_eq!(rng.next_u32(), 2_490_531_616);
        assert_eq!(rng.next_u32(), 566_354_947);
        assert_eq!(rng.next_u32(), 1_789_611_181);
        assert_eq!(rng.state(), [3, 3]);

        let mut rng = HashRng::new([7, 42]);
        assert_eq!(rng.next_u32(), 3_293_528_232);
        assert_eq!(rng.next_u32(), 3_563_093_846);
    }

    #[test]
    fn test_hash_rng_wraps_lanes() {
        let mut rng = HashRng::new([u32::MAX, u32::MAX - 1]);
        rng.next_u32();
        assert_eq!(rng.state(), [0, u32::MAX]);
    }

    #[test]
    fn test_seed_from_bytes() {
        let rng = HashRng::from_seed([7, 0, 0, 0, 42, 0, 0, 0]);
        assert_eq!(rng.state(), [7, 42]);
    }

    #[test]
    fn test_gen_f32_range_and_mean() {
        let mut rng = HashRng::for_pixel(3, 5, FrameSeed::new(12345, 67890));
        let n = 100_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x), "sample {} out of range", x);
            sum += x as f64;
        }
        let mean = sum / n as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean = {}", mean);
    }

    #[test]
    fn test_gen_f32_never_reaches_one() {
        struct MaxRng;
        impl RngCore for MaxRng {
            fn next_u32(&mut self) -> u32 {
                u32::MAX
            }
            fn next_u64(&mut self) -> u64 {
                u64::MAX
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0xff);
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }
        assert!(gen_f32(&mut MaxRng) < 1.0);
    }

    #[test]
    fn test_successive_draws_uncorrelated() {
        let mut rng = HashRng::for_pixel(10, 20, FrameSeed::new(99, 1234));
        let n = 50_000;
        let mut prev = gen_f32(&mut rng) as f64 - 0.5;
        let mut cov = 0.0f64;
        for _ in 0..n {
            let cur = gen_f32(&mut rng) as f64 - 0.5;
            cov += prev * cur;
            prev = cur;
        }
        // Uniform variance is 1/12; lag-1 correlation should be near zero
        let corr = (cov / n as f64) * 12.0;
        assert!(corr.abs() < 0.05, "lag-1 correlation = {}", corr);
    }

    #[test]
    fn test_pixels_get_distinct_streams() {
        let seed = FrameSeed::new(2024, 7);
        let a = HashRng::for_pixel(0, 0, seed);
        let b = HashRng::for_pixel(1, 0, seed);
        let c = HashRng::for_pixel(0, 1, seed);
        assert_ne!(a.state(), b.state());
        assert_ne!(a.state(), c.state());
        assert_ne!(b.state(), c.state());

        // Same pixel, different frame seed
        let d = HashRng::for_pixel(0, 0, FrameSeed::new(2025, 7));
        assert_ne!(a.state(), d.state());
    }

    #[test]
    fn test_low_seed_bits_reach_every_pixel() {
        let seeds = [
            FrameSeed::new(2024, 7),
            FrameSeed::new(2025, 7),
            FrameSeed::new(2024, 6),
            FrameSeed::new(2025, 6),
        ];
        let mut states = std::collections::HashSet::new();
        for seed in seeds {
            for y in 0..32 {
                for x in 0..32 {
                    assert!(states.insert(HashRng::for_pixel(x, y, seed).state()));
                }
            }
        }
        assert_eq!(states.len(), 4 * 32 * 32);
    }

    #[test]
    fn test_random_sphere_direction_is_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut mean = Vec3::ZERO;
        for _ in 0..10_000 {
            let d = random_sphere_direction(&mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            mean += d;
        }
        // Uniform on the sphere averages out to the origin
        assert!((mean / 10_000.0).length() < 0.05);
    }

    #[test]
    fn test_cos_weighted_stays_in_hemisphere() {
        let mut rng = HashRng::new([1, 2]);
        let normal = Vec3::new(0.0, 1.0, 0.0);
        for _ in 0..10_000 {
            let d = random_cos_weighted_hemisphere(normal, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.dot(normal) >= -1e-4);
        }
    }

    #[test]
    fn test_tent_filter() {
        assert_eq!(tent_filter(0.0), -1.0);
        assert_eq!(tent_filter(0.5), 0.0);
        assert!((tent_filter(0.125) - (-0.5)).abs() < 1e-6);
        assert!((tent_filter(0.875) - 0.5).abs() < 1e-6);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let t = tent_filter(gen_f32(&mut rng));
            assert!(t >= -1.0 && t < 1.0);
        }
    }
}
