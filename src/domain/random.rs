/// Uniform random source.
///
/// Every random draw the simulation makes (which token, where, how fast,
/// which gray) goes through this trait so tests can script the sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Uniform {
    /// Uniform float in `[lo, hi)`. Returns `lo` when the range is empty.
    fn range(&mut self, lo: f32, hi: f32) -> f32;
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
    /// Uniform float in `[0, 1)`, used for probability rolls.
    fn unit(&mut self) -> f64;
}

/// `rand`-backed source used by the binary.
pub struct RandSource<R: Rng> {
    rng: R,
}

impl RandSource<StdRng> {
    pub fn from_os_rng() -> Self {
        RandSource { rng: StdRng::from_os_rng() }
    }

    #[allow(dead_code)]
    pub fn seeded(seed: u64) -> Self {
        RandSource { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> Uniform for RandSource<R> {
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Test source: replays a fixed list of fractions in `[0, 1)`.
/// Each call consumes one fraction; an exhausted script yields 0.5.
#[cfg(test)]
pub struct Scripted {
    fractions: std::collections::VecDeque<f64>,
}

#[cfg(test)]
impl Scripted {
    pub fn new(fractions: &[f64]) -> Self {
        Scripted { fractions: fractions.iter().copied().collect() }
    }

    fn next(&mut self) -> f64 {
        self.fractions.pop_front().unwrap_or(0.5)
    }
}

#[cfg(test)]
impl Uniform for Scripted {
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        let f = self.next() as f32;
        if hi <= lo { lo } else { lo + f * (hi - lo) }
    }

    fn index(&mut self, len: usize) -> usize {
        ((self.next() * len as f64) as usize).min(len - 1)
    }

    fn unit(&mut self) -> f64 {
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_source_stays_in_range() {
        let mut src = RandSource::seeded(7);
        for _ in 0..1000 {
            let v = src.range(1.0, 3.0);
            assert!((1.0..3.0).contains(&v));
            assert!(src.index(3) < 3);
            let u = src.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn empty_range_returns_low_bound() {
        let mut src = RandSource::seeded(1);
        assert_eq!(src.range(20.0, 20.0), 20.0);
        assert_eq!(src.range(20.0, -5.0), 20.0);
    }

    #[test]
    fn scripted_maps_fractions() {
        let mut s = Scripted::new(&[0.0, 0.5, 0.999, 0.25]);
        assert_eq!(s.range(10.0, 20.0), 10.0);
        assert_eq!(s.range(10.0, 20.0), 15.0);
        assert_eq!(s.index(3), 2);
        assert_eq!(s.unit(), 0.25);
        // exhausted
        assert_eq!(s.unit(), 0.5);
    }
}
