// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It drives weight initialization and synapse sampling, and must be seedable
// so that learning runs are reproducible.

/// Source of uniform indices for synapse sampling.
///
/// Learning draws positions "uniformly with replacement" through this trait, so
/// callers can inject their own generator (or a scripted one in tests).
pub trait IndexSampler {
    /// Returns an index in `0..len`. Callers guarantee `len > 0`.
    fn sample_index(&mut self, len: usize) -> usize;
}

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u64;
        let v = self.next_u64() % span;
        low + v as usize
    }

    /// Uniform byte in `low..=high`.
    #[inline]
    pub fn gen_range_u8(&mut self, low: u8, high: u8) -> u8 {
        if high <= low {
            return low;
        }
        let span = u32::from(high - low) + 1;
        low + (self.next_u32() % span) as u8
    }
}

impl IndexSampler for Prng {
    #[inline]
    fn sample_index(&mut self, len: usize) -> usize {
        self.gen_range_usize(0, len)
    }
}

impl<S: IndexSampler + ?Sized> IndexSampler for &mut S {
    #[inline]
    fn sample_index(&mut self, len: usize) -> usize {
        (**self).sample_index(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Prng::new(7);
        let mut b = Prng::new(7);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut p = Prng::new(0);
        assert_ne!(p.state(), 0);
        assert_ne!(p.next_u32(), 0);
    }

    #[test]
    fn byte_range_is_inclusive_and_bounded() {
        let mut p = Prng::new(11);
        let mut seen = [false; 10];
        for _ in 0..2000 {
            let v = p.gen_range_u8(120, 129);
            assert!((120..=129).contains(&v));
            seen[(v - 120) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn sample_index_stays_below_len() {
        let mut p = Prng::new(3);
        for len in 1..50 {
            assert!(p.sample_index(len) < len);
        }
        assert_eq!(p.sample_index(1), 0);
    }
}
