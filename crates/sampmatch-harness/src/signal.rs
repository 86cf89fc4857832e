//! Sample generation for harness scenarios.
//!
//! Deterministic: the same seed always produces the same waveforms, so a
//! failing run can be replayed from its logged seed.

use crate::error::HarnessError;

/// xorshift64* generator.
#[derive(Clone, Copy, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Seed `0` is remapped; the all-zero state never advances.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// Uniform in `[-1, 1)`.
    pub fn next_symmetric(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }
}

/// Set every sample to zero.
pub fn null_samples(samples: &mut [f64]) -> &mut [f64] {
    samples.fill(0.0);
    samples
}

/// Add uniform noise in `[-range, range)` to every sample.
pub fn add_jitter<'a>(samples: &'a mut [f64], range: f64, rng: &mut XorShift64) -> &'a mut [f64] {
    for sample in samples.iter_mut() {
        *sample += rng.next_symmetric() * range;
    }
    samples
}

/// Parse a comma or whitespace separated list of samples.
pub fn parse_samples(raw: &str) -> Result<Vec<f64>, HarnessError> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token
                .parse::<f64>()
                .map_err(|_| HarnessError::InvalidSamples {
                    index,
                    value: token.to_string(),
                })
        })
        .collect()
}

/// Parse a seed given in decimal or `0x` hex, with optional `_` separators.
pub fn parse_seed(raw: &str) -> Result<u64, std::num::ParseIntError> {
    let s = raw.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(&hex.replace('_', ""), 16)
    } else {
        s.replace('_', "").parse::<u64>()
    }
}
