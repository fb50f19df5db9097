//! Seeded deterministic random source.
//!
//! Every generator draws from an instance-local linear congruential
//! sequence so that a layer's output is a pure function of its seed.
//! Nothing in here touches global state.

use rand::prelude::*;

/// Numerical Recipes LCG constants, 32 bit modulus.
const MODULUS: u64 = 1 << 32;
const MULTIPLIER: u64 = 1_664_525;
const INCREMENT: u64 = 1_013_904_223;

/// A seeded linear congruential generator.
///
/// Two instances constructed with the same nonzero seed produce identical
/// output sequences forever. A zero seed means "no seed": an entropy-chosen
/// substitute is used instead, so two zero-seeded instances will (almost
/// certainly) diverge. See `Lcg::new`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lcg {
    state: u64,
    seed: u32,
}

impl Lcg {
    /// Build a generator from a seed. A seed of zero draws a substitute
    /// seed from system entropy; any other value is fully deterministic.
    pub fn new(seed: u32) -> Lcg {
        let seed = if seed == 0 {
            SmallRng::from_entropy().gen_range(1..u32::MAX)
        } else {
            seed
        };
        Lcg {
            state: seed as u64 % MODULUS,
            seed,
        }
    }

    /// The seed actually in use (the substitute, for zero-seeded instances).
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance the sequence and return the new raw state in `[0, 2^32)`.
    pub fn next_int(&mut self) -> u64 {
        self.state = (MULTIPLIER.wrapping_mul(self.state) + INCREMENT) % MODULUS;
        self.state
    }

    /// Next value in `[0, 1)`.
    pub fn next_float(&mut self) -> f64 {
        self.next_int() as f64 / (MODULUS - 1) as f64
    }

    /// Next value in `[min, max)`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_float() * (max - min)
    }
}
