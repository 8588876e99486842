//! Poseidon parameter generation via the Grain LFSR.
//!
//! Round constants and MDS matrices are derived with the procedure from the
//! Poseidon reference scripts (`generate_parameters_grain.sage`), which is
//! what produced the constants shipped with circomlib: an
//! 80-bit Grain LFSR seeded from the field/S-box/width/round parameters,
//! round constants drawn with rejection sampling, and a Cauchy MDS matrix
//! built from the next `2t` samples reduced into the field. The output is
//! pinned bit-for-bit by the known-answer vectors in the engine tests.

use crate::field::modulus;
use num_bigint::BigUint;

/// Partial-round counts for widths `t = 2..=17` (arity 1 through 16). Full
/// rounds are always 8.
pub(super) const PARTIAL_ROUNDS: [usize; 16] =
    [56, 57, 56, 60, 60, 63, 64, 63, 60, 66, 60, 65, 70, 60, 64, 68];

pub(super) const FULL_ROUNDS: usize = 8;

/// Field-element bit width used when drawing samples.
const SAMPLE_BITS: usize = 254;

/// Generated permutation parameters for a single state width.
pub(super) struct Parameters {
    pub t: usize,
    pub partial_rounds: usize,
    /// `(FULL_ROUNDS + partial_rounds) * t` round constants, in application
    /// order.
    pub round_constants: Vec<BigUint>,
    /// Row-major `t x t` MDS matrix; the mix step computes
    /// `out[i] = sum_j mds[i][j] * state[j]`.
    pub mds: Vec<Vec<BigUint>>,
}

/// 80-bit Grain LFSR with the Poseidon output filter.
struct Grain {
    state: u128,
}

impl Grain {
    fn new(t: usize, full_rounds: usize, partial_rounds: usize) -> Self {
        let mut bits = Vec::with_capacity(80);
        let mut push = |value: usize, width: usize| {
            for i in (0..width).rev() {
                bits.push((value >> i) & 1 == 1);
            }
        };
        push(1, 2); // prime field
        push(0, 4); // x^alpha S-box
        push(SAMPLE_BITS, 12);
        push(t, 12);
        push(full_rounds, 10);
        push(partial_rounds, 10);
        for _ in 0..30 {
            bits.push(true);
        }
        debug_assert_eq!(bits.len(), 80);
        let mut state = 0u128;
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                state |= 1 << i;
            }
        }
        let mut grain = Self { state };
        for _ in 0..160 {
            grain.raw_bit();
        }
        grain
    }

    fn raw_bit(&mut self) -> bool {
        let s = self.state;
        let tap = |i: u32| (s >> i) & 1;
        let new = tap(62) ^ tap(51) ^ tap(38) ^ tap(23) ^ tap(13) ^ tap(0);
        self.state = (s >> 1) | (new << 79);
        new == 1
    }

    /// Next filtered bit: bits are consumed in pairs, the second bit is
    /// emitted only when the first is set.
    fn bit(&mut self) -> bool {
        loop {
            let first = self.raw_bit();
            let second = self.raw_bit();
            if first {
                return second;
            }
        }
    }

    /// Draws 254 filtered bits, most significant first.
    fn sample(&mut self) -> BigUint {
        let mut bytes = [0u8; 32];
        for i in 0..SAMPLE_BITS {
            if self.bit() {
                let pos = SAMPLE_BITS - 1 - i;
                bytes[31 - pos / 8] |= 1 << (pos % 8);
            }
        }
        BigUint::from_bytes_be(&bytes)
    }

    /// Draws a sample uniformly below the modulus by rejection.
    fn sample_rejecting(&mut self) -> BigUint {
        loop {
            let candidate = self.sample();
            if &candidate < modulus() {
                return candidate;
            }
        }
    }
}

/// Generates the parameters for state width `t` (hash arity `t - 1`).
pub(super) fn generate(t: usize) -> Parameters {
    let p = modulus();
    let partial_rounds = PARTIAL_ROUNDS[t - 2];
    let mut grain = Grain::new(t, FULL_ROUNDS, partial_rounds);

    let round_constants = (0..(FULL_ROUNDS + partial_rounds) * t)
        .map(|_| grain.sample_rejecting())
        .collect();

    // MDS entries are reduced rather than rejection-sampled; the reference
    // script draws the matrix from the same bit stream as the constants.
    let xs: Vec<BigUint> = (0..t).map(|_| grain.sample() % p).collect();
    let ys: Vec<BigUint> = (0..t).map(|_| grain.sample() % p).collect();
    let exponent = p - 2u32;
    let mds = xs
        .iter()
        .map(|x| {
            ys.iter()
                .map(|y| ((x + y) % p).modpow(&exponent, p))
                .collect()
        })
        .collect();

    Parameters {
        t,
        partial_rounds,
        round_constants,
        mds,
    }
}
