//! Arbitrary-precision Poseidon permutation.
//!
//! Straightforward rendition of the permutation over [BigUint]: every add,
//! multiply, and S-box reduces modulo the field prime. Slower than the
//! Montgomery backend but easy to audit, and used as the cross-check in the
//! engine tests.

use super::grain::{self, Parameters, FULL_ROUNDS};
use crate::field::modulus;
use num_bigint::BigUint;

pub(super) struct Kernel {
    /// Parameters for widths 2..=17, indexed by `t - 2`.
    params: Vec<Parameters>,
}

impl Kernel {
    pub(super) fn new() -> Self {
        Self {
            params: (2..=17).map(grain::generate).collect(),
        }
    }

    /// Runs the permutation over `[0, inputs...]` and returns the first
    /// `n_outs` elements of the final state. Inputs must already be reduced.
    pub(super) fn permute(&self, inputs: &[BigUint], n_outs: usize) -> Vec<BigUint> {
        let t = inputs.len() + 1;
        let params = &self.params[t - 2];
        let p = modulus();

        let mut state = Vec::with_capacity(t);
        state.push(BigUint::ZERO);
        state.extend_from_slice(inputs);

        let rounds = FULL_ROUNDS + params.partial_rounds;
        let half_full = FULL_ROUNDS / 2;
        for round in 0..rounds {
            for (i, element) in state.iter_mut().enumerate() {
                *element += &params.round_constants[round * t + i];
                *element %= p;
            }
            let full = round < half_full || round >= half_full + params.partial_rounds;
            let sbox_limit = if full { t } else { 1 };
            for element in state.iter_mut().take(sbox_limit) {
                let square = &*element * &*element % p;
                let quad = &square * &square % p;
                *element = quad * &*element % p;
            }
            state = params
                .mds
                .iter()
                .map(|row| {
                    let mut acc = BigUint::ZERO;
                    for (entry, element) in row.iter().zip(state.iter()) {
                        acc += entry * element;
                    }
                    acc % p
                })
                .collect();
        }

        state.truncate(n_outs);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input() {
        let kernel = Kernel::new();
        let out = kernel.permute(&[BigUint::from(1u32)], 1);
        assert_eq!(
            out[0].to_str_radix(10),
            "18586133768512220936620570745912940619677854269274689475585506675881198879027"
        );
    }

    #[test]
    fn test_two_inputs() {
        let kernel = Kernel::new();
        let out = kernel.permute(&[BigUint::from(1u32), BigUint::from(2u32)], 1);
        assert_eq!(
            out[0].to_str_radix(10),
            "7853200120776062878684798364095072458815029376092732009249414926327459813530"
        );
    }

    #[test]
    fn test_multiple_outputs() {
        let kernel = Kernel::new();
        let inputs: Vec<BigUint> = (1u32..=3).map(BigUint::from).collect();
        let out = kernel.permute(&inputs, 2);
        assert_eq!(
            out[0].to_str_radix(16),
            "e7732d89e6939c0ff03d5e58dab6302f3230e269dc5b968f725df34ab36d732"
        );
        assert_eq!(
            out[1].to_str_radix(16),
            "7b0b86b41ec7fdfe6c17ee6ccdddce4e47e748e493e542f9a435b0dde022a0d"
        );
    }
}
