//! Montgomery-form Poseidon permutation.
//!
//! Round constants and MDS entries are converted into Montgomery form once at
//! construction; the permutation then runs entirely on fixed-width limb
//! arithmetic with no allocation beyond the state vector.

use super::grain::{self, FULL_ROUNDS};
use crate::{field::Mont, utils::biguint_to_array};

struct Params {
    partial_rounds: usize,
    /// Round constants in application order, Montgomery form.
    c: Vec<Mont>,
    /// Row-major MDS matrix, Montgomery form.
    m: Vec<Vec<Mont>>,
}

pub(super) struct Kernel {
    /// Parameters for widths 2..=17, indexed by `t - 2`.
    params: Vec<Params>,
}

impl Kernel {
    pub(super) fn new() -> Self {
        let params = (2..=17)
            .map(|t| {
                let generated = grain::generate(t);
                let to_mont = |v: &num_bigint::BigUint| Mont::from_canonical(&biguint_to_array(v));
                Params {
                    partial_rounds: generated.partial_rounds,
                    c: generated.round_constants.iter().map(to_mont).collect(),
                    m: generated
                        .mds
                        .iter()
                        .map(|row| row.iter().map(to_mont).collect())
                        .collect(),
                }
            })
            .collect();
        Self { params }
    }

    /// Runs the permutation over `[0, inputs...]` and returns the first
    /// `n_outs` elements of the final state.
    pub(super) fn permute(&self, inputs: &[Mont], n_outs: usize) -> Vec<Mont> {
        let t = inputs.len() + 1;
        let params = &self.params[t - 2];

        let mut state = Vec::with_capacity(t);
        state.push(Mont::ZERO);
        state.extend_from_slice(inputs);
        let mut mixed = vec![Mont::ZERO; t];

        let rounds = FULL_ROUNDS + params.partial_rounds;
        let half_full = FULL_ROUNDS / 2;
        for round in 0..rounds {
            for (i, element) in state.iter_mut().enumerate() {
                *element = element.add(&params.c[round * t + i]);
            }
            let full = round < half_full || round >= half_full + params.partial_rounds;
            let sbox_limit = if full { t } else { 1 };
            for element in state.iter_mut().take(sbox_limit) {
                *element = element.pow5();
            }
            for (out, row) in mixed.iter_mut().zip(params.m.iter()) {
                let mut acc = Mont::ZERO;
                for (entry, element) in row.iter().zip(state.iter()) {
                    acc = acc.add(&entry.mul(element));
                }
                *out = acc;
            }
            std::mem::swap(&mut state, &mut mixed);
        }

        state.truncate(n_outs);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hex;

    #[test]
    fn test_single_input() {
        let kernel = Kernel::new();
        let out = kernel.permute(&[Mont::ONE], 1);
        assert_eq!(
            hex(&out[0].to_canonical()),
            "29176100eaa962bdc1fe6c654d6a3c130e96a4d1168b33848b897dc502820133"
        );
    }

    #[test]
    fn test_two_inputs() {
        let kernel = Kernel::new();
        let two = Mont::ONE.add(&Mont::ONE);
        let out = kernel.permute(&[Mont::ONE, two], 1);
        assert_eq!(
            hex(&out[0].to_canonical()),
            "115cc0f5e7d690413df64c6b9662e9cf2a3617f2743245519e19607a4417189a"
        );
    }

    #[test]
    fn test_matches_arbitrary_precision_backend() {
        use num_bigint::BigUint;

        let reference = super::super::reference::Kernel::new();
        let kernel = Kernel::new();
        for arity in [1usize, 4, 9, 16] {
            let integers: Vec<BigUint> = (1..=arity as u32).map(BigUint::from).collect();
            let elements: Vec<Mont> = integers
                .iter()
                .map(|v| Mont::from_canonical(&biguint_to_array(v)))
                .collect();
            let expected = reference.permute(&integers, 2);
            let actual = kernel.permute(&elements, 2);
            let actual: Vec<BigUint> = actual
                .iter()
                .map(|m| BigUint::from_bytes_be(&m.to_canonical()))
                .collect();
            assert_eq!(actual, expected);
        }
    }
}
