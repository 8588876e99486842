//! Fixed-arity hashing dispatcher over loosely-typed inputs.
//!
//! [hash_n] is the boundary between callers holding integers, strings, or raw
//! bytes and the typed engine underneath: inputs are normalized to field
//! elements, the input count selects the precompiled arity, and outputs are
//! shaped as bytes or integers on request.
//!
//! Only arities 1 through [MAX_ARITY] are accepted here even though the
//! engine derives parameters for more; the narrower contract is deliberate
//! and matched by downstream circuit tooling.

use super::PoseidonEngine;
use crate::{utils::bytes_to_biguint, Error, FieldElement};
use num_bigint::BigUint;

/// Smallest accepted input count.
pub const MIN_ARITY: usize = 1;
/// Largest accepted input count.
pub const MAX_ARITY: usize = 14;

/// An input accepted by [hash_n] before normalization.
#[derive(Debug, Clone)]
pub enum HashInput {
    /// An unsigned integer, reduced into the field.
    Integer(BigUint),
    /// A base-10 string.
    Decimal(String),
    /// A hex string, optionally `0x`-prefixed.
    Hex(String),
    /// Big-endian bytes of arbitrary length.
    Bytes(Vec<u8>),
}

/// The shaped result of [hash_n].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum HashOutput {
    /// Single digest as canonical bytes (`as_integer == false`, one output).
    Bytes([u8; 32]),
    /// Single digest as an integer (`as_integer == true`, one output).
    Integer(BigUint),
    /// Multiple digests as canonical bytes.
    BytesVec(Vec<[u8; 32]>),
    /// Multiple digests as integers.
    Integers(Vec<BigUint>),
}

fn normalize(input: &HashInput, index: usize) -> Result<FieldElement, Error> {
    let value = match input {
        HashInput::Integer(value) => value.clone(),
        HashInput::Decimal(text) => {
            if text.is_empty() {
                return Err(Error::InvalidInput(index));
            }
            BigUint::parse_bytes(text.as_bytes(), 10).ok_or(Error::InvalidInput(index))?
        }
        HashInput::Hex(text) => {
            let digits = text.strip_prefix("0x").unwrap_or(text);
            if digits.is_empty() {
                return Err(Error::InvalidInput(index));
            }
            BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(Error::InvalidInput(index))?
        }
        HashInput::Bytes(bytes) => bytes_to_biguint(bytes),
    };
    Ok(FieldElement::from_biguint(&value))
}

/// Hashes 1 to 14 inputs, shaping the result per `as_integer` and `outputs`.
///
/// A single requested output is returned unwrapped; more than one as an
/// ordered sequence. The input count outside `1..=14` fails with
/// [Error::ArityRange] before any input is inspected; an unparseable input
/// fails with [Error::InvalidInput] naming its index.
pub fn hash_n(
    engine: &PoseidonEngine,
    inputs: &[HashInput],
    as_integer: bool,
    outputs: usize,
) -> Result<HashOutput, Error> {
    let n = inputs.len();
    if !(MIN_ARITY..=MAX_ARITY).contains(&n) {
        return Err(Error::ArityRange(n));
    }

    let elements = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| normalize(input, index))
        .collect::<Result<Vec<_>, _>>()?;

    let digests = engine.hash_many(&elements, outputs)?;
    if digests.len() != outputs {
        return Err(Error::OutputShape);
    }

    Ok(match (as_integer, outputs) {
        (false, 1) => HashOutput::Bytes(*digests[0].as_bytes()),
        (true, 1) => HashOutput::Integer(digests[0].to_biguint()),
        (false, _) => HashOutput::BytesVec(digests.iter().map(|d| *d.as_bytes()).collect()),
        (true, _) => HashOutput::Integers(digests.iter().map(FieldElement::to_biguint).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poseidon::Backend;
    use futures::executor::block_on;

    fn engine() -> PoseidonEngine {
        block_on(PoseidonEngine::new(Backend::Optimized)).unwrap()
    }

    #[test]
    fn test_hex_inputs_as_integer() {
        // Pinned interop vector.
        let engine = engine();
        let inputs = [
            HashInput::Hex(
                "0x115cc0f5e7d690413df64c6b9662e9cf2a3617f2743245519e19607a4417189a".into(),
            ),
            HashInput::Hex(
                "0x2a92a4c8d7c21d97d946951043d11954de794cd506093dbbb97ada64c14b203b".into(),
            ),
        ];
        let out = hash_n(&engine, &inputs, true, 1).unwrap();
        assert_eq!(
            out,
            HashOutput::Integer(
                BigUint::parse_bytes(
                    b"106dc6dc79863b23dc1a63c7ca40e8c22bb830e449b75a2286c7f7b0b87ae6c3",
                    16,
                )
                .unwrap()
            )
        );
    }

    #[test]
    fn test_input_forms_agree() {
        let engine = engine();
        let mut two = vec![0u8; 32];
        two[31] = 2;
        let forms = [
            [
                HashInput::Integer(BigUint::from(1u32)),
                HashInput::Integer(BigUint::from(2u32)),
            ],
            [
                HashInput::Decimal("1".into()),
                HashInput::Decimal("2".into()),
            ],
            [HashInput::Hex("0x01".into()), HashInput::Hex("2".into())],
            [HashInput::Bytes(vec![1]), HashInput::Bytes(two)],
        ];
        for inputs in &forms {
            let out = hash_n(&engine, inputs, false, 1).unwrap();
            let HashOutput::Bytes(bytes) = out else {
                panic!("expected single byte output");
            };
            assert_eq!(
                crate::utils::hex(&bytes),
                "115cc0f5e7d690413df64c6b9662e9cf2a3617f2743245519e19607a4417189a"
            );
        }
    }

    #[test]
    fn test_arity_boundary() {
        let engine = engine();
        assert!(matches!(
            hash_n(&engine, &[], false, 1),
            Err(Error::ArityRange(0))
        ));

        let fourteen: Vec<HashInput> = (1u32..=14)
            .map(|v| HashInput::Integer(BigUint::from(v)))
            .collect();
        let out = hash_n(&engine, &fourteen, false, 1).unwrap();
        let HashOutput::Bytes(bytes) = out else {
            panic!("expected single byte output");
        };
        assert_eq!(
            crate::utils::hex(&bytes),
            "1278779aaafc5ca58bf573151005830cdb4683fb26591c85a7464d4f0e527776"
        );

        let fifteen: Vec<HashInput> = (1u32..=15)
            .map(|v| HashInput::Integer(BigUint::from(v)))
            .collect();
        assert!(matches!(
            hash_n(&engine, &fifteen, false, 1),
            Err(Error::ArityRange(15))
        ));
    }

    #[test]
    fn test_invalid_input_names_index() {
        let engine = engine();
        let inputs = [
            HashInput::Decimal("1".into()),
            HashInput::Decimal("not a number".into()),
        ];
        assert!(matches!(
            hash_n(&engine, &inputs, false, 1),
            Err(Error::InvalidInput(1))
        ));
        assert!(matches!(
            hash_n(&engine, &[HashInput::Hex("0x".into())], false, 1),
            Err(Error::InvalidInput(0))
        ));
    }

    #[test]
    fn test_multiple_outputs() {
        let engine = engine();
        let inputs: Vec<HashInput> = (1u32..=3)
            .map(|v| HashInput::Integer(BigUint::from(v)))
            .collect();
        let out = hash_n(&engine, &inputs, true, 2).unwrap();
        let HashOutput::Integers(values) = out else {
            panic!("expected integer sequence");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(
            values[0].to_str_radix(16),
            "e7732d89e6939c0ff03d5e58dab6302f3230e269dc5b968f725df34ab36d732"
        );

        let out = hash_n(&engine, &inputs, false, 2).unwrap();
        let HashOutput::BytesVec(digests) = out else {
            panic!("expected byte sequence");
        };
        assert_eq!(digests.len(), 2);
        assert_eq!(&bytes_to_biguint(&digests[0]), &values[0]);
    }

    #[test]
    fn test_oversized_integer_reduced() {
        // Inputs at or above the modulus are reduced, matching the engine's
        // canonical-decode behavior.
        let engine = engine();
        let reduced = hash_n(
            &engine,
            &[HashInput::Integer(crate::field::modulus() + 1u32)],
            false,
            1,
        )
        .unwrap();
        let one = hash_n(&engine, &[HashInput::Integer(BigUint::from(1u32))], false, 1).unwrap();
        assert_eq!(reduced, one);
    }
}
