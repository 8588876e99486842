//! Encoding and arithmetic for BN254 scalar-field elements.
//!
//! The canonical external representation of a field element is a 32-byte
//! big-endian array. The hashing backends operate on an internal Montgomery
//! representation; because the circomlibjs/ffjavascript field emits
//! little-endian bytes, converting between the two involves a byte reversal
//! *and* the Montgomery transform. Both directions are exposed here so every module
//! applies the convention identically; the pair is pinned by test vectors
//! rather than re-derived at call sites.

pub(crate) mod montgomery;

use crate::utils::{biguint_to_array, bytes_to_biguint};
use num_bigint::BigUint;
use std::{
    fmt::{Debug, Display},
    sync::OnceLock,
};

pub(crate) use montgomery::Mont;

const ELEMENT_LENGTH: usize = 32;

/// Returns the field modulus
/// `21888242871839275222246405745257275088548364400416034343698204186575808495617`.
pub fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| {
        let mut bytes = [0u8; ELEMENT_LENGTH];
        for (i, limb) in montgomery::MODULUS.iter().enumerate() {
            let offset = ELEMENT_LENGTH - (i + 1) * 8;
            bytes[offset..offset + 8].copy_from_slice(&limb.to_be_bytes());
        }
        BigUint::from_bytes_be(&bytes)
    })
}

/// A BN254 scalar-field element in canonical (reduced) form.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FieldElement([u8; ELEMENT_LENGTH]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self([0; ELEMENT_LENGTH]);

    /// Decodes canonical big-endian bytes, reducing values at or above the
    /// modulus.
    pub fn from_bytes(bytes: &[u8; ELEMENT_LENGTH]) -> Self {
        Self(Mont::from_canonical(bytes).to_canonical())
    }

    /// Reduces an arbitrary unsigned integer into the field.
    pub fn from_biguint(value: &BigUint) -> Self {
        Self(biguint_to_array(&(value % modulus())))
    }

    /// Returns the canonical big-endian encoding.
    pub fn as_bytes(&self) -> &[u8; ELEMENT_LENGTH] {
        &self.0
    }

    /// Returns the element as an unsigned integer.
    pub fn to_biguint(&self) -> BigUint {
        bytes_to_biguint(&self.0)
    }

    /// Converts to the backend-internal representation: the little-endian
    /// Montgomery residue bytes.
    pub fn to_internal(&self) -> [u8; ELEMENT_LENGTH] {
        Mont::from_canonical(&self.0).to_internal_bytes()
    }

    /// Converts from the backend-internal representation back to canonical
    /// form.
    pub fn from_internal(bytes: &[u8; ELEMENT_LENGTH]) -> Self {
        Self(Mont::from_internal_bytes(bytes).to_canonical())
    }

    pub(crate) fn to_mont(self) -> Mont {
        Mont::from_canonical(&self.0)
    }

    pub(crate) fn from_mont(value: Mont) -> Self {
        Self(value.to_canonical())
    }
}

impl From<[u8; ELEMENT_LENGTH]> for FieldElement {
    fn from(value: [u8; ELEMENT_LENGTH]) -> Self {
        Self::from_bytes(&value)
    }
}

impl AsRef<[u8]> for FieldElement {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::utils::hex(&self.0))
    }
}

impl Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::utils::hex(&self.0))
    }
}
