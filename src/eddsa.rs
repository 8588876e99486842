//! Deterministic Schnorr-style signatures over Baby Jubjub with a Poseidon
//! challenge.
//!
//! Key expansion follows the circomlib EdDSA recipe: the private scalar and
//! the nonce seed are both halves of the BLAKE-512 digest of the raw key,
//! with the usual bit pruning applied to the scalar half. The nonce is
//! derived deterministically from the seed and the message, the challenge is
//! `poseidon(R8.x, R8.y, A.x, A.y, m)`, and the response is
//! `S = r + c * k mod n` for the subgroup order `n`.
//!
//! Signing and verification take the hash engine explicitly; the
//! module-level [sign] and [verify] resolve the process-wide engine and fail
//! with [Error::UninitializedBackend] when none is registered.
//!
//! # Example
//!
//! ```rust
//! use zkprimitives::eddsa::PrivateKey;
//! use zkprimitives::poseidon::{Backend, PoseidonEngine};
//! use zkprimitives::FieldElement;
//!
//! let engine = futures::executor::block_on(PoseidonEngine::new(Backend::Optimized)).unwrap();
//!
//! let private_key = PrivateKey::from_rng(&mut rand::thread_rng());
//! let message = FieldElement::from([7u8; 32]);
//! let signature = private_key.sign(&engine, &message).unwrap();
//! assert!(private_key.public_key().verify(&engine, &message, &signature));
//! ```

use crate::{
    babyjubjub::{base8, suborder, Point},
    blake512::blake512,
    poseidon::{self, PoseidonEngine},
    utils::biguint_to_array,
    Error, FieldElement,
};
use num_bigint::BigUint;
use rand::{CryptoRng, Rng, RngCore};
use std::fmt::Display;
use zeroize::{Zeroize, ZeroizeOnDrop};

const KEY_LENGTH: usize = 32;

/// A raw 32-byte signing key.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    raw: [u8; KEY_LENGTH],
}

impl PrivateKey {
    pub fn new(raw: [u8; KEY_LENGTH]) -> Self {
        Self { raw }
    }

    /// Generates a random key.
    pub fn from_rng<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        let mut raw = [0u8; KEY_LENGTH];
        rng.fill_bytes(&mut raw);
        Self { raw }
    }

    /// Expands the raw key: the pruned scalar half and the nonce seed half
    /// of the BLAKE-512 digest.
    fn expand(&self) -> (BigUint, [u8; 32]) {
        let digest = blake512(&self.raw);
        let mut scalar_bytes: [u8; 32] = digest[..32].try_into().expect("digest half is 32 bytes");
        scalar_bytes[0] &= 0xf8;
        scalar_bytes[31] &= 0x7f;
        scalar_bytes[31] |= 0x40;
        let scalar = BigUint::from_bytes_le(&scalar_bytes) >> 3;
        let seed = digest[32..].try_into().expect("digest half is 32 bytes");
        (scalar, seed)
    }

    /// Derives the public point `A = k * Base8`.
    pub fn public_key(&self) -> PublicKey {
        let (scalar, _) = self.expand();
        PublicKey {
            point: base8().mul_scalar(&scalar),
        }
    }

    /// Produces a deterministic signature over a field-element message.
    pub fn sign(
        &self,
        engine: &PoseidonEngine,
        message: &FieldElement,
    ) -> Result<Signature, Error> {
        let (scalar, seed) = self.expand();
        let public = base8().mul_scalar(&scalar);

        // Nonce input is the seed half followed by the message in the hash
        // backend's internal byte form, matching the circomlib signer.
        let mut nonce_input = [0u8; 64];
        nonce_input[..32].copy_from_slice(&seed);
        nonce_input[32..].copy_from_slice(&message.to_internal());
        let nonce = BigUint::from_bytes_le(&blake512(&nonce_input)) % suborder();

        let r8 = base8().mul_scalar(&nonce);
        let challenge = challenge(engine, &r8, &public, message)?;
        let s = (nonce + challenge * scalar) % suborder();
        Ok(Signature { r8, s })
    }
}

/// A public point on the prime-order subgroup.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PublicKey {
    point: Point,
}

impl PublicKey {
    /// Reconstructs a public key from canonical coordinates, rejecting
    /// points off the curve.
    pub fn from_coordinates(x: FieldElement, y: FieldElement) -> Result<Self, Error> {
        let point = Point {
            x: x.to_mont(),
            y: y.to_mont(),
        };
        if !point.on_curve() {
            return Err(Error::InvalidPoint);
        }
        Ok(Self { point })
    }

    pub fn x(&self) -> FieldElement {
        FieldElement::from_mont(self.point.x)
    }

    pub fn y(&self) -> FieldElement {
        FieldElement::from_mont(self.point.y)
    }

    /// Checks `S * Base8 == R8 + c * A`. Malformed-but-parseable signatures
    /// simply fail the identity; this never errors on invalid input.
    pub fn verify(
        &self,
        engine: &PoseidonEngine,
        message: &FieldElement,
        signature: &Signature,
    ) -> bool {
        let challenge = match challenge(engine, &signature.r8, &self.point, message) {
            Ok(challenge) => challenge,
            Err(_) => return false,
        };
        let lhs = base8().mul_scalar(&signature.s);
        let rhs = signature.r8.add(&self.point.mul_scalar(&challenge));
        lhs == rhs
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

/// A signature: the commitment point `R8` and the response scalar `S`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature {
    r8: Point,
    s: BigUint,
}

impl Signature {
    /// Reconstructs a signature from its wire parts, rejecting commitment
    /// points off the curve.
    pub fn from_parts(
        r8_x: FieldElement,
        r8_y: FieldElement,
        s: &[u8; 32],
    ) -> Result<Self, Error> {
        let r8 = Point {
            x: r8_x.to_mont(),
            y: r8_y.to_mont(),
        };
        if !r8.on_curve() {
            return Err(Error::InvalidPoint);
        }
        Ok(Self {
            r8,
            s: BigUint::from_bytes_be(s),
        })
    }

    pub fn r8_x(&self) -> FieldElement {
        FieldElement::from_mont(self.r8.x)
    }

    pub fn r8_y(&self) -> FieldElement {
        FieldElement::from_mont(self.r8.y)
    }

    /// The response scalar as 32 big-endian bytes. Always fits because `S`
    /// is reduced modulo the subgroup order.
    pub fn s(&self) -> [u8; 32] {
        biguint_to_array(&self.s)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.r8_x(),
            self.r8_y(),
            crate::utils::hex(&self.s())
        )
    }
}

fn challenge(
    engine: &PoseidonEngine,
    r8: &Point,
    public: &Point,
    message: &FieldElement,
) -> Result<BigUint, Error> {
    let digest = engine.hash(&[
        FieldElement::from_mont(r8.x),
        FieldElement::from_mont(r8.y),
        FieldElement::from_mont(public.x),
        FieldElement::from_mont(public.y),
        *message,
    ])?;
    Ok(digest.to_biguint())
}

/// Signs with the process-wide registered hash engine.
pub fn sign(private_key: &PrivateKey, message: &FieldElement) -> Result<Signature, Error> {
    private_key.sign(&*poseidon::active()?, message)
}

/// Verifies with the process-wide registered hash engine. Unlike a merely
/// invalid signature, a missing engine is an error.
pub fn verify(
    message: &FieldElement,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<bool, Error> {
    Ok(public_key.verify(&*poseidon::active()?, message, signature))
}

/// Hashes 32 cryptographically-random bytes to a field element. Suitable for
/// nonce-like uses, not for key material.
pub fn gen_random_point(engine: &PoseidonEngine) -> Result<FieldElement, Error> {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    engine.hash(&[FieldElement::from(bytes)])
}
