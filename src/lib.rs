//! Zero-knowledge-friendly cryptographic primitives over BN254.
//!
//! Provides the hashing and signing core used by privacy-preserving wallet
//! tooling: a variable-arity Poseidon hash with interchangeable
//! reference/optimized backends, deterministic EdDSA over Baby Jubjub with a
//! Poseidon challenge, AES-256 payload encryption, and Ethereum-compatible
//! secp256k1 message signing. Field elements cross every API boundary as
//! canonical 32-byte big-endian arrays; the Montgomery representation the
//! hashing backends use internally never leaks unless explicitly requested.
//!
//! # Example
//!
//! ```rust
//! use zkprimitives::eddsa::PrivateKey;
//! use zkprimitives::poseidon::{Backend, PoseidonEngine};
//! use zkprimitives::FieldElement;
//!
//! // Build the hash engine once; it derives all per-arity parameters and
//! // verifies itself against a known-answer vector.
//! let engine = futures::executor::block_on(PoseidonEngine::new(Backend::Optimized)).unwrap();
//!
//! // Hash a pair of field elements.
//! let one = FieldElement::from({
//!     let mut bytes = [0u8; 32];
//!     bytes[31] = 1;
//!     bytes
//! });
//! let digest = engine.hash(&[one, one]).unwrap();
//!
//! // Sign the digest and verify the signature.
//! let key = PrivateKey::from_rng(&mut rand::thread_rng());
//! let signature = key.sign(&engine, &digest).unwrap();
//! assert!(key.public_key().verify(&engine, &digest, &signature));
//! ```

pub mod aes;
mod babyjubjub;
mod blake512;
pub mod eddsa;
pub mod ethereum;
pub mod field;
pub mod poseidon;
pub mod utils;

pub use field::FieldElement;

use thiserror::Error;

/// Errors that can occur when interacting with cryptographic primitives.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("no hash backend initialized")]
    UninitializedBackend,
    #[error("backend initialization failed: {0}")]
    BackendInitialization(&'static str),
    #[error("input count out of range: {0}")]
    ArityRange(usize),
    #[error("invalid input at index {0}")]
    InvalidInput(usize),
    #[error("output shape inconsistent with request")]
    OutputShape,
    #[error("invalid key length: {0}")]
    InvalidKeyLength(usize),
    #[error("invalid iv length: {0}")]
    InvalidIvLength(usize),
    #[error("authentication failed")]
    Authentication,
    #[error("invalid hex")]
    InvalidHex,
    #[error("point not on curve")]
    InvalidPoint,
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid signature")]
    InvalidSignature,
}
