//! Variable-arity Poseidon hashing over the BN254 scalar field.
//!
//! Two interchangeable backends implement the same permutation: an
//! arbitrary-precision backend that mirrors the published construction, and a
//! Montgomery-form backend for production use. [PoseidonEngine::new] builds
//! the per-arity parameters (an expensive one-time derivation) and verifies
//! the backend against a known-answer vector before handing the engine out.
//!
//! Constructed engines can be registered process-wide with [init]; [hash] and
//! the signing code then resolve the active engine through [active], which
//! prefers the Montgomery backend when both are registered.
//!
//! # Example
//!
//! ```rust
//! use zkprimitives::poseidon::{hash, init, Backend};
//! use zkprimitives::FieldElement;
//!
//! futures::executor::block_on(init(Backend::Optimized)).unwrap();
//!
//! let mut preimage = [0u8; 32];
//! preimage[31] = 1;
//! let digest = hash(&[FieldElement::from(preimage)]).unwrap();
//! println!("poseidon(1): {digest}");
//! ```
//!
//! # Acknowledgements
//!
//! * <https://eprint.iacr.org/2019/458>: the Poseidon construction and the
//!   Grain-based parameter derivation.

mod grain;
mod optimized;
mod reference;

pub mod dispatch;

use crate::{field::Mont, Error, FieldElement};
use num_bigint::BigUint;
use std::sync::{Arc, RwLock};

/// Expected digest of `hash([1])`, used to verify a freshly built backend.
const KNOWN_ANSWER: [u8; 32] = [
    0x29, 0x17, 0x61, 0x00, 0xea, 0xa9, 0x62, 0xbd, 0xc1, 0xfe, 0x6c, 0x65, 0x4d, 0x6a, 0x3c,
    0x13, 0x0e, 0x96, 0xa4, 0xd1, 0x16, 0x8b, 0x33, 0x84, 0x8b, 0x89, 0x7d, 0xc5, 0x02, 0x82,
    0x01, 0x33,
];

/// Which permutation implementation an engine runs on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Arbitrary-precision arithmetic. Slow, easy to audit.
    Reference,
    /// Fixed-width Montgomery arithmetic.
    Optimized,
}

enum Kernel {
    Reference(reference::Kernel),
    Optimized(optimized::Kernel),
}

/// A Poseidon hasher with parameters derived for arities 1 through
/// [Self::PRECOMPILED_ARITIES].
pub struct PoseidonEngine {
    backend: Backend,
    kernel: Kernel,
}

impl PoseidonEngine {
    /// Number of input arities the engine derives parameters for.
    pub const PRECOMPILED_ARITIES: usize = 16;

    /// Builds an engine on the given backend and verifies it against a
    /// known-answer vector.
    pub async fn new(backend: Backend) -> Result<Self, Error> {
        let kernel = match backend {
            Backend::Reference => Kernel::Reference(reference::Kernel::new()),
            Backend::Optimized => Kernel::Optimized(optimized::Kernel::new()),
        };
        let engine = Self { backend, kernel };
        let digest = engine.hash(&[FieldElement::from_biguint(&BigUint::from(1u32))])?;
        if digest.as_bytes() != &KNOWN_ANSWER {
            return Err(Error::BackendInitialization("known-answer check failed"));
        }
        Ok(engine)
    }

    /// Returns the backend this engine was built on.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Hashes between 1 and [Self::PRECOMPILED_ARITIES] field elements to a
    /// single digest.
    pub fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, Error> {
        Ok(self.hash_many(inputs, 1)?[0])
    }

    /// Hashes between 1 and [Self::PRECOMPILED_ARITIES] field elements,
    /// returning the first `outputs` elements of the permuted state.
    pub fn hash_many(
        &self,
        inputs: &[FieldElement],
        outputs: usize,
    ) -> Result<Vec<FieldElement>, Error> {
        if inputs.is_empty() || inputs.len() > Self::PRECOMPILED_ARITIES {
            return Err(Error::ArityRange(inputs.len()));
        }
        if outputs == 0 || outputs > inputs.len() + 1 {
            return Err(Error::OutputShape);
        }
        Ok(match &self.kernel {
            Kernel::Reference(kernel) => {
                let integers: Vec<BigUint> =
                    inputs.iter().map(FieldElement::to_biguint).collect();
                kernel
                    .permute(&integers, outputs)
                    .iter()
                    .map(FieldElement::from_biguint)
                    .collect()
            }
            Kernel::Optimized(kernel) => {
                let elements: Vec<Mont> = inputs.iter().map(|e| e.to_mont()).collect();
                kernel
                    .permute(&elements, outputs)
                    .into_iter()
                    .map(FieldElement::from_mont)
                    .collect()
            }
        })
    }
}

struct Slots {
    reference: RwLock<Option<Arc<PoseidonEngine>>>,
    optimized: RwLock<Option<Arc<PoseidonEngine>>>,
}

static SLOTS: Slots = Slots {
    reference: RwLock::new(None),
    optimized: RwLock::new(None),
};

/// Builds an engine on the given backend and registers it process-wide,
/// replacing any engine previously registered for that backend.
pub async fn init(backend: Backend) -> Result<(), Error> {
    let engine = Arc::new(PoseidonEngine::new(backend).await?);
    let slot = match backend {
        Backend::Reference => &SLOTS.reference,
        Backend::Optimized => &SLOTS.optimized,
    };
    *slot.write().expect("engine slot poisoned") = Some(engine);
    Ok(())
}

/// Returns the active registered engine, preferring the Montgomery backend.
///
/// Fails with [Error::UninitializedBackend] when [init] has not completed for
/// any backend.
pub fn active() -> Result<Arc<PoseidonEngine>, Error> {
    for slot in [&SLOTS.optimized, &SLOTS.reference] {
        if let Some(engine) = slot.read().expect("engine slot poisoned").as_ref() {
            return Ok(engine.clone());
        }
    }
    Err(Error::UninitializedBackend)
}

/// Hashes field elements with the active registered engine.
pub fn hash(inputs: &[FieldElement]) -> Result<FieldElement, Error> {
    active()?.hash(inputs)
}
