//! Ethereum-style ECDSA signing over secp256k1.
//!
//! Messages are hashed with the personal-message prefix
//! (`\x19Ethereum Signed Message:\n<length>`) before Keccak-256, signatures
//! are deterministic (RFC 6979) and carry the legacy `v = 27 + recovery_id`
//! byte, and addresses are the low 20 bytes of the Keccak-256 digest of the
//! uncompressed public key.

use crate::{utils::keccak256, Error};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

pub const ADDRESS_LENGTH: usize = 20;
pub const SIGNATURE_LENGTH: usize = 65;

/// Hashes a message with the personal-message prefix.
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let mut prefixed = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
    prefixed.extend_from_slice(message);
    keccak256(&prefixed)
}

/// Derives the address for a raw secp256k1 private key.
pub fn address(private_key: &[u8; 32]) -> Result<[u8; ADDRESS_LENGTH], Error> {
    let signing_key =
        SigningKey::from_bytes(private_key.into()).map_err(|_| Error::InvalidPrivateKey)?;
    Ok(address_of(signing_key.verifying_key()))
}

fn address_of(verifying_key: &VerifyingKey) -> [u8; ADDRESS_LENGTH] {
    let point = verifying_key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    digest[12..].try_into().expect("digest tail is 20 bytes")
}

/// Signs a personal message, returning `r || s || v` with `v` in 27/28 form.
pub fn sign_message(
    private_key: &[u8; 32],
    message: &[u8],
) -> Result<[u8; SIGNATURE_LENGTH], Error> {
    let signing_key =
        SigningKey::from_bytes(private_key.into()).map_err(|_| Error::InvalidPrivateKey)?;
    let (signature, recovery) = signing_key
        .sign_prehash_recoverable(&hash_message(message))
        .map_err(|_| Error::InvalidPrivateKey)?;
    let mut out = [0u8; SIGNATURE_LENGTH];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = 27 + recovery.to_byte();
    Ok(out)
}

/// Recovers the signer address of a personal-message signature.
pub fn recover_address(
    signature: &[u8; SIGNATURE_LENGTH],
    message: &[u8],
) -> Result<[u8; ADDRESS_LENGTH], Error> {
    let recovery =
        RecoveryId::from_byte(signature[64].wrapping_sub(27)).ok_or(Error::InvalidSignature)?;
    let signature =
        Signature::from_slice(&signature[..64]).map_err(|_| Error::InvalidSignature)?;
    let verifying_key =
        VerifyingKey::recover_from_prehash(&hash_message(message), &signature, recovery)
            .map_err(|_| Error::InvalidSignature)?;
    Ok(address_of(&verifying_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hex;

    fn key_one() -> [u8; 32] {
        let mut key = [0u8; 32];
        key[31] = 1;
        key
    }

    #[test]
    fn test_address_of_key_one() {
        // The address of private key 1 is a fixed point of the scheme.
        assert_eq!(
            hex(&address(&key_one()).unwrap()),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_sign_recover_round_trip() {
        let message = b"attest: 0x00ff";
        let signature = sign_message(&key_one(), message).unwrap();
        assert!(signature[64] == 27 || signature[64] == 28);
        assert_eq!(
            recover_address(&signature, message).unwrap(),
            address(&key_one()).unwrap()
        );
    }

    #[test]
    fn test_deterministic() {
        let message = b"same message";
        assert_eq!(
            sign_message(&key_one(), message).unwrap(),
            sign_message(&key_one(), message).unwrap()
        );
    }

    #[test]
    fn test_tampered_message_recovers_other_address() {
        let signature = sign_message(&key_one(), b"original").unwrap();
        let recovered = recover_address(&signature, b"tampered");
        match recovered {
            Ok(address_bytes) => assert_ne!(address_bytes, address(&key_one()).unwrap()),
            Err(Error::InvalidSignature) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            address(&[0u8; 32]),
            Err(Error::InvalidPrivateKey)
        ));
        let mut signature = sign_message(&key_one(), b"m").unwrap();
        signature[64] = 99;
        assert!(matches!(
            recover_address(&signature, b"m"),
            Err(Error::InvalidSignature)
        ));
    }
}
