//! Byte, integer, and hex conversion helpers shared across primitives.

use crate::Error;
use num_bigint::BigUint;
use sha3::{Digest as _, Keccak256};

/// Converts a byte slice to a hexadecimal string.
pub fn hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes.iter() {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

/// Converts a hexadecimal string (optionally `0x`-prefixed) to bytes.
pub fn from_hex(hex: &str) -> Result<Vec<u8>, Error> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return Err(Error::InvalidHex);
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidHex))
        .collect()
}

/// Decodes a big-endian byte slice as an unsigned big integer.
pub fn bytes_to_biguint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Encodes an unsigned big integer as a fixed-width big-endian byte vector,
/// zero-padded on the left.
///
/// High-order bits beyond `length` bytes are silently discarded: this is a
/// fixed-width wraparound, not an error. Callers must ensure values fit.
pub fn biguint_to_bytes(value: &BigUint, length: usize) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes.len() > length {
        bytes.drain(..bytes.len() - length);
        return bytes;
    }
    let mut out = vec![0u8; length - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}

/// Encodes an unsigned big integer as a 32-byte big-endian array, with the
/// same truncation semantics as [biguint_to_bytes].
pub fn biguint_to_array(value: &BigUint) -> [u8; 32] {
    let bytes = biguint_to_bytes(value, 32);
    bytes.try_into().expect("encoding is exactly 32 bytes")
}

/// Computes the Keccak-256 hash of the input.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}
