//! AES-256 symmetric encryption in authenticated (GCM) and streaming (CTR)
//! modes.
//!
//! The interface is block-oriented: callers pass an ordered list of
//! variable-length plaintext chunks and get the same shape back. Internally
//! the chunks are enciphered as one contiguous buffer and re-split, which is
//! equivalent because both modes run a single continuous keystream. Both
//! modes use a 16-byte IV; GCM carries a 16-byte authentication tag and
//! fails with [Error::Authentication] on any tamper.

use crate::Error;
use aes::{
    cipher::{KeyIvInit, StreamCipher},
    Aes256,
};
use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit},
    AesGcm, Nonce,
};
use ctr::Ctr128BE;
use rand::{rngs::OsRng, RngCore};

type Aes256Gcm = AesGcm<Aes256, U16>;
type Aes256Ctr = Ctr128BE<Aes256>;

pub const KEY_LENGTH: usize = 32;
pub const IV_LENGTH: usize = 16;
pub const TAG_LENGTH: usize = 16;

/// Output of authenticated encryption.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GcmCiphertext {
    pub iv: [u8; IV_LENGTH],
    pub tag: [u8; TAG_LENGTH],
    pub blocks: Vec<Vec<u8>>,
}

/// Output of streaming (unauthenticated) encryption.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CtrCiphertext {
    pub iv: [u8; IV_LENGTH],
    pub blocks: Vec<Vec<u8>>,
}

fn check_key(key: &[u8]) -> Result<(), Error> {
    if key.len() != KEY_LENGTH {
        return Err(Error::InvalidKeyLength(key.len()));
    }
    Ok(())
}

fn check_iv(iv: &[u8]) -> Result<[u8; IV_LENGTH], Error> {
    iv.try_into().map_err(|_| Error::InvalidIvLength(iv.len()))
}

fn random_iv() -> [u8; IV_LENGTH] {
    let mut iv = [0u8; IV_LENGTH];
    OsRng.fill_bytes(&mut iv);
    iv
}

fn concat(blocks: &[Vec<u8>]) -> Vec<u8> {
    blocks.concat()
}

fn split(mut data: Vec<u8>, blocks: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        let rest = data.split_off(block.len());
        out.push(data);
        data = rest;
    }
    out
}

/// Encrypts blocks with AES-256-GCM under a random IV.
pub fn encrypt_gcm(blocks: &[Vec<u8>], key: &[u8]) -> Result<GcmCiphertext, Error> {
    encrypt_gcm_with_iv(blocks, key, &random_iv())
}

/// Encrypts blocks with AES-256-GCM under the caller's 16-byte IV. The IV
/// must never repeat for a given key.
pub fn encrypt_gcm_with_iv(
    blocks: &[Vec<u8>],
    key: &[u8],
    iv: &[u8],
) -> Result<GcmCiphertext, Error> {
    check_key(key)?;
    let iv = check_iv(iv)?;
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::InvalidKeyLength(key.len()))?;
    let mut sealed = cipher
        .encrypt(Nonce::from_slice(&iv), concat(blocks).as_slice())
        .map_err(|_| Error::Authentication)?;
    let tag_offset = sealed.len() - TAG_LENGTH;
    let tag: [u8; TAG_LENGTH] = sealed[tag_offset..]
        .try_into()
        .map_err(|_| Error::Authentication)?;
    sealed.truncate(tag_offset);
    Ok(GcmCiphertext {
        iv,
        tag,
        blocks: split(sealed, blocks),
    })
}

/// Decrypts and authenticates an AES-256-GCM ciphertext, restoring the
/// original block shape.
pub fn decrypt_gcm(ciphertext: &GcmCiphertext, key: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
    check_key(key)?;
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::InvalidKeyLength(key.len()))?;
    let mut sealed = concat(&ciphertext.blocks);
    sealed.extend_from_slice(&ciphertext.tag);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&ciphertext.iv), sealed.as_slice())
        .map_err(|_| Error::Authentication)?;
    Ok(split(plaintext, &ciphertext.blocks))
}

/// Encrypts blocks with AES-256-CTR under a random IV. No authentication.
pub fn encrypt_ctr(blocks: &[Vec<u8>], key: &[u8]) -> Result<CtrCiphertext, Error> {
    encrypt_ctr_with_iv(blocks, key, &random_iv())
}

/// Encrypts blocks with AES-256-CTR under the caller's 16-byte IV.
pub fn encrypt_ctr_with_iv(
    blocks: &[Vec<u8>],
    key: &[u8],
    iv: &[u8],
) -> Result<CtrCiphertext, Error> {
    check_key(key)?;
    let iv = check_iv(iv)?;
    let mut cipher =
        Aes256Ctr::new_from_slices(key, &iv).map_err(|_| Error::InvalidKeyLength(key.len()))?;
    let mut data = concat(blocks);
    cipher.apply_keystream(&mut data);
    Ok(CtrCiphertext {
        iv,
        blocks: split(data, blocks),
    })
}

/// Decrypts an AES-256-CTR ciphertext, restoring the original block shape.
pub fn decrypt_ctr(ciphertext: &CtrCiphertext, key: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
    check_key(key)?;
    let mut cipher = Aes256Ctr::new_from_slices(key, &ciphertext.iv)
        .map_err(|_| Error::InvalidKeyLength(key.len()))?;
    let mut data = concat(&ciphertext.blocks);
    cipher.apply_keystream(&mut data);
    Ok(split(data, &ciphertext.blocks))
}
