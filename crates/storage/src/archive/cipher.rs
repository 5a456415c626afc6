//! Member encryption
//!
//! A 256-bit key is derived from the password with PBKDF2-HMAC-SHA256.
//! Each member is sealed with AES-256-GCM under a fresh random nonce, stored
//! as `nonce || ciphertext || tag`.

use std::num::NonZeroU32;

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::types::KdfHeader;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// A derived member key
pub struct Cipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl Cipher {
    /// Derive the key for `password` under `header`
    pub fn derive(password: &str, header: &KdfHeader) -> ArchiveResult<Self> {
        let iterations = NonZeroU32::new(header.iterations)
            .ok_or_else(|| ArchiveError::invalid_archive("kdf iteration count is zero"))?;

        let mut key_bytes = [0u8; KEY_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            &header.salt,
            password.as_bytes(),
            &mut key_bytes,
        );

        let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes)
            .map_err(|_| ArchiveError::crypto("invalid AES-256-GCM key"))?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Fresh key-derivation header with a random salt
    pub fn new_header(iterations: u32) -> ArchiveResult<KdfHeader> {
        let mut salt = vec![0u8; SALT_LEN];
        SystemRandom::new()
            .fill(&mut salt)
            .map_err(|_| ArchiveError::crypto("cannot generate salt"))?;
        Ok(KdfHeader { salt, iterations })
    }

    /// Encrypt `plaintext`
    pub fn seal(&self, plaintext: &[u8]) -> ArchiveResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| ArchiveError::crypto("cannot generate nonce"))?;

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| ArchiveError::crypto("sealing failed"))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(sealed)
    }

    /// Decrypt a sealed member; `member` names it in errors
    pub fn open(&self, member: &str, sealed: &[u8]) -> ArchiveResult<Vec<u8>> {
        if sealed.len() < NONCE_LEN {
            return Err(ArchiveError::Decryption(member.to_string()));
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| ArchiveError::Decryption(member.to_string()))?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| ArchiveError::Decryption(member.to_string()))?;
        Ok(plaintext.to_vec())
    }
}
