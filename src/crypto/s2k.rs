//! Iterated-and-salted String-to-Key derivation, SHA-1 only (spec.md
//! §4.E).

use crate::types::HashAlgorithm;
use crate::{Error, Result};
use digest::Digest;
use sha1collisiondetection::Sha1CD;

const SHA1_OUTPUT_LEN: usize = 20;

/// Derives `key_length` bytes from `passphrase` using the RFC 4880
/// iterated-and-salted S2K mechanism.
///
/// `count` is the raw S2K count octet; `hash_bytes` below is the RFC 4880
/// count formula (`(16 + (c & 15)) << ((c >> 4) + 6)`), i.e. the number of
/// bytes of `salt || passphrase` material fed to the hash per round,
/// wrapping around as many times as needed.
pub(crate) fn derive_key(
    hash_algo: HashAlgorithm,
    salt: &[u8; 8],
    passphrase: &[u8],
    count: u8,
    key_length: usize,
) -> Result<Vec<u8>> {
    if hash_algo != HashAlgorithm::Sha1 {
        return Err(Error::FormatUnsupported(format!("{hash_algo:?} for S2K")).into());
    }

    let hash_bytes: u64 = (16 + (count & 0x0F) as u64) << ((count >> 4) as u64 + 6);

    let mut hash_buf = Vec::with_capacity(8 + passphrase.len());
    hash_buf.extend_from_slice(salt);
    hash_buf.extend_from_slice(passphrase);
    let l = hash_buf.len() as u64;

    // ceil(key_length / hash_output_length); see SPEC_FULL.md §4.E for why
    // this departs from the source's miscomputed `hashIters` while
    // producing identical key material for the two algorithms in scope.
    let iters = (key_length + SHA1_OUTPUT_LEN - 1) / SHA1_OUTPUT_LEN;

    let mut key = Vec::with_capacity(key_length);
    for round in 0..iters {
        let mut ctx = Sha1CD::new();
        // The zero-byte prefix is OpenPGP's canonical "extend the key"
        // trick: round 0 has no prefix, round r has r leading zero bytes.
        for _ in 0..round {
            ctx.update([0u8]);
        }
        let full_copies = hash_bytes / l;
        let extra = (hash_bytes % l) as usize;
        for _ in 0..full_copies {
            ctx.update(&hash_buf);
        }
        if extra > 0 {
            ctx.update(&hash_buf[..extra]);
        }
        let digest: [u8; SHA1_OUTPUT_LEN] = ctx.finalize().into();
        let need = key_length - key.len();
        let take = need.min(SHA1_OUTPUT_LEN);
        key.extend_from_slice(&digest[..take]);
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        // Testable property 5.
        let salt = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let a = derive_key(HashAlgorithm::Sha1, &salt, b"test", 96, 24).unwrap();
        let b = derive_key(HashAlgorithm::Sha1, &salt, b"test", 96, 24).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);
    }

    #[test]
    fn single_round_suffices_for_cast5() {
        let salt = [0u8; 8];
        let key = derive_key(HashAlgorithm::Sha1, &salt, b"hunter2", 10, 16).unwrap();
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn rejects_non_sha1() {
        let salt = [0u8; 8];
        let err = derive_key(HashAlgorithm::Unknown(8), &salt, b"x", 96, 24).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FormatUnsupported(_))
        ));
    }
}
