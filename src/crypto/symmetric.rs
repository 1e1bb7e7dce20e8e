//! CFB-mode symmetric cipher dispatch over the closed algorithm table
//! (spec.md §4.F, §4.H), built directly on the RustCrypto block-cipher
//! crates the teacher already depends on.

use crate::types::SymmetricAlgorithm;
use crate::{Error, Result};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};

macro_rules! with_cfb_decryptor {
    ($algo:expr, $key:expr, $iv:expr, $buf:expr, $cipher:ty) => {{
        let dec = cfb_mode::Decryptor::<$cipher>::new_from_slices($key, $iv)
            .map_err(|e| Error::CryptoLibraryError(e.to_string()))?;
        dec.decrypt($buf);
        Ok(())
    }};
}

macro_rules! with_cfb_encryptor {
    ($algo:expr, $key:expr, $iv:expr, $buf:expr, $cipher:ty) => {{
        let enc = cfb_mode::Encryptor::<$cipher>::new_from_slices($key, $iv)
            .map_err(|e| Error::CryptoLibraryError(e.to_string()))?;
        enc.encrypt($buf);
        Ok(())
    }};
}

/// Decrypts `data` in place using CFB mode with `key`/`iv` under `algo`.
pub(crate) fn cfb_decrypt(
    algo: SymmetricAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> Result<()> {
    match algo {
        SymmetricAlgorithm::Idea => with_cfb_decryptor!(algo, key, iv, data, idea::Idea),
        SymmetricAlgorithm::TripleDes => {
            with_cfb_decryptor!(algo, key, iv, data, des::TdesEde3)
        }
        SymmetricAlgorithm::Cast5 => with_cfb_decryptor!(algo, key, iv, data, cast5::Cast5),
        SymmetricAlgorithm::Blowfish => {
            with_cfb_decryptor!(algo, key, iv, data, blowfish::Blowfish)
        }
        SymmetricAlgorithm::Aes128 => with_cfb_decryptor!(algo, key, iv, data, aes::Aes128),
        SymmetricAlgorithm::Aes192 => with_cfb_decryptor!(algo, key, iv, data, aes::Aes192),
        SymmetricAlgorithm::Aes256 => with_cfb_decryptor!(algo, key, iv, data, aes::Aes256),
        SymmetricAlgorithm::Twofish => {
            with_cfb_decryptor!(algo, key, iv, data, twofish::Twofish)
        }
        SymmetricAlgorithm::Unknown(v) => {
            Err(Error::FormatUnsupported(format!("symmetric algorithm {v}")).into())
        }
    }
}

/// Encrypts `data` in place using CFB mode. Only used by test fixtures
/// that need to construct literal encrypted packet bytes; the engine
/// itself never writes PGP packets (Non-goals, spec.md §1).
#[cfg(test)]
pub(crate) fn cfb_encrypt(
    algo: SymmetricAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> Result<()> {
    match algo {
        SymmetricAlgorithm::Idea => with_cfb_encryptor!(algo, key, iv, data, idea::Idea),
        SymmetricAlgorithm::TripleDes => {
            with_cfb_encryptor!(algo, key, iv, data, des::TdesEde3)
        }
        SymmetricAlgorithm::Cast5 => with_cfb_encryptor!(algo, key, iv, data, cast5::Cast5),
        SymmetricAlgorithm::Blowfish => {
            with_cfb_encryptor!(algo, key, iv, data, blowfish::Blowfish)
        }
        SymmetricAlgorithm::Aes128 => with_cfb_encryptor!(algo, key, iv, data, aes::Aes128),
        SymmetricAlgorithm::Aes192 => with_cfb_encryptor!(algo, key, iv, data, aes::Aes192),
        SymmetricAlgorithm::Aes256 => with_cfb_encryptor!(algo, key, iv, data, aes::Aes256),
        SymmetricAlgorithm::Twofish => {
            with_cfb_encryptor!(algo, key, iv, data, twofish::Twofish)
        }
        SymmetricAlgorithm::Unknown(v) => {
            Err(Error::FormatUnsupported(format!("symmetric algorithm {v}")).into())
        }
    }
}
