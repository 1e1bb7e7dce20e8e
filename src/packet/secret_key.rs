//! The Secret-key packet body, S2K parameters, and decryption (spec.md
//! §4.D, §4.E, §4.F).

use crate::crypto::s2k;
use crate::crypto::symmetric;
use crate::cursor::Cursor;
use crate::mpi::{self, Mpi};
use crate::packet::public_key::PublicKey;
use crate::packet::Header;
use crate::types::{HashAlgorithm, PublicKeyAlgorithm, S2kSpecifier, SymmetricAlgorithm};
use crate::{Error, Result};
use digest::Digest;
use sha1collisiondetection::Sha1CD;
use zeroize::Zeroizing;

/// A v4 secret-key packet body: an embedded public key plus the
/// string-to-key parameters and (until decrypted) the encrypted secret
/// MPIs.
#[derive(Debug, Clone)]
pub struct SecretKey {
    pub public: PublicKey,
    pub s2k_type: u8,
    pub s2k_encryption: SymmetricAlgorithm,
    pub s2k_specifier: Option<S2kSpecifier>,
    pub s2k_hash_algo: Option<HashAlgorithm>,
    pub s2k_salt: Option<[u8; 8]>,
    pub s2k_count: Option<u8>,
    pub iv: Vec<u8>,
    encrypted_data: Option<Vec<u8>>,
    pub secret_mpis: Vec<Mpi>,
    pub is_decrypted: bool,
}

impl SecretKey {
    pub(crate) fn parse(cursor: &mut Cursor, _header: &Header) -> Result<Self> {
        let public = PublicKey::parse(cursor)?;
        let s2k_type = cursor.read_u8()?;

        let (s2k_encryption, s2k_specifier) = match s2k_type {
            0 => (SymmetricAlgorithm::Unknown(0), None),
            254 | 255 => {
                let sym = SymmetricAlgorithm::from_u8(cursor.read_u8()?);
                let specifier = S2kSpecifier::from_u8(cursor.read_u8()?);
                (sym, Some(specifier))
            }
            legacy => (SymmetricAlgorithm::from_u8(legacy), None),
        };

        if s2k_type == 0 {
            // Unencrypted: read the secret MPIs directly. The source only
            // implements this path for DSA (Design Note 3) — kept as a
            // documented gap rather than harmonized with the
            // post-decryption reader, which does support Elgamal too.
            let count = match public.algo {
                PublicKeyAlgorithm::Dsa => 1,
                other => {
                    return Err(Error::FormatUnsupported(format!(
                        "unencrypted secret key for {other:?}"
                    ))
                    .into())
                }
            };
            let secret_mpis = mpi::parse_n(cursor, count)?;
            return Ok(SecretKey {
                public,
                s2k_type,
                s2k_encryption,
                s2k_specifier,
                s2k_hash_algo: None,
                s2k_salt: None,
                s2k_count: None,
                iv: Vec::new(),
                encrypted_data: None,
                secret_mpis,
                is_decrypted: true,
            });
        }

        let mut s2k_hash_algo = None;
        let mut s2k_salt = None;
        let mut s2k_count = None;
        if let Some(specifier) = s2k_specifier {
            match specifier {
                S2kSpecifier::Salted | S2kSpecifier::IteratedSalted => {
                    s2k_hash_algo = Some(HashAlgorithm::from_u8(cursor.read_u8()?));
                    let salt: [u8; 8] = cursor.advance(8)?.try_into().unwrap();
                    s2k_salt = Some(salt);
                    if specifier == S2kSpecifier::IteratedSalted {
                        s2k_count = Some(cursor.read_u8()?);
                    }
                }
                S2kSpecifier::Unknown(code) => {
                    return Err(Error::FormatUnsupported(format!(
                        "s2k specifier {code}"
                    ))
                    .into())
                }
            }
        }

        let blocksize = s2k_encryption
            .block_size()
            .ok_or_else(|| Error::FormatUnsupported(format!("{s2k_encryption:?} IV length")))?;
        let iv = cursor.advance(blocksize)?.to_vec();

        // The remainder of the packet's content is the encrypted secret
        // MPI region; the engine already positioned the cursor past
        // everything read above, so this reads whatever is left in the
        // buffer up to this packet's boundary. Callers pass the exact
        // slice via `content_length` bookkeeping in `parse::decode_message`.
        let remaining = cursor.remaining();
        let encrypted_data = cursor.advance(remaining)?.to_vec();

        Ok(SecretKey {
            public,
            s2k_type,
            s2k_encryption,
            s2k_specifier,
            s2k_hash_algo,
            s2k_salt,
            s2k_count,
            iv,
            encrypted_data: Some(encrypted_data),
            secret_mpis: Vec::new(),
            is_decrypted: false,
        })
    }

    /// Decrypts the secret MPI region with `passphrase` (spec.md §4.F).
    /// Idempotent: a second call on an already-decrypted packet is a no-op
    /// (testable property 6).
    pub fn decrypt(&mut self, passphrase: &[u8]) -> Result<()> {
        if self.is_decrypted {
            return Ok(());
        }
        let hash_algo = self
            .s2k_hash_algo
            .ok_or_else(|| Error::FormatUnsupported("missing s2k hash algorithm".into()))?;
        let salt = self
            .s2k_salt
            .ok_or_else(|| Error::FormatUnsupported("missing s2k salt".into()))?;
        let count = self
            .s2k_count
            .ok_or_else(|| Error::FormatUnsupported("missing s2k count".into()))?;
        let key_length = self.s2k_encryption.key_length().ok_or_else(|| {
            Error::FormatUnsupported(format!("{:?} key length", self.s2k_encryption))
        })?;

        let key: Zeroizing<Vec<u8>> =
            Zeroizing::new(s2k::derive_key(hash_algo, &salt, passphrase, count, key_length)?);

        let encrypted = self
            .encrypted_data
            .as_ref()
            .ok_or(Error::InvalidArgs)?
            .clone();
        let mut plaintext: Zeroizing<Vec<u8>> = Zeroizing::new(encrypted);
        symmetric::cfb_decrypt(self.s2k_encryption, &key, &self.iv, &mut plaintext)?;

        if plaintext.len() < 20 {
            return Err(Error::DecryptFailed.into());
        }
        let split = plaintext.len() - 20;
        let (body, trailer) = plaintext.split_at(split);
        let mut ctx = Sha1CD::new();
        ctx.update(body);
        let digest: [u8; 20] = ctx.finalize().into();
        if digest != trailer {
            return Err(Error::DecryptFailed.into());
        }

        let count = match self.public.algo {
            PublicKeyAlgorithm::Dsa | PublicKeyAlgorithm::Elgamal => 1,
            other => {
                return Err(Error::FormatUnsupported(format!(
                    "decrypted secret MPIs for {other:?}"
                ))
                .into())
            }
        };
        let mut body_cursor = Cursor::new(body);
        let secret_mpis = mpi::parse_n(&mut body_cursor, count)?;

        self.secret_mpis = secret_mpis;
        self.is_decrypted = true;
        self.encrypted_data = None;
        Ok(())
    }
}
