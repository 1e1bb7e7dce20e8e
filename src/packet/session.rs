//! The public-key-encrypted session-key packet body, and session-key
//! recovery (spec.md §4.D, §4.G).

use crate::crypto::elgamal;
use crate::cursor::Cursor;
use crate::mpi::{self, Mpi};
use crate::packet::secret_key::SecretKey;
use crate::types::{PublicKeyAlgorithm, SymmetricAlgorithm};
use crate::{Error, Result};
use zeroize::Zeroizing;

/// A public-key-encrypted session-key packet body.
#[derive(Debug, Clone)]
pub struct Session {
    pub version: u8,
    pub key_id: [u8; 8],
    pub algo: PublicKeyAlgorithm,
    pub mpi1: Mpi,
    pub mpi2: Option<Mpi>,
    pub sym_algo: Option<SymmetricAlgorithm>,
    pub key: Option<Zeroizing<Vec<u8>>>,
}

impl Session {
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Self> {
        let version = cursor.read_u8()?;
        let key_id: [u8; 8] = cursor.advance(8)?.try_into().unwrap();
        let algo = PublicKeyAlgorithm::from_u8(cursor.read_u8()?);
        let (mpi1, mpi2) = match algo {
            PublicKeyAlgorithm::Elgamal => {
                let a = Mpi::parse(cursor)?;
                let b = Mpi::parse(cursor)?;
                (a, Some(b))
            }
            PublicKeyAlgorithm::Dsa => {
                return Err(Error::FormatUnsupported(
                    "DSA is a signature algorithm, not valid for session packets".into(),
                )
                .into())
            }
            PublicKeyAlgorithm::Unknown(v) => {
                // RSA and friends would take one MPI; keep parsing minimal
                // since this engine never decrypts them (spec.md §4.D).
                let a = mpi::Mpi::parse(cursor).map_err(|_| {
                    Error::FormatUnsupported(format!("public-key algorithm {v}"))
                })?;
                (a, None)
            }
        };
        Ok(Session {
            version,
            key_id,
            algo,
            mpi1,
            mpi2,
            sym_algo: None,
            key: None,
        })
    }

    /// Whether a session key has already been recovered.
    pub fn is_resolved(&self) -> bool {
        self.key.is_some()
    }

    /// Recovers the session key using `secret`'s private material
    /// (spec.md §4.G). Only Elgamal is implemented.
    pub(crate) fn recover_with(&mut self, secret: &SecretKey) -> Result<()> {
        if self.is_resolved() {
            return Ok(());
        }
        if self.algo != PublicKeyAlgorithm::Elgamal {
            return Err(Error::FormatUnsupported(format!(
                "session-key recovery for {:?}",
                self.algo
            ))
            .into());
        }
        if !secret.is_decrypted {
            return Err(Error::DecryptFailed.into());
        }

        let p = secret.public.mpis[0].to_biguint();
        let x = secret
            .secret_mpis
            .first()
            .ok_or(Error::DecryptFailed)?
            .to_biguint();
        let a = self.mpi1.to_biguint();
        let b = self
            .mpi2
            .as_ref()
            .ok_or(Error::FormatUnsupported("elgamal session packet missing b".into()))?
            .to_biguint();

        let m = elgamal::decrypt(&p, &x, &a, &b)?;
        let frame = Mpi::from_biguint(&m).as_wire();
        let (sym_algo, key) = parse_session_key_frame(&frame)?;

        self.sym_algo = Some(sym_algo);
        self.key = Some(Zeroizing::new(key));
        Ok(())
    }
}

/// Parses the EME-PKCS1-v1.5-style frame recovered from the asymmetric
/// decryption (spec.md §4.G step 4): a 2-byte length prefix, block type
/// `0x02`, non-zero padding, a zero separator, the symmetric algorithm
/// byte, the session key, and a 2-byte additive checksum.
fn parse_session_key_frame(frame: &[u8]) -> Result<(SymmetricAlgorithm, Vec<u8>)> {
    if frame.len() < 4 {
        return Err(Error::IncompletePacket.into());
    }
    let mut i = 2;
    if frame[i] != 0x02 {
        return Err(Error::DecryptFailed.into());
    }
    i += 1;
    while i < frame.len() && frame[i] != 0 {
        i += 1;
    }
    if i >= frame.len() {
        return Err(Error::DecryptFailed.into());
    }
    i += 1; // past the zero separator
    if i >= frame.len() {
        return Err(Error::DecryptFailed.into());
    }
    let sym_algo = SymmetricAlgorithm::from_u8(frame[i]);
    i += 1;
    if frame.len() < i + 2 {
        return Err(Error::DecryptFailed.into());
    }
    let key_len = frame.len() - i - 2;
    let key = frame[i..i + key_len].to_vec();
    let checksum = ((frame[frame.len() - 2] as u32) << 8) | frame[frame.len() - 1] as u32;
    let sum: u32 = key.iter().map(|&b| b as u32).sum();
    if sum % 65536 != checksum {
        return Err(Error::DecryptFailed.into());
    }
    Ok((sym_algo, key))
}
