//! The Public-key packet body and fingerprint computation (spec.md §4.D).

use crate::cursor::Cursor;
use crate::mpi::{self, Mpi};
use crate::types::PublicKeyAlgorithm;
use crate::{Error, Result};
use digest::Digest;
use sha1collisiondetection::Sha1CD;

/// A 20-byte SHA-1 fingerprint identifying a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 20]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The OpenPGP v4 key-id convention: the last 8 bytes of the
    /// fingerprint (spec.md Design Note 4).
    pub fn key_id(&self) -> [u8; 8] {
        self.0[12..20].try_into().expect("fingerprint is 20 bytes")
    }
}

/// A v4 public-key packet body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub version: u8,
    pub creation_time: u32,
    pub algo: PublicKeyAlgorithm,
    pub mpis: Vec<Mpi>,
    pub fingerprint: Fingerprint,
}

impl PublicKey {
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Self> {
        let version = cursor.read_u8()?;
        if version != 4 {
            return Err(Error::FormatUnsupported(format!(
                "public key version {version}, only v4 is supported"
            ))
            .into());
        }
        let creation_time = u32::from_be_bytes(cursor.advance(4)?.try_into().unwrap());
        let algo = PublicKeyAlgorithm::from_u8(cursor.read_u8()?);
        let count = algo.public_mpi_count().ok_or_else(|| {
            Error::FormatUnsupported(format!("public-key algorithm {algo:?}"))
        })?;
        let mpis = mpi::parse_n(cursor, count)?;

        let fingerprint = compute_fingerprint(version, creation_time, algo, &mpis);
        Ok(PublicKey {
            version,
            creation_time,
            algo,
            mpis,
            fingerprint,
        })
    }
}

/// SHA-1 over a canonical encoding of the public-key body (spec.md §4.D).
///
/// Reproduces the source's non-standard little-endian `creation_time`
/// byte order verbatim (Design Note 1); this does not match a standards-
/// compliant OpenPGP fingerprint, and is kept as documented rather than
/// "fixed".
pub(crate) fn compute_fingerprint(
    version: u8,
    creation_time: u32,
    algo: PublicKeyAlgorithm,
    mpis: &[Mpi],
) -> Fingerprint {
    let packet_size: u16 = (6_usize
        + mpis.iter().map(|m| m.byte_count() + 2).sum::<usize>())
        as u16;

    let mut ctx = Sha1CD::new();
    ctx.update([0x99]);
    ctx.update(packet_size.to_be_bytes());
    ctx.update([version]);
    ctx.update([
        (creation_time & 0xFF) as u8,
        ((creation_time >> 8) & 0xFF) as u8,
        ((creation_time >> 16) & 0xFF) as u8,
        ((creation_time >> 24) & 0xFF) as u8,
    ]);
    ctx.update([algo.to_u8()]);
    for m in mpis {
        ctx.update(m.as_wire());
    }
    let digest: [u8; 20] = ctx.finalize().into();
    Fingerprint(digest)
}
