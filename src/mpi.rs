//! The Multi-Precision Integer wire codec (spec.md §4.B / data model).
//!
//! On the wire an MPI is a 2-byte big-endian bit count followed by the
//! minimum number of big-endian bytes needed to hold that many bits. This
//! mirrors `sequoia-openpgp`'s `crypto::mpi::MPI`, trimmed to the one
//! representation this engine needs (no elliptic-curve point encoding).

use crate::cursor::Cursor;
use crate::{Error, Result};
use num_bigint_dig::BigUint;
use zeroize::Zeroizing;

/// A length-prefixed big-endian multi-precision integer.
///
/// `value` is zeroized on drop. Most MPIs hold public key material (`p`,
/// `g`, `y`) for which this buys nothing, but the same type also holds the
/// decrypted secret exponent `x` (see `packet::secret_key::SecretKey`),
/// and giving that one a separate non-zeroizing representation would mean
/// two `Mpi` types instead of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mpi {
    bit_count: u16,
    value: Zeroizing<Vec<u8>>,
}

impl Mpi {
    /// Builds an MPI from raw big-endian integer bytes, computing the
    /// canonical bit count (leading zero bytes are not part of the value).
    pub fn from_bytes(value: &[u8]) -> Self {
        let mut value = value.to_vec();
        while value.first() == Some(&0) && value.len() > 1 {
            value.remove(0);
        }
        let bit_count = bits_of(&value);
        Mpi {
            bit_count,
            value: Zeroizing::new(value),
        }
    }

    pub fn from_biguint(v: &BigUint) -> Self {
        Mpi::from_bytes(&v.to_bytes_be())
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.value)
    }

    /// Parses one MPI from the cursor (testable property 3: `byte_count ==
    /// (bit_count+7)/8` and the 2-byte prefix encodes `bit_count`).
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Self> {
        let prefix = cursor.advance(2)?;
        let bit_count = u16::from_be_bytes([prefix[0], prefix[1]]);
        let byte_count = (bit_count as usize + 7) / 8;
        let value = cursor.advance(byte_count)?.to_vec();
        Ok(Mpi {
            bit_count,
            value: Zeroizing::new(value),
        })
    }

    pub fn bit_count(&self) -> u16 {
        self.bit_count
    }

    pub fn byte_count(&self) -> usize {
        self.value.len()
    }

    /// The raw big-endian integer bytes, without the length prefix.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// The full on-wire encoding: the 2-byte length prefix followed by the
    /// value bytes. Used both for re-serializing a recovered session-key
    /// frame (4.G step 4) and for fingerprint hashing (4.D), which feeds
    /// each MPI's full on-wire bytes into the hash.
    pub fn as_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.value.len());
        out.extend_from_slice(&self.bit_count.to_be_bytes());
        out.extend_from_slice(&self.value);
        out
    }
}

fn bits_of(value: &[u8]) -> u16 {
    match value.first() {
        None => 0,
        Some(&0) => 0,
        Some(&first) => {
            let leading_byte_bits = 8 - first.leading_zeros() as u16;
            leading_byte_bits + 8 * (value.len() as u16 - 1)
        }
    }
}

/// Reads `count` consecutive MPIs, failing `IncompletePacket` is surfaced
/// by the cursor itself as `BufferOverflow` if the buffer runs out.
pub(crate) fn parse_n(cursor: &mut Cursor, count: usize) -> Result<Vec<Mpi>> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(Mpi::parse(cursor).map_err(|_| Error::IncompletePacket)?);
    }
    Ok(out)
}
