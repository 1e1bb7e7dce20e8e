//! Raw Elgamal decryption for session-key recovery (spec.md §4.G).
//!
//! There is no dedicated Elgamal crate in the RustCrypto ecosystem, so this
//! performs the modular exponentiation directly with `num-bigint-dig`,
//! which the teacher already depends on for its own MPI/big-integer
//! handling (`crypto/mpi.rs`).

use crate::{Error, Result};
use num_bigint_dig::{BigUint, ModInverse};

/// Decrypts an Elgamal ciphertext `(a, b)` under private key `x` (with
/// public parameters `p`), returning the recovered message integer `m`.
///
/// `m = b * (a^x mod p)^-1 mod p`.
pub(crate) fn decrypt(p: &BigUint, x: &BigUint, a: &BigUint, b: &BigUint) -> Result<BigUint> {
    let s = a.modpow(x, p);
    let s_inv = s
        .mod_inverse(p)
        .ok_or_else(|| Error::CryptoLibraryError("elgamal: s has no inverse mod p".into()))?;
    // `ModInverse` on `BigUint` returns a `BigInt`; the result is taken mod
    // p, which is always non-negative here because `p` is positive.
    let s_inv = s_inv
        .to_biguint()
        .ok_or_else(|| Error::CryptoLibraryError("elgamal: negative modular inverse".into()))?;
    Ok((b * s_inv) % p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_example() {
        // A toy Elgamal group: p=467 (prime), g=2, x=127 (private),
        // y = g^x mod p (public).
        let p = BigUint::from(467u32);
        let g = BigUint::from(2u32);
        let x = BigUint::from(127u32);
        let y = g.modpow(&x, &p);

        // Encrypt m=7 with ephemeral k=5: a = g^k mod p, b = m * y^k mod p.
        let k = BigUint::from(5u32);
        let m = BigUint::from(7u32);
        let a = g.modpow(&k, &p);
        let b = (&m * y.modpow(&k, &p)) % &p;

        let recovered = decrypt(&p, &x, &a, &b).unwrap();
        assert_eq!(recovered, m);
    }
}
