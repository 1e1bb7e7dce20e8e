//! The cryptographic primitives this engine composes: SHA-1 (via
//! `sha1collisiondetection`), CFB-mode symmetric ciphers (via the
//! RustCrypto block-cipher crates), and raw Elgamal decryption (via
//! `num-bigint-dig`).
//!
//! `sequoia-openpgp` abstracts these behind a pluggable multi-backend
//! `crypto::backend::Backend` trait (nettle/openssl/botan/RustCrypto,
//! selected by Cargo feature). This engine's cryptographic surface is much
//! narrower — one hash, eight symmetric ciphers, one asymmetric algorithm —
//! so this crate implements a single, concrete module instead of
//! reproducing that abstraction; see DESIGN.md.

pub(crate) mod elgamal;
pub(crate) mod s2k;
pub(crate) mod symmetric;
