//! OpenPGP packet decoding and cryptographic processing engine.
//!
//! This crate decodes RFC 4880–style packet streams (transferable key
//! packages and symmetrically encrypted integrity-protected data) into a
//! [`PacketChain`], decrypts secret-key material given a passphrase,
//! recovers session keys from public-key-encrypted session packets, and
//! decrypts the bulk SEIPD payload those session keys protect.
//!
//! Armor, I/O, signature verification, key generation and compression are
//! out of scope; this crate works on an in-memory byte buffer and returns
//! an in-memory packet chain.

mod cursor;
pub mod fmt;
pub mod types;
pub mod mpi;
pub mod packet;
pub mod crypto;
mod parse;
mod keychain;

pub use fmt::{hex_decode, hex_encode};
pub use mpi::Mpi;
pub use packet::{Body, Header, Packet, PacketChain, Tag};
pub use packet::public_key::PublicKey;
pub use packet::secret_key::SecretKey;
pub use packet::session::Session;
pub use packet::seip::SeipData;
pub use packet::user_id::UserId;
pub use keychain::{KeyChainSource, VecKeyChain};
pub use parse::{decode_message, decrypt_all_secret_keys, recover_session_keys,
                 decrypt_seipd_packets};

/// The crate's result type; errors are [`anyhow::Error`] wrapping an
/// [`Error`] variant, downcastable at call sites that need the
/// discriminant rather than just the message.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// The flat error taxonomy this engine reports.
///
/// Every failure at any depth unwinds to the nearest operation boundary
/// (`decode_message`, `decrypt_all_secret_keys`, `recover_session_keys`,
/// `decrypt_seipd_packets`); nothing is recovered locally except an
/// unsupported packet type, which is skipped and logged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A caller passed an empty buffer or otherwise malformed arguments.
    #[error("invalid arguments")]
    InvalidArgs,
    /// An allocation could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// A packet header failed a structural invariant (e.g. bit 7 unset).
    #[error("invalid packet header")]
    InvalidHeader,
    /// A value is outside what this engine implements (algorithm, version,
    /// length form, ...).
    #[error("unsupported format: {0}")]
    FormatUnsupported(String),
    /// A read would have run past the end of the buffer.
    #[error("buffer overflow")]
    BufferOverflow,
    /// The underlying cryptographic primitive reported a failure.
    #[error("cryptographic library error: {0}")]
    CryptoLibraryError(String),
    /// A packet's declared length promises bytes the buffer does not have.
    #[error("incomplete packet")]
    IncompletePacket,
    /// A decryption or integrity check failed.
    #[error("decryption failed")]
    DecryptFailed,
    /// The keychain collaborator could not satisfy a lookup.
    #[error("keychain error")]
    KeychainError,
    /// Anything else.
    #[error("{0}")]
    Generic(String),
}
