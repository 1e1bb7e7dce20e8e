//! The closed algorithm tables this engine understands (spec.md §6).

/// A symmetric cipher algorithm, as used for secret-key and SEIPD
/// decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymmetricAlgorithm {
    Idea,
    TripleDes,
    Cast5,
    Blowfish,
    Aes128,
    Aes192,
    Aes256,
    Twofish,
    Unknown(u8),
}

impl SymmetricAlgorithm {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => SymmetricAlgorithm::Idea,
            2 => SymmetricAlgorithm::TripleDes,
            3 => SymmetricAlgorithm::Cast5,
            4 => SymmetricAlgorithm::Blowfish,
            7 => SymmetricAlgorithm::Aes128,
            8 => SymmetricAlgorithm::Aes192,
            9 => SymmetricAlgorithm::Aes256,
            10 => SymmetricAlgorithm::Twofish,
            other => SymmetricAlgorithm::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            SymmetricAlgorithm::Idea => 1,
            SymmetricAlgorithm::TripleDes => 2,
            SymmetricAlgorithm::Cast5 => 3,
            SymmetricAlgorithm::Blowfish => 4,
            SymmetricAlgorithm::Aes128 => 7,
            SymmetricAlgorithm::Aes192 => 8,
            SymmetricAlgorithm::Aes256 => 9,
            SymmetricAlgorithm::Twofish => 10,
            SymmetricAlgorithm::Unknown(v) => v,
        }
    }

    /// Key length in bytes, for the algorithms this engine can derive an
    /// S2K key for (3DES and CAST5; see `crypto::s2k`).
    pub fn key_length(self) -> Option<usize> {
        match self {
            SymmetricAlgorithm::Idea => Some(16),
            SymmetricAlgorithm::TripleDes => Some(24),
            SymmetricAlgorithm::Cast5 => Some(16),
            SymmetricAlgorithm::Blowfish => Some(16),
            SymmetricAlgorithm::Aes128 => Some(16),
            SymmetricAlgorithm::Aes192 => Some(24),
            SymmetricAlgorithm::Aes256 => Some(32),
            SymmetricAlgorithm::Twofish => Some(32),
            SymmetricAlgorithm::Unknown(_) => None,
        }
    }

    /// Block size in bytes; also the CFB IV length for this algorithm.
    pub fn block_size(self) -> Option<usize> {
        match self {
            SymmetricAlgorithm::Idea
            | SymmetricAlgorithm::TripleDes
            | SymmetricAlgorithm::Cast5
            | SymmetricAlgorithm::Blowfish => Some(8),
            SymmetricAlgorithm::Aes128
            | SymmetricAlgorithm::Aes192
            | SymmetricAlgorithm::Aes256
            | SymmetricAlgorithm::Twofish => Some(16),
            SymmetricAlgorithm::Unknown(_) => None,
        }
    }
}

/// A public-key (asymmetric) algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKeyAlgorithm {
    Elgamal,
    Dsa,
    Unknown(u8),
}

impl PublicKeyAlgorithm {
    pub fn from_u8(v: u8) -> Self {
        match v {
            16 => PublicKeyAlgorithm::Elgamal,
            17 => PublicKeyAlgorithm::Dsa,
            other => PublicKeyAlgorithm::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            PublicKeyAlgorithm::Elgamal => 16,
            PublicKeyAlgorithm::Dsa => 17,
            PublicKeyAlgorithm::Unknown(v) => v,
        }
    }

    /// Number of public MPIs this algorithm's public key carries.
    pub fn public_mpi_count(self) -> Option<usize> {
        match self {
            PublicKeyAlgorithm::Dsa => Some(4),     // p, q, g, y
            PublicKeyAlgorithm::Elgamal => Some(3), // p, g, y
            PublicKeyAlgorithm::Unknown(_) => None,
        }
    }
}

/// A hash algorithm. This engine only ever implements SHA-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Unknown(u8),
}

impl HashAlgorithm {
    pub fn from_u8(v: u8) -> Self {
        match v {
            2 => HashAlgorithm::Sha1,
            other => HashAlgorithm::Unknown(other),
        }
    }

    pub fn is_supported(self) -> bool {
        matches!(self, HashAlgorithm::Sha1)
    }
}

/// The S2K "specifier" byte (distinct from the secret-key packet's
/// `s2k_type`, see `packet::secret_key`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S2kSpecifier {
    Salted,
    IteratedSalted,
    Unknown(u8),
}

impl S2kSpecifier {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => S2kSpecifier::Salted,
            3 => S2kSpecifier::IteratedSalted,
            other => S2kSpecifier::Unknown(other),
        }
    }
}
