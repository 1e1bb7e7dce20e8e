//! The explicit keychain abstraction used for session-key recovery
//! (spec.md §6), replacing the source's global `is_valid`/`iter_start`/
//! `iter_next`/`iter_end` collaborator with an ordinary trait over owned
//! packet chains passed in by the caller.

use crate::packet::PacketChain;

/// A source of packet chains to search for secret keys when recovering
/// session keys. Implementations typically hold the parsed, already
/// `decrypt_all_secret_keys`-processed contents of one or more keyring
/// files.
pub trait KeyChainSource {
    fn chains(&self) -> Box<dyn Iterator<Item = &PacketChain> + '_>;
}

/// The simplest `KeyChainSource`: an owned list of packet chains.
#[derive(Debug, Clone, Default)]
pub struct VecKeyChain(Vec<PacketChain>);

impl VecKeyChain {
    pub fn new() -> Self {
        VecKeyChain(Vec::new())
    }

    pub fn push(&mut self, chain: PacketChain) {
        self.0.push(chain);
    }
}

impl FromIterator<PacketChain> for VecKeyChain {
    fn from_iter<T: IntoIterator<Item = PacketChain>>(iter: T) -> Self {
        VecKeyChain(iter.into_iter().collect())
    }
}

impl KeyChainSource for VecKeyChain {
    fn chains(&self) -> Box<dyn Iterator<Item = &PacketChain> + '_> {
        Box::new(self.0.iter())
    }
}
