//! The top-level engine: structural decoding plus the three explicit
//! cryptographic passes that replace the source's single eager pass
//! (spec.md §4.I, §9, `SPEC_FULL.md` §9).

use crate::cursor::Cursor;
use crate::keychain::KeyChainSource;
use crate::packet::header::Header;
use crate::packet::public_key::PublicKey;
use crate::packet::secret_key::SecretKey;
use crate::packet::seip::SeipData;
use crate::packet::session::Session;
use crate::packet::user_id::UserId;
use crate::packet::{Body, Packet, PacketChain, Tag};
use crate::types::SymmetricAlgorithm;
use crate::{Error, Result};

/// Structurally parses a byte buffer into a chain of packets (spec.md
/// §4.I). Unknown packet tags are logged and skipped rather than treated
/// as fatal (step 3); a stray `0x00` padding byte between packets is
/// likewise skipped.
///
/// This performs no cryptography: secret keys are left locked, session
/// packets unresolved, and SEIPD payloads encrypted. Call
/// `decrypt_all_secret_keys`, `recover_session_keys`, and
/// `decrypt_seipd_packets` afterward as needed.
pub fn decode_message(bytes: &[u8]) -> Result<PacketChain> {
    let mut cursor = Cursor::new(bytes);
    let mut packets = Vec::new();

    while !cursor.is_at_end() {
        if cursor.at(0)? == 0x00 {
            cursor.advance(1)?;
            continue;
        }

        let header = Header::parse(&mut cursor)?;

        if header.tag == Tag::SymEncryptedIntegrityProtectedData {
            let body = Body::SeipData(SeipData::parse(&mut cursor, &header)?);
            packets.push(Packet { header, body });
            continue;
        }

        if let Tag::Unknown(code) = header.tag {
            log::warn!("skipping unknown packet tag {code}");
            cursor.advance(header.content_length as usize)?;
            packets.push(Packet {
                header,
                body: Body::Unknown(code),
            });
            continue;
        }

        let content = cursor.advance(header.content_length as usize)?;
        let mut body_cursor = Cursor::new(content);
        let body = match header.tag {
            Tag::UserId => Body::UserId(UserId::parse(&mut body_cursor, &header)?),
            Tag::PublicKey | Tag::PublicSubkey => {
                Body::Public(PublicKey::parse(&mut body_cursor)?)
            }
            Tag::SecretKey | Tag::SecretSubkey => {
                Body::Secret(SecretKey::parse(&mut body_cursor, &header)?)
            }
            Tag::PublicKeyEncryptedSessionKey => Body::Session(Session::parse(&mut body_cursor)?),
            Tag::SymEncryptedIntegrityProtectedData | Tag::Unknown(_) => {
                unreachable!("handled above")
            }
        };
        packets.push(Packet { header, body });
    }

    Ok(PacketChain::new(packets))
}

/// Decrypts every secret-key packet in `chain` with `passphrase` (spec.md
/// §4.F). Already-decrypted packets are left alone.
pub fn decrypt_all_secret_keys(chain: &mut PacketChain, passphrase: &[u8]) -> Result<()> {
    for packet in chain.iter_mut() {
        if let Body::Secret(secret) = &mut packet.body {
            secret.decrypt(passphrase)?;
        }
    }
    Ok(())
}

/// Attempts to recover the session key for every unresolved session
/// packet in `chain`, matching each against a decrypted secret key found
/// anywhere in `keychain` by key id (spec.md §4.G).
///
/// A session packet with no matching decrypted secret key is left
/// unresolved rather than treated as an error — a message can carry
/// session packets addressed to recipients other than the caller.
pub fn recover_session_keys(chain: &mut PacketChain, keychain: &dyn KeyChainSource) -> Result<()> {
    use std::collections::HashMap;

    let mut secrets: HashMap<[u8; 8], SecretKey> = HashMap::new();
    for source_chain in keychain.chains() {
        for packet in source_chain.iter() {
            if let Body::Secret(secret) = &packet.body {
                if secret.is_decrypted {
                    secrets.insert(secret.public.fingerprint.key_id(), secret.clone());
                }
            }
        }
    }

    for packet in chain.iter_mut() {
        if let Body::Session(session) = &mut packet.body {
            if session.is_resolved() {
                continue;
            }
            if let Some(secret) = secrets.get(&session.key_id) {
                session.recover_with(secret)?;
            }
        }
    }
    Ok(())
}

/// Decrypts every SEIPD packet in `chain` using the session key resolved
/// by the nearest preceding session packet (spec.md §4.H).
pub fn decrypt_seipd_packets(chain: &mut PacketChain) -> Result<()> {
    let mut pending_key: Option<(SymmetricAlgorithm, zeroize::Zeroizing<Vec<u8>>)> = None;

    for packet in chain.iter_mut() {
        match &mut packet.body {
            Body::Session(session) => {
                if session.is_resolved() {
                    pending_key = Some((
                        session.sym_algo.expect("resolved session has a sym algo"),
                        session.key.clone().expect("resolved session has a key"),
                    ));
                }
            }
            Body::SeipData(seip) => {
                if !seip.is_decrypted() {
                    let (algo, key) = pending_key.as_ref().ok_or(Error::DecryptFailed)?;
                    seip.decrypt_with_session_key(*algo, key)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
