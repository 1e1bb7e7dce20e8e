//! The Symmetrically Encrypted Integrity-Protected Data packet body, and
//! bulk decryption across partial-length segments (spec.md §4.D, §4.H).

use crate::crypto::symmetric;
use crate::cursor::Cursor;
use crate::packet::header::parse_new_format_length;
use crate::packet::Header;
use crate::types::SymmetricAlgorithm;
use crate::{Error, Result};

/// A SEIPD packet body. Ciphertext is copied out of the input buffer at
/// parse time, one entry per partial-length segment; decryption happens
/// later, once a session key is available (see `SPEC_FULL.md` §9 for why
/// this is a separate pass rather than happening inline).
#[derive(Debug, Clone)]
pub struct SeipData {
    pub version: u8,
    ciphertext: Vec<u8>,
    segments: Vec<usize>,
    plaintext: Option<Vec<u8>>,
}

impl SeipData {
    pub(crate) fn parse(cursor: &mut Cursor, header: &Header) -> Result<Self> {
        let version = cursor.read_u8()?;
        if version != 1 {
            return Err(Error::FormatUnsupported(format!("SEIPD version {version}")).into());
        }

        let mut ciphertext = Vec::new();
        let mut segments = Vec::new();
        let mut seglen = (header.content_length as usize)
            .checked_sub(1)
            .ok_or(Error::IncompletePacket)?;
        let mut is_partial = header.is_partial;

        loop {
            let bytes = cursor.advance(seglen)?;
            ciphertext.extend_from_slice(bytes);
            segments.push(seglen);
            if !is_partial {
                break;
            }
            let (next_len, _field_len, partial) = parse_new_format_length(cursor)?;
            seglen = next_len as usize;
            is_partial = partial;
        }

        Ok(SeipData {
            version,
            ciphertext,
            segments,
            plaintext: None,
        })
    }

    pub fn is_decrypted(&self) -> bool {
        self.plaintext.is_some()
    }

    /// The inner packet stream, available once `decrypt_with_session_key`
    /// has succeeded. Callers re-enter `decode_message` on this slice to
    /// parse the packets it embeds (testable scenario S5).
    pub fn decrypted_payload(&self) -> Option<&[u8]> {
        self.plaintext.as_deref()
    }

    /// Decrypts the ciphertext in place, one CFB cipher instance per
    /// recorded segment with an all-zero IV each time — intentionally
    /// reopening the cipher per segment, taken directly from the source's
    /// loop body (spec.md §4.H step 1 is inside the loop).
    pub(crate) fn decrypt_with_session_key(
        &mut self,
        sym_algo: SymmetricAlgorithm,
        key: &[u8],
    ) -> Result<()> {
        let blocksize = sym_algo
            .block_size()
            .ok_or_else(|| Error::FormatUnsupported(format!("{sym_algo:?} block size")))?;

        let mut plaintext = self.ciphertext.clone();
        let mut offset = 0;
        for &seglen in &self.segments {
            let zero_iv = vec![0u8; blocksize];
            symmetric::cfb_decrypt(sym_algo, key, &zero_iv, &mut plaintext[offset..offset + seglen])?;
            offset += seglen;
        }

        if plaintext.len() < blocksize + 2 {
            return Err(Error::DecryptFailed.into());
        }
        // The "random prefix + 2-byte repeat" quick integrity check.
        if plaintext[blocksize - 2..blocksize] != plaintext[blocksize..blocksize + 2] {
            return Err(Error::DecryptFailed.into());
        }

        self.plaintext = Some(plaintext[blocksize + 2..].to_vec());
        Ok(())
    }
}
