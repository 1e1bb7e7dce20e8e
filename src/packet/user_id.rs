//! The UserId packet body (spec.md §4.D).

use crate::cursor::Cursor;
use crate::packet::Header;
use crate::Result;

/// An opaque user-id byte sequence. By convention UTF-8, but the core does
/// not validate that — matching `original_source/src/packet.c`'s
/// `spgp_parse_userid_packet`, which copies the content verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId {
    data: Vec<u8>,
}

impl UserId {
    pub(crate) fn parse(cursor: &mut Cursor, header: &Header) -> Result<Self> {
        let data = cursor.advance(header.content_length as usize)?.to_vec();
        Ok(UserId { data })
    }

    /// The raw content bytes, without a trailing NUL.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}
