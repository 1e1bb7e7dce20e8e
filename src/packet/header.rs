//! The tag/length framing state machine (spec.md §4.C).

use crate::cursor::Cursor;
use crate::{Error, Result};

/// A packet's type, extracted from the tag byte (RFC 4880 §4.3), narrowed
/// to the six types this engine understands plus `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    PublicKeyEncryptedSessionKey,
    SecretKey,
    SecretSubkey,
    PublicKey,
    PublicSubkey,
    UserId,
    SymEncryptedIntegrityProtectedData,
    Unknown(u8),
}

impl Tag {
    fn from_u8(code: u8) -> Self {
        match code {
            1 => Tag::PublicKeyEncryptedSessionKey,
            5 => Tag::SecretKey,
            6 => Tag::PublicKey,
            7 => Tag::SecretSubkey,
            13 => Tag::UserId,
            14 => Tag::PublicSubkey,
            18 => Tag::SymEncryptedIntegrityProtectedData,
            other => Tag::Unknown(other),
        }
    }
}

/// A fully decoded packet header.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub raw_tag_byte: u8,
    pub is_new_format: bool,
    pub tag: Tag,
    pub header_length: usize,
    pub content_length: u32,
    pub is_partial: bool,
}

impl Header {
    /// Parses one header starting at the cursor's current position
    /// (positioned on a tag byte), leaving the cursor on the first content
    /// byte.
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Header> {
        let raw_tag_byte = cursor.read_u8()?;
        if raw_tag_byte & 0x80 == 0 {
            return Err(Error::InvalidHeader.into());
        }
        let is_new_format = raw_tag_byte & 0x40 != 0;

        let (tag_code, content_length, length_field_len, is_partial) = if is_new_format {
            let tag_code = raw_tag_byte & 0x1F;
            let (content_length, length_field_len, is_partial) =
                parse_new_format_length(cursor)?;
            (tag_code, content_length, length_field_len, is_partial)
        } else {
            let tag_code = (raw_tag_byte >> 2) & 0x0F;
            let (content_length, length_field_len) = match raw_tag_byte & 0x03 {
                0 => (cursor.read_u8()? as u32, 1),
                1 => {
                    let b = cursor.advance(2)?;
                    (u16::from_be_bytes([b[0], b[1]]) as u32, 2)
                }
                2 => {
                    let b = cursor.advance(4)?;
                    (u32::from_be_bytes([b[0], b[1], b[2], b[3]]), 4)
                }
                _ => {
                    return Err(Error::FormatUnsupported(
                        "indeterminate-length old-format packet".into(),
                    )
                    .into())
                }
            };
            (tag_code, content_length, length_field_len, false)
        };

        Ok(Header {
            raw_tag_byte,
            is_new_format,
            tag: Tag::from_u8(tag_code),
            // Total header length, tag byte included. See DESIGN.md for why
            // this differs from spec.md's literal "5" for the five-octet
            // new-format branch (testable property 1 requires the cursor to
            // land on `header_length` bytes past the packet start, which
            // only holds if the marker byte is counted).
            header_length: 1 + length_field_len,
            content_length,
            is_partial,
        })
    }
}

/// Decodes a new-format length field starting at the cursor's current
/// position. Returns `(content_length, length_field_bytes, is_partial)`;
/// `length_field_bytes` does not include the tag byte.
///
/// Also used directly by SEIPD parsing (4.H) to read each partial segment's
/// sub-header.
pub(crate) fn parse_new_format_length(cursor: &mut Cursor) -> Result<(u32, usize, bool)> {
    let b0 = cursor.read_u8()?;
    if b0 <= 191 {
        Ok((b0 as u32, 1, false))
    } else if b0 <= 223 {
        let b1 = cursor.read_u8()?;
        let len = ((b0 as u32 - 192) << 8) | (b1 as u32 + 192);
        Ok((len, 2, false))
    } else if b0 == 255 {
        let bytes = cursor.advance(4)?;
        let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Ok((len, 5, false))
    } else {
        let len = 1u32 << (b0 & 0x1F);
        Ok((len, 1, true))
    }
}
