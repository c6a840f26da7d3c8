use crate::error::{ParseErrorKind, Result, SapError};

/// Number of fixed header bytes (flags, auth length, message id hash).
pub const HEADER_LEN: usize = 4;

/// Bytes occupied by an IPv4 originating source address.
pub const ORIGIN_LEN: usize = 4;

/// SAP fixed header (RFC 2974 §3).
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | V=1 |A|R|T|E|C|   auth len    |         msg id hash           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |              originating source (32 or 128 bits)              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                optional authentication data                   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |              optional payload type (NUL terminated)           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            payload                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Decoding never rejects a header on its flag values. Whether a version,
/// encryption or compression setting is acceptable is decided by
/// [`parse_packet`](super::packet::parse_packet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SapHeader {
    /// Protocol version (3 bits). Only 1 is in use.
    pub version: u8,
    /// A bit: 0 = IPv4 origin, 1 = IPv6 origin.
    pub address_type: u8,
    /// T bit: 0 = announcement, 1 = deletion.
    pub message_type: u8,
    /// E bit.
    pub encrypted: bool,
    /// C bit.
    pub compressed: bool,
    /// Length of the authentication data in 32-bit words.
    pub auth_len: u8,
    /// Message identifier hash, used by announcers to version a session.
    pub msg_id_hash: u16,
}

impl SapHeader {
    /// Decode the fixed header from the start of `data`.
    ///
    /// Returns the header and the offset where the payload begins:
    /// 4 header bytes, 4 origin bytes, then `auth_len * 4` bytes of
    /// authentication data. The origin is always counted as IPv4 width.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < HEADER_LEN {
            return Err(SapError::parse(ParseErrorKind::TooShort(data.len())));
        }

        let flags = data[0];
        let header = SapHeader {
            version: (flags & 0xE0) >> 5,
            address_type: (flags & 0x10) >> 4,
            message_type: (flags & 0x04) >> 2,
            encrypted: flags & 0x02 != 0,
            compressed: flags & 0x01 != 0,
            auth_len: data[1],
            msg_id_hash: u16::from_be_bytes([data[2], data[3]]),
        };

        Ok((header, header.payload_offset()))
    }

    /// Offset of the payload (or MIME type token) within the datagram.
    pub fn payload_offset(&self) -> usize {
        HEADER_LEN + ORIGIN_LEN + self.auth_len as usize * 4
    }

    pub fn is_deletion(&self) -> bool {
        self.message_type == 1
    }

    pub fn is_ipv6(&self) -> bool {
        self.address_type == 1
    }

    /// Serialize the 4 fixed header bytes. The reserved bit is always 0.
    pub fn write(&self) -> [u8; HEADER_LEN] {
        let flags = ((self.version & 0x07) << 5)
            | ((self.address_type & 0x01) << 4)
            | ((self.message_type & 0x01) << 2)
            | ((self.encrypted as u8) << 1)
            | self.compressed as u8;

        let hash = self.msg_id_hash.to_be_bytes();
        [flags, self.auth_len, hash[0], hash[1]]
    }
}

impl Default for SapHeader {
    /// A plain IPv4 announcement: version 1, no auth, no encryption.
    fn default() -> Self {
        Self {
            version: 1,
            address_type: 0,
            message_type: 0,
            encrypted: false,
            compressed: false,
            auth_len: 0,
            msg_id_hash: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short() {
        for len in 0..HEADER_LEN {
            let err = SapHeader::decode(&vec![0x20; len]).unwrap_err();
            assert!(matches!(
                err,
                SapError::Parse {
                    kind: ParseErrorKind::TooShort(n)
                } if n == len
            ));
        }
    }

    #[test]
    fn decodes_flag_bits() {
        // V=1, A=1, R=1, T=1, E=0, C=1
        let (h, _) = SapHeader::decode(&[0b0011_1101, 0, 0, 0]).unwrap();
        assert_eq!(h.version, 1);
        assert!(h.is_ipv6());
        assert!(h.is_deletion());
        assert!(!h.encrypted);
        assert!(h.compressed);

        let (h, _) = SapHeader::decode(&[0b1110_0010, 0, 0, 0]).unwrap();
        assert_eq!(h.version, 7);
        assert_eq!(h.address_type, 0);
        assert_eq!(h.message_type, 0);
        assert!(h.encrypted);
        assert!(!h.compressed);
    }

    #[test]
    fn msg_id_hash_is_big_endian() {
        let (h, _) = SapHeader::decode(&[0x20, 0, 0xAB, 0xCD]).unwrap();
        assert_eq!(h.msg_id_hash, 0xABCD);
    }

    #[test]
    fn payload_offset_counts_auth_words() {
        let (_, offset) = SapHeader::decode(&[0x20, 0, 0, 0]).unwrap();
        assert_eq!(offset, 8);

        let (h, offset) = SapHeader::decode(&[0x20, 3, 0, 0]).unwrap();
        assert_eq!(h.auth_len, 3);
        assert_eq!(offset, 20);

        let (_, offset) = SapHeader::decode(&[0x20, 255, 0, 0]).unwrap();
        assert_eq!(offset, 8 + 255 * 4);
    }

    #[test]
    fn write_matches_decode() {
        let header = SapHeader {
            message_type: 1,
            auth_len: 2,
            msg_id_hash: 0x1234,
            ..SapHeader::default()
        };
        let bytes = header.write();
        assert_eq!(bytes, [0x24, 2, 0x12, 0x34]);

        let (decoded, _) = SapHeader::decode(&bytes).unwrap();
        assert_eq!(decoded, header);
    }
}
