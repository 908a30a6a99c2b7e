//! Packing of short byte chunks into integers.
//!
//! Every byte becomes two hex digits and the digit string is read back as one
//! base-16 number, i.e. big-endian packing. The decoded length comes from the
//! digit count of the number alone, so leading NUL bytes of a chunk do not
//! survive a round trip: `[0x00, 0x41]` encodes to `0x41` and decodes to `[0x41]`.

/// Widest chunk whose code still fits in a `u64`.
pub const MAX_CODE_BYTES: usize = 8;

/// # Panics
/// If `chunk` is longer than [`MAX_CODE_BYTES`].
pub fn encode(chunk: &[u8]) -> u64 {
    assert!(chunk.len() <= MAX_CODE_BYTES, "chunk of {} bytes does not fit a code", chunk.len());
    let code = chunk.iter().fold(0u64, |acc, &b| acc << 8 | b as u64);
    log::trace!("encode {:02X?} => {:0w$X} => {}", chunk, code, code, w = chunk.len() * 2);
    code
}

pub fn decode(code: u64) -> Vec<u8> {
    let digits = format!("{code:X}").len();
    let len = (digits + 1) / 2;
    let res = code.to_be_bytes()[MAX_CODE_BYTES - len..].to_vec();
    log::trace!("decode {} => {:0w$X} => {:02X?}", code, code, res, w = len * 2);
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_hex_packing() {
        assert_eq!(encode(b"Hi!!"), 0x48692121);
        assert_eq!(encode(b"A"), 0x41);
        assert_eq!(encode(b"AB"), 0x4142);
        assert_eq!(encode(&[0xff; 4]), 0xffff_ffff);
        assert_eq!(encode(&[]), 0);
    }

    #[test]
    fn test_round_trip_without_nul() {
        let samples: [&[u8]; 6] = [b"a", b"ab", b"abc", b"abcd", &[0xff, 0x01, 0x7f], &[0x01, 0x00, 0x00, 0x02]];
        for chunk in samples {
            assert_eq!(decode(encode(chunk)), chunk, "chunk {:x?}", chunk);
        }
    }

    #[test]
    fn test_trailing_nul_kept() {
        assert_eq!(encode(b"AB\0\0"), 0x41420000);
        assert_eq!(decode(0x41420000), b"AB\0\0");
    }

    #[test]
    fn test_leading_nul_dropped() {
        assert_eq!(encode(&[0x00, 0x41]), 0x41);
        assert_eq!(decode(encode(&[0x00, 0x41])), vec![0x41]);
        assert_eq!(decode(encode(&[0x00, 0x00, 0x00, 0x07])), vec![0x07]);
    }

    #[test]
    fn test_decode_length_from_digits() {
        assert_eq!(decode(0), vec![0]);
        assert_eq!(decode(0x141), vec![0x01, 0x41]);
        assert_eq!(decode(0x1_0000_0000), vec![0x01, 0, 0, 0, 0]);
    }
}
