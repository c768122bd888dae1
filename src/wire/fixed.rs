//! Fixed-width little-endian lanes.
//!
//! fixed32/sfixed32/float occupy exactly four bytes, fixed64/sfixed64/double
//! exactly eight. Floats travel as their raw IEEE-754 bit patterns; the bit
//! reinterpretation happens at the value layer, not here.

use byteorder::{ByteOrder, LittleEndian};

use super::{WireError, WireResult};

/// Appends `value` as four little-endian bytes.
pub fn encode_fixed32(value: u32, out: &mut Vec<u8>) {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Appends `value` as eight little-endian bytes.
pub fn encode_fixed64(value: u64, out: &mut Vec<u8>) {
    let mut buf = [0u8; 8];
    LittleEndian::write_u64(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Reads four little-endian bytes from the front of `input`.
///
/// `base` is the absolute stream offset of `input[0]`, carried into errors.
pub(crate) fn decode_fixed32(input: &[u8], base: usize) -> WireResult<u32> {
    if input.len() < 4 {
        return Err(WireError::TruncatedInput {
            offset: base + input.len(),
        });
    }
    Ok(LittleEndian::read_u32(&input[..4]))
}

/// Reads eight little-endian bytes from the front of `input`.
pub(crate) fn decode_fixed64(input: &[u8], base: usize) -> WireResult<u64> {
    if input.len() < 8 {
        return Err(WireError::TruncatedInput {
            offset: base + input.len(),
        });
    }
    Ok(LittleEndian::read_u64(&input[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed32_layout() {
        let mut buf = Vec::new();
        encode_fixed32(0x1234_5678, &mut buf);
        assert_eq!(buf, [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(decode_fixed32(&buf, 0).unwrap(), 0x1234_5678);
    }

    #[test]
    fn fixed64_layout() {
        let mut buf = Vec::new();
        encode_fixed64(0x0102_0304_0506_0708, &mut buf);
        assert_eq!(buf, [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(decode_fixed64(&buf, 0).unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn truncated_reads_report_end_offset() {
        assert_eq!(
            decode_fixed32(&[0x01, 0x02], 10).unwrap_err(),
            WireError::TruncatedInput { offset: 12 }
        );
        assert_eq!(
            decode_fixed64(&[0u8; 7], 0).unwrap_err(),
            WireError::TruncatedInput { offset: 7 }
        );
    }

    #[test]
    fn float_bits_survive_transport() {
        let mut buf = Vec::new();
        encode_fixed32(11.1f32.to_bits(), &mut buf);
        let back = f32::from_bits(decode_fixed32(&buf, 0).unwrap());
        assert_eq!(back, 11.1f32);
    }
}
