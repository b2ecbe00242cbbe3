//! Bit-strings: the `0`/`1` text form and byte packing.

use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};

/// A bit-string, most significant bit first within each backing byte.
pub type Bits = BitVec<u8, Msb0>;

/// Parses a textual bit-string made of `'0'` and `'1'` markers.
pub fn parse_bits(text: &str) -> Result<Bits> {
    let mut bits = Bits::with_capacity(text.len());
    for (offset, marker) in text.chars().enumerate() {
        match marker {
            '0' => bits.push(false),
            '1' => bits.push(true),
            _ => return Err(HuffmanError::InvalidBitMarker { marker, offset }),
        }
    }
    Ok(bits)
}

pub fn format_bits(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter().map(|bit| if *bit { '1' } else { '0' }).collect()
}

/// A bit-string packed eight bits per byte. The final byte is zero padded;
/// `bit_count` says how many of the bits are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBits {
    pub bit_count: usize,
    pub bytes: Vec<u8>,
}

impl PackedBits {
    pub fn pack(bits: &Bits) -> Self {
        let mut owned = bits.clone();
        // Padding bits past `len` are unspecified in bitvec; clear them.
        owned.set_uninitialized(false);
        PackedBits {
            bit_count: bits.len(),
            bytes: owned.into_vec(),
        }
    }

    pub fn unpack(&self) -> Result<Bits> {
        let needed = self.bit_count.div_ceil(8);
        if self.bytes.len() < needed {
            return Err(HuffmanError::CorruptContainer(format!(
                "{} bits need {} bytes, found {}",
                self.bit_count,
                needed,
                self.bytes.len()
            )));
        }
        let mut bits = Bits::from_slice(&self.bytes[..needed]);
        bits.truncate(self.bit_count);
        Ok(bits)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&Bits> for PackedBits {
    fn from(bits: &Bits) -> Self {
        PackedBits::pack(bits)
    }
}

impl From<(usize, Vec<u8>)> for PackedBits {
    fn from((bit_count, bytes): (usize, Vec<u8>)) -> Self {
        PackedBits { bit_count, bytes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    #[test_case(""; "empty")]
    #[test_case("0"; "single zero")]
    #[test_case("1011"; "partial byte")]
    #[test_case("10110011"; "exact byte")]
    #[test_case("1011001110"; "byte plus two")]
    fn text_form_survives_parse_and_format(text: &str) {
        let bits = parse_bits(text).unwrap();
        assert_eq!(bits.len(), text.len());
        assert_eq!(format_bits(&bits), text);
    }

    #[test]
    fn rejects_foreign_markers() {
        assert_matches!(
            parse_bits("01x1"),
            Err(HuffmanError::InvalidBitMarker { marker: 'x', offset: 2 })
        );
    }

    #[test]
    fn packs_msb_first_with_zero_padding() {
        let bits = parse_bits("1011001110").unwrap();
        let packed = PackedBits::pack(&bits);
        assert_eq!(packed.bit_count, 10);
        assert_eq!(packed.as_bytes(), &[0b1011_0011, 0b1000_0000]);
        assert_eq!(packed.unpack().unwrap(), bits);
    }

    #[test]
    fn unpack_rejects_short_buffers() {
        let packed = PackedBits::from((17, vec![0xFF, 0x00]));
        assert_matches!(packed.unpack(), Err(HuffmanError::CorruptContainer(_)));
    }

    #[test]
    fn unpack_ignores_trailing_padding() {
        let packed = PackedBits::from((3, vec![0b1110_0000, 0xAA]));
        assert_eq!(format_bits(&packed.unpack().unwrap()), "111");
    }
}
