//! Encoding and decoding against an explicit code table.

use std::io::{Read, Write};

use log::{debug, info};

use crate::bit_vec::{Bits, PackedBits};
use crate::code_table::{CodeTable, CodeToSymbol, SymbolToCode};
use crate::compressed_data::{CompressedData, SymbolCodec};
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol};

/// Concatenates the code of every input symbol, in order.
pub fn encode<S: Symbol>(input: &[S], codes: &SymbolToCode<S>) -> Result<Bits> {
    let mut bits = Bits::new();
    for (position, symbol) in input.iter().enumerate() {
        match codes.get(symbol) {
            Some(code) => bits.extend_from_bitslice(code.as_bitslice()),
            None => {
                return Err(HuffmanError::MissingCode {
                    symbol: format!("{:?}", symbol),
                    position,
                })
            }
        }
    }
    Ok(bits)
}

/// Rebuilds the symbol sequence from a bit-string.
///
/// The candidate code grows one bit at a time from the current start offset
/// until it names a symbol; the prefix-free property means the first match is
/// the only one. A candidate longer than every known code can never match, so
/// the scan stops there rather than running to the end.
pub fn decode<S: Symbol>(bits: &Bits, inverse: &CodeToSymbol<S>) -> Result<Vec<S>> {
    let max_len = inverse.keys().map(|code| code.len()).max().unwrap_or(0);
    let mut output = Vec::new();
    let mut start = 0;

    for end in 1..=bits.len() {
        if let Some(symbol) = inverse.get(&bits[start..end]) {
            output.push(symbol.clone());
            start = end;
        } else if end - start >= max_len {
            return Err(HuffmanError::TruncatedOrInvalidInput {
                offset: start,
                pending: end - start,
            });
        }
    }

    if start < bits.len() {
        return Err(HuffmanError::TruncatedOrInvalidInput {
            offset: start,
            pending: bits.len() - start,
        });
    }
    Ok(output)
}

/// Compresses text into a bit-string plus the table needed to read it back.
/// Empty text yields an empty bit-string and an empty table.
pub fn compress(text: &str) -> Result<(Bits, CodeTable<char>)> {
    if text.is_empty() {
        return Ok((Bits::new(), CodeTable::default()));
    }
    let symbols: Vec<char> = text.chars().collect();
    let table = CodeTable::from_frequencies(&FrequencyTable::from_symbols(symbols.iter().copied()))?;
    let bits = encode(&symbols, table.encoder())?;
    debug!("compressed {} chars into {} bits", symbols.len(), bits.len());
    Ok((bits, table))
}

pub fn decompress(bits: &Bits, table: &CodeTable<char>) -> Result<String> {
    Ok(decode(bits, table.decoder())?.into_iter().collect())
}

/// A code table together with the frequencies it was built from.
#[derive(Debug, Clone)]
pub struct HuffmanCodec<S: Symbol> {
    frequencies: FrequencyTable<S>,
    table: CodeTable<S>,
}

impl<S: Symbol> HuffmanCodec<S> {
    pub fn new(frequencies: FrequencyTable<S>) -> Result<Self> {
        let table = CodeTable::from_frequencies(&frequencies)?;
        Ok(HuffmanCodec { frequencies, table })
    }

    pub fn from_symbols(input: &[S]) -> Result<Self> {
        HuffmanCodec::new(FrequencyTable::from_symbols(input.iter().cloned()))
    }

    pub fn table(&self) -> &CodeTable<S> {
        &self.table
    }

    pub fn frequencies(&self) -> &FrequencyTable<S> {
        &self.frequencies
    }

    pub fn encode(&self, input: &[S]) -> Result<Bits> {
        encode(input, self.table.encoder())
    }

    pub fn decode(&self, bits: &Bits) -> Result<Vec<S>> {
        decode(bits, self.table.decoder())
    }
}

impl<S: SymbolCodec> HuffmanCodec<S> {
    /// Encodes `input` and packs it with this codec's frequency table.
    /// `input` may be any sequence the table has codes for, not only the
    /// one the codec was built from.
    pub fn encode_to_container(&self, input: &[S]) -> Result<CompressedData<S>> {
        let bits = self.encode(input)?;
        Ok(CompressedData {
            original_length: input.len(),
            frequencies: self.frequencies.clone(),
            packed: PackedBits::pack(&bits),
        })
    }

    /// Builds a codec from an input and encodes that input into a container.
    /// Empty input produces an empty container.
    pub fn compress_symbols(input: &[S]) -> Result<CompressedData<S>> {
        if input.is_empty() {
            return Ok(CompressedData::default());
        }
        HuffmanCodec::from_symbols(input)?.encode_to_container(input)
    }

    /// Rebuilds the code table from the container's frequencies and decodes
    /// its payload.
    ///
    /// The stored table may describe more than the encoded input (see
    /// [`HuffmanCodec::encode_to_container`]), so only the decoded length is
    /// checked against the header.
    pub fn decode_container(compressed: &CompressedData<S>) -> Result<Vec<S>> {
        if compressed.frequencies.is_empty() {
            if compressed.packed.bit_count != 0 || compressed.original_length != 0 {
                return Err(HuffmanError::CorruptContainer(
                    "payload present without a frequency table".to_string(),
                ));
            }
            return Ok(Vec::new());
        }

        let codec = HuffmanCodec::new(compressed.frequencies.clone())?;
        let bits = compressed.packed.unpack()?;
        let decoded = codec.decode(&bits)?;

        if decoded.len() != compressed.original_length {
            return Err(HuffmanError::CorruptContainer(format!(
                "expected {} symbols, got {}",
                compressed.original_length,
                decoded.len()
            )));
        }
        Ok(decoded)
    }
}

impl HuffmanCodec<u8> {
    /// Reads all of `input`, compresses it and writes the container to `output`.
    pub fn encode_from_reader<R: Read, W: Write>(mut input: R, mut output: W) -> Result<CompressedData<u8>> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        let compressed = HuffmanCodec::compress_symbols(&data)?;
        let bytes = compressed.serialize()?;
        output.write_all(&bytes)?;
        output.flush()?;

        info!(
            "compressed {} bytes to {} bytes ({} payload bits, {} distinct symbols)",
            data.len(),
            bytes.len(),
            compressed.packed.bit_count,
            compressed.frequencies.len()
        );
        Ok(compressed)
    }

    /// Reads a container from `input` and writes the decompressed bytes to `output`.
    pub fn decode_from_reader<R: Read, W: Write>(mut input: R, mut output: W) -> Result<usize> {
        let compressed = CompressedData::<u8>::read_from(&mut input)?;
        let decoded = HuffmanCodec::decode_container(&compressed)?;
        output.write_all(&decoded)?;
        output.flush()?;

        info!("decompressed {} bytes", decoded.len());
        Ok(decoded.len())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;
    use crate::bit_vec::{format_bits, parse_bits};
    use assert_matches::assert_matches;
    use test_case::test_case;

    #[test]
    fn single_symbol_roundtrip() {
        let (bits, table) = compress("aaaa").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(format_bits(&bits), "0000");
        assert_eq!(decompress(&parse_bits("0000").unwrap(), &table).unwrap(), "aaaa");
    }

    #[test]
    fn aabbc_roundtrip() {
        let (bits, table) = compress("aabbc").unwrap();
        assert_eq!(format_bits(&bits), "11110010");
        assert_eq!(decompress(&bits, &table).unwrap(), "aabbc");
    }

    #[test]
    fn missing_code_is_reported() {
        let (_, table) = compress("aabbc").unwrap();
        let input: Vec<char> = "abz".chars().collect();
        assert_matches!(
            encode(&input, table.encoder()),
            Err(HuffmanError::MissingCode { ref symbol, position: 2 }) if symbol == "'z'"
        );
    }

    #[test_case("01", 1, 1; "trailing partial code")]
    #[test_case("1", 0, 1; "lone prefix")]
    #[test_case("0001", 3, 1; "valid codes then partial")]
    fn truncated_input_is_reported(bits: &str, offset: usize, pending: usize) {
        let (_, table) = compress("aabbc").unwrap();
        let result = decode(&parse_bits(bits).unwrap(), table.decoder());
        assert_matches!(
            result,
            Err(HuffmanError::TruncatedOrInvalidInput { offset: o, pending: p }) if o == offset && p == pending
        );
    }

    #[test]
    fn foreign_bits_fail_fast() {
        // Codes lengthened by a trailing 1 never line up with the stream.
        let (_, table) = compress("ab").unwrap();
        let (bits, _) = compress("aabbccdd").unwrap();
        let other: CodeToSymbol<char> = table
            .decoder()
            .iter()
            .map(|(code, symbol)| {
                let mut longer = code.clone();
                longer.push(true);
                (longer, *symbol)
            })
            .collect();
        assert_matches!(
            decode(&bits, &other),
            Err(HuffmanError::TruncatedOrInvalidInput { .. })
        );
    }

    #[test]
    fn empty_text_is_a_fixed_point() {
        let (bits, table) = compress("").unwrap();
        assert!(bits.is_empty());
        assert!(table.is_empty());
        assert_eq!(decompress(&bits, &table).unwrap(), "");
    }

    #[test]
    fn decoding_with_an_empty_table_fails() {
        let table = CodeTable::<char>::default();
        assert_matches!(
            decompress(&parse_bits("0").unwrap(), &table),
            Err(HuffmanError::TruncatedOrInvalidInput { offset: 0, pending: 1 })
        );
    }

    #[test]
    fn codec_over_bytes() {
        let data = b"abracadabra, abracadabra!".to_vec();
        let codec = HuffmanCodec::from_symbols(&data).unwrap();
        let bits = codec.encode(&data).unwrap();
        assert_eq!(bits.len(), codec.table().encoded_len(codec.frequencies()));
        assert!(bits.len() < data.len() * 8);
        assert_eq!(codec.decode(&bits).unwrap(), data);
    }

    #[test]
    fn reader_writer_roundtrip() {
        let original = b"It was the best of times, it was the worst of times.".to_vec();

        let mut compressed = Vec::new();
        HuffmanCodec::<u8>::encode_from_reader(Cursor::new(&original), &mut compressed).unwrap();

        let mut restored = Vec::new();
        let n = HuffmanCodec::<u8>::decode_from_reader(Cursor::new(&compressed), &mut restored).unwrap();

        assert_eq!(n, original.len());
        assert_eq!(restored, original);
    }

    #[test]
    fn container_with_a_wider_table_roundtrips() {
        let codec = HuffmanCodec::from_symbols(b"abracadabra").unwrap();
        let compressed = codec.encode_to_container(b"abba").unwrap();
        assert_eq!(compressed.original_length, 4);
        assert_eq!(compressed.frequencies.total(), 11);

        let bytes = compressed.serialize().unwrap();
        let restored = CompressedData::<u8>::deserialize(&bytes).unwrap();
        assert_eq!(HuffmanCodec::decode_container(&restored).unwrap(), b"abba".to_vec());
    }

    #[test]
    fn empty_table_with_a_length_is_rejected() {
        let compressed = CompressedData::<u8> {
            original_length: 3,
            ..CompressedData::default()
        };
        assert_matches!(
            HuffmanCodec::decode_container(&compressed),
            Err(HuffmanError::CorruptContainer(_))
        );
    }

    #[test]
    fn container_length_mismatch_is_rejected() {
        let data = b"hello world".to_vec();
        let mut compressed = HuffmanCodec::compress_symbols(&data).unwrap();
        compressed.original_length += 1;
        assert_matches!(
            HuffmanCodec::decode_container(&compressed),
            Err(HuffmanError::CorruptContainer(_))
        );
    }
}
