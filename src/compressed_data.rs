//! The self-describing container: frequency table plus packed payload.

use std::io::{self, Cursor, Read, Write};

use crate::bit_vec::PackedBits;
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol};
use crate::metadata::{self, ContainerHeader, KIND_BYTE, KIND_CHAR};

/// A symbol type the container knows how to store.
pub trait SymbolCodec: Symbol {
    const KIND: u8;

    fn write_symbol<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    fn read_symbol<R: Read>(reader: &mut R) -> Result<Self>;
}

impl SymbolCodec for u8 {
    const KIND: u8 = KIND_BYTE;

    fn write_symbol<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[*self])
    }

    fn read_symbol<R: Read>(reader: &mut R) -> Result<Self> {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}

impl SymbolCodec for char {
    const KIND: u8 = KIND_CHAR;

    fn write_symbol<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        metadata::write_u32(writer, *self as u32)
    }

    fn read_symbol<R: Read>(reader: &mut R) -> Result<Self> {
        let scalar = metadata::read_u32(reader)?;
        char::from_u32(scalar)
            .ok_or_else(|| HuffmanError::CorruptContainer(format!("{:#x} is not a unicode scalar value", scalar)))
    }
}

/// A packed bit-string with the frequency table its code was built from.
///
/// Layout: fixed header, then `entry_count` × (symbol, u64
/// count), then a u64 payload length and the payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData<S: SymbolCodec> {
    pub original_length: usize,
    pub frequencies: FrequencyTable<S>,
    pub packed: PackedBits,
}

impl<S: SymbolCodec> Default for CompressedData<S> {
    fn default() -> Self {
        CompressedData {
            original_length: 0,
            frequencies: FrequencyTable::default(),
            packed: PackedBits::default(),
        }
    }
}

impl<S: SymbolCodec> CompressedData<S> {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let entry_count = u32::try_from(self.frequencies.len()).map_err(|_| {
            HuffmanError::CorruptContainer(format!("{} distinct symbols is too many", self.frequencies.len()))
        })?;

        let header = ContainerHeader {
            symbol_kind: S::KIND,
            original_length: self.original_length,
            bit_count: self.packed.bit_count,
            entry_count: entry_count as usize,
        };
        metadata::write_header(writer, &header)?;

        for (symbol, count) in self.frequencies.iter() {
            symbol.write_symbol(writer)?;
            metadata::write_u64(writer, count as u64)?;
        }

        metadata::write_u64(writer, self.packed.bytes.len() as u64)?;
        writer.write_all(&self.packed.bytes)?;
        Ok(())
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let data = Self::read_from(&mut cursor)?;
        if (cursor.position() as usize) != bytes.len() {
            return Err(HuffmanError::CorruptContainer(format!(
                "{} trailing bytes after payload",
                bytes.len() - cursor.position() as usize
            )));
        }
        Ok(data)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let header = metadata::read_header(reader)?;
        if header.symbol_kind != S::KIND {
            return Err(HuffmanError::CorruptContainer(format!(
                "symbol kind {} does not match expected {}",
                header.symbol_kind,
                S::KIND
            )));
        }

        let mut counts = Vec::new();
        let mut total = 0usize;
        for _ in 0..header.entry_count {
            let symbol = S::read_symbol(reader)?;
            let count = metadata::read_len(reader)?;
            total = total.checked_add(count).ok_or_else(|| {
                HuffmanError::CorruptContainer("frequency counts overflow".to_string())
            })?;
            counts.push((symbol, count));
        }
        let frequencies = FrequencyTable::from_counts(counts);
        if frequencies.len() != header.entry_count {
            return Err(HuffmanError::CorruptContainer(
                "frequency table has zero or duplicate entries".to_string(),
            ));
        }

        // Read through `take` so a corrupt length cannot force a huge allocation.
        let data_len = metadata::read_len(reader)?;
        let mut payload = Vec::new();
        reader.by_ref().take(data_len as u64).read_to_end(&mut payload)?;
        if payload.len() != data_len {
            return Err(HuffmanError::CorruptContainer(format!(
                "payload truncated: expected {} bytes, found {}",
                data_len,
                payload.len()
            )));
        }

        Ok(CompressedData {
            original_length: header.original_length,
            frequencies,
            packed: PackedBits::from((header.bit_count, payload)),
        })
    }
}
