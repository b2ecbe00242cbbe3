//! Fixed-size header of the container and the little-endian primitives it is
//! made of.

use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};

pub const MAGIC: [u8; 4] = *b"HUF1";

pub const KIND_BYTE: u8 = 0;
pub const KIND_CHAR: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub symbol_kind: u8,
    pub original_length: usize,
    pub bit_count: usize,
    pub entry_count: usize,
}

pub fn write_header<W: Write>(writer: &mut W, header: &ContainerHeader) -> io::Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&[header.symbol_kind])?;
    write_u64(writer, header.original_length as u64)?;
    write_u64(writer, header.bit_count as u64)?;
    write_u32(writer, header.entry_count as u32)
}

pub fn read_header<R: Read>(reader: &mut R) -> Result<ContainerHeader> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(HuffmanError::CorruptContainer(format!("bad magic {:02x?}", magic)));
    }

    let mut kind = [0u8; 1];
    reader.read_exact(&mut kind)?;
    let original_length = read_len(reader)?;
    let bit_count = read_len(reader)?;
    let entry_count = read_u32(reader)? as usize;

    Ok(ContainerHeader {
        symbol_kind: kind[0],
        original_length,
        bit_count,
        entry_count,
    })
}

pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

pub fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Reads a u64 length field that must fit in `usize`.
pub fn read_len<R: Read>(reader: &mut R) -> Result<usize> {
    let value = read_u64(reader)?;
    usize::try_from(value)
        .map_err(|_| HuffmanError::CorruptContainer(format!("length {} does not fit in memory", value)))
}
