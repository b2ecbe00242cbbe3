//! # huffman_text
//!
//! Huffman coding for arbitrary symbol sequences: count frequencies, build
//! the code tree, derive the prefix-free code table, encode and decode.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffman_text::{compress, decompress, format_bits};
//!
//! let (bits, table) = compress("aabbc")?;
//! assert_eq!(format_bits(&bits), "11110010");
//! assert_eq!(decompress(&bits, &table)?, "aabbc");
//! # Ok::<(), huffman_text::HuffmanError>(())
//! ```
//!
//! The stages can also be driven one at a time:
//!
//! ```rust
//! use huffman_text::{build_frequencies, decode, encode, CodeTable, CodeTree};
//!
//! let input = [3u16, 3, 7, 3, 9];
//! let tree = CodeTree::build(&build_frequencies(&input))?;
//! let table = CodeTable::from_tree(&tree);
//! let bits = encode(&input, table.encoder())?;
//! assert_eq!(decode(&bits, table.decoder())?, input);
//! # Ok::<(), huffman_text::HuffmanError>(())
//! ```

pub mod bit_vec;
pub mod code_table;
pub mod compressed_data;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;

// Internal modules - not part of public API
mod metadata;
mod min_heap;

// Re-export main types for convenience
pub use bit_vec::{format_bits, parse_bits, Bits, PackedBits};
pub use code_table::{CodeTable, CodeToSymbol, SymbolToCode};
pub use compressed_data::{CompressedData, SymbolCodec};
pub use error::{HuffmanError, Result};
pub use frequency::{build_frequencies, FrequencyTable, Symbol};
pub use huffman_codec::{compress, decode, decompress, encode, HuffmanCodec};
pub use hufftree::{CodeTree, HuffNode};
pub use min_heap::HeapErr;
