//! The single error type shared by every stage of the codec.

use thiserror::Error;

use crate::min_heap::HeapErr;

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// There are no symbols to build a code tree from.
    #[error("cannot build a code tree from empty input")]
    EmptyInput,

    /// A symbol being encoded has no code in the supplied table.
    #[error("no code for symbol {symbol} at input position {position}")]
    MissingCode { symbol: String, position: usize },

    /// The decoder ran out of bits (or out of possible codes) with a partial
    /// candidate still pending.
    #[error("bit-string is truncated or does not match the code table: {pending} unmatched bit(s) starting at offset {offset}")]
    TruncatedOrInvalidInput { offset: usize, pending: usize },

    /// A textual bit-string contained something other than `'0'` or `'1'`.
    #[error("invalid bit marker {marker:?} at offset {offset}, expected '0' or '1'")]
    InvalidBitMarker { marker: char, offset: usize },

    /// Misuse of the priority queue. Reaching this is a bug.
    #[error("priority queue error: {0}")]
    Heap(#[from] HeapErr),

    /// A container failed validation: bad magic, wrong symbol kind,
    /// inconsistent lengths or counts.
    #[error("corrupt container: {0}")]
    CorruptContainer(String),

    /// Reading or writing a container failed, including running out of
    /// bytes mid-header.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
