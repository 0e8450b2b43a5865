//! # Templight Buffer
//!
//! Read-mostly document snapshots backed by a rope.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - `TextBuffer` owns the rope data structure
//! - Line iteration hands out borrowed `Cow<str>` values
//! - Mutations require `&mut self` (exclusive access), so a scan can never
//!   observe a half-applied edit
//!
//! ### Offsets
//! Every offset in this crate is a char (Unicode scalar) index. Byte offsets
//! only appear inside the syntax crate and never cross into here.

mod buffer;

pub use buffer::{Lines, TextBuffer};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Line {0} is out of bounds")]
    LineOutOfBounds(usize),

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Invalid range: {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
