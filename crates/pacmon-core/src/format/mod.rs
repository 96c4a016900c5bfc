//! PACMAN message wire codec.
//!
//! A message is an 8-byte header (type tag, timestamp, word count) followed
//! by `word_count` fixed 16-byte words. Every word is a one-byte tag and a
//! 15-byte payload whose shape depends on the tag. All multi-byte integers
//! are big-endian; streams written in any other byte order are rejected, not
//! guessed.
//!
//! Byte positions live in `layout`, safe big-endian reads in `reader`, and
//! the encoder in `writer`. `parser` turns bytes into `Message` values and
//! never indexes the buffer directly.

pub mod error;
pub mod layout;
pub mod message;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::FormatError;
pub use message::{Message, MessageType, Word, WordType};
pub use parser::{Header, decode, decode_prefix, frame_len, parse_header};
pub use writer::encode;
