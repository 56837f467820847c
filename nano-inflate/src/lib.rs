//! A small, pure-Rust zlib/DEFLATE inflate implementation.
//!
//! This crate knows nothing about PNG; it exposes exactly the zlib decode
//! contract the container format needs: hand it a zlib-framed byte slice and
//! the number of bytes you expect to come out, get exactly that many bytes
//! back or an error.

pub use adler32::adler32;
pub use decoder::DeflateDecoder;
pub use errors::InflateError;

mod adler32;
mod bitstream;
mod constants;
mod decoder;
pub mod errors;
mod huffman;
