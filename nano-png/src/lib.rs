//! A small PNG decoder and encoder for 8-bit grayscale, grayscale+alpha,
//! RGB, and RGBA images.
//!
//! Interlacing, non-8-bit depths, palette images, and ancillary chunks
//! other than `tEXt` are out of scope; ICC/gamma-aware color management is
//! left to callers. The encoder only ever emits stored (uncompressed)
//! DEFLATE blocks — this crate favors a small, auditable implementation
//! over compression ratio.

pub use decoder::PngDecoder;
pub use encoder::PngEncoder;
pub use error::{PngEncodeError, PngError};
pub use image::{ColorType, Image};
pub use options::DecoderOptions;

mod chunk;
mod constants;
mod crc;
mod decoder;
mod encoder;
pub mod error;
mod filters;
mod image;
pub mod options;
