//! Decode/encode error types.
//!
//! Shaped after `zune_png::error::PngErrors` (a handful of named structural
//! variants plus a catch-all `Generic(String)` for messages that need
//! interpolated context), but with a real `std::error::Error` impl added —
//! `zune_png` stays `no_std`-friendly and skips that; this crate only
//! targets `std`, so there's no reason not to.

use std::fmt::{Debug, Display, Formatter};

use nano_inflate::InflateError;

pub enum PngError
{
    /// Input shorter than the 8-byte PNG signature, or otherwise truncated
    /// before its stated chunk length.
    Truncated,
    /// The first 8 bytes weren't the PNG magic number.
    BadSignature,
    /// The first chunk after the signature wasn't `IHDR`.
    MissingIhdr,
    /// An `IHDR` with a length other than 13, or more than one `IHDR`.
    MalformedIhdr,
    /// Width or height was zero, or exceeded the configured maximum.
    InvalidDimensions,
    /// `width * height * channels` (or the raw-scanline equivalent)
    /// overflowed `usize`, or the predicted raw length exceeded the
    /// configured safety cap.
    DimensionsTooLarge,
    /// Bit depth was not 8.
    UnsupportedBitDepth(u8),
    /// Color type 3 (palette), or any other value outside {0,2,4,6}.
    UnsupportedColorType(u8),
    /// IHDR's compression or filter method byte was nonzero.
    UnsupportedMethod,
    /// IHDR's interlace byte was nonzero (Adam7 is a Non-goal).
    UnsupportedInterlace,
    /// A chunk's stored CRC-32 didn't match the computed one.
    BadCrc { expected: u32, computed: u32 },
    /// An unrecognized *critical* chunk (lowercase-bit clear in its first
    /// type byte) appeared; ancillary chunks are skipped instead.
    UnknownCriticalChunk([u8; 4]),
    /// No `IDAT` chunk was present before `IEND`.
    MissingImageData,
    /// A PNG filter type byte greater than 4.
    UnknownFilterType(u8),
    /// The decompressed IDAT stream didn't carry enough bytes for the
    /// declared width/height/channels.
    TruncatedImageData,
    /// Propagated from the zlib/DEFLATE layer.
    Inflate(InflateError),
    /// Anything else, with a human-readable reason.
    Generic(String)
}

impl Display for PngError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::Truncated => write!(f, "input is too short to be a valid PNG"),
            Self::BadSignature => write!(f, "bad PNG signature"),
            Self::MissingIhdr => write!(f, "first chunk after the signature was not IHDR"),
            Self::MalformedIhdr => write!(f, "IHDR chunk is malformed"),
            Self::InvalidDimensions =>
            {
                write!(f, "image width or height is zero or exceeds the configured maximum")
            }
            Self::DimensionsTooLarge =>
            {
                write!(f, "image dimensions overflow or exceed the allocation safety cap")
            }
            Self::UnsupportedBitDepth(depth) => write!(f, "unsupported bit depth {depth}, only 8 is supported"),
            Self::UnsupportedColorType(color) => write!(f, "unsupported color type {color}"),
            Self::UnsupportedMethod => write!(f, "compression or filter method byte was not 0"),
            Self::UnsupportedInterlace => write!(f, "interlaced PNGs are not supported"),
            Self::BadCrc { expected, computed } =>
            {
                write!(f, "chunk CRC mismatch: expected {expected:#010x}, computed {computed:#010x}")
            }
            Self::UnknownCriticalChunk(kind) =>
            {
                let name = std::str::from_utf8(kind).unwrap_or("????");
                write!(f, "unknown critical chunk {name:?}")
            }
            Self::MissingImageData => write!(f, "no IDAT chunk present"),
            Self::UnknownFilterType(filter) => write!(f, "unknown PNG filter type {filter}"),
            Self::TruncatedImageData => write!(f, "decompressed image data is shorter than expected"),
            Self::Inflate(err) => write!(f, "zlib/deflate error: {err}"),
            Self::Generic(msg) => write!(f, "{msg}")
        }
    }
}

impl Debug for PngError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        Display::fmt(self, f)
    }
}

impl std::error::Error for PngError {}

impl From<InflateError> for PngError
{
    fn from(value: InflateError) -> Self
    {
        PngError::Inflate(value)
    }
}

impl From<String> for PngError
{
    fn from(value: String) -> Self
    {
        PngError::Generic(value)
    }
}

/// Errors an encode operation can surface: I/O failure, and malformed
/// `tEXt` metadata (allocation failure aborts in Rust rather than returning
/// an error, so there's no variant for it).
pub enum PngEncodeError
{
    Io(std::io::Error),
    /// A `tEXt` keyword was empty, longer than 79 bytes, outside the
    /// printable Latin-1 range 32-126, or contained a NUL.
    InvalidKeyword,
    /// `tEXt` text contained a NUL byte.
    InvalidText
}

impl Display for PngEncodeError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::Io(err) => write!(f, "I/O error writing PNG: {err}"),
            Self::InvalidKeyword => write!(f, "tEXt keyword must be 1-79 bytes in the range 32-126 with no NUL"),
            Self::InvalidText => write!(f, "tEXt text must not contain a NUL byte")
        }
    }
}

impl Debug for PngEncodeError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        Display::fmt(self, f)
    }
}

impl std::error::Error for PngEncodeError {}

impl From<std::io::Error> for PngEncodeError
{
    fn from(value: std::io::Error) -> Self
    {
        PngEncodeError::Io(value)
    }
}
