//! The decoded/encodable pixel buffer.

use crate::error::PngError;

/// The four color layouts this crate supports (PNG color types 0, 2, 4, 6 —
/// color type 3, palette, is intentionally unsupported).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType
{
    Grayscale,
    Rgb,
    GrayscaleAlpha,
    Rgba
}

impl ColorType
{
    pub(crate) fn from_png_byte(byte: u8) -> Result<Self, PngError>
    {
        match byte
        {
            0 => Ok(ColorType::Grayscale),
            2 => Ok(ColorType::Rgb),
            4 => Ok(ColorType::GrayscaleAlpha),
            6 => Ok(ColorType::Rgba),
            other => Err(PngError::UnsupportedColorType(other))
        }
    }

    pub(crate) fn to_png_byte(self) -> u8
    {
        match self
        {
            ColorType::Grayscale => 0,
            ColorType::Rgb => 2,
            ColorType::GrayscaleAlpha => 4,
            ColorType::Rgba => 6
        }
    }

    /// Samples per pixel, at the fixed 8-bit depth this crate supports.
    pub const fn channels(self) -> usize
    {
        match self
        {
            ColorType::Grayscale => 1,
            ColorType::Rgb => 3,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgba => 4
        }
    }
}

/// A fully decoded (or not-yet-encoded) raster image: interleaved 8-bit
/// samples, row-major, no padding between rows.
#[derive(Debug, Clone)]
pub struct Image
{
    width:  u32,
    height: u32,
    color:  ColorType,
    buffer: Vec<u8>,
    text:   Vec<(String, String)>
}

impl Image
{
    /// Builds an image from raw interleaved pixel data. `buffer.len()` must
    /// equal `width as usize * height as usize * color.channels()`.
    pub fn new(width: u32, height: u32, color: ColorType, buffer: Vec<u8>) -> Result<Self, PngError>
    {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(color.channels()))
            .ok_or(PngError::DimensionsTooLarge)?;
        if buffer.len() != expected
        {
            return Err(PngError::Generic(format!(
                "buffer length {} does not match {width}x{height} at {} channels",
                buffer.len(),
                color.channels()
            )));
        }
        Ok(Image { width, height, color, buffer, text: Vec::new() })
    }

    /// A `width x height` image of all-zero samples.
    pub fn blank(width: u32, height: u32, color: ColorType) -> Result<Self, PngError>
    {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(color.channels()))
            .ok_or(PngError::DimensionsTooLarge)?;
        Ok(Image { width, height, color, buffer: vec![0; len], text: Vec::new() })
    }

    pub const fn width(&self) -> u32
    {
        self.width
    }

    pub const fn height(&self) -> u32
    {
        self.height
    }

    pub const fn color_type(&self) -> ColorType
    {
        self.color
    }

    pub fn buffer(&self) -> &[u8]
    {
        &self.buffer
    }

    pub fn into_buffer(self) -> Vec<u8>
    {
        self.buffer
    }

    /// `tEXt` keyword/text pairs carried by the file this image was decoded
    /// from (empty for freshly constructed images).
    pub fn text_chunks(&self) -> &[(String, String)]
    {
        &self.text
    }

    pub(crate) fn from_raw_parts(
        width: u32, height: u32, color: ColorType, buffer: Vec<u8>, text: Vec<(String, String)>
    ) -> Self
    {
        Image { width, height, color, buffer, text }
    }
}
