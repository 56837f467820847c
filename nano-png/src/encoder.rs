//! Stored-block PNG encoder.
//!
//! Writes the usual chunk sequence — signature, IHDR, optional tEXt, IDAT,
//! IEND — through a small builder (`PngEncoder::with_text`) rather than one
//! do-everything entry point.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::constants::{MAX_STORED_BLOCK_LEN, PNG_SIGNATURE, ZLIB_HEADER};
use crate::crc;
use crate::error::PngEncodeError;
use crate::image::Image;

/// Encodes an [`Image`] to the PNG byte format. Every row is written with
/// filter type 0 (None), and a stored (uncompressed) DEFLATE block always
/// follows — this crate trades compression ratio for a small, auditable
/// write path.
pub struct PngEncoder<'a>
{
    image: &'a Image,
    text:  Vec<(String, String)>
}

impl<'a> PngEncoder<'a>
{
    pub fn new(image: &'a Image) -> Self
    {
        PngEncoder { image, text: Vec::new() }
    }

    /// Attaches a `tEXt` keyword/text pair to the output. `keyword` must be
    /// 1-79 printable Latin-1 bytes (0x20-0x7E) with no NUL; `text` must not
    /// contain a NUL.
    pub fn with_text(mut self, keyword: &str, text: &str) -> Result<Self, PngEncodeError>
    {
        validate_keyword(keyword)?;
        if text.bytes().any(|b| b == 0)
        {
            return Err(PngEncodeError::InvalidText);
        }
        self.text.push((keyword.to_string(), text.to_string()));
        Ok(self)
    }

    pub fn encode_to_vec(&self) -> Result<Vec<u8>, PngEncodeError>
    {
        let mut out = Vec::new();
        out.extend_from_slice(&PNG_SIGNATURE);

        write_chunk(&mut out, b"IHDR", &ihdr_payload(self.image));

        for (keyword, text) in &self.text
        {
            let mut payload = Vec::with_capacity(keyword.len() + 1 + text.len());
            payload.extend_from_slice(keyword.as_bytes());
            payload.push(0);
            payload.extend_from_slice(text.as_bytes());
            write_chunk(&mut out, b"tEXt", &payload);
        }

        let filtered = prefix_rows_with_none_filter(self.image);
        let compressed = deflate_store(&filtered);
        write_chunk(&mut out, b"IDAT", &compressed);

        write_chunk(&mut out, b"IEND", &[]);
        Ok(out)
    }

    pub fn encode_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PngEncodeError>
    {
        let bytes = self.encode_to_vec()?;
        let mut file = fs::File::create(path)?;
        file.write_all(&bytes)?;
        Ok(())
    }
}

fn ihdr_payload(image: &Image) -> [u8; 13]
{
    let mut payload = [0_u8; 13];
    payload[0..4].copy_from_slice(&image.width().to_be_bytes());
    payload[4..8].copy_from_slice(&image.height().to_be_bytes());
    payload[8] = 8; // bit depth
    payload[9] = image.color_type().to_png_byte();
    payload[10] = 0; // compression method
    payload[11] = 0; // filter method
    payload[12] = 0; // interlace method
    payload
}

fn prefix_rows_with_none_filter(image: &Image) -> Vec<u8>
{
    let channels = image.color_type().channels();
    let row_bytes = image.width() as usize * channels;
    let buffer = image.buffer();

    let mut out = Vec::with_capacity((row_bytes + 1) * image.height() as usize);
    for row in buffer.chunks_exact(row_bytes)
    {
        out.push(0); // filter type None
        out.extend_from_slice(row);
    }
    out
}

/// Wraps `raw` in a zlib stream made of one or more DEFLATE stored blocks:
/// each carries up to 65,535 bytes verbatim behind a 5-byte header
/// (BFINAL/BTYPE + LEN + one's-complement NLEN).
fn deflate_store(raw: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(raw.len() + raw.len() / MAX_STORED_BLOCK_LEN + 16);
    out.extend_from_slice(&ZLIB_HEADER);

    if raw.is_empty()
    {
        out.push(0x01); // BFINAL=1, BTYPE=00, remaining bits of this byte are padding
        out.extend_from_slice(&0_u16.to_le_bytes());
        out.extend_from_slice(&0xFFFF_u16.to_le_bytes());
    }
    else
    {
        let mut chunks = raw.chunks(MAX_STORED_BLOCK_LEN).peekable();
        while let Some(chunk) = chunks.next()
        {
            let is_final = chunks.peek().is_none();
            out.push(if is_final { 0x01 } else { 0x00 });
            let len = chunk.len() as u16;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&(!len).to_le_bytes());
            out.extend_from_slice(chunk);
        }
    }

    out.extend_from_slice(&nano_inflate::adler32(raw).to_be_bytes());
    out
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], payload: &[u8])
{
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);

    let mut crc_input = Vec::with_capacity(4 + payload.len());
    crc_input.extend_from_slice(kind);
    crc_input.extend_from_slice(payload);
    out.extend_from_slice(&crc::crc32(&crc_input).to_be_bytes());
}

fn validate_keyword(keyword: &str) -> Result<(), PngEncodeError>
{
    if keyword.is_empty() || keyword.len() > 79
    {
        return Err(PngEncodeError::InvalidKeyword);
    }
    let valid = keyword.bytes().all(|b| (0x20..=0x7E).contains(&b));
    if !valid
    {
        return Err(PngEncodeError::InvalidKeyword);
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::decoder::PngDecoder;
    use crate::image::ColorType;

    #[test]
    fn stored_block_output_inflates_back_to_the_source_bytes()
    {
        let raw = vec![7_u8; 200_000]; // forces more than one stored block
        let compressed = deflate_store(&raw);
        let decoded = nano_inflate::DeflateDecoder::new(&compressed).decode_zlib(raw.len()).unwrap();
        assert_eq!(decoded, raw);
    }

    #[test]
    fn round_trips_through_the_full_decoder()
    {
        let image = Image::new(2, 2, ColorType::Grayscale, vec![0, 64, 128, 255]).unwrap();
        let bytes = PngEncoder::new(&image).encode_to_vec().unwrap();
        let decoded = PngDecoder::new(&bytes).decode().unwrap();
        assert_eq!(decoded.buffer(), image.buffer());
    }

    #[test]
    fn rejects_overlong_keyword()
    {
        let image = Image::blank(1, 1, ColorType::Grayscale).unwrap();
        let keyword = "x".repeat(80);
        assert!(PngEncoder::new(&image).with_text(&keyword, "value").is_err());
    }

    #[test]
    fn rejects_keyword_outside_ascii_printable_range()
    {
        let image = Image::blank(1, 1, ColorType::Grayscale).unwrap();
        // 0xA9 ('©' in Latin-1) is outside spec.md's 32-126 keyword range.
        assert!(PngEncoder::new(&image).with_text("Copyright\u{a9}", "value").is_err());
    }

    #[test]
    fn rejects_text_containing_nul()
    {
        let image = Image::blank(1, 1, ColorType::Grayscale).unwrap();
        assert!(PngEncoder::new(&image).with_text("Comment", "has\0nul").is_err());
    }

    #[test]
    fn emits_text_chunk_round_trip()
    {
        let image = Image::blank(1, 1, ColorType::Grayscale).unwrap();
        let bytes = PngEncoder::new(&image).with_text("Comment", "hello").unwrap().encode_to_vec().unwrap();
        let decoded = PngDecoder::new(&bytes).decode().unwrap();
        assert_eq!(decoded.text_chunks(), &[("Comment".to_string(), "hello".to_string())]);
    }

    #[test]
    fn round_trips_randomized_images_across_all_color_types()
    {
        use nanorand::{Rng, WyRand};

        let mut rng = WyRand::new_seed(0xC0FF_EE42);
        let color_types = [ColorType::Grayscale, ColorType::GrayscaleAlpha, ColorType::Rgb, ColorType::Rgba];

        for color in color_types
        {
            for _ in 0..8
            {
                let width = 1 + rng.generate_range(0_u32..16);
                let height = 1 + rng.generate_range(0_u32..16);
                let len = (width * height) as usize * color.channels();
                let buffer: Vec<u8> = (0..len).map(|_| rng.generate::<u8>()).collect();

                let image = Image::new(width, height, color, buffer).unwrap();
                let bytes = PngEncoder::new(&image).encode_to_vec().unwrap();
                let decoded = PngDecoder::new(&bytes).decode().unwrap();

                assert_eq!(decoded.buffer(), image.buffer());
                assert_eq!(decoded.color_type(), color);
            }
        }
    }
}
