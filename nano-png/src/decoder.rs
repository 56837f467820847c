//! The top-level decode driver: signature, chunk framing, row unfiltering,
//! and the rest tied together.
//!
//! Grounded on `zune_png::decoder::PngDecoder::decode`'s overall shape: a
//! chunk dispatch loop that accumulates `IDAT` payloads and stops at `IEND`,
//! followed by a single inflate call and a row-by-row unfilter pass
//! (`create_png_image_raw`), simplified to the fixed 8-bit, non-interlaced,
//! non-palette case this crate supports.

use std::fs;
use std::path::Path;

use log::{debug, trace, warn};
use nano_inflate::DeflateDecoder;

use crate::chunk::ChunkIter;
use crate::constants::PNG_SIGNATURE;
use crate::error::PngError;
use crate::filters;
use crate::image::{ColorType, Image};
use crate::options::DecoderOptions;

#[derive(Debug, Clone, Copy)]
struct IhdrInfo
{
    width:  u32,
    height: u32,
    color:  ColorType
}

/// Drives a single PNG decode over a borrowed byte slice.
pub struct PngDecoder<'a>
{
    data:    &'a [u8],
    options: DecoderOptions
}

impl<'a> PngDecoder<'a>
{
    pub fn new(data: &'a [u8]) -> Self
    {
        PngDecoder { data, options: DecoderOptions::default() }
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> Self
    {
        PngDecoder { data, options }
    }

    /// Parses the signature, chunk stream, and IDAT payload, returning a
    /// fully reconstructed [`Image`].
    pub fn decode(&mut self) -> Result<Image, PngError>
    {
        let body = self.verify_signature()?;

        let mut ihdr: Option<IhdrInfo> = None;
        let mut idat = Vec::new();
        let mut text = Vec::new();
        let mut seen_idat = false;

        for chunk in ChunkIter::new(body, self.options.confirm_crc())
        {
            let chunk = chunk?;

            if ihdr.is_none()
            {
                if !chunk.is(b"IHDR")
                {
                    return Err(PngError::MissingIhdr);
                }
                ihdr = Some(self.parse_ihdr(chunk.payload)?);
                continue;
            }

            if chunk.is(b"IHDR")
            {
                return Err(PngError::MalformedIhdr);
            }
            else if chunk.is(b"IDAT")
            {
                seen_idat = true;
                idat.extend_from_slice(chunk.payload);
            }
            else if chunk.is(b"IEND")
            {
                trace!("reached IEND after {} bytes of IDAT", idat.len());
                break;
            }
            else if chunk.is(b"tEXt")
            {
                if let Some((keyword, value)) = parse_text_chunk(chunk.payload)
                {
                    text.push((keyword, value));
                }
            }
            else if chunk.is_critical()
            {
                return Err(PngError::UnknownCriticalChunk(chunk.kind));
            }
            else
            {
                debug!("skipping ancillary chunk {:?}", String::from_utf8_lossy(&chunk.kind));
            }
        }

        let ihdr = ihdr.ok_or(PngError::MissingIhdr)?;
        if !seen_idat || idat.is_empty()
        {
            return Err(PngError::MissingImageData);
        }

        let raw = self.inflate_idat(&idat, ihdr)?;
        let buffer = unfilter_image(&raw, ihdr.width, ihdr.height, ihdr.color)?;

        Ok(Image::from_raw_parts(ihdr.width, ihdr.height, ihdr.color, buffer, text))
    }

    pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Image, PngError>
    {
        let data = fs::read(path).map_err(|err| PngError::Generic(err.to_string()))?;
        PngDecoder::new(&data).decode()
    }

    fn verify_signature(&self) -> Result<&'a [u8], PngError>
    {
        if self.data.len() < PNG_SIGNATURE.len()
        {
            return Err(PngError::Truncated);
        }
        if self.data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE
        {
            return Err(PngError::BadSignature);
        }
        Ok(&self.data[PNG_SIGNATURE.len()..])
    }

    fn parse_ihdr(&self, payload: &[u8]) -> Result<IhdrInfo, PngError>
    {
        if payload.len() != 13
        {
            return Err(PngError::MalformedIhdr);
        }

        let width = u32::from_be_bytes(payload[0..4].try_into().unwrap());
        let height = u32::from_be_bytes(payload[4..8].try_into().unwrap());
        let bit_depth = payload[8];
        let color_byte = payload[9];
        let compression = payload[10];
        let filter_method = payload[11];
        let interlace = payload[12];

        if width == 0 || height == 0 || width > self.options.max_width() || height > self.options.max_height()
        {
            return Err(PngError::InvalidDimensions);
        }
        if bit_depth != 8
        {
            return Err(PngError::UnsupportedBitDepth(bit_depth));
        }
        let color = ColorType::from_png_byte(color_byte)?;
        if compression != 0 || filter_method != 0
        {
            return Err(PngError::UnsupportedMethod);
        }
        if interlace != 0
        {
            return Err(PngError::UnsupportedInterlace);
        }

        debug!("IHDR: {width}x{height}, color type {color_byte}");
        Ok(IhdrInfo { width, height, color })
    }

    fn inflate_idat(&self, idat: &[u8], ihdr: IhdrInfo) -> Result<Vec<u8>, PngError>
    {
        let row_bytes = (ihdr.width as usize)
            .checked_mul(ihdr.color.channels())
            .ok_or(PngError::DimensionsTooLarge)?;
        let raw_len = row_bytes
            .checked_add(1)
            .and_then(|stride| stride.checked_mul(ihdr.height as usize))
            .ok_or(PngError::DimensionsTooLarge)?;
        if raw_len > self.options.max_raw_len()
        {
            return Err(PngError::DimensionsTooLarge);
        }

        let raw = DeflateDecoder::new(idat).decode_zlib(raw_len)?;
        if raw.len() != raw_len
        {
            warn!("inflate produced {} bytes, expected {raw_len}", raw.len());
            return Err(PngError::TruncatedImageData);
        }
        Ok(raw)
    }
}

fn unfilter_image(raw: &[u8], width: u32, height: u32, color: ColorType) -> Result<Vec<u8>, PngError>
{
    let bpp = color.channels();
    let row_bytes = width as usize * bpp;
    let stride = row_bytes + 1;

    let mut out = Vec::with_capacity(row_bytes * height as usize);
    let mut prev = vec![0_u8; row_bytes];

    for row_index in 0..height as usize
    {
        let start = row_index * stride;
        let row = raw.get(start..start + stride).ok_or(PngError::TruncatedImageData)?;
        let filter_byte = row[0];
        let mut current = row[1..].to_vec();

        filters::unfilter_row(filter_byte, &mut current, &prev, bpp)?;

        out.extend_from_slice(&current);
        prev = current;
    }

    Ok(out)
}

/// Splits a `tEXt` payload into its NUL-separated keyword and text. Returns
/// `None` (and logs a warning) for payloads the decoder declines to surface
/// rather than hard-failing the whole image over metadata.
fn parse_text_chunk(payload: &[u8]) -> Option<(String, String)>
{
    let nul_at = payload.iter().position(|&b| b == 0)?;
    let (keyword, rest) = payload.split_at(nul_at);
    let text = &rest[1..];

    let keyword = String::from_utf8(keyword.to_vec()).ok()?;
    let text = String::from_utf8(text.to_vec()).ok()?;
    if keyword.is_empty() || keyword.len() > 79
    {
        warn!("discarding tEXt chunk with invalid keyword length {}", keyword.len());
        return None;
    }
    Some((keyword, text))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::crc;
    use crate::encoder::PngEncoder;

    #[test]
    fn rejects_bad_signature()
    {
        let data = [0_u8; 16];
        assert!(matches!(PngDecoder::new(&data).decode(), Err(PngError::BadSignature)));
    }

    #[test]
    fn rejects_truncated_input()
    {
        let data = PNG_SIGNATURE;
        assert!(matches!(PngDecoder::new(&data).decode(), Err(PngError::Truncated)));
    }

    #[test]
    fn round_trips_a_small_rgba_image_through_encode_and_decode()
    {
        let image = Image::new(
            3,
            2,
            ColorType::Rgba,
            vec![
                10, 20, 30, 255, 40, 50, 60, 255, 70, 80, 90, 255, //
                11, 21, 31, 200, 41, 51, 61, 200, 71, 81, 91, 200
            ]
        )
        .unwrap();

        let bytes = PngEncoder::new(&image).encode_to_vec().unwrap();
        let decoded = PngDecoder::new(&bytes).decode().unwrap();

        assert_eq!(decoded.width(), 3);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.color_type(), ColorType::Rgba);
        assert_eq!(decoded.buffer(), image.buffer());
    }

    #[test]
    fn rejects_image_with_no_idat()
    {
        let image = Image::blank(1, 1, ColorType::Grayscale).unwrap();
        let mut bytes = PngEncoder::new(&image).encode_to_vec().unwrap();

        // Splice out the IDAT chunk (find it and remove its whole frame).
        let idat_pos = bytes.windows(4).position(|w| w == b"IDAT").unwrap() - 4;
        let length = u32::from_be_bytes(bytes[idat_pos..idat_pos + 4].try_into().unwrap()) as usize;
        let frame_len = 4 + 4 + length + 4;
        bytes.drain(idat_pos..idat_pos + frame_len);

        assert!(matches!(PngDecoder::new(&bytes).decode(), Err(PngError::MissingImageData)));
    }

    /// Hand-assembles a PNG byte-for-byte, independent of `PngEncoder`, so
    /// this exercises the decoder against a literal wire format rather than
    /// round-tripping through our own writer.
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

    #[test]
    fn decodes_a_1x1_black_rgb_image_from_literal_bytes()
    {
        // Scenario: IHDR(1x1, color type 2/RGB), IDAT wrapping a zlib stream
        // whose single stored block carries exactly [0x00, 0x00, 0x00, 0x00]
        // (filter byte None, then one black RGB pixel).
        let raw = [0x00_u8, 0x00, 0x00, 0x00];

        let mut zlib = vec![0x78, 0x01];
        zlib.push(0x01); // BFINAL=1, BTYPE=00 (stored)
        zlib.extend_from_slice(&(raw.len() as u16).to_le_bytes());
        zlib.extend_from_slice(&(!(raw.len() as u16)).to_le_bytes());
        zlib.extend_from_slice(&raw);
        zlib.extend_from_slice(&nano_inflate::adler32(&raw).to_be_bytes());

        let mut ihdr = [0_u8; 13];
        ihdr[0..4].copy_from_slice(&1_u32.to_be_bytes());
        ihdr[4..8].copy_from_slice(&1_u32.to_be_bytes());
        ihdr[8] = 8; // bit depth
        ihdr[9] = 2; // color type RGB

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&PNG_SIGNATURE);
        write_chunk(&mut bytes, b"IHDR", &ihdr);
        write_chunk(&mut bytes, b"IDAT", &zlib);
        write_chunk(&mut bytes, b"IEND", &[]);

        let decoded = PngDecoder::new(&bytes).decode().unwrap();
        assert_eq!(decoded.width(), 1);
        assert_eq!(decoded.height(), 1);
        assert_eq!(decoded.color_type(), ColorType::Rgb);
        assert_eq!(decoded.buffer(), &[0, 0, 0]);
    }

    #[test]
    fn rejects_well_formed_ihdr_with_no_idat()
    {
        let mut ihdr = [0_u8; 13];
        ihdr[0..4].copy_from_slice(&1_u32.to_be_bytes());
        ihdr[4..8].copy_from_slice(&1_u32.to_be_bytes());
        ihdr[8] = 8;
        ihdr[9] = 2;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&PNG_SIGNATURE);
        write_chunk(&mut bytes, b"IHDR", &ihdr);
        write_chunk(&mut bytes, b"IEND", &[]);

        assert!(matches!(PngDecoder::new(&bytes).decode(), Err(PngError::MissingImageData)));
    }
}
