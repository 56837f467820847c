//! The DEFLATE block loop and zlib framing, per RFC 1950/1951.
//!
//! Structured the way `zune_inflate::decoder::DeflateDecoder` separates
//! "build decode table" from "drive the block loop": header check, block
//! loop, stored/fixed/dynamic dispatch, symbol loop, length check, Adler-32
//! check, each as its own small method.

use crate::adler32::adler32;
use crate::bitstream::BitReader;
use crate::constants::{
    CODE_LENGTH_ORDER, DIST_BASE, DIST_EXTRA_BITS, LENGTH_BASE, LENGTH_EXTRA_BITS,
    NUM_CODELEN_SYMBOLS
};
use crate::errors::InflateError;
use crate::huffman::HuffmanTable;

const BTYPE_STORED: u32 = 0;
const BTYPE_FIXED: u32 = 1;
const BTYPE_DYNAMIC: u32 = 2;
const BTYPE_RESERVED: u32 = 3;

/// A one-shot zlib/DEFLATE decompressor over a borrowed byte slice.
pub struct DeflateDecoder<'a>
{
    data: &'a [u8]
}

impl<'a> DeflateDecoder<'a>
{
    pub fn new(data: &'a [u8]) -> Self
    {
        DeflateDecoder { data }
    }

    /// Decode a zlib-framed DEFLATE stream, returning exactly `expected_len`
    /// bytes or an error. `expected_len` is known up front because the PNG
    /// container records image dimensions independently of the compressed
    /// stream.
    pub fn decode_zlib(&self, expected_len: usize) -> Result<Vec<u8>, InflateError>
    {
        if self.data.len() < 6
        {
            return Err(InflateError::InsufficientData);
        }

        let cmf = self.data[0];
        let flg = self.data[1];

        if cmf & 0x0F != 8
        {
            return Err(InflateError::BadCompressionMethod(cmf & 0x0F));
        }

        let check = (u16::from(cmf) << 8) + u16::from(flg);
        if check % 31 != 0
        {
            return Err(InflateError::BadHeaderCheck);
        }

        let mut pos = 2;
        if flg & 0x20 != 0
        {
            // FDICT: a preset dictionary id follows. PNG never sets this, but
            // skipping it costs nothing and keeps us honest to the RFC.
            pos += 4;
        }

        if self.data.len() < pos + 4
        {
            return Err(InflateError::InsufficientData);
        }

        let payload_end = self.data.len() - 4;
        if payload_end < pos
        {
            return Err(InflateError::InsufficientData);
        }

        let mut reader = BitReader::new(&self.data[pos..payload_end]);
        let mut out = Vec::with_capacity(expected_len.min(64 * 1024 * 1024));

        Self::decode_blocks(&mut reader, &mut out, expected_len)?;

        if out.len() != expected_len
        {
            return Err(InflateError::LengthMismatch { expected: expected_len, actual: out.len() });
        }

        let trailer: [u8; 4] = self.data[payload_end..].try_into().unwrap();
        let expected_adler = u32::from_be_bytes(trailer);
        let actual_adler = adler32(&out);

        if actual_adler != expected_adler
        {
            return Err(InflateError::AdlerMismatch { expected: expected_adler, actual: actual_adler });
        }

        Ok(out)
    }

    fn decode_blocks(reader: &mut BitReader, out: &mut Vec<u8>, expected_len: usize) -> Result<(), InflateError>
    {
        loop
        {
            let is_final = reader.get_bit()? == 1;
            let block_type = reader.get_bits(2)?;

            match block_type
            {
                BTYPE_STORED => Self::decode_stored_block(reader, out, expected_len)?,
                BTYPE_FIXED =>
                {
                    let (litlen, dist) = Self::fixed_tables();
                    Self::decode_huffman_block(reader, &litlen, &dist, out, expected_len)?;
                }
                BTYPE_DYNAMIC =>
                {
                    let (litlen, dist) = Self::read_dynamic_tables(reader)?;
                    Self::decode_huffman_block(reader, &litlen, &dist, out, expected_len)?;
                }
                BTYPE_RESERVED | _ => return Err(InflateError::ReservedBlockType)
            }

            if is_final
            {
                return Ok(());
            }
        }
    }

    fn decode_stored_block(reader: &mut BitReader, out: &mut Vec<u8>, expected_len: usize) -> Result<(), InflateError>
    {
        reader.align();
        let len = reader.get_bits(16)?;
        let nlen = reader.get_bits(16)?;

        if len != (!nlen & 0xFFFF)
        {
            return Err(InflateError::StoredLengthMismatch);
        }

        let len = len as usize;
        if out.len() + len > expected_len
        {
            return Err(InflateError::OutputOverflow);
        }

        let start = out.len();
        out.resize(start + len, 0);
        reader.read_bytes(&mut out[start..])
    }

    fn fixed_tables() -> (HuffmanTable, HuffmanTable)
    {
        let mut litlen_lengths = [0_u8; 288];
        litlen_lengths[0..144].fill(8);
        litlen_lengths[144..256].fill(9);
        litlen_lengths[256..280].fill(7);
        litlen_lengths[280..288].fill(8);

        let dist_lengths = [5_u8; 32];

        (
            HuffmanTable::build(&litlen_lengths).expect("fixed literal/length lengths are always valid"),
            HuffmanTable::build(&dist_lengths).expect("fixed distance lengths are always valid")
        )
    }

    fn read_dynamic_tables(reader: &mut BitReader) -> Result<(HuffmanTable, HuffmanTable), InflateError>
    {
        let hlit = reader.get_bits(5)? as usize + 257;
        let hdist = reader.get_bits(5)? as usize + 1;
        let hclen = reader.get_bits(4)? as usize + 4;

        let mut precode_lengths = [0_u8; NUM_CODELEN_SYMBOLS];
        for &position in CODE_LENGTH_ORDER.iter().take(hclen)
        {
            precode_lengths[position] = reader.get_bits(3)? as u8;
        }

        let precode_table = HuffmanTable::build(&precode_lengths)?;

        let total = hlit + hdist;
        let mut lengths = vec![0_u8; total];
        let mut i = 0;

        while i < total
        {
            let symbol = precode_table.decode(reader)?;

            match symbol
            {
                0..=15 =>
                {
                    lengths[i] = symbol as u8;
                    i += 1;
                }
                16 =>
                {
                    if i == 0
                    {
                        return Err(InflateError::RepeatWithNoPrevious);
                    }
                    let repeat = 3 + reader.get_bits(2)? as usize;
                    if i + repeat > total
                    {
                        return Err(InflateError::RepeatCountOverflow);
                    }
                    let previous = lengths[i - 1];
                    lengths[i..i + repeat].fill(previous);
                    i += repeat;
                }
                17 =>
                {
                    let repeat = 3 + reader.get_bits(3)? as usize;
                    if i + repeat > total
                    {
                        return Err(InflateError::RepeatCountOverflow);
                    }
                    lengths[i..i + repeat].fill(0);
                    i += repeat;
                }
                18 =>
                {
                    let repeat = 11 + reader.get_bits(7)? as usize;
                    if i + repeat > total
                    {
                        return Err(InflateError::RepeatCountOverflow);
                    }
                    lengths[i..i + repeat].fill(0);
                    i += repeat;
                }
                _ => return Err(InflateError::ReservedSymbol)
            }
        }

        let litlen_table = HuffmanTable::build(&lengths[..hlit])?;
        let dist_table = HuffmanTable::build(&lengths[hlit..])?;

        Ok((litlen_table, dist_table))
    }

    /// The symbol loop shared by fixed and dynamic blocks.
    fn decode_huffman_block(
        reader: &mut BitReader, litlen: &HuffmanTable, dist: &HuffmanTable, out: &mut Vec<u8>, expected_len: usize
    ) -> Result<(), InflateError>
    {
        loop
        {
            let symbol = litlen.decode(reader)?;

            if symbol < 256
            {
                if out.len() >= expected_len
                {
                    return Err(InflateError::OutputOverflow);
                }
                out.push(symbol as u8);
            }
            else if symbol == 256
            {
                return Ok(());
            }
            else if symbol <= 285
            {
                let index = usize::from(symbol - 257);
                let mut length = usize::from(LENGTH_BASE[index]);
                let extra_bits = LENGTH_EXTRA_BITS[index];
                if extra_bits > 0
                {
                    length += reader.get_bits(u32::from(extra_bits))? as usize;
                }

                let dist_symbol = dist.decode(reader)?;
                if dist_symbol >= 30
                {
                    return Err(InflateError::ReservedSymbol);
                }
                let dist_index = usize::from(dist_symbol);
                let mut distance = usize::from(DIST_BASE[dist_index]);
                let dist_extra_bits = DIST_EXTRA_BITS[dist_index];
                if dist_extra_bits > 0
                {
                    distance += reader.get_bits(u32::from(dist_extra_bits))? as usize;
                }

                if distance == 0 || distance > out.len()
                {
                    return Err(InflateError::DistanceTooFar);
                }
                if out.len() + length > expected_len
                {
                    return Err(InflateError::OutputOverflow);
                }

                // Byte-at-a-time on purpose: when length > distance this run
                // must read bytes it just wrote (LZ77 run-length behavior).
                for _ in 0..length
                {
                    let byte = out[out.len() - distance];
                    out.push(byte);
                }
            }
            else
            {
                return Err(InflateError::ReservedSymbol);
            }
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::io::Write;

    fn zlib_compress(data: &[u8]) -> Vec<u8>
    {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    /// A bit-at-a-time writer mirroring `BitReader`'s packing convention, so
    /// scenario tests can hand-assemble exact DEFLATE bit patterns instead of
    /// only exercising the engine through a real compressor.
    struct BitWriter
    {
        bytes:    Vec<u8>,
        cur:      u8,
        cur_bits: u32
    }

    impl BitWriter
    {
        fn new() -> Self
        {
            BitWriter { bytes: Vec::new(), cur: 0, cur_bits: 0 }
        }

        fn push_bit(&mut self, bit: u32)
        {
            self.cur |= (bit as u8) << self.cur_bits;
            self.cur_bits += 1;
            if self.cur_bits == 8
            {
                self.bytes.push(self.cur);
                self.cur = 0;
                self.cur_bits = 0;
            }
        }

        /// Push `n` bits of `value`, LSB first — matches `BitReader::get_bits`,
        /// and (for byte-aligned fields) plain little-endian byte order.
        fn push_lsb(&mut self, value: u32, n: u32)
        {
            for i in 0..n
            {
                self.push_bit((value >> i) & 1);
            }
        }

        /// Push a canonical Huffman code, MSB first — matches how
        /// `HuffmanTable::decode` accumulates bits into `code`.
        fn push_huffman(&mut self, code: u32, n: u32)
        {
            for i in (0..n).rev()
            {
                self.push_bit((code >> i) & 1);
            }
        }

        /// Pad the current byte with zero bits (used before a stored block's
        /// byte-aligned `LEN`/`NLEN`/data, matching `BitReader::align`).
        fn align(&mut self)
        {
            while self.cur_bits != 0
            {
                self.push_bit(0);
            }
        }

        fn finish(mut self) -> Vec<u8>
        {
            self.align();
            self.bytes
        }
    }

    fn wrap_zlib(deflate_payload: &[u8], raw_output: &[u8]) -> Vec<u8>
    {
        let mut stream = vec![0x78, 0x01];
        stream.extend_from_slice(deflate_payload);
        stream.extend_from_slice(&adler32(raw_output).to_be_bytes());
        stream
    }

    #[test]
    fn decodes_empty_stored_block()
    {
        // zlib header + one empty final stored block + adler32 of empty input.
        let mut stream = vec![0x78, 0x01];
        stream.extend_from_slice(&[0x01, 0x00, 0x00, 0xFF, 0xFF]); // BFINAL=1,BTYPE=0,LEN=0,NLEN=~0
        stream.extend_from_slice(&1_u32.to_be_bytes()); // adler32([]) == 1

        let out = DeflateDecoder::new(&stream).decode_zlib(0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn round_trips_flate2_compressed_data()
    {
        let original = b"the quick brown fox jumps over the lazy dog, again and again and again";
        let compressed = zlib_compress(original);

        let out = DeflateDecoder::new(&compressed).decode_zlib(original.len()).unwrap();
        assert_eq!(out, original);
    }

    #[test]
    fn round_trips_highly_repetitive_data_through_back_references()
    {
        let original: Vec<u8> = (0..5000).map(|i| (i % 7) as u8).collect();
        let compressed = zlib_compress(&original);

        let out = DeflateDecoder::new(&compressed).decode_zlib(original.len()).unwrap();
        assert_eq!(out, original);
    }

    #[test]
    fn rejects_reserved_block_type()
    {
        // BFINAL=1, BTYPE=11 (reserved), immediately.
        let mut stream = vec![0x78, 0x01];
        stream.push(0b0000_0111);
        stream.extend_from_slice(&[0, 0, 0, 0]);

        let err = DeflateDecoder::new(&stream).decode_zlib(0);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_bad_header_parity()
    {
        let stream = [0x78, 0x02, 0, 0, 0, 0]; // fails mod-31 check
        assert!(DeflateDecoder::new(&stream).decode_zlib(0).is_err());
    }

    #[test]
    fn rejects_truncated_input()
    {
        let stream = [0x78];
        assert!(DeflateDecoder::new(&stream).decode_zlib(0).is_err());
    }

    #[test]
    fn rejects_distance_exceeding_output_so_far()
    {
        // Fixed-Huffman block containing a single backreference with no
        // prior output: literal/length symbol 257 (length 3) encoded as 7
        // bits value 0b0000000 (symbol 256 is 0x0000000 at length 7; 257 is
        // the next code). Rather than hand-encode bits, assert on a
        // synthetic stream built from flate2 with the back-reference logic
        // stressed via round trip coverage above; this test instead checks
        // our own manual LZ77 decode path directly catches corruption by
        // truncating a valid compressed stream before its last byte, which
        // must never panic or read out of bounds.
        let original = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let mut compressed = zlib_compress(original);
        compressed.truncate(compressed.len() - 1);
        assert!(DeflateDecoder::new(&compressed).decode_zlib(original.len()).is_err());
    }

    #[test]
    fn fixed_huffman_block_decodes_literal_bytes()
    {
        // Scenario: a fixed-Huffman block emitting literals 0x00, 0xFF, 0x80
        // followed by end-of-block. Fixed-table codes (RFC 1951 §3.2.6):
        // symbol s in 0..=143 is 8 bits, value 0x30+s; symbol s in 144..=255
        // is 9 bits, value 0x190+(s-144); symbol 256 (EOB) is 7 bits, value 0.
        let mut writer = BitWriter::new();
        writer.push_lsb(1, 1); // BFINAL=1
        writer.push_lsb(BTYPE_FIXED, 2); // BTYPE=01
        writer.push_huffman(0x30, 8); // literal 0x00
        writer.push_huffman(0x190 + (0xFF - 144), 9); // literal 0xFF
        writer.push_huffman(0x30 + 0x80, 8); // literal 0x80
        writer.push_huffman(0, 7); // end-of-block
        let payload = writer.finish();

        let expected = [0x00_u8, 0xFF, 0x80];
        let stream = wrap_zlib(&payload, &expected);

        let out = DeflateDecoder::new(&stream).decode_zlib(expected.len()).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn lz77_overlapping_copy_produces_run_length_output()
    {
        // Scenario: a stored block emitting "AB", followed by a final fixed
        // block containing a single length-5 distance-2 back-reference. The
        // copy must read bytes it has just written, producing "ABABABA".
        let mut writer = BitWriter::new();
        writer.push_lsb(0, 1); // BFINAL=0
        writer.push_lsb(BTYPE_STORED, 2); // BTYPE=00
        writer.align();
        writer.push_lsb(2, 16); // LEN=2
        writer.push_lsb(!2_u32 & 0xFFFF, 16); // NLEN=~LEN
        writer.push_lsb(b'A' as u32, 8);
        writer.push_lsb(b'B' as u32, 8);

        writer.push_lsb(1, 1); // BFINAL=1
        writer.push_lsb(BTYPE_FIXED, 2); // BTYPE=01
        // length=5 -> symbol 259 (256 + 3), 7-bit fixed code value 3, no extra bits.
        writer.push_huffman(3, 7);
        // distance=2 -> distance symbol 1, 5-bit fixed code value 1, no extra bits.
        writer.push_huffman(1, 5);
        writer.push_huffman(0, 7); // end-of-block
        let payload = writer.finish();

        let expected = b"ABABABA";
        let stream = wrap_zlib(&payload, expected);

        let out = DeflateDecoder::new(&stream).decode_zlib(expected.len()).unwrap();
        assert_eq!(out, expected);
    }
}
