//! Canonical Huffman table construction and decode, per RFC 1951 §3.2.2.

use crate::constants::MAX_CODE_LENGTH;
use crate::errors::InflateError;

pub(crate) struct HuffmanTable
{
    /// `count[len]` = number of codes of length `len`. Index 0 is unused.
    count:  [u16; MAX_CODE_LENGTH + 1],
    /// Symbols in canonical order, grouped by code length.
    symbol: [u16; 288]
}

impl HuffmanTable
{
    /// Build a canonical Huffman table from a slice of code lengths (one per
    /// symbol, 0 meaning "symbol unused").
    pub(crate) fn build(lengths: &[u8]) -> Result<Self, InflateError>
    {
        let mut count = [0_u16; MAX_CODE_LENGTH + 1];

        for &len in lengths
        {
            let len = usize::from(len);
            if len > MAX_CODE_LENGTH
            {
                return Err(InflateError::OversubscribedHuffman);
            }
            count[len] += 1;
        }

        // Kraft's inequality: verify the lengths don't over-subscribe the
        // codespace, and note whether they leave it incomplete.
        let mut left: i32 = 1;
        for len in 1..=MAX_CODE_LENGTH
        {
            left <<= 1;
            left -= i32::from(count[len]);
            if left < 0
            {
                return Err(InflateError::OversubscribedHuffman);
            }
        }

        if left != 0
        {
            // Incomplete code. The only case DEFLATE actually relies on is an
            // *empty* code (a distance alphabet used by zero back-references
            // in a block with only literals) — everything else, including the
            // well-known "single length-1 symbol" corner, is rejected.
            let total: u16 = count[1..].iter().sum();
            if total != 0
            {
                return Err(InflateError::IncompleteHuffman);
            }
        }

        let mut offsets = [0_u16; MAX_CODE_LENGTH + 2];
        for len in 1..=MAX_CODE_LENGTH
        {
            offsets[len + 1] = offsets[len] + count[len];
        }

        let mut symbol = [0_u16; 288];
        let mut next_offset = offsets;
        for (sym, &len) in lengths.iter().enumerate()
        {
            let len = usize::from(len);
            if len != 0
            {
                symbol[usize::from(next_offset[len])] = sym as u16;
                next_offset[len] += 1;
            }
        }

        Ok(HuffmanTable { count, symbol })
    }

    /// Decode exactly one symbol, reading bits MSB-first one at a time.
    pub(crate) fn decode(&self, reader: &mut crate::bitstream::BitReader) -> Result<u16, InflateError>
    {
        let mut code: u32 = 0;
        let mut first: u32 = 0;
        let mut index: u32 = 0;

        for len in 1..=MAX_CODE_LENGTH
        {
            code |= reader.get_bit()?;
            let count = u32::from(self.count[len]);
            if code < first + count
            {
                return Ok(self.symbol[(index + (code - first)) as usize]);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }

        Err(InflateError::OversubscribedHuffman)
    }
}
