//! Chunk framing — length/type/payload/CRC.
//!
//! Reads a 4-byte big-endian length, a 4-byte type, then the CRC after the
//! payload, generalized into a standalone iterator so the driver in
//! `decoder.rs` can `for chunk in ChunkIter::new(data) { ... }`.

use crate::crc;
use crate::error::PngError;

pub(crate) struct Chunk<'a>
{
    pub kind:    [u8; 4],
    pub payload: &'a [u8]
}

impl<'a> Chunk<'a>
{
    /// True when the lowercase bit (bit 5) of the first type byte is clear,
    /// i.e. this is a critical chunk a decoder may not silently skip.
    /// Matches `zune_png::options::default_chunk_handler`'s test.
    pub(crate) fn is_critical(&self) -> bool
    {
        self.kind[0] & 0x20 == 0
    }

    pub(crate) fn is(&self, name: &[u8; 4]) -> bool
    {
        &self.kind == name
    }
}

pub(crate) struct ChunkIter<'a>
{
    data:        &'a [u8],
    pos:         usize,
    confirm_crc: bool,
    done:        bool
}

impl<'a> ChunkIter<'a>
{
    pub(crate) fn new(data: &'a [u8], confirm_crc: bool) -> Self
    {
        ChunkIter { data, pos: 0, confirm_crc, done: false }
    }
}

impl<'a> Iterator for ChunkIter<'a>
{
    type Item = Result<Chunk<'a>, PngError>;

    fn next(&mut self) -> Option<Self::Item>
    {
        if self.done
        {
            return None;
        }
        if self.pos + 8 > self.data.len()
        {
            self.done = true;
            return Some(Err(PngError::Truncated));
        }

        let length = u32::from_be_bytes(self.data[self.pos..self.pos + 4].try_into().unwrap()) as usize;
        let kind: [u8; 4] = self.data[self.pos + 4..self.pos + 8].try_into().unwrap();

        let payload_start = self.pos + 8;
        let payload_end = match payload_start.checked_add(length)
        {
            Some(end) if end + 4 <= self.data.len() => end,
            _ =>
            {
                self.done = true;
                return Some(Err(PngError::Truncated));
            }
        };

        let payload = &self.data[payload_start..payload_end];

        #[cfg(feature = "crc")]
        if self.confirm_crc
        {
            let stored_crc = u32::from_be_bytes(self.data[payload_end..payload_end + 4].try_into().unwrap());
            let mut crc_input = Vec::with_capacity(4 + length);
            crc_input.extend_from_slice(&kind);
            crc_input.extend_from_slice(payload);
            let computed = crc::crc32(&crc_input);
            if computed != stored_crc
            {
                self.done = true;
                return Some(Err(PngError::BadCrc { expected: stored_crc, computed }));
            }
        }

        self.pos = payload_end + 4;
        if kind == *b"IEND"
        {
            self.done = true;
        }
        Some(Ok(Chunk { kind, payload }))
    }
}
