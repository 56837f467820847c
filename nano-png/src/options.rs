//! Decoder configuration.
//!
//! Shaped after `zune_png::options::PngOptions`: a small bag of resource
//! limits and a CRC-verification toggle, constructed via `Default` and
//! mutated with `with_*` builder methods rather than public fields.

use crate::constants::{DEFAULT_MAX_DIMENSION, DEFAULT_MAX_RAW_LEN};

#[derive(Debug, Clone, Copy)]
pub struct DecoderOptions
{
    max_width:   u32,
    max_height:  u32,
    max_raw_len: usize,
    confirm_crc: bool
}

impl Default for DecoderOptions
{
    fn default() -> Self
    {
        DecoderOptions {
            max_width:   DEFAULT_MAX_DIMENSION,
            max_height:  DEFAULT_MAX_DIMENSION,
            max_raw_len: DEFAULT_MAX_RAW_LEN,
            confirm_crc: true
        }
    }
}

impl DecoderOptions
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub const fn with_max_width(mut self, max_width: u32) -> Self
    {
        self.max_width = max_width;
        self
    }

    pub const fn with_max_height(mut self, max_height: u32) -> Self
    {
        self.max_height = max_height;
        self
    }

    pub const fn with_max_raw_len(mut self, max_raw_len: usize) -> Self
    {
        self.max_raw_len = max_raw_len;
        self
    }

    /// Disabling this skips chunk CRC-32 verification entirely, trading
    /// integrity checking for a faster decode of trusted input.
    pub const fn with_crc_check(mut self, confirm_crc: bool) -> Self
    {
        self.confirm_crc = confirm_crc;
        self
    }

    pub const fn max_width(&self) -> u32
    {
        self.max_width
    }

    pub const fn max_height(&self) -> u32
    {
        self.max_height
    }

    pub const fn max_raw_len(&self) -> usize
    {
        self.max_raw_len
    }

    pub const fn confirm_crc(&self) -> bool
    {
        self.confirm_crc
    }
}
