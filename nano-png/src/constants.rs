pub(crate) const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Hard safety cap on the predicted raw (pre-unfilter) inflate output, so a
/// hostile IHDR can't make us allocate an unbounded buffer before we've
/// verified a single byte of pixel data.
pub(crate) const DEFAULT_MAX_RAW_LEN: usize = 256 * 1024 * 1024;

/// Sanity bound on width/height individually, well below what would make
/// `width * height * channels` approach `usize` overflow on 32-bit targets.
pub(crate) const DEFAULT_MAX_DIMENSION: u32 = 1 << 24;

/// Maximum bytes a single DEFLATE stored block may carry (a 16-bit LEN).
pub(crate) const MAX_STORED_BLOCK_LEN: usize = 0xFFFF;

/// Zlib header bytes this encoder always emits: CMF=0x78 (deflate, 32K
/// window), FLG=0x01 (no preset dictionary, fastest/level 0, FCHECK makes
/// `0x7801 % 31 == 0`).
pub(crate) const ZLIB_HEADER: [u8; 2] = [0x78, 0x01];
