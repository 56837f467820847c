use std::fmt::{Debug, Display, Formatter};

/// Everything that can go wrong while inflating a zlib/DEFLATE stream.
///
/// There is no partial-success variant: any error here means the caller gets
/// nothing back, per the "no local recovery" policy the format built on top
/// of this crate (PNG) expects.
pub enum InflateError
{
    /// Fewer bytes than the minimum zlib framing (2-byte header + 4-byte
    /// trailer) were supplied.
    InsufficientData,
    /// `CMF` byte's low nibble was not 8 (deflate).
    BadCompressionMethod(u8),
    /// `(CMF << 8) + FLG` was not a multiple of 31.
    BadHeaderCheck,
    /// `BTYPE == 0b11`.
    ReservedBlockType,
    /// A stored block's `LEN` did not match `!NLEN`.
    StoredLengthMismatch,
    /// Huffman code lengths form an over-subscribed code (Kraft's
    /// inequality violated).
    OversubscribedHuffman,
    /// Huffman code lengths form an incomplete code that isn't the one
    /// documented empty-code exception.
    IncompleteHuffman,
    /// A code length of 16 (copy previous) appeared with no previous length.
    RepeatWithNoPrevious,
    /// A literal/length or distance symbol fell in the reserved range
    /// (286-287, or 30-31).
    ReservedSymbol,
    /// A back-reference's distance exceeded the number of bytes produced
    /// so far.
    DistanceTooFar,
    /// Decoding would have produced more bytes than the caller-supplied
    /// expected length.
    OutputOverflow,
    /// Bits were requested past the end of the input.
    BitstreamUnderrun,
    /// Final decoded length did not equal the expected length.
    LengthMismatch { expected: usize, actual: usize },
    /// Trailing Adler-32 did not match the decoded bytes.
    AdlerMismatch { expected: u32, actual: u32 },
    /// A repeat code-length run-length spilled past the declared
    /// HLIT+HDIST symbol count.
    RepeatCountOverflow
}

impl Display for InflateError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::InsufficientData => write!(f, "not enough bytes for a zlib stream"),
            Self::BadCompressionMethod(cm) =>
            {
                write!(f, "unsupported zlib compression method {cm}, expected 8 (deflate)")
            }
            Self::BadHeaderCheck => write!(f, "zlib header failed the FCHECK parity test"),
            Self::ReservedBlockType => write!(f, "DEFLATE block used reserved BTYPE 0b11"),
            Self::StoredLengthMismatch => write!(f, "stored block LEN did not match ~NLEN"),
            Self::OversubscribedHuffman =>
            {
                write!(f, "Huffman code lengths over-subscribe the codespace")
            }
            Self::IncompleteHuffman =>
            {
                write!(f, "Huffman code lengths under-subscribe the codespace")
            }
            Self::RepeatWithNoPrevious => write!(f, "code-length 16 (repeat) with no previous length"),
            Self::ReservedSymbol => write!(f, "reserved literal/length or distance symbol decoded"),
            Self::DistanceTooFar => write!(f, "back-reference distance exceeds bytes written so far"),
            Self::OutputOverflow => write!(f, "decoded output would exceed the expected length"),
            Self::BitstreamUnderrun => write!(f, "ran out of input bits mid-symbol"),
            Self::LengthMismatch { expected, actual } =>
            {
                write!(f, "decoded {actual} bytes but expected exactly {expected}")
            }
            Self::AdlerMismatch { expected, actual } =>
            {
                write!(f, "Adler-32 mismatch: expected {expected:#010x}, got {actual:#010x}")
            }
            Self::RepeatCountOverflow =>
            {
                write!(f, "code-length repeat run overflows the declared symbol count")
            }
        }
    }
}

impl Debug for InflateError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        Display::fmt(self, f)
    }
}

impl std::error::Error for InflateError {}
