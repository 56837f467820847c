//! Adler-32, the checksum zlib (RFC 1950) appends after the DEFLATE stream.

const MOD_ADLER: u32 = 65521;

/// Computes the Adler-32 checksum zlib appends after a DEFLATE stream.
/// Exposed so encoders (which also need to emit this trailer) don't have to
/// duplicate it.
pub fn adler32(data: &[u8]) -> u32
{
    let mut a: u32 = 1;
    let mut b: u32 = 0;

    // Accumulate in chunks small enough that `b` cannot overflow a u32
    // before the next reduction mod 65521 (the classic zlib trick).
    for chunk in data.chunks(5552)
    {
        for &byte in chunk
        {
            a += u32::from(byte);
            b += a;
        }
        a %= MOD_ADLER;
        b %= MOD_ADLER;
    }

    (b << 16) | a
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn empty_input_is_one()
    {
        assert_eq!(adler32(&[]), 1);
    }

    #[test]
    fn matches_known_vector()
    {
        // "Wikipedia" -> 0x11E60398, a commonly cited Adler-32 test vector.
        assert_eq!(adler32(b"Wikipedia"), 0x1_1E60398);
    }
}
