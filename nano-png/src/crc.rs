//! CRC-32 (the PNG/ITU polynomial), used to verify every chunk's integrity.
//!
//! Built once behind a `OnceLock` rather than lazily on first use with no
//! synchronization, matching `zune-png`'s practice of making its one piece
//! of process-wide state safe under concurrent first use.

use std::sync::OnceLock;

const POLYNOMIAL: u32 = 0xEDB8_8320;

fn table() -> &'static [u32; 256]
{
    static TABLE: OnceLock<[u32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0_u32; 256];
        let mut n = 0;
        while n < 256
        {
            let mut c = n as u32;
            let mut k = 0;
            while k < 8
            {
                c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
                k += 1;
            }
            table[n] = c;
            n += 1;
        }
        table
    })
}

/// CRC-32 over `data`, as used by PNG chunks (computed over chunk type
/// concatenated with chunk payload).
pub(crate) fn crc32(data: &[u8]) -> u32
{
    let table = table();
    let mut crc = 0xFFFF_FFFF_u32;
    for &byte in data
    {
        crc = table[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ 0xFFFF_FFFF
}
