#![no_main]

use libfuzzer_sys::fuzz_target;
use nano_png::{DecoderOptions, PngDecoder};

fuzz_target!(|data: &[u8]| {
    // CRC verification off: we're after panics/hangs on malformed structure,
    // not re-exercising the checksum path on every input.
    let options = DecoderOptions::new().with_crc_check(false);
    let _ = PngDecoder::new_with_options(data, options).decode();
});
