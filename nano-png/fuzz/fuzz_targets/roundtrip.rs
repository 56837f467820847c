#![no_main]

use libfuzzer_sys::fuzz_target;
use nano_png::{ColorType, Image, PngDecoder, PngEncoder};

const METADATA_BYTES: usize = 2;

fuzz_target!(|data: &[u8]| {
    if let Some(image) = build_image(data) {
        let encoded = PngEncoder::new(&image).encode_to_vec().expect("encode should not fail");
        let decoded = PngDecoder::new(&encoded).decode().expect("re-decoding our own output should not fail");
        assert_eq!(decoded.buffer(), image.buffer());
        assert_eq!(decoded.width(), image.width());
        assert_eq!(decoded.height(), image.height());
    }
});

/// Derives a small image's dimensions and pixel buffer directly from fuzzer
/// bytes, so the corpus explores width/height/channel combinations instead
/// of requiring a second PNG encoder as an oracle.
fn build_image(data: &[u8]) -> Option<Image> {
    if data.len() <= METADATA_BYTES {
        return None;
    }
    let height = u32::from(data[0].clamp(1, 64));
    let color = match data[1] % 4 {
        0 => ColorType::Grayscale,
        1 => ColorType::GrayscaleAlpha,
        2 => ColorType::Rgb,
        _ => ColorType::Rgba
    };

    let pixels = &data[METADATA_BYTES..];
    let channels = color.channels() as u32;
    let width = (pixels.len() as u32) / height / channels;
    if width == 0 {
        return None;
    }

    let needed = (width * height * channels) as usize;
    Image::new(width, height, color, pixels[..needed].to_vec()).ok()
}
