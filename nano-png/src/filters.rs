//! Row filter (de)reconstruction.
//!
//! Shaped after `zune_png::filters`'s `handle_sub`/`handle_up`/`handle_avg`/
//! `handle_paeth`/`paeth` free-function layout, with the SIMD fast paths and
//! first-row-special-cased variants dropped: this crate treats "no previous
//! row" uniformly as an all-zero row, which is what the general formula
//! already gives for row 0 (`b = 0`, `c = 0`), so a single code path
//! handles every row.

use crate::error::PngError;

const NONE: u8 = 0;
const SUB: u8 = 1;
const UP: u8 = 2;
const AVERAGE: u8 = 3;
const PAETH: u8 = 4;

/// Reconstruct one raw scanline in place.
///
/// `current` holds the filtered bytes on entry and the unfiltered bytes on
/// exit. `prev` is the previously reconstructed row (or an all-zero row of
/// the same length, for row 0). `bpp` is the byte step to the left
/// neighbor, equal to the image's channel count for 8-bit images.
pub(crate) fn unfilter_row(filter: u8, current: &mut [u8], prev: &[u8], bpp: usize) -> Result<(), PngError>
{
    match filter
    {
        NONE => {}
        SUB => handle_sub(current, bpp),
        UP => handle_up(current, prev),
        AVERAGE => handle_average(current, prev, bpp),
        PAETH => handle_paeth(current, prev, bpp),
        other => return Err(PngError::UnknownFilterType(other))
    }
    Ok(())
}

fn handle_sub(current: &mut [u8], bpp: usize)
{
    for i in bpp..current.len()
    {
        current[i] = current[i].wrapping_add(current[i - bpp]);
    }
}

fn handle_up(current: &mut [u8], prev: &[u8])
{
    for (byte, &above) in current.iter_mut().zip(prev)
    {
        *byte = byte.wrapping_add(above);
    }
}

fn handle_average(current: &mut [u8], prev: &[u8], bpp: usize)
{
    for i in 0..current.len()
    {
        let a = if i >= bpp { u16::from(current[i - bpp]) } else { 0 };
        let b = u16::from(prev[i]);
        let average = ((a + b) / 2) as u8;
        current[i] = current[i].wrapping_add(average);
    }
}

fn handle_paeth(current: &mut [u8], prev: &[u8], bpp: usize)
{
    for i in 0..current.len()
    {
        let a = if i >= bpp { current[i - bpp] } else { 0 };
        let b = prev[i];
        let c = if i >= bpp { prev[i - bpp] } else { 0 };
        current[i] = current[i].wrapping_add(paeth_predictor(a, b, c));
    }
}

/// Selects, from the left (`a`), upper (`b`), and upper-left (`c`)
/// neighbors, whichever is closest to the linear estimate `a + b - c`. Ties
/// resolve a, then b, then c.
pub(crate) fn paeth_predictor(a: u8, b: u8, c: u8) -> u8
{
    let pa_base = i16::from(a) + i16::from(b) - i16::from(c);
    let pa = (pa_base - i16::from(a)).abs();
    let pb = (pa_base - i16::from(b)).abs();
    let pc = (pa_base - i16::from(c)).abs();

    if pa <= pb && pa <= pc
    {
        a
    }
    else if pb <= pc
    {
        b
    }
    else
    {
        c
    }
}
