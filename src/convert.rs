// convert.rs — Colour-space conversions for sensor frames.
//
// The sensor delivers interleaved B, G, R bytes. Colour segmentation works
// in Y/Cb/Cr (ITU-R BT.601, full range):
//
//   Y  =       0.299 R + 0.587 G + 0.114 B
//   Cb = 128 - 0.169 R - 0.331 G + 0.500 B
//   Cr = 128 + 0.500 R - 0.419 G - 0.081 B
//
// Y carries brightness; Cb/Cr carry colour and are roughly invariant to
// lighting, which is what the change detector and the region classifier
// compare on.
//
// Results are rounded and CLAMPED to 0..=255. Pure red, for instance, has
// Cr = 255.5 and saturates at 255 instead of wrapping to 0.
//
// Output channel order: [Y, Cb, Cr].

use crate::image::{assert_same_shape, Image};

/// Channel index of luma in a converted buffer.
pub const LUMA: usize = 0;
/// Channel index of blue-difference chroma.
pub const CB: usize = 1;
/// Channel index of red-difference chroma.
pub const CR: usize = 2;

#[inline]
fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert one BGR pixel to [Y, Cb, Cr].
#[inline]
pub fn bgr_pixel_to_ycbcr([b, g, r]: [u8; 3]) -> [u8; 3] {
    let (b, g, r) = (b as f32, g as f32, r as f32);
    [
        saturate(0.299 * r + 0.587 * g + 0.114 * b),
        saturate(128.0 - 0.169 * r - 0.331 * g + 0.500 * b),
        saturate(128.0 + 0.500 * r - 0.419 * g - 0.081 * b),
    ]
}

/// Convert a full BGR frame to Y/Cb/Cr. Every pixel is written.
///
/// # Panics
/// Panics if `src` and `dst` differ in shape.
pub fn bgr_to_ycbcr(src: &Image<[u8; 3]>, dst: &mut Image<[u8; 3]>) {
    assert_same_shape(src, dst);
    for (d, &s) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
        *d = bgr_pixel_to_ycbcr(s);
    }
}

/// Luma-only conversion of a BGR frame into a grayscale buffer.
pub fn bgr_to_gray(src: &Image<[u8; 3]>, dst: &mut Image<u8>) {
    assert_same_shape(src, dst);
    for (d, &[b, g, r]) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
        *d = saturate(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32);
    }
}

/// Copy one channel of a 3-channel buffer into a grayscale buffer.
///
/// # Panics
/// Panics if `channel >= 3` or the shapes differ.
pub fn extract_channel(src: &Image<[u8; 3]>, channel: usize, dst: &mut Image<u8>) {
    assert!(channel < 3, "channel index {channel} out of range for 3-channel image");
    assert_same_shape(src, dst);
    for (d, s) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
        *d = s[channel];
    }
}
