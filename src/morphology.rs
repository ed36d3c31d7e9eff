// morphology.rs — 3×3 binary erosion and dilation.
//
// For each interior pixel, erosion takes the bitwise AND and dilation the
// bitwise OR of the 9 samples in the 3×3 neighbourhood:
//
//     (x-1,y-1) (x,y-1) (x+1,y-1)
//     (x-1,y  ) (x,y  ) (x+1,y  )
//     (x-1,y+1) (x,y+1) (x+1,y+1)
//
// On a mask holding only 0 and 255 this is exactly neighbourhood min/max,
// i.e. the textbook operators with a 3×3 square structuring element. On
// any other byte values the result is a bitwise mix, not a set operation.
// Callers must hand in a {0, 255} mask.
//
// Pixels closer than `border` to an edge are never written, so the 3×3
// window never leaves the frame. `src` and `dst` are separate borrows, so
// the window can never observe its own output.
//
// Opening (erode, then dilate) removes specks smaller than 3×3 and leaves
// larger blobs at their original extent.

use crate::image::{assert_same_shape, Image};

/// Bitwise AND over the 3×3 neighbourhood of every interior pixel.
///
/// # Panics
/// Panics if `border == 0` or the shapes differ.
pub fn erode3x3(src: &Image<u8>, dst: &mut Image<u8>, border: usize) {
    filter3x3(src, dst, border, |a, b| a & b);
}

/// Bitwise OR over the 3×3 neighbourhood of every interior pixel.
///
/// # Panics
/// Panics if `border == 0` or the shapes differ.
pub fn dilate3x3(src: &Image<u8>, dst: &mut Image<u8>, border: usize) {
    filter3x3(src, dst, border, |a, b| a | b);
}

/// Morphological opening in place: `mask` → erode → `scratch` → dilate → `mask`.
///
/// `scratch` is overwritten on its interior; its border is left alone.
pub fn open3x3(mask: &mut Image<u8>, scratch: &mut Image<u8>, border: usize) {
    erode3x3(mask, scratch, border);
    dilate3x3(scratch, mask, border);
}

/// Morphological closing in place: dilate into `scratch`, erode back into `mask`.
pub fn close3x3(mask: &mut Image<u8>, scratch: &mut Image<u8>, border: usize) {
    dilate3x3(mask, scratch, border);
    erode3x3(scratch, mask, border);
}

fn filter3x3(src: &Image<u8>, dst: &mut Image<u8>, border: usize, op: impl Fn(u8, u8) -> u8) {
    assert!(border >= 1, "3×3 filtering needs a border of at least 1");
    assert_same_shape(src, dst);

    let (w, h) = src.dimensions();
    if w <= 2 * border || h <= 2 * border {
        return;
    }

    for y in border..h - border {
        let above = src.row(y - 1);
        let here = src.row(y);
        let below = src.row(y + 1);
        let out = dst.row_mut(y);

        for x in border..w - border {
            let mut acc = here[x];
            for row in [above, here, below] {
                acc = op(acc, row[x - 1]);
                acc = op(acc, row[x]);
                acc = op(acc, row[x + 1]);
            }
            out[x] = acc;
        }
    }
}
