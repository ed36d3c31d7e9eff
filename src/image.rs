// image.rs — Fixed-size frame buffer, generic over sample type.
//
// Every buffer in the pipeline is one of two shapes:
//
//   Image<u8>       grayscale intensity, or a binary mask (0/255 or 0/1)
//   Image<[u8; 3]>  interleaved 3-channel colour (BGR from the sensor,
//                   Y/Cb/Cr after conversion)
//
// Geometry is fixed when the buffer is created and never changes. The
// pipeline allocates its buffers once and rewrites them in place every
// frame, so nothing here reallocates after construction.
//
// Memory layout (width = 4, height = 3), row-major, no padding:
//
//   data index:  0  1  2  3   4  5  6  7   8  9 10 11
//   row:         |- row 0 -|  |- row 1 -|  |- row 2 -|
//
// Pixel (x, y) lives at index y * width + x. All accessors take (x, y),
// column first, and bounds-check; hot loops borrow whole rows instead.

use std::fmt;

// ---------------------------------------------------------------------------
// Pixel Trait
// ---------------------------------------------------------------------------

/// Trait for sample types that can be stored in an Image.
pub trait Pixel: Copy + Default + PartialEq + Send + Sync + 'static {
    /// Number of interleaved bytes per pixel.
    const CHANNELS: usize;
}

impl Pixel for u8 {
    const CHANNELS: usize = 1;
}

impl Pixel for [u8; 3] {
    const CHANNELS: usize = 3;
}

// ---------------------------------------------------------------------------
// Image<T>
// ---------------------------------------------------------------------------

/// A 2D frame buffer with fixed dimensions, generic over sample type `T`.
pub struct Image<T: Pixel> {
    /// Samples in row-major order. Length = width * height.
    data: Vec<T>,
    width: usize,
    height: usize,
}

// Explicit so a deep copy of a frame is visible at the call site.
impl<T: Pixel> Clone for Image<T> {
    fn clone(&self) -> Self {
        Image {
            data: self.data.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Pixel> Image<T> {
    // --- Constructors ---

    /// Create a zero-initialized image with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Image {
            data: vec![T::default(); width * height],
            width,
            height,
        }
    }

    /// Create an image from an existing sample vector (row-major).
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "data length ({}) must equal width * height ({})",
            data.len(),
            width * height,
        );
        Image { data, width, height }
    }

    /// Create an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Image { data, width, height }
    }

    // --- Accessors ---

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of interleaved bytes per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        T::CHANNELS
    }

    /// `(width, height)` pair, handy for shape assertions.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True when `other` has the same width and height (sample type may differ).
    #[inline]
    pub fn same_shape<U: Pixel>(&self, other: &Image<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Get the pixel value at (x, y). x is column, y is row.
    ///
    /// # Panics
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.bounds_check(x, y);
        self.data[y * self.width + x]
    }

    /// Get a mutable reference to the pixel at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        self.bounds_check(x, y);
        let idx = y * self.width + x;
        &mut self.data[idx]
    }

    /// Set the pixel at (x, y) to the given value.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }

    /// Borrow a single row as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Mutable borrow of a single row.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Iterate over all pixels as `(x, y, value)` tuples.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| (x, y, self.data[y * self.width + x]))
        })
    }

    /// Flat view of all samples, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat view of all samples.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    // --- Bulk operations (no reallocation) ---

    /// Overwrite every pixel with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Reset every pixel to the zero value.
    pub fn clear(&mut self) {
        self.fill(T::default());
    }

    /// Overwrite the outer `border` rows and columns with `value`.
    pub fn fill_border(&mut self, border: usize, value: T) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            let row = self.row_mut(y);
            if y < border || y + border >= h {
                row.fill(value);
            } else {
                let b = border.min(w);
                row[..b].fill(value);
                row[w - b..].fill(value);
            }
        }
    }

    /// Copy all pixels from `src` into this buffer.
    ///
    /// # Panics
    /// Panics if the shapes differ.
    pub fn copy_from(&mut self, src: &Image<T>) {
        assert_same_shape(self, src);
        self.data.copy_from_slice(&src.data);
    }

    /// Count pixels equal to `value`.
    pub fn count(&self, value: T) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }

    // --- Internal helpers ---

    #[inline]
    fn bounds_check(&self, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) out of bounds for image {}×{}",
            self.width,
            self.height,
        );
    }
}

/// Panic unless both buffers have identical width and height.
///
/// Shape mismatches are programming errors: every buffer in a pipeline is
/// allocated from the same fixed geometry.
#[inline]
#[track_caller]
pub fn assert_same_shape<A: Pixel, B: Pixel>(a: &Image<A>, b: &Image<B>) {
    assert!(
        a.same_shape(b),
        "buffer shape mismatch: {}×{} vs {}×{}",
        a.width(),
        a.height(),
        b.width(),
        b.height(),
    );
}

// Debug formatting — useful for small images in tests.
impl<T: Pixel + fmt::Debug> fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Image<{}> {{ {}×{} }}",
            std::any::type_name::<T>(),
            self.width,
            self.height,
        )?;
        for y in 0..self.height.min(16) {
            write!(f, "  row {y:2}: [")?;
            for x in 0..self.width.min(16) {
                if x > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", self.get(x, y))?;
            }
            if self.width > 16 {
                write!(f, ", ...")?;
            }
            writeln!(f, "]")?;
        }
        if self.height > 16 {
            writeln!(f, "  ...")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Index / IndexMut — img[(x, y)] syntax
// ---------------------------------------------------------------------------

impl<T: Pixel> std::ops::Index<(usize, usize)> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        self.bounds_check(x, y);
        &self.data[y * self.width + x]
    }
}

impl<T: Pixel> std::ops::IndexMut<(usize, usize)> for Image<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        self.get_mut(x, y)
    }
}
