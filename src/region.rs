// region.rs — Region descriptors and the labeling collaborator contract.
//
// Connected-component labeling is done by an external library on the board;
// the pipeline only hands it a cleaned mask and reads back descriptors. This
// module defines that boundary:
//
//   mask (0/1)  ──RegionLabeler::label──▶  Vec<Region>
//
// A region is a list of horizontal runs plus summary properties (area,
// bounding box, centroid). Runs are kept in the order the labeler produced
// them; consumers walk the list to the end and never mutate it.
//
// MASK CONVENTION: labelers take a strict {0, 1} mask. The pipeline's
// morphology output is {0, 255}; `to_unit_mask` converts between the two.
//
// `RunLabeler` is a small 8-connected reference labeler so the crate works
// on a host without the board library. It groups runs with a union-find
// over overlapping runs in adjacent rows.

use crate::image::{assert_same_shape, Image};

/// A maximal horizontal run of foreground pixels: columns
/// `start..=end` on `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

impl Run {
    /// Pixel count; a run always covers at least one pixel.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Pixel coordinates `(x, y)` covered by this run.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> {
        let row = self.row;
        (self.start..=self.end).map(move |x| (x, row))
    }

    /// True if the two runs are on adjacent rows and touch, diagonals included.
    #[inline]
    fn touches_8(&self, other: &Run) -> bool {
        self.start <= other.end + 1 && other.start <= self.end + 1
    }
}

/// Inclusive pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl BoundingBox {
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }
}

/// One connected foreground region as reported by a labeler.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Number of pixels.
    pub area: usize,
    pub bbox: BoundingBox,
    /// Mean pixel position `(x, y)`.
    pub centroid: (f32, f32),
    /// Member runs in labeler order.
    pub runs: Vec<Run>,
}

impl Region {
    /// Build a region from its runs, computing area, bounding box and centroid.
    ///
    /// # Panics
    /// Panics if `runs` is empty.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        assert!(!runs.is_empty(), "a region needs at least one run");

        let mut area = 0usize;
        let mut sum_x = 0f64;
        let mut sum_y = 0f64;
        let mut bbox = BoundingBox {
            left: usize::MAX,
            top: usize::MAX,
            right: 0,
            bottom: 0,
        };

        for run in &runs {
            let n = run.len();
            area += n;
            // Sum of start..=end is n * (start + end) / 2.
            sum_x += n as f64 * (run.start + run.end) as f64 / 2.0;
            sum_y += (n * run.row) as f64;
            bbox.left = bbox.left.min(run.start);
            bbox.right = bbox.right.max(run.end);
            bbox.top = bbox.top.min(run.row);
            bbox.bottom = bbox.bottom.max(run.row);
        }

        Region {
            area,
            bbox,
            centroid: ((sum_x / area as f64) as f32, (sum_y / area as f64) as f32),
            runs,
        }
    }

    /// Every pixel `(x, y)` in the region, run by run.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.runs.iter().flat_map(Run::pixels)
    }
}

/// External connected-component labeling.
///
/// Implementations receive a {0, 1} mask and return every connected region
/// of 1-pixels. The pipeline treats the result as read-only.
pub trait RegionLabeler {
    fn label(&mut self, mask: &Image<u8>) -> Vec<Region>;
}

/// Convert a {0, 255} mask into the {0, 1} convention labelers expect.
/// Any non-zero sample becomes 1.
pub fn to_unit_mask(src: &Image<u8>, dst: &mut Image<u8>) {
    assert_same_shape(src, dst);
    for (d, &s) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
        *d = (s != 0) as u8;
    }
}

// ============================================================
// Reference labeler
// ============================================================

/// 8-connected run-based labeler.
///
/// Scratch vectors are kept between calls so steady-state labeling does not
/// reallocate once they have grown to the scene's run count.
#[derive(Debug, Default)]
pub struct RunLabeler {
    runs: Vec<Run>,
    parent: Vec<usize>,
}

impl RunLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            // Path halving.
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Keep the earlier run as root so regions come out in raster order.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }

    fn collect_runs(&mut self, mask: &Image<u8>) {
        self.runs.clear();
        for y in 0..mask.height() {
            let row = mask.row(y);
            let mut x = 0;
            while x < row.len() {
                if row[x] == 0 {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < row.len() && row[x] != 0 {
                    x += 1;
                }
                self.runs.push(Run {
                    row: y,
                    start,
                    end: x - 1,
                });
            }
        }
    }
}

impl RegionLabeler for RunLabeler {
    fn label(&mut self, mask: &Image<u8>) -> Vec<Region> {
        self.collect_runs(mask);
        let n = self.runs.len();
        self.parent.clear();
        self.parent.extend(0..n);

        // Runs are sorted by row, then column. Two cursors sweep the
        // previous row's runs against the current row's.
        let mut prev_start = 0;
        let mut row_start = 0;
        while row_start < n {
            let row = self.runs[row_start].row;
            let mut row_end = row_start;
            while row_end < n && self.runs[row_end].row == row {
                row_end += 1;
            }

            let prev_row_adjacent = prev_start < row_start && self.runs[prev_start].row + 1 == row;
            if prev_row_adjacent {
                for cur in row_start..row_end {
                    for prev in prev_start..row_start {
                        if self.runs[cur].touches_8(&self.runs[prev]) {
                            self.union(cur, prev);
                        }
                    }
                }
            }

            prev_start = row_start;
            row_start = row_end;
        }

        // Group runs by root, regions ordered by their first run.
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        let mut groups: Vec<Vec<Run>> = Vec::new();
        for i in 0..n {
            let root = self.find(i);
            let slot = match slot_of_root[root] {
                Some(s) => s,
                None => {
                    groups.push(Vec::new());
                    slot_of_root[root] = Some(groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[slot].push(self.runs[i]);
        }

        groups.into_iter().map(Region::from_runs).collect()
    }
}
