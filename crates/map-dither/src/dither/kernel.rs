//! Error diffusion kernel definition and the sliding error window.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`: the neighbor at `(x + dx, y + dy)`
/// receives `error * weight / divisor`. Only not-yet-visited neighbors
/// appear, so `dy >= 0` and `dx > 0` when `dy == 0`.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum dy value in entries; the error window holds `max_dy + 1` rows.
    pub max_dy: usize,
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

/// Sliding window of accumulated error.
///
/// Holds only the rows the kernel can reach instead of a full-image float
/// copy: `rows[0]` is the current row, `rows[1]` the next, and so on.
#[derive(Debug)]
pub(crate) struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Allocate `row_depth` zeroed rows of `width` entries.
    ///
    /// Returns `None` if the allocation cannot be satisfied.
    pub(crate) fn try_new(width: usize, row_depth: usize) -> Option<Self> {
        let mut rows = Vec::new();
        rows.try_reserve_exact(row_depth).ok()?;
        for _ in 0..row_depth {
            let mut row = Vec::new();
            row.try_reserve_exact(width).ok()?;
            row.resize(width, [0.0; 3]);
            rows.push(row);
        }
        Some(Self { rows, width })
    }

    /// Error accumulated so far for column `x` of the current row.
    #[inline]
    pub(crate) fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below the current one.
    ///
    /// Out-of-range targets are ignored.
    #[inline]
    pub(crate) fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            let cell = &mut self.rows[row_offset][x];
            for c in 0..3 {
                cell[c] += error[c];
            }
        }
    }

    /// Rotate so the next row becomes current and a zeroed row is appended.
    pub(crate) fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}
