//! Viewport windowing for the entry list.
//!
//! Pure computation of which contiguous range of entries fits on screen. It keeps the
//! cursor centered when possible and clamps at both ends so the window never shows a
//! dead region. Recomputed on every draw since both cursor and terminal size change.

use std::ops::Range;

/// Half-open window `[begin, end)` of entry indices to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    begin: usize,
    end: usize,
}

impl Viewport {
    /// Computes the window for `total` entries, the cursor index and the rows available.
    ///
    /// The window always has `min(rows, total)` entries and contains the cursor when
    /// there is at least one row.
    pub fn compute(total: usize, cursor: usize, rows: usize) -> Self {
        let n = rows.min(total);
        if n == 0 {
            return Self::default();
        }
        let cursor = cursor.min(total - 1);
        let half = n / 2;

        let (begin, end) = if cursor < half {
            (0, n)
        } else if cursor >= total - half {
            (total - n, total)
        } else {
            (cursor - half, cursor + half + (n & 1))
        };
        Self { begin, end }
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }
}
