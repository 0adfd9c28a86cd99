// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{Area, Lifespan, Offset, TimeValue};

/// A sub-interval of a buffer's lifespan during which the buffer is
/// inactive and its memory may be reused by others.
///
/// Canonical form (established by the solver's canonicalization pass):
/// gaps are sorted by `lower`, pairwise disjoint, non-adjacent, and
/// strictly interior to the owning lifespan.
pub type Gap = Lifespan;

/// A single allocation request: a lifespan on the time axis and a size on
/// the memory axis, together with the constraints the assigned offset must
/// satisfy.
///
/// Buffers are constructed by problem ingestion and treated as immutable
/// afterwards; canonicalization replaces a buffer wholesale rather than
/// mutating it in place.
///
/// # Examples
///
/// ```rust
/// # use minimalloc_model::buffer::Buffer;
/// # use minimalloc_model::Lifespan;
///
/// let buffer = Buffer::new("b0", Lifespan::new(0, 10), 4)
///     .with_alignment(2)
///     .with_gap(Lifespan::new(3, 5));
/// assert_eq!(buffer.area(), 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buffer {
    /// A unique identifier for this buffer (used in file I/O and as a
    /// deterministic tie-breaker in the solver's placement order).
    pub id: String,
    /// The half-open time interval during which this buffer exists.
    pub lifespan: Lifespan,
    /// The amount of memory occupied while the buffer is active.
    pub size: i64,
    /// Every assigned offset must be a multiple of this value.
    pub alignment: i64,
    /// Slots where this buffer is inactive.
    pub gaps: Vec<Gap>,
    /// If present, the fixed position of this buffer.
    pub offset: Option<Offset>,
}

impl Buffer {
    /// Creates a new buffer with alignment 1, no gaps, and no fixed
    /// offset.
    pub fn new<S: Into<String>>(id: S, lifespan: Lifespan, size: i64) -> Self {
        Self {
            id: id.into(),
            lifespan,
            size,
            alignment: 1,
            gaps: Vec::new(),
            offset: None,
        }
    }

    /// Sets the alignment requirement.
    #[inline]
    pub fn with_alignment(mut self, alignment: i64) -> Self {
        self.alignment = alignment;
        self
    }

    /// Appends a single gap.
    #[inline]
    pub fn with_gap(mut self, gap: Gap) -> Self {
        self.gaps.push(gap);
        self
    }

    /// Replaces the gap list.
    #[inline]
    pub fn with_gaps<I>(mut self, gaps: I) -> Self
    where
        I: IntoIterator<Item = Gap>,
    {
        self.gaps = gaps.into_iter().collect();
        self
    }

    /// Pins the buffer to a fixed offset.
    #[inline]
    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns the total time this buffer is active: the lifespan length
    /// minus the combined gap length.
    pub fn active_length(&self) -> TimeValue {
        let gap_total: TimeValue = self.gaps.iter().map(|g| g.len()).sum();
        self.lifespan.len() - gap_total
    }

    /// Returns the product of this buffer's size and its active length.
    #[inline]
    pub fn area(&self) -> Area {
        self.size * self.active_length()
    }

    /// Returns `true` if the buffer occupies memory at time `t`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_model::buffer::Buffer;
    /// # use minimalloc_model::Lifespan;
    ///
    /// let buffer = Buffer::new("b", Lifespan::new(0, 10), 1)
    ///     .with_gap(Lifespan::new(4, 6));
    /// assert!(buffer.is_active_at(3));
    /// assert!(!buffer.is_active_at(4));
    /// assert!(!buffer.is_active_at(10));
    /// ```
    pub fn is_active_at(&self, t: TimeValue) -> bool {
        self.lifespan.contains_point(t) && !self.gaps.iter().any(|g| g.contains_point(t))
    }

    /// Returns an iterator over the buffer's active intervals: the
    /// lifespan minus its gaps, as a disjoint, sorted sequence of
    /// half-open intervals.
    ///
    /// The gap list must be canonical (sorted, disjoint, interior);
    /// canonicalization guarantees this for every buffer the solver and
    /// validator see.
    #[inline]
    pub fn active_intervals(&self) -> ActiveIntervals<'_> {
        ActiveIntervals {
            cursor: self.lifespan.lower(),
            end: self.lifespan.upper(),
            gaps: self.gaps.iter(),
        }
    }
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Buffer(id: {}, lifespan: {}, size: {}, alignment: {}, gaps: {}, offset: {:?})",
            self.id,
            self.lifespan,
            self.size,
            self.alignment,
            self.gaps.len(),
            self.offset
        )
    }
}

/// An iterator over a buffer's active intervals, yielded in ascending
/// order without allocating.
#[derive(Clone, Debug)]
pub struct ActiveIntervals<'a> {
    cursor: TimeValue,
    end: TimeValue,
    gaps: std::slice::Iter<'a, Gap>,
}

impl Iterator for ActiveIntervals<'_> {
    type Item = Lifespan;

    fn next(&mut self) -> Option<Self::Item> {
        for gap in self.gaps.by_ref() {
            let piece_end = gap.lower().min(self.end);
            if self.cursor < piece_end {
                let piece = Lifespan::new_unchecked(self.cursor, piece_end);
                self.cursor = gap.upper();
                return Some(piece);
            }
            self.cursor = self.cursor.max(gap.upper());
        }

        if self.cursor < self.end {
            let piece = Lifespan::new_unchecked(self.cursor, self.end);
            self.cursor = self.end;
            Some(piece)
        } else {
            None
        }
    }
}

impl std::iter::FusedIterator for ActiveIntervals<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lower: TimeValue, upper: TimeValue) -> Lifespan {
        Lifespan::new(lower, upper)
    }

    #[test]
    fn test_active_intervals_without_gaps() {
        let buffer = Buffer::new("a", iv(0, 10), 1);
        let active: Vec<_> = buffer.active_intervals().collect();
        assert_eq!(active, vec![iv(0, 10)]);
    }

    #[test]
    fn test_active_intervals_with_gaps() {
        let buffer = Buffer::new("a", iv(0, 10), 1).with_gaps([iv(1, 4), iv(6, 9)]);
        let active: Vec<_> = buffer.active_intervals().collect();
        assert_eq!(active, vec![iv(0, 1), iv(4, 6), iv(9, 10)]);
    }

    #[test]
    fn test_active_intervals_recompose_to_active_set() {
        // Decomposition followed by recomposition yields the original
        // active set at every point in time.
        let buffer = Buffer::new("a", iv(0, 20), 1).with_gaps([iv(2, 5), iv(9, 12), iv(15, 18)]);
        let active: Vec<_> = buffer.active_intervals().collect();

        for t in -2..22 {
            let in_pieces = active.iter().any(|p| p.contains_point(t));
            assert_eq!(in_pieces, buffer.is_active_at(t), "mismatch at t={}", t);
        }

        let recomposed: TimeValue = active.iter().map(|p| p.len()).sum();
        assert_eq!(recomposed, buffer.active_length());
    }

    #[test]
    fn test_area_uses_active_length() {
        let buffer = Buffer::new("a", iv(0, 10), 4).with_gap(iv(2, 7));
        assert_eq!(buffer.active_length(), 5);
        assert_eq!(buffer.area(), 20);
    }

    #[test]
    fn test_is_active_at_boundaries() {
        let buffer = Buffer::new("a", iv(0, 10), 1).with_gap(iv(4, 6));
        assert!(buffer.is_active_at(0));
        assert!(buffer.is_active_at(3));
        assert!(!buffer.is_active_at(4));
        assert!(!buffer.is_active_at(5));
        assert!(buffer.is_active_at(6));
        assert!(buffer.is_active_at(9));
        assert!(!buffer.is_active_at(10));
        assert!(!buffer.is_active_at(-1));
    }
}
