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

//! The overlap engine, shared by the validator and the solver.
//!
//! Two buffers overlap iff there is a point in time at which both are
//! active, i.e. inside their lifespan and outside every gap. The predicate
//! walks both buffers' active intervals with a two-pointer sweep and runs
//! in `O(|gaps_a| + |gaps_b|)` without allocating.

use crate::buffer::Buffer;

/// Returns `true` iff buffers `a` and `b` are simultaneously active at
/// some point in time.
///
/// Both gap lists must be canonical (sorted, disjoint, interior). A
/// buffer with no gaps contributes its whole lifespan as the single
/// active interval. Touching intervals do not overlap.
///
/// # Examples
///
/// ```rust
/// # use minimalloc_model::buffer::Buffer;
/// # use minimalloc_model::overlap::overlaps;
/// # use minimalloc_model::Lifespan;
///
/// let a = Buffer::new("a", Lifespan::new(0, 2), 1);
/// let b = Buffer::new("b", Lifespan::new(1, 3), 1);
/// let c = Buffer::new("c", Lifespan::new(2, 4), 1);
/// assert!(overlaps(&a, &b));
/// assert!(!overlaps(&a, &c));
/// ```
pub fn overlaps(a: &Buffer, b: &Buffer) -> bool {
    let mut intervals_a = a.active_intervals();
    let mut intervals_b = b.active_intervals();

    let mut current_a = intervals_a.next();
    let mut current_b = intervals_b.next();

    while let (Some(piece_a), Some(piece_b)) = (current_a, current_b) {
        if piece_a.overlaps(piece_b) {
            return true;
        }
        // Advance the interval that ends first; the other one may still
        // intersect what comes next.
        if piece_a.upper() <= piece_b.upper() {
            current_a = intervals_a.next();
        } else {
            current_b = intervals_b.next();
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lifespan;

    fn iv(lower: i64, upper: i64) -> Lifespan {
        Lifespan::new(lower, upper)
    }

    #[test]
    fn test_with_overlap() {
        let a = Buffer::new("a", iv(0, 2), 1);
        let b = Buffer::new("b", iv(1, 3), 1);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_without_overlap() {
        let a = Buffer::new("a", iv(0, 2), 1);
        let b = Buffer::new("b", iv(3, 5), 1);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn test_touching_lifespans_do_not_overlap() {
        let a = Buffer::new("a", iv(0, 2), 1);
        let b = Buffer::new("b", iv(2, 4), 1);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn test_gaps_with_overlap() {
        let a = Buffer::new("a", iv(0, 10), 1).with_gaps([iv(1, 4), iv(6, 9)]);
        let b = Buffer::new("b", iv(5, 15), 1).with_gaps([iv(6, 9), iv(11, 14)]);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_gaps_without_overlap() {
        let a = Buffer::new("a", iv(0, 10), 1).with_gap(iv(1, 9));
        let b = Buffer::new("b", iv(5, 15), 1).with_gap(iv(6, 14));
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn test_gap_shadowing_entire_shared_window() {
        let a = Buffer::new("a", iv(0, 10), 1);
        let b = Buffer::new("b", iv(5, 15), 1).with_gap(iv(5, 10));
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));

        let c = Buffer::new("c", iv(0, 10), 1).with_gap(iv(5, 10));
        let d = Buffer::new("d", iv(5, 15), 1);
        assert!(!overlaps(&c, &d));
        assert!(!overlaps(&d, &c));
    }

    #[test]
    fn test_disjoint_active_sets_interleaved() {
        // The active pieces interleave perfectly without ever sharing a
        // point: a is active on [0,2) and [4,6), b on [2,4) and [6,8).
        let a = Buffer::new("a", iv(0, 6), 1).with_gap(iv(2, 4));
        let b = Buffer::new("b", iv(2, 8), 1).with_gap(iv(4, 6));
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }
}
