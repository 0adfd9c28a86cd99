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

use num_traits::PrimInt;
use smallvec::SmallVec;
use std::cmp::{max, min};

/// A half-open interval `[lower, upper)` over an integer domain.
///
/// The same type describes both axes of the allocation problem: lifespans
/// and gaps on the time axis, and occupied or free byte ranges on the
/// memory axis. Two intervals *overlap* iff they share at least one point;
/// intervals that merely touch (`a.upper == b.lower`) do not overlap.
///
/// Equality is component-wise, and the derived order is lexicographic by
/// `(lower, upper)`, which is the order sorted interval lists rely on.
///
/// # Invariants
///
/// `lower <= upper` at all times.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Interval<T>
where
    T: PrimInt,
{
    lower: T,
    upper: T,
}

impl<T> Interval<T>
where
    T: PrimInt,
{
    /// Creates a new `Interval`.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_core::math::interval::Interval;
    ///
    /// let iv = Interval::new(0, 10);
    /// assert_eq!(iv.len(), 10);
    /// ```
    #[inline]
    pub fn new(lower: T, upper: T) -> Self {
        assert!(
            lower <= upper,
            "Invalid interval: lower must be less than or equal to upper"
        );
        Self { lower, upper }
    }

    /// Creates a new `Interval` if the bounds are valid.
    ///
    /// Returns `None` if `lower > upper`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_core::math::interval::Interval;
    ///
    /// assert!(Interval::try_new(0, 10).is_some());
    /// assert!(Interval::try_new(10, 0).is_none());
    /// ```
    #[inline]
    pub fn try_new(lower: T, upper: T) -> Option<Self> {
        if lower <= upper {
            Some(Self { lower, upper })
        } else {
            None
        }
    }

    /// Creates a new `Interval` without checking the invariant in release
    /// builds.
    ///
    /// The caller must ensure `lower <= upper`; a `debug_assert!` catches
    /// violations during development.
    #[inline]
    pub fn new_unchecked(lower: T, upper: T) -> Self {
        debug_assert!(
            lower <= upper,
            "Invalid interval: lower must be less than or equal to upper"
        );
        Self { lower, upper }
    }

    /// Returns the inclusive lower bound.
    #[inline]
    pub const fn lower(&self) -> T {
        self.lower
    }

    /// Returns the exclusive upper bound.
    #[inline]
    pub const fn upper(&self) -> T {
        self.upper
    }

    /// Returns the length of the interval (`upper - lower`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_core::math::interval::Interval;
    ///
    /// assert_eq!(Interval::new(10, 25).len(), 15);
    /// ```
    #[inline]
    pub fn len(&self) -> T {
        self.upper - self.lower
    }

    /// Returns `true` if the interval is empty (`lower == upper`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    /// Returns `true` if `value` lies in `[lower, upper)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_core::math::interval::Interval;
    ///
    /// let iv = Interval::new(0, 10);
    /// assert!(iv.contains_point(0));
    /// assert!(iv.contains_point(9));
    /// assert!(!iv.contains_point(10));
    /// ```
    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.lower <= value && value < self.upper
    }

    /// Returns `true` if `other` is fully contained within `self`.
    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    /// Returns `true` if this interval shares at least one point with
    /// `other`.
    ///
    /// Touching intervals do not overlap.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_core::math::interval::Interval;
    ///
    /// let a = Interval::new(0, 2);
    /// assert!(a.overlaps(Interval::new(1, 3)));
    /// assert!(!a.overlaps(Interval::new(2, 4)));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: Self) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }

    /// Calculates the intersection of two intervals.
    ///
    /// Returns `None` if the intervals do not overlap.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_core::math::interval::Interval;
    ///
    /// let a = Interval::new(0, 10);
    /// let b = Interval::new(5, 15);
    /// assert_eq!(a.intersection(b), Some(Interval::new(5, 10)));
    /// ```
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let lower = max(self.lower, other.lower);
        let upper = min(self.upper, other.upper);

        if lower < upper {
            Some(Self::new_unchecked(lower, upper))
        } else {
            None
        }
    }

    /// Calculates the set difference `self - other`.
    ///
    /// # Returns
    ///
    /// A list of:
    /// * 0 intervals if `other` fully covers `self`,
    /// * 1 interval if `other` clips one side of `self` or misses it,
    /// * 2 intervals if `other` punches a hole into `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use minimalloc_core::math::interval::Interval;
    ///
    /// let diff = Interval::new(0, 10).difference(Interval::new(4, 6));
    /// assert_eq!(diff.as_slice(), &[Interval::new(0, 4), Interval::new(6, 10)]);
    /// ```
    pub fn difference(&self, other: Self) -> SmallVec<[Self; 2]> {
        if !self.overlaps(other) {
            return smallvec::smallvec![*self];
        }

        let mut parts = SmallVec::new();
        if self.lower < other.lower {
            parts.push(Self::new_unchecked(self.lower, other.lower));
        }
        if other.upper < self.upper {
            parts.push(Self::new_unchecked(other.upper, self.upper));
        }
        parts
    }
}

impl<T> Default for Interval<T>
where
    T: PrimInt,
{
    #[inline]
    fn default() -> Self {
        Self {
            lower: T::zero(),
            upper: T::zero(),
        }
    }
}

impl<T> std::fmt::Display for Interval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

impl<T> From<std::ops::Range<T>> for Interval<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<Interval<T>> for std::ops::Range<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(iv: Interval<T>) -> Self {
        iv.lower..iv.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let iv = Interval::new(10, 20);
        assert_eq!(iv.lower(), 10);
        assert_eq!(iv.upper(), 20);
        assert_eq!(iv.len(), 10);
        assert!(!iv.is_empty());

        let empty = Interval::new(7, 7);
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn test_try_new() {
        assert!(Interval::try_new(5, 10).is_some());
        assert!(Interval::try_new(5, 5).is_some());
        assert!(Interval::try_new(10, 5).is_none());
    }

    #[test]
    #[should_panic(expected = "Invalid interval")]
    fn test_new_panics_on_inverted_bounds() {
        Interval::new(10, 5);
    }

    #[test]
    fn test_ord_is_lexicographic() {
        let mut intervals = vec![
            Interval::new(3, 4),
            Interval::new(0, 9),
            Interval::new(0, 2),
            Interval::new(3, 3),
        ];
        intervals.sort();
        assert_eq!(
            intervals,
            vec![
                Interval::new(0, 2),
                Interval::new(0, 9),
                Interval::new(3, 3),
                Interval::new(3, 4),
            ]
        );
    }

    #[test]
    fn test_overlaps() {
        let a = Interval::new(0, 10);

        // Disjoint left / right
        assert!(!a.overlaps(Interval::new(-5, -1)));
        assert!(!a.overlaps(Interval::new(11, 15)));
        // Touching (half-open): no overlap
        assert!(!a.overlaps(Interval::new(-5, 0)));
        assert!(!a.overlaps(Interval::new(10, 15)));
        // Proper overlap
        assert!(a.overlaps(Interval::new(-5, 1)));
        assert!(a.overlaps(Interval::new(9, 15)));
        // Containment and identity
        assert!(a.overlaps(Interval::new(2, 8)));
        assert!(a.overlaps(a));
        // An empty interval overlaps nothing
        assert!(!a.overlaps(Interval::new(5, 5)));
    }

    #[test]
    fn test_contains() {
        let a = Interval::new(0, 10);
        assert!(a.contains_point(0));
        assert!(!a.contains_point(10));
        assert!(a.contains_interval(Interval::new(0, 10)));
        assert!(a.contains_interval(Interval::new(2, 8)));
        assert!(!a.contains_interval(Interval::new(-1, 5)));
        assert!(!a.contains_interval(Interval::new(5, 11)));
    }

    #[test]
    fn test_intersection() {
        let a = Interval::new(0, 10);
        assert_eq!(
            a.intersection(Interval::new(5, 15)),
            Some(Interval::new(5, 10))
        );
        assert_eq!(
            a.intersection(Interval::new(2, 8)),
            Some(Interval::new(2, 8))
        );
        assert_eq!(a.intersection(Interval::new(10, 20)), None);
        assert_eq!(a.intersection(Interval::new(12, 20)), None);
    }

    #[test]
    fn test_difference() {
        let base = Interval::new(0, 10);

        // Disjoint: unchanged
        let diff = base.difference(Interval::new(12, 15));
        assert_eq!(diff.as_slice(), &[base]);

        // Full cover: empty
        assert!(base.difference(Interval::new(-5, 15)).is_empty());

        // Clip right / left
        let diff = base.difference(Interval::new(8, 15));
        assert_eq!(diff.as_slice(), &[Interval::new(0, 8)]);
        let diff = base.difference(Interval::new(-5, 2));
        assert_eq!(diff.as_slice(), &[Interval::new(2, 10)]);

        // Hole
        let diff = base.difference(Interval::new(4, 6));
        assert_eq!(diff.as_slice(), &[Interval::new(0, 4), Interval::new(6, 10)]);
    }

    #[test]
    fn test_display_and_range_conversions() {
        let iv = Interval::new(10, 20);
        assert_eq!(format!("{}", iv), "[10, 20)");

        let from_range = Interval::from(0..4);
        assert_eq!(from_range, Interval::new(0, 4));

        let range: std::ops::Range<i64> = Interval::new(3, 9).into();
        assert_eq!(range, 3..9);
    }
}
