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

use crate::{index::BufferIndex, Offset};

/// The assignment produced for an allocation problem: one offset per
/// buffer, parallel to the problem's buffer list.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Solution {
    offsets: Vec<Offset>,
}

impl Solution {
    /// Constructs a solution from a vector of offsets.
    #[inline]
    pub fn new(offsets: Vec<Offset>) -> Self {
        Self { offsets }
    }

    /// Returns the number of buffers covered by this solution.
    #[inline]
    pub fn num_buffers(&self) -> usize {
        self.offsets.len()
    }

    /// Returns the offset assigned to a specific buffer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_buffers()`.
    #[inline]
    pub fn offset(&self, index: BufferIndex) -> Offset {
        debug_assert!(
            index.get() < self.num_buffers(),
            "called `Solution::offset` with buffer index out of bounds: the len is {} but the index is {}",
            self.num_buffers(),
            index.get()
        );

        self.offsets[index.get()]
    }

    /// Returns a slice of all assigned offsets.
    #[inline]
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution(")?;
        for (i, offset) in self.offsets.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", offset)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let solution = Solution::new(vec![0, 4, 2]);
        assert_eq!(solution.num_buffers(), 3);
        assert_eq!(solution.offset(BufferIndex::new(1)), 4);
        assert_eq!(solution.offsets(), &[0, 4, 2]);
    }

    #[test]
    fn test_display() {
        let solution = Solution::new(vec![0, 4]);
        assert_eq!(format!("{}", solution), "Solution(0, 4)");
    }
}
