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

use crate::{
    buffer::{Buffer, Gap},
    index::BufferIndex,
    solution::Solution,
    Capacity, Offset,
};

/// A complete allocation problem: a list of buffers that must be packed
/// into a single contiguous address space of the given capacity.
///
/// Buffers are identified by position (`BufferIndex`). No buffer may be
/// assigned an offset such that `offset + size > capacity`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Problem {
    /// The allocation requests, addressed by `BufferIndex`.
    pub buffers: Vec<Buffer>,
    /// The total size of the memory address space.
    pub capacity: Capacity,
}

impl Problem {
    /// Creates an empty problem with the given capacity.
    #[inline]
    pub fn new(capacity: Capacity) -> Self {
        Self {
            buffers: Vec::new(),
            capacity,
        }
    }

    /// Appends a buffer and returns its index.
    #[inline]
    pub fn add_buffer(&mut self, buffer: Buffer) -> BufferIndex {
        self.buffers.push(buffer);
        BufferIndex::new(self.buffers.len() - 1)
    }

    /// Returns the number of buffers.
    #[inline]
    pub fn num_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Returns a reference to the buffer at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_buffers()`.
    #[inline]
    pub fn buffer(&self, index: BufferIndex) -> &Buffer {
        debug_assert!(
            index.get() < self.num_buffers(),
            "called `Problem::buffer` with buffer index out of bounds: the len is {} but the index is {}",
            self.num_buffers(),
            index.get()
        );

        &self.buffers[index.get()]
    }

    /// Extracts a `Solution` from the fixed offset of each buffer,
    /// clearing the offsets in the process.
    ///
    /// Returns `ProblemError::MissingOffset` if any buffer carries no
    /// offset; in that case the problem is left unmodified.
    pub fn strip_solution(&mut self) -> Result<Solution, ProblemError> {
        if let Some(position) = self.buffers.iter().position(|b| b.offset.is_none()) {
            return Err(ProblemError::MissingOffset {
                buffer: BufferIndex::new(position),
            });
        }

        let offsets: Vec<Offset> = self
            .buffers
            .iter_mut()
            .map(|b| b.offset.take().unwrap_or_default())
            .collect();
        Ok(Solution::new(offsets))
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Problem(num_buffers: {}, capacity: {})",
            self.num_buffers(),
            self.capacity
        )
    }
}

/// The structural error taxonomy for allocation problems.
///
/// These errors describe inputs the solver cannot recover from; they are
/// raised by canonicalization (or `strip_solution`) and bubbled to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    /// A buffer's lifespan is empty (`lower >= upper`).
    EmptyLifespan { buffer: BufferIndex },
    /// A buffer's size is zero or negative.
    NonPositiveSize { buffer: BufferIndex },
    /// A buffer's alignment is smaller than 1.
    InvalidAlignment { buffer: BufferIndex },
    /// A gap extends outside its buffer's lifespan.
    GapOutsideLifespan { buffer: BufferIndex, gap: Gap },
    /// The merged gaps cover the buffer's entire lifespan, leaving it
    /// active at no point in time.
    GapsCoverLifespan { buffer: BufferIndex },
    /// A fixed offset is negative or exceeds `capacity - size`.
    FixedOffsetOutOfRange { buffer: BufferIndex, offset: Offset },
    /// A fixed offset is not a multiple of the buffer's alignment.
    FixedOffsetMisaligned { buffer: BufferIndex, offset: Offset },
    /// `strip_solution` was called while some buffer has no offset.
    MissingOffset { buffer: BufferIndex },
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLifespan { buffer } => {
                write!(f, "buffer {} has an empty lifespan", buffer.get())
            }
            Self::NonPositiveSize { buffer } => {
                write!(f, "buffer {} has a non-positive size", buffer.get())
            }
            Self::InvalidAlignment { buffer } => {
                write!(f, "buffer {} has an alignment smaller than 1", buffer.get())
            }
            Self::GapOutsideLifespan { buffer, gap } => {
                write!(
                    f,
                    "buffer {} has gap {} outside its lifespan",
                    buffer.get(),
                    gap
                )
            }
            Self::GapsCoverLifespan { buffer } => {
                write!(
                    f,
                    "buffer {} is covered entirely by its gaps",
                    buffer.get()
                )
            }
            Self::FixedOffsetOutOfRange { buffer, offset } => {
                write!(
                    f,
                    "buffer {} has fixed offset {} outside the capacity range",
                    buffer.get(),
                    offset
                )
            }
            Self::FixedOffsetMisaligned { buffer, offset } => {
                write!(
                    f,
                    "buffer {} has fixed offset {} violating its alignment",
                    buffer.get(),
                    offset
                )
            }
            Self::MissingOffset { buffer } => {
                write!(f, "buffer {} has no offset to strip", buffer.get())
            }
        }
    }
}

impl std::error::Error for ProblemError {}
