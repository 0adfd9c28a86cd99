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

//! Problem canonicalization.
//!
//! Canonicalization turns an arbitrary (possibly messy) problem into the
//! normal form the search engine and the overlap engine rely on:
//!
//! - every buffer is structurally valid (non-empty lifespan, positive
//!   size, alignment at least 1, fixed offset within capacity and
//!   alignment),
//! - gaps are sorted, merged when overlapping or adjacent, and strictly
//!   interior to the lifespan — a gap touching a lifespan boundary is
//!   equivalent to a shorter lifespan and is converted into one.
//!
//! The pass is idempotent and never changes which points in time a buffer
//! is active at, so validation verdicts are identical before and after.

use minimalloc_model::{
    buffer::Buffer,
    index::BufferIndex,
    problem::{Problem, ProblemError},
    Capacity, Lifespan,
};
use rangemap::RangeSet;

/// Canonicalizes a problem, returning a structurally validated copy with
/// normalized gaps.
///
/// # Errors
///
/// Returns the first `ProblemError` encountered, in buffer order.
///
/// # Examples
///
/// ```rust
/// # use minimalloc_model::buffer::Buffer;
/// # use minimalloc_model::problem::Problem;
/// # use minimalloc_model::Lifespan;
/// # use minimalloc_solver::canonicalize;
///
/// let mut problem = Problem::new(4);
/// problem.add_buffer(
///     Buffer::new("a", Lifespan::new(0, 10), 1)
///         .with_gaps([Lifespan::new(4, 6), Lifespan::new(6, 8)]),
/// );
///
/// let canonical = canonicalize(&problem).unwrap();
/// assert_eq!(canonical.buffers[0].gaps, vec![Lifespan::new(4, 8)]);
/// ```
pub fn canonicalize(problem: &Problem) -> Result<Problem, ProblemError> {
    let mut canonical = Problem::new(problem.capacity);
    for (index, buffer) in problem.buffers.iter().enumerate() {
        let index = BufferIndex::new(index);
        canonical
            .buffers
            .push(canonicalize_buffer(buffer, index, problem.capacity)?);
    }
    Ok(canonical)
}

fn canonicalize_buffer(
    buffer: &Buffer,
    index: BufferIndex,
    capacity: Capacity,
) -> Result<Buffer, ProblemError> {
    if buffer.lifespan.is_empty() {
        return Err(ProblemError::EmptyLifespan { buffer: index });
    }
    if buffer.size <= 0 {
        return Err(ProblemError::NonPositiveSize { buffer: index });
    }
    if buffer.alignment < 1 {
        return Err(ProblemError::InvalidAlignment { buffer: index });
    }
    if let Some(offset) = buffer.offset {
        if offset < 0 || offset + buffer.size > capacity {
            return Err(ProblemError::FixedOffsetOutOfRange {
                buffer: index,
                offset,
            });
        }
        if offset % buffer.alignment != 0 {
            return Err(ProblemError::FixedOffsetMisaligned {
                buffer: index,
                offset,
            });
        }
    }

    let mut merged = RangeSet::new();
    for gap in &buffer.gaps {
        if gap.is_empty() {
            continue;
        }
        if !buffer.lifespan.contains_interval(*gap) {
            return Err(ProblemError::GapOutsideLifespan {
                buffer: index,
                gap: *gap,
            });
        }
        merged.insert(gap.lower()..gap.upper());
    }

    // Merged gaps are disjoint and non-adjacent, so at most the first can
    // touch the lower lifespan bound and at most the last the upper one.
    let mut lower = buffer.lifespan.lower();
    let mut upper = buffer.lifespan.upper();
    let mut gaps = Vec::new();
    for range in merged.iter() {
        if range.start == lower {
            lower = range.end;
        } else if range.end == upper {
            upper = range.start;
        } else {
            gaps.push(Lifespan::new_unchecked(range.start, range.end));
        }
    }

    if lower >= upper {
        return Err(ProblemError::GapsCoverLifespan { buffer: index });
    }

    Ok(Buffer {
        id: buffer.id.clone(),
        lifespan: Lifespan::new_unchecked(lower, upper),
        size: buffer.size,
        alignment: buffer.alignment,
        gaps,
        offset: buffer.offset,
    })
}
