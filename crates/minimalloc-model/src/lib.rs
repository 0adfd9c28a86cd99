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

//! # MiniMalloc Model
//!
//! **The core domain model for the MiniMalloc static memory allocator.**
//!
//! MiniMalloc assigns every buffer of a machine-learning program a byte
//! offset into one contiguous memory region so that no two buffers that are
//! simultaneously alive occupy overlapping addresses. This crate defines
//! the data that problem is stated in, and the pure checks over it:
//!
//! * **`index`**: strongly-typed wrappers (`BufferIndex`, `SectionIndex`)
//!   to prevent logical indexing errors.
//! * **`buffer`**: `Buffer` and `Gap` — a lifespan on the time axis, a
//!   size on the memory axis, alignment, inactive gaps, and an optional
//!   fixed offset.
//! * **`problem`**: `Problem` (buffers + capacity) and the structural
//!   error taxonomy `ProblemError`.
//! * **`solution`**: `Solution`, one offset per buffer.
//! * **`overlap`**: the active-interval overlap predicate shared by the
//!   validator and the solver.
//! * **`validate`**: the solution certifier, a closed `ValidationCode`
//!   enumeration.
//! * **`loading`**: the record-oriented CSV reader/writer for problem
//!   instances. The rest of the crate never depends on it.

pub mod buffer;
pub mod index;
pub mod loading;
pub mod overlap;
pub mod problem;
pub mod solution;
pub mod validate;

use minimalloc_core::math::interval::Interval;

/// An abstract, unitless start/end time of a buffer.
pub type TimeValue = i64;

/// A memory address (e.g. in bytes) assigned to a buffer.
pub type Offset = i64;

/// The maximum memory capacity, defined at the `Problem` level.
pub type Capacity = i64;

/// The unitless product of a buffer's size and its active length.
pub type Area = i64;

/// The half-open time interval during which a buffer nominally exists.
pub type Lifespan = Interval<TimeValue>;
