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

//! # MiniMalloc Core
//!
//! Foundational primitives for the MiniMalloc static-allocation stack.
//! This crate consolidates the small, reusable building blocks that the
//! model and solver crates are written in terms of.
//!
//! ## Modules
//!
//! - `math`: the half-open `Interval<T>` primitive with validation,
//!   predicates (overlap, containment), set operations (intersection,
//!   difference), and conversions to/from `std::ops::Range`.
//! - `utils`: phantom-tagged, strongly typed indices (`TypedIndex<T>`)
//!   that keep buffer indices and section indices from being mixed up.
//!
//! Refer to each module for detailed APIs and examples.

pub mod math;
pub mod utils;
