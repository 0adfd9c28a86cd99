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

//! Problem instance loader for the record-oriented CSV format.
//!
//! Each instance is a header line followed by one record per buffer:
//!
//! ```raw
//! id,lower,upper,size,alignment,gaps,offset
//! b0,0,10,4,2,1-3;6-8,
//! b1,5,15,4,1,,0
//! ```
//!
//! The `id`, `lower`, `upper`, and `size` columns are required; columns
//! may appear in any order. `gaps` is a semicolon-separated list of
//! `lo-hi` pairs, and an empty `gaps`/`offset`/`alignment` field falls
//! back to the buffer defaults. The memory capacity is not part of the
//! file; it is supplied to the loader, matching the command-line driver
//! that owns this format.
//!
//! The loader accepts any `BufRead`, a file path, or a string slice, and
//! reports descriptive errors carrying the offending line. The rest of
//! the crate consumes structured `Problem` values only and never depends
//! on this module.

use crate::{
    buffer::Buffer, problem::Problem, solution::Solution, Capacity, Lifespan, Offset, TimeValue,
};
use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
    str::FromStr,
};

/// The error type for the problem loading process.
#[derive(Debug)]
pub enum ProblemLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input contains no header line.
    MissingHeader,
    /// The header names a column this format does not define.
    UnknownColumn(String),
    /// The header lacks one of the required columns.
    MissingColumn(&'static str),
    /// A record has a different number of fields than the header.
    FieldCount { line: usize },
    /// A field could not be parsed.
    Parse(ParseFieldError),
}

/// Details about a failed field parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldError {
    /// The field content that failed to parse.
    pub field: String,
    /// The 1-based line the field appeared on.
    pub line: usize,
}

impl std::fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not parse field '{}' on line {}", self.field, self.line)
    }
}

impl std::error::Error for ParseFieldError {}

impl std::fmt::Display for ProblemLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingHeader => write!(f, "input contains no header line"),
            Self::UnknownColumn(name) => write!(f, "unknown column '{name}' in header"),
            Self::MissingColumn(name) => write!(f, "required column '{name}' missing from header"),
            Self::FieldCount { line } => {
                write!(f, "record on line {line} does not match the header field count")
            }
            Self::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for ProblemLoaderError {}

impl From<std::io::Error> for ProblemLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseFieldError> for ProblemLoaderError {
    fn from(e: ParseFieldError) -> Self {
        Self::Parse(e)
    }
}

/// Column positions resolved from the header line.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    id: usize,
    lower: usize,
    upper: usize,
    size: usize,
    alignment: Option<usize>,
    gaps: Option<usize>,
    offset: Option<usize>,
    num_columns: usize,
}

impl ColumnLayout {
    fn from_header(header: &str) -> Result<Self, ProblemLoaderError> {
        let mut id = None;
        let mut lower = None;
        let mut upper = None;
        let mut size = None;
        let mut alignment = None;
        let mut gaps = None;
        let mut offset = None;
        let mut num_columns = 0;

        for (position, name) in header.split(',').enumerate() {
            let slot = match name.trim() {
                "id" => &mut id,
                "lower" => &mut lower,
                "upper" => &mut upper,
                "size" => &mut size,
                "alignment" => &mut alignment,
                "gaps" => &mut gaps,
                "offset" => &mut offset,
                other => return Err(ProblemLoaderError::UnknownColumn(other.to_string())),
            };
            *slot = Some(position);
            num_columns = position + 1;
        }

        Ok(ColumnLayout {
            id: id.ok_or(ProblemLoaderError::MissingColumn("id"))?,
            lower: lower.ok_or(ProblemLoaderError::MissingColumn("lower"))?,
            upper: upper.ok_or(ProblemLoaderError::MissingColumn("upper"))?,
            size: size.ok_or(ProblemLoaderError::MissingColumn("size"))?,
            alignment,
            gaps,
            offset,
            num_columns,
        })
    }
}

/// A loader for CSV problem instances.
///
/// # Examples
///
/// ```rust
/// # use minimalloc_model::loading::ProblemLoader;
///
/// let csv = "id,lower,upper,size\nb0,0,10,4\nb1,5,15,4\n";
/// let problem = ProblemLoader::new(8).from_csv(csv).unwrap();
/// assert_eq!(problem.num_buffers(), 2);
/// assert_eq!(problem.capacity, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemLoader {
    capacity: Capacity,
}

impl ProblemLoader {
    /// Creates a loader producing problems with the given capacity.
    #[inline]
    pub fn new(capacity: Capacity) -> Self {
        Self { capacity }
    }

    /// Loads a problem from a file path.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Problem, ProblemLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a problem from a string slice.
    pub fn from_csv(&self, input: &str) -> Result<Problem, ProblemLoaderError> {
        self.from_bufread(input.as_bytes())
    }

    /// Loads a problem from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, reader: R) -> Result<Problem, ProblemLoaderError> {
        let mut lines = reader.lines().enumerate();

        let layout = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    break ColumnLayout::from_header(&line)?;
                }
                None => return Err(ProblemLoaderError::MissingHeader),
            }
        };

        let mut problem = Problem::new(self.capacity);

        for (index, line) in lines {
            let line = line?;
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != layout.num_columns {
                return Err(ProblemLoaderError::FieldCount { line: line_number });
            }

            let id = fields[layout.id].to_string();
            let lower: TimeValue = parse_field(fields[layout.lower], line_number)?;
            let upper: TimeValue = parse_field(fields[layout.upper], line_number)?;
            let size: i64 = parse_field(fields[layout.size], line_number)?;

            let mut buffer = Buffer::new(id, lifespan(lower, upper, line_number)?, size);

            if let Some(position) = layout.alignment {
                let field = fields[position];
                if !field.is_empty() {
                    buffer.alignment = parse_field(field, line_number)?;
                }
            }
            if let Some(position) = layout.gaps {
                let field = fields[position];
                if !field.is_empty() {
                    buffer.gaps = parse_gaps(field, line_number)?;
                }
            }
            if let Some(position) = layout.offset {
                let field = fields[position];
                if !field.is_empty() {
                    buffer.offset = Some(parse_field(field, line_number)?);
                }
            }

            problem.add_buffer(buffer);
        }

        Ok(problem)
    }
}

fn parse_field<T: FromStr>(field: &str, line: usize) -> Result<T, ParseFieldError> {
    field.parse().map_err(|_| ParseFieldError {
        field: field.to_string(),
        line,
    })
}

fn lifespan(
    lower: TimeValue,
    upper: TimeValue,
    line: usize,
) -> Result<Lifespan, ParseFieldError> {
    Lifespan::try_new(lower, upper).ok_or(ParseFieldError {
        field: format!("{lower}..{upper}"),
        line,
    })
}

fn parse_gaps(field: &str, line: usize) -> Result<Vec<Lifespan>, ParseFieldError> {
    let mut gaps = Vec::new();
    for pair in field.split(';') {
        let (lo, hi) = pair.split_once('-').ok_or(ParseFieldError {
            field: pair.to_string(),
            line,
        })?;
        let lower: TimeValue = parse_field(lo, line)?;
        let upper: TimeValue = parse_field(hi, line)?;
        gaps.push(lifespan(lower, upper, line)?);
    }
    Ok(gaps)
}

/// Writes a problem, together with an optional solution, back out in the
/// CSV format understood by `ProblemLoader`.
///
/// When a solution is supplied, its offsets populate the `offset` column;
/// otherwise the buffers' own pinned offsets are written (empty when
/// absent).
pub fn write_csv<W: Write>(
    problem: &Problem,
    solution: Option<&Solution>,
    writer: &mut W,
) -> std::io::Result<()> {
    writeln!(writer, "id,lower,upper,size,alignment,gaps,offset")?;

    for (index, buffer) in problem.buffers.iter().enumerate() {
        let gaps = buffer
            .gaps
            .iter()
            .map(|g| format!("{}-{}", g.lower(), g.upper()))
            .collect::<Vec<_>>()
            .join(";");

        let offset: Option<Offset> = match solution {
            Some(solution) => Some(solution.offsets()[index]),
            None => buffer.offset,
        };
        let offset = offset.map(|o| o.to_string()).unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            buffer.id,
            buffer.lifespan.lower(),
            buffer.lifespan.upper(),
            buffer.size,
            buffer.alignment,
            gaps,
            offset
        )?;
    }

    Ok(())
}
