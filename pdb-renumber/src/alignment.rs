//! Correspondence between the original residue numbers and the new ones.
use std::fmt;
use std::io::{self, Write};

use crate::parsers::line::split_terminator;

/// One residue whose number was looked at: the first residue of each chain,
/// and every residue where the numbering changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentEntry {
    /// Residue name and chain identifier, as written in the file.
    pub label: String,
    /// Residue number as written in the file, padding included.
    pub original_key: String,
    pub original_identifier: isize,
    pub new_number: isize,
}

impl AlignmentEntry {
    pub fn is_unchanged(&self) -> bool {
        self.original_identifier == self.new_number
    }
}

impl fmt::Display for AlignmentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unchanged = if self.is_unchanged() { "True" } else { "False" };
        write!(
            f,
            "{:<8}{:>6}{:>6}{:>10}",
            self.label, self.original_key, self.new_number, unchanged
        )
    }
}

/// Write an alignment file.
///
/// The first line is a comment echoing `header`, usually the first line of
/// the renumbered file, followed by one line per entry. The header keeps its
/// own line terminator if it has one.
pub fn write_alignment<W>(mut output: W, header: &str, entries: &[AlignmentEntry]) -> io::Result<()>
where
    W: Write,
{
    let (header, terminator) = split_terminator(header);
    let terminator = if terminator.is_empty() { "\n" } else { terminator };
    write!(output, "#{header}{terminator}")?;
    for entry in entries {
        writeln!(output, "{entry}")?;
    }
    output.flush()
}
