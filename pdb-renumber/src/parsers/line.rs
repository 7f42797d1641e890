//! Fixed-column access to the PDB records involved in renumbering.
//!
//! All the column offsets live here. Records are classified by their prefix,
//! in the same order of precedence as the PDB readers of the workspace: an
//! `ATOM` prefix wins over `TER`, which wins over `REMARK`. Anything else,
//! `HETATM` included, is passed through untouched.
use std::fmt;
use std::ops::Range;

use crate::parsers::errors::{FieldError, FormatError};

/// Residue name and chain identifier, used as the label of alignment lines.
const LABEL_COLUMNS: Range<usize> = 17..22;
/// Residue sequence number.
const RESIDUE_COLUMNS: Range<usize> = 22..26;
const PREFIX_END: usize = 22;
const SUFFIX_START: usize = 26;

/// Largest residue number that fits in the 4 columns of the field.
pub const MAX_RESIDUE_NUMBER: isize = 9999;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RecordTag {
    Atom,
    Ter,
    Remark,
    Other,
}

impl RecordTag {
    pub fn of(line: &str) -> Self {
        if line.starts_with("ATOM") {
            Self::Atom
        } else if line.starts_with("TER") {
            Self::Ter
        } else if line.starts_with("REMARK") {
            Self::Remark
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Atom => "ATOM",
            Self::Ter => "TER",
            Self::Remark => "REMARK",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// One line of a PDB file, with its fixed columns validated for its kind.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Record<'a> {
    Atom(AtomLine<'a>),
    Ter(TerLine<'a>),
    Remark(&'a str),
    Other(&'a str),
}

impl<'a> Record<'a> {
    pub fn parse(line: &'a str) -> Result<Self, FormatError> {
        match RecordTag::of(line) {
            RecordTag::Atom => AtomLine::parse(line).map(Record::Atom),
            RecordTag::Ter => TerLine::parse(line).map(Record::Ter),
            RecordTag::Remark => Ok(Record::Remark(line)),
            RecordTag::Other => Ok(Record::Other(line)),
        }
    }

    pub fn tag(&self) -> RecordTag {
        match self {
            Self::Atom(_) => RecordTag::Atom,
            Self::Ter(_) => RecordTag::Ter,
            Self::Remark(_) => RecordTag::Remark,
            Self::Other(_) => RecordTag::Other,
        }
    }
}

/// An ATOM line. The residue identifier is parsed when the line is read so
/// that a malformed field is reported at the line it appears on.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct AtomLine<'a> {
    line: &'a str,
    residue_identifier: isize,
}

impl<'a> AtomLine<'a> {
    fn parse(line: &'a str) -> Result<Self, FormatError> {
        if line.len() < SUFFIX_START {
            return Err(FormatError::LineTooShort);
        }
        if !line.as_bytes()[..SUFFIX_START].is_ascii() {
            return Err(FormatError::NotAscii);
        }
        // From this point, slicing the first columns cannot panic.
        let residue_identifier = line[RESIDUE_COLUMNS]
            .trim()
            .parse()
            .map_err(|_| FormatError::FieldFormat(FieldError::ResidueIdentifier))?;
        Ok(Self {
            line,
            residue_identifier,
        })
    }

    pub fn label(&self) -> &'a str {
        &self.line[LABEL_COLUMNS]
    }

    /// The residue number as written in the file, padding included.
    pub fn residue_key(&self) -> &'a str {
        &self.line[RESIDUE_COLUMNS]
    }

    pub fn residue_identifier(&self) -> isize {
        self.residue_identifier
    }

    pub fn with_residue_number(&self, number: isize) -> String {
        splice_residue_number(&self.line[..PREFIX_END], number, &self.line[SUFFIX_START..])
    }
}

/// A TER line. Only the prefix and the residue field matter; a bare `TER`
/// is accepted and gets padded up to the residue field when rewritten.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TerLine<'a> {
    line: &'a str,
}

impl<'a> TerLine<'a> {
    fn parse(line: &'a str) -> Result<Self, FormatError> {
        let fixed_end = line.len().min(SUFFIX_START);
        if !line.as_bytes()[..fixed_end].is_ascii() {
            return Err(FormatError::NotAscii);
        }
        Ok(Self { line })
    }

    pub fn with_residue_number(&self, number: isize) -> String {
        let prefix_end = self.line.len().min(PREFIX_END);
        let suffix = self.line.get(SUFFIX_START..).unwrap_or("");
        splice_residue_number(&self.line[..prefix_end], number, suffix)
    }
}

fn splice_residue_number(prefix: &str, number: isize, suffix: &str) -> String {
    format!("{prefix:<width$}{number:>4}{suffix}", width = PREFIX_END)
}

/// Split a line into its content and its terminator (`\r\n`, `\n`, or
/// nothing for a last line without newline).
pub fn split_terminator(line: &str) -> (&str, &str) {
    let content_end = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .map_or(line.len(), str::len);
    line.split_at(content_end)
}
