use std::io;
use thiserror::Error;

/// When a PDB field is ill-formatted, this enum tells what field has the issue.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldError {
    ResidueIdentifier,
}

/// What went wrong when reading an ATOM or TER line in a PDB file?
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum FormatError {
    #[error("the residue identifier field (columns 23-26) is not an integer")]
    FieldFormat(FieldError),
    #[error("the line is too short to contain a residue identifier")]
    LineTooShort,
    #[error("the fixed-width columns contain non-ASCII characters")]
    NotAscii,
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Error while reading the file: {0}")]
    IOError(#[from] io::Error),
}
