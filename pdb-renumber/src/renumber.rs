//! Renumber the residues of each chain so they are contiguous.
//!
//! A chain starts at the first ATOM record of the file, or at the first ATOM
//! record after a TER record. Its first residue keeps its number if it is
//! positive, and is numbered 1 otherwise. Every time the residue number field
//! changes from one ATOM record to the next, the new number is incremented by
//! one, whatever the original numbering was.
use std::io::{self, Write};

use log::{debug, trace};
use thiserror::Error;

use crate::alignment::{self, AlignmentEntry};
use crate::parsers::errors::FormatError;
use crate::parsers::line::{split_terminator, AtomLine, MAX_RESIDUE_NUMBER};
use crate::parsers::pdb::write_pdb_lines;
use crate::parsers::{Record, RecordTag};

/// Inserted before the first REMARK record of the input, padded to 80 columns.
pub const RENUMBER_REMARK: &str = "REMARK    *ALL GAPS IN CHAIN RENUMBERED*";
const RECORD_WIDTH: usize = 80;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenumberError {
    #[error("No REMARK record to insert the renumbering remark before.")]
    MissingAnchor,
    #[error("Line {line}: TER record without any ATOM record in its chain.")]
    EmptyChain { line: usize },
    #[error("The input does not contain any ATOM record.")]
    NoAtoms,
    #[error("Line {line}: ill-formatted {tag} record: {source}.")]
    Format {
        line: usize,
        tag: RecordTag,
        source: FormatError,
    },
    #[error("Line {line}: residue number {number} does not fit in the 4 columns of the field.")]
    ResidueNumberOverflow { line: usize, number: isize },
}

/// The renumbered records, and how the residue numbers were mapped. Each
/// record keeps the line terminator it had in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renumbered {
    pub records: Vec<String>,
    pub alignment: Vec<AlignmentEntry>,
}

impl Renumbered {
    pub fn write_pdb<W: Write>(&self, output: W) -> io::Result<()> {
        write_pdb_lines(output, &self.records)
    }

    /// Write the alignment, with the first renumbered record as header.
    pub fn write_alignment<W: Write>(&self, output: W) -> io::Result<()> {
        let header = self.records.first().map(String::as_str).unwrap_or_default();
        alignment::write_alignment(output, header, &self.alignment)
    }
}

/// The chain being renumbered.
#[derive(Debug)]
struct OpenChain<'a> {
    current_key: &'a str,
    output_counter: isize,
}

/// What needs to be remembered from one record to the next. When `chain` is
/// `None`, the next ATOM record starts a new chain.
#[derive(Debug, Default)]
struct RenumberState<'a> {
    chain: Option<OpenChain<'a>>,
    chain_count: usize,
}

impl<'a> RenumberState<'a> {
    /// Account for an ATOM record. Returns the residue number to write, and
    /// an alignment entry if the record starts a chain or a new residue.
    fn visit_atom(
        &mut self,
        atom: &AtomLine<'a>,
        lineno: usize,
    ) -> (isize, Option<AlignmentEntry>) {
        let key = atom.residue_key();
        let output_counter = match &mut self.chain {
            None => {
                let output_counter = atom.residue_identifier().max(1);
                self.chain_count += 1;
                trace!(
                    "Line {lineno}: chain starts at residue {} ({}), numbered {output_counter}.",
                    key.trim(),
                    atom.label()
                );
                self.chain = Some(OpenChain {
                    current_key: key,
                    output_counter,
                });
                output_counter
            }
            Some(chain) if chain.current_key != key => {
                chain.output_counter += 1;
                chain.current_key = key;
                chain.output_counter
            }
            Some(chain) => return (chain.output_counter, None),
        };
        let entry = AlignmentEntry {
            label: atom.label().to_string(),
            original_key: key.to_string(),
            original_identifier: atom.residue_identifier(),
            new_number: output_counter,
        };
        (output_counter, Some(entry))
    }

    /// Close the current chain, returning its last residue number.
    fn close_chain(&mut self) -> Option<isize> {
        self.chain.take().map(|chain| chain.output_counter)
    }
}

fn checked_residue_number(number: isize, lineno: usize) -> Result<isize, RenumberError> {
    if number > MAX_RESIDUE_NUMBER {
        return Err(RenumberError::ResidueNumberOverflow {
            line: lineno,
            number,
        });
    }
    Ok(number)
}

/// Renumber the residues of every chain in the lines of a PDB file.
///
/// Only the residue number field of ATOM and TER records is modified; every
/// other record is kept as is, in the same order, line terminator included.
/// A remark is inserted before the first REMARK record, so the output has
/// one more line than the input. The remark ends with the first line
/// terminator found in the input, if any.
pub fn renumber<S>(lines: &[S]) -> Result<Renumbered, RenumberError>
where
    S: AsRef<str>,
{
    let mut state = RenumberState::default();
    let mut records = Vec::with_capacity(lines.len() + 1);
    let mut alignment = Vec::new();
    let mut anchor = None;
    let mut atom_count = 0;
    let mut line_ending = "";

    for (index, line) in lines.iter().enumerate() {
        let (line, terminator) = split_terminator(line.as_ref());
        if line_ending.is_empty() {
            line_ending = terminator;
        }
        let lineno = index + 1;
        let record = Record::parse(line).map_err(|source| RenumberError::Format {
            line: lineno,
            tag: RecordTag::of(line),
            source,
        })?;
        match record {
            Record::Atom(atom) => {
                atom_count += 1;
                let (number, entry) = state.visit_atom(&atom, lineno);
                alignment.extend(entry);
                let number = checked_residue_number(number, lineno)?;
                records.push(atom.with_residue_number(number) + terminator);
            }
            Record::Ter(ter) => {
                let number = state
                    .close_chain()
                    .ok_or(RenumberError::EmptyChain { line: lineno })?;
                records.push(ter.with_residue_number(number) + terminator);
            }
            Record::Remark(line) => {
                anchor.get_or_insert(index);
                records.push([line, terminator].concat());
            }
            Record::Other(line) => records.push([line, terminator].concat()),
        }
    }

    if atom_count == 0 {
        return Err(RenumberError::NoAtoms);
    }
    let anchor = anchor.ok_or(RenumberError::MissingAnchor)?;
    // Records and input lines are in index correspondence until the insertion.
    records.insert(
        anchor,
        format!("{:<width$}{line_ending}", RENUMBER_REMARK, width = RECORD_WIDTH),
    );

    debug!(
        "Renumbered {atom_count} atoms in {} chains, {} residue numbers looked at.",
        state.chain_count,
        alignment.len()
    );
    Ok(Renumbered { records, alignment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn atom(serial: usize, residue_name: &str, chain: char, residue: &str) -> String {
        format!(
            "ATOM  {serial:>5}  N   {residue_name} {chain}{residue:>4}       1.000   2.000   3.000  1.00 20.00           N  "
        )
    }

    fn ter(serial: usize, residue_name: &str, chain: char, residue: &str) -> String {
        format!("TER   {serial:>5}      {residue_name} {chain}{residue:>4}")
    }

    fn remark() -> String {
        String::from("REMARK   1 SOMETHING")
    }

    fn residue_numbers(records: &[String], prefix: &str) -> Vec<isize> {
        records
            .iter()
            .filter(|line| line.starts_with(prefix))
            .map(|line| line[22..26].trim().parse().unwrap())
            .collect()
    }

    fn summary(alignment: &[AlignmentEntry]) -> Vec<(isize, isize, bool)> {
        alignment
            .iter()
            .map(|entry| (entry.original_identifier, entry.new_number, entry.is_unchanged()))
            .collect()
    }

    fn two_chains() -> Vec<String> {
        vec![
            remark(),
            atom(1, "ALA", 'A', "5"),
            atom(2, "ALA", 'A', "5"),
            atom(3, "GLY", 'A', "7"),
            atom(4, "GLY", 'A', "7"),
            atom(5, "SER", 'A', "9"),
            ter(6, "SER", 'A', "9"),
            atom(7, "LYS", 'B', "-3"),
            atom(8, "LYS", 'B', "-3"),
            atom(9, "MET", 'B', "-2"),
            ter(10, "MET", 'B', "-2"),
            String::from("END"),
        ]
    }

    #[test]
    fn test_gapped_chains() {
        let renumbered = renumber(&two_chains()).unwrap();
        assert_eq!(
            residue_numbers(&renumbered.records, "ATOM"),
            vec![5, 5, 6, 6, 7, 1, 1, 2]
        );
        assert_eq!(residue_numbers(&renumbered.records, "TER"), vec![7, 2]);
        assert_eq!(
            summary(&renumbered.alignment),
            vec![
                (5, 5, true),
                (7, 6, false),
                (9, 7, false),
                (-3, 1, false),
                (-2, 2, false),
            ]
        );
        assert_eq!(renumbered.alignment[0].label, "ALA A");
        assert_eq!(renumbered.alignment[3].original_key, "  -3");
    }

    #[rstest]
    #[case("-3", 1)]
    #[case("0", 1)]
    #[case("1", 1)]
    #[case("5", 5)]
    #[case("1024", 1024)]
    fn test_first_residue_floor(#[case] first: &str, #[case] expected: isize) {
        let lines = vec![remark(), atom(1, "ALA", 'A', first), atom(2, "ALA", 'A', "9999")];
        let renumbered = renumber(&lines).unwrap();
        assert_eq!(
            residue_numbers(&renumbered.records, "ATOM"),
            vec![expected, expected + 1]
        );
    }

    #[test]
    fn test_contiguous_chain_is_unchanged() {
        let lines = vec![
            remark(),
            atom(1, "ALA", 'A', "1"),
            atom(2, "GLY", 'A', "2"),
            atom(3, "GLY", 'A', "2"),
            atom(4, "SER", 'A', "3"),
            ter(5, "SER", 'A', "3"),
        ];
        let renumbered = renumber(&lines).unwrap();
        assert_eq!(renumbered.records[1..], lines[..]);
        assert_eq!(renumbered.alignment.len(), 3);
        assert!(renumbered.alignment.iter().all(AlignmentEntry::is_unchanged));
    }

    #[test]
    fn test_chain_isolation() {
        let lines = vec![
            remark(),
            atom(1, "ALA", 'A', "10"),
            atom(2, "GLY", 'A', "20"),
            ter(3, "GLY", 'A', "20"),
            atom(4, "SER", 'B', "3"),
            atom(5, "LYS", 'B', "30"),
            ter(6, "LYS", 'B', "30"),
        ];
        let renumbered = renumber(&lines).unwrap();
        assert_eq!(residue_numbers(&renumbered.records, "ATOM"), vec![10, 11, 3, 4]);
        assert_eq!(residue_numbers(&renumbered.records, "TER"), vec![11, 4]);
    }

    #[test]
    fn test_disordered_numbering() {
        let lines = vec![
            remark(),
            atom(1, "ALA", 'A', "10"),
            atom(2, "GLY", 'A', "3"),
            atom(3, "SER", 'A', "10"),
            atom(4, "SER", 'A', "10"),
        ];
        let renumbered = renumber(&lines).unwrap();
        assert_eq!(residue_numbers(&renumbered.records, "ATOM"), vec![10, 11, 12, 12]);
        assert_eq!(renumbered.alignment.len(), 3);
    }

    #[test]
    fn test_remark_inserted_before_first_remark() {
        let mut lines = two_chains();
        lines.insert(0, String::from("HEADER    SOMETHING"));
        lines.insert(4, String::from("REMARK   2 ANOTHER ONE"));
        let renumbered = renumber(&lines).unwrap();
        assert_eq!(renumbered.records.len(), lines.len() + 1);
        assert_eq!(renumbered.records[0], lines[0]);
        assert_eq!(renumbered.records[1].len(), 80);
        assert_eq!(renumbered.records[1].trim_end(), RENUMBER_REMARK);
        assert_eq!(renumbered.records[2], lines[1]);
    }

    #[test]
    fn test_remark_after_atoms() {
        let lines = vec![
            atom(1, "ALA", 'A', "5"),
            ter(2, "ALA", 'A', "5"),
            remark(),
            String::from("END"),
        ];
        let renumbered = renumber(&lines).unwrap();
        assert_eq!(renumbered.records.len(), 5);
        assert_eq!(renumbered.records[2].trim_end(), RENUMBER_REMARK);
        assert_eq!(renumbered.records[3], remark());
    }

    #[test]
    fn test_line_terminators_are_kept() {
        let crlf = |line: String| line + "\r\n";
        let lines = vec![
            crlf(String::from("HEADER    SOMETHING")),
            crlf(remark()),
            crlf(atom(1, "ALA", 'A', "5")),
            crlf(atom(2, "GLY", 'A', "7")),
            crlf(ter(3, "GLY", 'A', "7")),
            String::from("END"),
        ];
        let renumbered = renumber(&lines).unwrap();
        let expected = vec![
            lines[0].clone(),
            crlf(format!("{RENUMBER_REMARK:<80}")),
            lines[1].clone(),
            lines[2].clone(),
            crlf(atom(2, "GLY", 'A', "6")),
            crlf(ter(3, "GLY", 'A', "6")),
            String::from("END"),
        ];
        assert_eq!(renumbered.records, expected);
    }

    #[test]
    fn test_other_records_pass_through() {
        let hetatm =
            "HETATM   12  O   HOH W 101       8.000   8.000   8.000  1.00 30.00           O  ";
        let lines = vec![
            remark(),
            atom(1, "ALA", 'A', "5"),
            hetatm.to_string(),
            String::from("END"),
        ];
        let renumbered = renumber(&lines).unwrap();
        assert_eq!(renumbered.records[3], hetatm);
        assert_eq!(renumbered.records[4], "END");
    }

    #[test]
    fn test_missing_anchor() {
        let lines = vec![atom(1, "ALA", 'A', "5"), ter(2, "ALA", 'A', "5")];
        assert_eq!(renumber(&lines), Err(RenumberError::MissingAnchor));
    }

    #[test]
    fn test_empty_input() {
        let lines: Vec<String> = Vec::new();
        assert_eq!(renumber(&lines), Err(RenumberError::NoAtoms));
    }

    #[test]
    fn test_no_atoms() {
        let lines = vec![remark(), String::from("END")];
        assert_eq!(renumber(&lines), Err(RenumberError::NoAtoms));
    }

    #[rstest]
    #[case(vec![remark(), ter(1, "ALA", 'A', "5")], 2)]
    #[case(vec![remark(), atom(1, "ALA", 'A', "5"), ter(2, "ALA", 'A', "5"), ter(3, "ALA", 'A', "5")], 4)]
    fn test_empty_chain(#[case] lines: Vec<String>, #[case] line: usize) {
        assert_eq!(renumber(&lines), Err(RenumberError::EmptyChain { line }));
    }

    #[test]
    fn test_malformed_residue_number() {
        let mut lines = two_chains();
        lines[3] = atom(3, "GLY", 'A', "X");
        let error = renumber(&lines).unwrap_err();
        assert_eq!(
            error,
            RenumberError::Format {
                line: 4,
                tag: RecordTag::Atom,
                source: FormatError::FieldFormat(
                    crate::parsers::errors::FieldError::ResidueIdentifier
                ),
            }
        );
        assert!(error.to_string().starts_with("Line 4: ill-formatted ATOM record"));
    }

    #[test]
    fn test_truncated_atom() {
        let lines = vec![remark(), String::from("ATOM      1  N   ALA A")];
        assert_eq!(
            renumber(&lines),
            Err(RenumberError::Format {
                line: 2,
                tag: RecordTag::Atom,
                source: FormatError::LineTooShort,
            })
        );
    }

    #[test]
    fn test_residue_number_overflow() {
        let lines = vec![
            remark(),
            atom(1, "ALA", 'A', "9999"),
            atom(2, "GLY", 'A', "1"),
        ];
        assert_eq!(
            renumber(&lines),
            Err(RenumberError::ResidueNumberOverflow {
                line: 3,
                number: 10000
            })
        );
    }

    #[test]
    fn test_alignment_header() {
        let renumbered = renumber(&two_chains()).unwrap();
        let mut buffer = Vec::new();
        renumbered.write_alignment(&mut buffer).unwrap();
        let written = String::from_utf8(buffer).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().map(str::trim_end),
            Some("#REMARK    *ALL GAPS IN CHAIN RENUMBERED*")
        );
        assert_eq!(lines.count(), 5);
    }
}
