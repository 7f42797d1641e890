use crate::parsers::errors::ReadError;
use std::io::{self, BufRead, Write};

/// Read all the lines of a PDB file, each with its own line terminator.
///
/// The lines are not interpreted here; classification happens when they are
/// renumbered, so that the order and content of records is kept as is. A last
/// line without newline stays without newline.
pub fn read_pdb_lines<F>(mut input: F) -> Result<Vec<String>, ReadError>
where
    F: BufRead,
{
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Write lines as they are; they are expected to carry their terminators.
pub fn write_pdb_lines<W, S>(mut output: W, lines: &[S]) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for line in lines {
        output.write_all(line.as_ref().as_bytes())?;
    }
    output.flush()
}
