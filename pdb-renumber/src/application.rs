extern crate clap;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use futures::future::join_all;
use log::{debug, error, info};
use thiserror::Error;

use crate::output::OutputPaths;
use crate::parsers::errors::ReadError;
use crate::parsers::read_pdb_lines;
use crate::renumber::{renumber, RenumberError};

/// Renumber the residues of PDB files so they are contiguous in each chain.
///
/// The renumbered file for `<name>.pdb` is written as `<name>_res-renum.pdb`
/// in the current directory.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// The PDB files to renumber.
    #[clap(value_parser, required = true)]
    pub input_paths: Vec<PathBuf>,
    /// Also write the residue alignment as `<name>_res-algn.out`.
    #[clap(short, long, value_parser, default_value_t = false)]
    pub align_out: bool,
    /// Display more information about what the software does.
    #[clap(short, long, value_parser, default_value_t = false)]
    pub verbose: bool,
    /// Be very verbose about what the software does.
    #[clap(short, long, value_parser, default_value_t = false)]
    pub trace: bool,
}

/// Why a single file could not be renumbered.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Cannot derive the output file names from {}.", .path.display())]
    NoFileName { path: PathBuf },
    #[error("Cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: ReadError },
    #[error("Cannot renumber {}: {source}", .path.display())]
    Renumber { path: PathBuf, source: RenumberError },
    #[error("Cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(
        "Skipping {}: its output files are the same as for {}.",
        .path.display(),
        .first.display()
    )]
    DuplicateOutput { path: PathBuf, first: PathBuf },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot access the output directory: {0}")]
    OutputDirectory(#[source] io::Error),
    #[error("{failed} out of {total} files could not be renumbered.")]
    FailedFiles { failed: usize, total: usize },
}

/// The current directory, where the output files go.
pub fn default_output_directory() -> Result<PathBuf, AppError> {
    std::env::current_dir().map_err(AppError::OutputDirectory)
}

/// Read, renumber, and write one file.
///
/// Nothing is written unless the whole file could be renumbered.
pub async fn process_file(
    input: &Path,
    output_directory: &Path,
    align_out: bool,
) -> Result<OutputPaths, FileError> {
    let outputs =
        OutputPaths::new(input, output_directory).ok_or_else(|| FileError::NoFileName {
            path: input.to_path_buf(),
        })?;
    let read_error = |source: ReadError| FileError::Read {
        path: input.to_path_buf(),
        source,
    };

    let content = tokio::fs::read(input)
        .await
        .map_err(|error| read_error(ReadError::IOError(error)))?;
    let lines = read_pdb_lines(content.as_slice()).map_err(read_error)?;
    debug!("Read {} lines from {}.", lines.len(), input.display());

    let renumbered = renumber(&lines).map_err(|source| FileError::Renumber {
        path: input.to_path_buf(),
        source,
    })?;

    let mut buffer = Vec::new();
    renumbered
        .write_pdb(&mut buffer)
        .map_err(|source| FileError::Write {
            path: outputs.renumbered.clone(),
            source,
        })?;
    write_file(&outputs.renumbered, buffer).await?;
    info!(
        "Renumbered {} into {}.",
        input.display(),
        outputs.renumbered.display()
    );

    if align_out {
        let mut buffer = Vec::new();
        renumbered
            .write_alignment(&mut buffer)
            .map_err(|source| FileError::Write {
                path: outputs.alignment.clone(),
                source,
            })?;
        write_file(&outputs.alignment, buffer).await?;
        info!(
            "Residue alignment written out to {}.",
            outputs.alignment.display()
        );
    }

    Ok(outputs)
}

async fn write_file(path: &Path, content: Vec<u8>) -> Result<(), FileError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Renumber every input file of the command line, each in its own task.
///
/// A file that fails does not prevent the others from being written. When
/// several inputs share a file stem, only the first one is renumbered; the
/// others fail instead of racing to write the same files. The output paths
/// of the files that succeeded are returned in input order.
pub async fn main_to_wrap(
    cli: Cli,
    output_directory: PathBuf,
) -> Result<Vec<OutputPaths>, AppError> {
    let total = cli.input_paths.len();
    let align_out = cli.align_out;
    let mut claimed_outputs: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut tasks = Vec::with_capacity(total);
    for input in cli.input_paths {
        let first_claim = OutputPaths::new(&input, &output_directory).and_then(|outputs| {
            match claimed_outputs.entry(outputs.renumbered) {
                Entry::Occupied(claim) => Some(claim.get().clone()),
                Entry::Vacant(claim) => {
                    claim.insert(input.clone());
                    None
                }
            }
        });
        let output_directory = output_directory.clone();
        tasks.push(tokio::spawn(async move {
            if let Some(first) = first_claim {
                return Err(FileError::DuplicateOutput { path: input, first });
            }
            process_file(&input, &output_directory, align_out).await
        }));
    }

    let mut written = Vec::with_capacity(total);
    let mut failed = 0;
    for joined in join_all(tasks).await {
        match joined {
            Ok(Ok(outputs)) => written.push(outputs),
            Ok(Err(error)) => {
                error!("{error}");
                failed += 1;
            }
            Err(join_error) => {
                error!("A renumbering task stopped unexpectedly: {join_error}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(AppError::FailedFiles { failed, total });
    }
    Ok(written)
}
