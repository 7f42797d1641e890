use std::ffi::OsString;
use std::path::{Path, PathBuf};

const RENUMBERED_SUFFIX: &str = "_res-renum.pdb";
const ALIGNMENT_SUFFIX: &str = "_res-algn.out";

/// Where the files produced from one input file are written.
///
/// For an input `<name>.pdb`, the renumbered structure is
/// `<name>_res-renum.pdb` and the alignment is `<name>_res-algn.out`, both in
/// the output directory whatever the directory of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub renumbered: PathBuf,
    pub alignment: PathBuf,
}

impl OutputPaths {
    /// Returns `None` if the input path has no file name.
    pub fn new(input: &Path, output_directory: &Path) -> Option<Self> {
        let stem = input.file_stem()?;
        let with_suffix = |suffix: &str| {
            let mut name = OsString::from(stem);
            name.push(suffix);
            output_directory.join(name)
        };
        Some(Self {
            renumbered: with_suffix(RENUMBERED_SUFFIX),
            alignment: with_suffix(ALIGNMENT_SUFFIX),
        })
    }
}
