pub mod errors;
pub mod line;
pub mod pdb;

pub use line::{Record, RecordTag};
pub use pdb::{read_pdb_lines, write_pdb_lines};
