pub mod test_utils;

pub mod alignment;
pub mod application;
pub mod output;
pub mod parsers;
pub mod renumber;

pub use renumber::{renumber, RenumberError, Renumbered};
