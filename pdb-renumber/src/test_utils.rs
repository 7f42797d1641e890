/// Path to a fixture under `ressources/tests/` of this crate.
// Adapted from https://stackoverflow.com/a/74550371
#[macro_export]
macro_rules! test_ressource {
    ($fname:expr) => {
        concat!(env!("CARGO_MANIFEST_DIR"), "/ressources/tests/", $fname) // assumes Linux ('/')!
    };
}
