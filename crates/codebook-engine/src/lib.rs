pub mod check;
pub mod io;
pub mod models;
pub mod parsing;
pub mod renumber;
pub mod roundtrip;
pub mod validation;
pub mod verify;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use check::{
    CheckOptions, DocumentReport, Findings, Unparseable, check_book, check_directory, check_file,
};
pub use io::IoError;
pub use models::*;
pub use parsing::{ParseError, parse_document};
pub use renumber::{NumberedFile, Priority, RenumberError, Renumbering};
pub use roundtrip::{Drift, RoundTrip, check_round_trip};
pub use validation::{ValidationMode, Violation, validate, validate_document};
pub use verify::{
    SourceCheck, SourceKind, SourceReport, SourceRoot, verify_directory, verify_sources,
};
