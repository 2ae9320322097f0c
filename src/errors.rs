//! Errors and error-related utilities.
//!
//! Every error here is fatal for the batch: the caller is expected to stop
//! and report the message, which always carries the offending raw values.

use std::{error, fmt, result};

/// The result type used throughout this library.
pub type Result<T> = result::Result<T, Box<dyn error::Error>>;

/// Invalid input.
#[derive(Debug)]
pub struct InvalidInput(pub String);

/// Invalid command line argument.
#[derive(Debug)]
pub struct InvalidArgument(pub String);

/// The same position was referenced twice in one notes field.
#[derive(Debug)]
pub struct DuplicateReferenceError {
    pub position: u32,
    pub notes: Vec<String>,
}

/// A flagged token resolved to an empty headword.
#[derive(Debug)]
pub struct EmptyHeadwordError {
    pub token: String,
}

/// The notes field looks like it references a position, but no reference was parsed.
#[derive(Debug)]
pub struct MisformattedReferenceError {
    pub token: String,
    pub position: usize,
    pub notes: String,
}

/// Override table carries only one of the two prebuilt expression lists.
#[derive(Debug)]
pub struct ConflictingInputError(pub String);

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid input: {}", self.0)
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid argument: {}", self.0)
    }
}

impl fmt::Display for DuplicateReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "position {} referenced twice in notes: {:?}",
            self.position, self.notes
        )
    }
}

impl fmt::Display for EmptyHeadwordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "headword empty for flagged token '{}'", self.token)
    }
}

impl fmt::Display for MisformattedReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "incorrect reference format for '{}' | {} | {}",
            self.token, self.position, self.notes
        )
    }
}

impl fmt::Display for ConflictingInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "conflicting input: {}", self.0)
    }
}

impl error::Error for InvalidInput {}

impl error::Error for InvalidArgument {}

impl error::Error for DuplicateReferenceError {}

impl error::Error for EmptyHeadwordError {}

impl error::Error for MisformattedReferenceError {}

impl error::Error for ConflictingInputError {}

/// A helper for constructing [InvalidInput].
pub fn invalid_input(s: String) -> Box<dyn error::Error> {
    InvalidInput(s).into()
}

/// A helper for constructing [InvalidInput].
pub fn invalid_input_ref(s: &str) -> Box<dyn error::Error> {
    InvalidInput(s.to_owned()).into()
}

/// A helper for constructing [InvalidArgument].
pub fn invalid_argument(s: String) -> Box<dyn error::Error> {
    InvalidArgument(s).into()
}
