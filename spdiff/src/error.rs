//! Common error type.

use crate::store::Error as StoreError;
use spdiff_parse::Error as ParseError;

/// Common error type.
#[derive(Debug, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Store(StoreError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
