// SPDX-License-Identifier: MIT
//
// Error type shared by the terminal and console layers.

use std::io;

use thiserror::Error;

/// Errors from terminal I/O and console configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying device failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A write was accepted only partially.
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Raw mode was requested on something that is not a terminal.
    #[error("not a terminal")]
    NotATerminal,

    /// A configuration option could not be parsed or applied.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

/// Result type for terminal and console operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: gone");
    }

    #[test]
    fn short_write_message() {
        let err = Error::ShortWrite { written: 3, expected: 10 };
        assert_eq!(err.to_string(), "short write: 3 of 10 bytes");
    }

    #[test]
    fn invalid_option_message() {
        let err = Error::InvalidOption("bogus".into());
        assert_eq!(err.to_string(), "invalid option: bogus");
    }
}
