use std::{fmt, io};

/// Transport and codec failures. Truncated messages are NOT errors: the
/// framing layer reports them as "no message" (`Ok(None)`) so that callers
/// treat them as a unit that produced no result.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    CouldNotEncodeMessage,
    CouldNotDecodeMessage,
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::CouldNotEncodeMessage => write!(f, "could not encode message"),
            Error::CouldNotDecodeMessage => write!(f, "could not decode message"),
        }
    }
}

impl std::error::Error for Error {}
