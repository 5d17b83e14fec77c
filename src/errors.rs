//
// Errors
//
use std::io;
use std::result;
use std::error;
use std::fmt;
use rusqlite;

/// Type alias for lexcount errors
pub type Result<X> = result::Result<X, Error>;

/// Wrapper for the kinds of errors occuring while counting
#[derive(Debug)]
pub enum Error {
    /// One entity could not be built from the parser output. Contained per entity.
    MalformedOccurrence(String),
    StoreError(String),
    SqliteError(rusqlite::Error),
    ParseError(String),
    IOError(io::Error),
    Other(String),
}

impl Error {
    /// Anything that came out of a counter store
    pub fn is_store_error(&self) -> bool {
        match *self {
            Error::StoreError(_) | Error::SqliteError(_) => true,
            _ => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        match *self {
            Error::MalformedOccurrence(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedOccurrence(ref info) => write!(f, "Malformed occurrence: {}", info),
            Error::StoreError(ref info) => write!(f, "Counter store error: {}", info),
            Error::SqliteError(ref err) => write!(f, "SQLite error: {}", err),
            Error::ParseError(ref info) => {
                write!(f,
                    "Couldn't read the parse dump. Each line should start with one of \
                    sentence, parse, word, link, disjunct or end. The problem was: {}",
                    info)
            },
            Error::IOError(ref err) => write!(f, "IO error: {}", err),
            Error::Other(ref info) => write!(f, "{}", info),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::MalformedOccurrence(_) => None,
            Error::StoreError(_) => None,
            Error::SqliteError(ref err) => Some(err),
            Error::ParseError(_) => None,
            Error::IOError(ref err) => Some(err),
            Error::Other(_) => None,
        }
    }
}
//
// Convert everything else into Error
//
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::SqliteError(err)
    }
}
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IOError(err)
    }
}

//
// Convert Error into a general io Error
//
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}
