use std::io;

use failure::Fail;

/// Configuration and I/O failures. Contract violations between a sampler and
/// the code driving it are not represented here: those panic.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Sampler \"{}\" unknown.", _0)]
    UnknownSampler(String),
    #[fail(display = "Invalid value for parameter \"{}\": {}", name, reason)]
    InvalidParameter { name: String, reason: String },
    #[fail(display = "Invalid resolution: {}", _0)]
    InvalidResolution(String),
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),
}

impl Error {
    pub fn invalid_parameter<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Error {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
