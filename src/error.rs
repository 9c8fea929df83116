use std::{
    error::Error,
    fmt::{Display, Formatter},
};

/// Result type used by the fallible parts of this crate and the programs that use it.
pub type ErrorMapResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Clone, Copy)]
pub struct ErrorMapError {
    pub msg: &'static str,
}

impl Display for ErrorMapError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.msg)
    }
}

impl Error for ErrorMapError {}

/// A coordinate that cannot be placed on the globe (NaN, infinite, or out of range).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for InvalidCoordinate {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "invalid coordinate: latitude={} longitude={}",
            self.latitude, self.longitude
        )
    }
}

impl Error for InvalidCoordinate {}
