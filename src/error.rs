use thiserror::Error;

/// Errors raised while configuring the show or setting up the terminal.
///
/// The simulation itself never fails; everything here happens before the
/// first frame or while talking to the terminal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No usable drawing surface at startup.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
